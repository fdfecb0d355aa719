//! Production progress derived from track stage statuses.

use crate::finance::round_one_decimal;
use crate::status::StageStatus;

/// Stage statuses of one track, in production order.
#[derive(Debug, Clone, Copy)]
pub struct TrackStages<'a> {
    pub recording: &'a str,
    pub mix: &'a str,
    pub master: &'a str,
}

impl TrackStages<'_> {
    fn parsed(&self) -> [StageStatus; 3] {
        [
            StageStatus::from_name(self.recording),
            StageStatus::from_name(self.mix),
            StageStatus::from_name(self.master),
        ]
    }

    /// Percentage complete, where pending counts 0, in progress one half
    /// and done 1 for each of the three stages.
    pub fn progress_pct(&self) -> f64 {
        let total: f64 = self.parsed().iter().map(|s| s.weight()).sum();
        round_one_decimal(total / 3.0 * 100.0)
    }

    /// A track is complete when every stage is done.
    pub fn is_complete(&self) -> bool {
        self.parsed().iter().all(|s| *s == StageStatus::Done)
    }

    /// True when any stage has started but the track is not complete.
    pub fn is_in_progress(&self) -> bool {
        !self.is_complete() && self.parsed().iter().any(|s| *s != StageStatus::Pending)
    }
}

/// Mean track progress for a project. A project with no tracks is at zero.
pub fn project_progress_pct<'a, I>(tracks: I) -> f64
where
    I: IntoIterator<Item = TrackStages<'a>>,
{
    let (sum, count) = tracks
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), t| (sum + t.progress_pct(), count + 1));
    if count == 0 {
        0.0
    } else {
        round_one_decimal(sum / count as f64)
    }
}

//! Handlers for the `/projects` resource, the composite create and the
//! project detail page.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use labelops_core::progress::project_progress_pct;
use labelops_core::search::filter_rows;
use labelops_core::types::DbId;
use labelops_db::mirror::MirrorRecord;
use labelops_db::models::artist::Artist;
use labelops_db::models::producer::Producer;
use labelops_db::models::project::{
    CreateProject, CreateProjectComposite, Project, UpdateProject,
};
use labelops_db::models::reference::Reference;
use labelops_db::models::release::Release;
use labelops_db::models::track::Track;
use labelops_db::repositories::{
    ArtistRepo, BudgetRepo, PaymentRepo, ProducerRepo, ProjectRepo, ReferenceRepo, ReleaseRepo,
    TrackRepo,
};
use serde::Serialize;

use crate::data_access;
use crate::error::AppResult;
use crate::handlers::budget::{summarize, BudgetSummary};
use crate::query::{matches, ProjectListParams};
use crate::response::{Deleted, Loaded, Written};
use crate::state::AppState;

/// A project created together with its first tracks and references.
#[derive(Debug, Serialize)]
pub struct ProjectBundle {
    pub project: Project,
    pub tracks: Vec<Track>,
    pub references: Vec<Reference>,
}

/// Everything the project page shows.
#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    pub project: Project,
    pub artist: Option<Artist>,
    pub producer: Option<Producer>,
    /// Ordered by track number.
    pub tracks: Vec<Track>,
    pub references: Vec<Reference>,
    pub releases: Vec<Release>,
    pub budget: BudgetSummary,
    /// Mean progress over the tracks; 0 without tracks.
    pub progress_pct: f64,
}

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<Written<Project>>)> {
    input.validate()?;
    let written =
        data_access::create::<Project, _>(&state, &input, ProjectRepo::create(&state.pool, &input))
            .await?;
    Ok(written.with_status(StatusCode::CREATED))
}

/// POST /api/v1/projects/composite
///
/// The project, its tracks and its references are written in one
/// transaction, or applied to the mirror as one unit.
pub async fn create_composite(
    State(state): State<AppState>,
    Json(input): Json<CreateProjectComposite>,
) -> AppResult<(StatusCode, Json<Written<ProjectBundle>>)> {
    input.validate()?;
    let written = data_access::write_or_fallback(
        &state,
        Project::KIND,
        "composite create",
        ProjectRepo::create_composite(&state.pool, &input),
        state.mirror.create_project_composite(&input),
    )
    .await?;

    if written.persisted {
        let (project, tracks, references) = &written.data;
        state.mirror.store(project.clone()).await;
        for track in tracks {
            state.mirror.store(track.clone()).await;
        }
        for reference in references {
            state.mirror.store(reference.clone()).await;
        }
    }

    let written = written.map(|(project, tracks, references)| ProjectBundle {
        project,
        tracks,
        references,
    });
    Ok(written.with_status(StatusCode::CREATED))
}

/// GET /api/v1/projects?q=&artist_id=&status=&kind=
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ProjectListParams>,
) -> AppResult<Json<Loaded<Vec<Project>>>> {
    let loaded = data_access::load_all(&state, ProjectRepo::list(&state.pool)).await?;
    Ok(Json(loaded.map(|projects| {
        let projects = projects
            .into_iter()
            .filter(|p| matches(params.artist_id.as_ref(), &p.artist_id))
            .filter(|p| matches(params.status.as_deref(), p.status.as_str()))
            .filter(|p| matches(params.kind.as_deref(), p.kind.as_str()))
            .collect();
        filter_rows(projects, params.q.as_deref())
    })))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Loaded<Project>>> {
    let loaded =
        data_access::load_one(&state, id, ProjectRepo::find_by_id(&state.pool, id)).await?;
    Ok(Json(loaded))
}

/// GET /api/v1/projects/{id}/detail
///
/// Each related table is loaded on its own, concurrently.
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Loaded<ProjectDetail>>> {
    let pool = &state.pool;
    let (project, artists, producers, tracks, references, releases, budgets, payments) = tokio::join!(
        data_access::load_one(&state, id, ProjectRepo::find_by_id(pool, id)),
        data_access::load_all(&state, ArtistRepo::list(pool)),
        data_access::load_all(&state, ProducerRepo::list(pool)),
        data_access::load_all(&state, TrackRepo::list(pool)),
        data_access::load_all(&state, ReferenceRepo::list(pool)),
        data_access::load_all(&state, ReleaseRepo::list(pool)),
        data_access::load_all(&state, BudgetRepo::list(pool)),
        data_access::load_all(&state, PaymentRepo::list(pool)),
    );
    let project = project?;
    let (artists, producers, tracks, references, releases, budgets, payments) = (
        artists?, producers?, tracks?, references?, releases?, budgets?, payments?,
    );

    let source = [
        artists.source,
        producers.source,
        tracks.source,
        references.source,
        releases.source,
        budgets.source,
        payments.source,
    ]
    .into_iter()
    .fold(project.source, |acc, s| acc.combine(s));

    let project = project.data;
    let mut tracks: Vec<Track> = tracks
        .data
        .into_iter()
        .filter(|t| t.project_id == id)
        .collect();
    tracks.sort_by_key(|t| (t.track_number, t.id));
    let progress_pct = project_progress_pct(tracks.iter().map(Track::stages));

    let detail = ProjectDetail {
        artist: artists.data.into_iter().find(|a| a.id == project.artist_id),
        producer: project
            .producer_id
            .and_then(|pid| producers.data.into_iter().find(|p| p.id == pid)),
        references: references
            .data
            .into_iter()
            .filter(|r| r.project_id == id)
            .collect(),
        releases: releases
            .data
            .into_iter()
            .filter(|r| r.project_id == id)
            .collect(),
        budget: summarize(id, &budgets.data, &payments.data),
        progress_pct,
        tracks,
        project,
    };
    Ok(Json(Loaded {
        data: detail,
        source,
    }))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<(StatusCode, Json<Written<Project>>)> {
    input.validate()?;
    let written = data_access::update::<Project, _>(
        &state,
        id,
        &input,
        ProjectRepo::update(&state.pool, id, &input),
    )
    .await?;
    Ok(written.with_status(StatusCode::OK))
}

/// DELETE /api/v1/projects/{id}
///
/// Tracks, references, budgets, payments and releases go with it.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<Deleted> {
    data_access::delete::<Project, _, _>(&state, id, ProjectRepo::delete(&state.pool, id)).await
}

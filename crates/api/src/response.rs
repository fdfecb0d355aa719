//! Shared response envelope types for API handlers.
//!
//! Every payload says where it came from or whether it reached the database:
//! reads carry a [`Source`], writes carry a `persisted` flag plus a warning
//! when only the local mirror was changed.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Warning attached to every write that only reached the local mirror.
pub const LOCAL_ONLY_WARNING: &str = "Database unavailable: the change was applied to the \
     local mirror only and will be lost when the server restarts or the data is next \
     refreshed from the database.";

/// Where a read was answered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Remote,
    Fallback,
}

impl Source {
    /// An answer assembled from several reads is only remote when all were.
    pub fn combine(self, other: Source) -> Source {
        match (self, other) {
            (Source::Remote, Source::Remote) => Source::Remote,
            _ => Source::Fallback,
        }
    }
}

/// `{ "data": T, "source": "remote" | "fallback" }`
#[derive(Debug, Serialize)]
pub struct Loaded<T> {
    pub data: T,
    pub source: Source,
}

impl<T> Loaded<T> {
    pub fn remote(data: T) -> Self {
        Self {
            data,
            source: Source::Remote,
        }
    }

    pub fn fallback(data: T) -> Self {
        Self {
            data,
            source: Source::Fallback,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Loaded<U> {
        Loaded {
            data: f(self.data),
            source: self.source,
        }
    }
}

/// `{ "data": T, "persisted": bool, "warning"?: string }`
#[derive(Debug, Serialize)]
pub struct Written<T> {
    pub data: T,
    pub persisted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl<T> Written<T> {
    pub fn persisted(data: T) -> Self {
        Self {
            data,
            persisted: true,
            warning: None,
        }
    }

    pub fn local(data: T) -> Self {
        Self {
            data,
            persisted: false,
            warning: Some(LOCAL_ONLY_WARNING.to_string()),
        }
    }

    /// Pair the envelope with `status` when persisted, `202 Accepted` when not.
    pub fn with_status(self, status: StatusCode) -> (StatusCode, Json<Self>) {
        let status = if self.persisted {
            status
        } else {
            StatusCode::ACCEPTED
        };
        (status, Json(self))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Written<U> {
        Written {
            data: f(self.data),
            persisted: self.persisted,
            warning: self.warning,
        }
    }
}

/// Outcome of a delete.
#[derive(Debug, PartialEq, Eq)]
pub enum Deleted {
    /// Removed from the database: `204 No Content`.
    Persisted,
    /// Removed from the local mirror only: `202` with a warning body.
    Local,
}

#[derive(Serialize)]
struct LocalDeleteBody {
    persisted: bool,
    warning: &'static str,
}

impl IntoResponse for Deleted {
    fn into_response(self) -> Response {
        match self {
            Deleted::Persisted => StatusCode::NO_CONTENT.into_response(),
            Deleted::Local => (
                StatusCode::ACCEPTED,
                Json(LocalDeleteBody {
                    persisted: false,
                    warning: LOCAL_ONLY_WARNING,
                }),
            )
                .into_response(),
        }
    }
}

//! Budget (orçamento) entity model and DTOs.
//!
//! One planned amount per project and category; payments are compared
//! against it.

use labelops_core::error::CoreError;
use labelops_core::nullable;
use labelops_core::search::Searchable;
use labelops_core::types::{Cents, DbId, Timestamp};
use labelops_core::validation::{
    require_non_empty, require_non_empty_if_present, validate_cents,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Budget {
    pub id: DbId,
    pub project_id: DbId,
    pub category: String,
    pub description: Option<String>,
    pub planned_cents: Cents,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Searchable for Budget {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![Some(self.category.as_str()), self.description.as_deref()]
    }
}

/// DTO for creating a new budget line.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBudget {
    pub project_id: DbId,
    pub category: String,
    pub description: Option<String>,
    pub planned_cents: Cents,
}

impl CreateBudget {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_non_empty("category", &self.category)?;
        validate_cents("planned_cents", self.planned_cents)
    }
}

/// DTO for updating an existing budget line. All fields are optional;
/// `null` clears a nullable column.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBudget {
    pub category: Option<String>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub description: Option<Option<String>>,
    pub planned_cents: Option<Cents>,
}

impl UpdateBudget {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_non_empty_if_present("category", self.category.as_deref())?;
        if let Some(cents) = self.planned_cents {
            validate_cents("planned_cents", cents)?;
        }
        Ok(())
    }
}

/// Body of `PUT /projects/{project_id}/budgets/{category}`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertBudget {
    pub description: Option<String>,
    pub planned_cents: Cents,
}

impl UpsertBudget {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_cents("planned_cents", self.planned_cents)
    }

    pub fn into_create(self, project_id: DbId, category: String) -> CreateBudget {
        CreateBudget {
            project_id,
            category,
            description: self.description,
            planned_cents: self.planned_cents,
        }
    }
}

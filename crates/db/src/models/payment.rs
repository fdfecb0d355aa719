//! Payment entity model and DTOs.

use labelops_core::error::CoreError;
use labelops_core::nullable;
use labelops_core::finance::PaymentFigure;
use labelops_core::search::Searchable;
use labelops_core::status::validate_payment_status;
use labelops_core::types::{Cents, Date, DbId, Timestamp};
use labelops_core::validation::{
    require_non_empty, require_non_empty_if_present, validate_cents,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Payment {
    pub id: DbId,
    pub project_id: DbId,
    pub budget_id: Option<DbId>,
    pub supplier_id: Option<DbId>,
    pub producer_id: Option<DbId>,
    pub description: String,
    pub amount_cents: Cents,
    pub status: String,
    pub due_date: Option<Date>,
    pub paid_on: Option<Date>,
    pub method: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Payment {
    pub fn figure(&self) -> PaymentFigure<'_> {
        PaymentFigure {
            budget_id: self.budget_id,
            amount_cents: self.amount_cents,
            status: &self.status,
        }
    }
}

impl Searchable for Payment {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.description.as_str()),
            Some(self.status.as_str()),
            self.method.as_deref(),
        ]
    }
}

/// DTO for creating a new payment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePayment {
    pub project_id: DbId,
    pub budget_id: Option<DbId>,
    pub supplier_id: Option<DbId>,
    pub producer_id: Option<DbId>,
    pub description: String,
    pub amount_cents: Cents,
    /// Defaults to `pending` if omitted.
    pub status: Option<String>,
    pub due_date: Option<Date>,
    /// Stamped with today when the payment is created as `paid` without one.
    pub paid_on: Option<Date>,
    pub method: Option<String>,
}

impl CreatePayment {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_non_empty("description", &self.description)?;
        validate_cents("amount_cents", self.amount_cents)?;
        if let Some(status) = &self.status {
            validate_payment_status(status)?;
        }
        Ok(())
    }
}

/// DTO for updating an existing payment. All fields are optional;
/// `null` clears a nullable column.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePayment {
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub budget_id: Option<Option<DbId>>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub supplier_id: Option<Option<DbId>>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub producer_id: Option<Option<DbId>>,
    pub description: Option<String>,
    pub amount_cents: Option<Cents>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub due_date: Option<Option<Date>>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub paid_on: Option<Option<Date>>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub method: Option<Option<String>>,
}

impl UpdatePayment {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_non_empty_if_present("description", self.description.as_deref())?;
        if let Some(cents) = self.amount_cents {
            validate_cents("amount_cents", cents)?;
        }
        if let Some(status) = &self.status {
            validate_payment_status(status)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_vocabulary_enforced() {
        let mut input = CreatePayment {
            project_id: 1,
            budget_id: None,
            supplier_id: None,
            producer_id: None,
            description: "Diária de estúdio".into(),
            amount_cents: 80_000,
            status: Some("paid".into()),
            due_date: None,
            paid_on: None,
            method: Some("pix".into()),
        };
        assert!(input.validate().is_ok());
        input.status = Some("refunded".into());
        assert!(input.validate().is_err());
    }
}

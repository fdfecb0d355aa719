//! Producer (produtor) entity model and DTOs.

use labelops_core::error::CoreError;
use labelops_core::nullable;
use labelops_core::search::Searchable;
use labelops_core::types::{Cents, DbId, Timestamp};
use labelops_core::validation::{
    require_non_empty, require_non_empty_if_present, validate_cents,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::supplier::validate_optional_email;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Producer {
    pub id: DbId,
    pub name: String,
    pub specialty: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Usual fee per track, when agreed.
    pub fee_cents: Option<Cents>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Searchable for Producer {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.name.as_str()),
            self.specialty.as_deref(),
            self.email.as_deref(),
        ]
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProducer {
    pub name: String,
    pub specialty: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub fee_cents: Option<Cents>,
    pub notes: Option<String>,
}

impl CreateProducer {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_non_empty("name", &self.name)?;
        validate_optional_email(self.email.as_deref())?;
        if let Some(fee) = self.fee_cents {
            validate_cents("fee_cents", fee)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProducer {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub specialty: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub fee_cents: Option<Option<Cents>>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub notes: Option<Option<String>>,
}

impl UpdateProducer {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_non_empty_if_present("name", self.name.as_deref())?;
        validate_optional_email(nullable::value_str(&self.email))?;
        if let Some(Some(fee)) = self.fee_cents {
            validate_cents("fee_cents", fee)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labelops_core::validation::MAX_CENTS;

    fn producer(fee_cents: Option<Cents>) -> CreateProducer {
        CreateProducer {
            name: "Rafael Monteiro".into(),
            specialty: None,
            email: None,
            phone: None,
            fee_cents,
            notes: None,
        }
    }

    #[test]
    fn fee_must_be_within_range() {
        assert!(producer(None).validate().is_ok());
        assert!(producer(Some(0)).validate().is_ok());
        assert!(producer(Some(MAX_CENTS)).validate().is_ok());
        assert!(producer(Some(-1)).validate().is_err());
        assert!(producer(Some(MAX_CENTS + 1)).validate().is_err());
    }

    #[test]
    fn update_fee_can_be_cleared_but_not_negative() {
        let update: UpdateProducer = serde_json::from_str(r#"{"fee_cents": null}"#).unwrap();
        assert_eq!(update.fee_cents, Some(None));
        assert!(update.validate().is_ok());

        let update: UpdateProducer = serde_json::from_str(r#"{"fee_cents": -5}"#).unwrap();
        assert!(update.validate().is_err());

        let update: UpdateProducer = serde_json::from_str(r#"{"email": "rafa@"}"#).unwrap();
        assert!(update.validate().is_err());
    }
}

//! Supplier (fornecedor) entity model and DTOs.

use labelops_core::error::CoreError;
use labelops_core::nullable;
use labelops_core::search::Searchable;
use labelops_core::types::{DbId, Timestamp};
use labelops_core::validation::{require_non_empty, require_non_empty_if_present, validate_email};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Supplier {
    pub id: DbId,
    pub name: String,
    /// What the supplier provides, e.g. studio, pressing, design.
    pub service_type: Option<String>,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// CNPJ/CPF or equivalent.
    pub tax_id: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Searchable for Supplier {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.name.as_str()),
            self.service_type.as_deref(),
            self.contact_name.as_deref(),
            self.email.as_deref(),
            self.tax_id.as_deref(),
        ]
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSupplier {
    pub name: String,
    pub service_type: Option<String>,
    pub contact_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub tax_id: Option<String>,
    pub notes: Option<String>,
}

impl CreateSupplier {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_non_empty("name", &self.name)?;
        validate_optional_email(self.email.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSupplier {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub service_type: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub contact_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub tax_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable::deserialize")]
    pub notes: Option<Option<String>>,
}

impl UpdateSupplier {
    pub fn validate(&self) -> Result<(), CoreError> {
        require_non_empty_if_present("name", self.name.as_deref())?;
        validate_optional_email(nullable::value_str(&self.email))
    }
}

pub(crate) fn validate_optional_email(email: Option<&str>) -> Result<(), CoreError> {
    match email.filter(|e| !e.trim().is_empty()) {
        Some(email) => validate_email("email", email),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supplier(email: Option<&str>) -> CreateSupplier {
        CreateSupplier {
            name: "Estúdio Vila Sonora".into(),
            service_type: None,
            contact_name: None,
            email: email.map(String::from),
            phone: None,
            tax_id: None,
            notes: None,
        }
    }

    #[test]
    fn email_is_checked_only_when_given() {
        assert!(supplier(None).validate().is_ok());
        assert!(supplier(Some("  ")).validate().is_ok());
        assert!(supplier(Some("agenda@vilasonora.com.br")).validate().is_ok());
        assert!(matches!(
            supplier(Some("agenda")).validate(),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn update_distinguishes_null_from_absent() {
        let update: UpdateSupplier =
            serde_json::from_str(r#"{"contact_name": null, "email": "a@b.co"}"#).unwrap();
        assert_eq!(update.contact_name, Some(None));
        assert_eq!(update.email, Some(Some("a@b.co".into())));
        assert_eq!(update.notes, None);
        assert!(update.validate().is_ok());

        let update: UpdateSupplier = serde_json::from_str(r#"{"name": ""}"#).unwrap();
        assert!(update.validate().is_err());
    }
}

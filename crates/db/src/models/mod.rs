//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `Serialize` + `Deserialize` entity struct (deserializable so the
//!   mirror can be seeded from JSON)
//! - A `FromRow` row struct when the table has JSON-string columns that need
//!   lenient parsing
//! - A `Deserialize` create DTO and an all-`Option` update DTO, each with a
//!   `validate` method

pub mod artist;
pub mod attachment;
pub mod budget;
pub mod document;
pub mod payment;
pub mod producer;
pub mod project;
pub mod reference;
pub mod release;
pub mod supplier;
pub mod track;

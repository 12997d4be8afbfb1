//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) where the entity is mutable

pub mod category;
pub mod comment;
pub mod donation;
pub mod project;
pub mod rating;
pub mod refresh_token;
pub mod report;
pub mod tag;
pub mod user;

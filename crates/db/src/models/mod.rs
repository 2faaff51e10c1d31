//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts
//! - Conversions into the plain inputs `wishdrop_core` computes over

pub mod badge;
pub mod donation;
pub mod profile;
pub mod report;
pub mod thank_you;
pub mod wish;

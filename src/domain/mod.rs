//! Domain types for the MedVest client core.
//! Defines the validation capability, pagination shapes and error types shared
//! by the form engine and the query layer.

pub mod error;
pub mod page;
pub mod validation;

pub use error::*;
pub use page::*;
pub use validation::*;

/// Identifier of a community post.
pub type PostId = String;

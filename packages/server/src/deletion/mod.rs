//! Recipe deletion across the database and the upload server.
//!
//! A recipe, its likes, comments and ratings, and its uploaded file are
//! removed together or not at all. The relational deletes run in one
//! transaction that is committed only after the upload server confirms the
//! file is gone; any other answer rolls the transaction back.

mod outcome;
mod ownership;
mod service;

pub use outcome::{CompensationFailure, DeleteError, DeleteOutcome, FailureKind};
pub use ownership::{Principal, Role, resolve_owner};
pub use service::{RecipeDeleter, delete_dependents, delete_owned_recipe};

use std::time::Duration;

use common::{FileDeletion, FileStoreError};
use sea_orm::DbErr;
use thiserror::Error;

/// Why a deletion that got past authorization did not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A delete statement failed, matched no row, or the commit failed.
    StorageTransaction,
    /// The upload server did not confirm the file deletion.
    Compensation,
    /// No usable database connection.
    Connection,
}

/// Result of one deletion request as seen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    Unauthorized,
    Failed(FailureKind),
}

impl DeleteOutcome {
    /// Human-readable summary, safe to show to clients.
    pub fn message(&self) -> &'static str {
        match self {
            DeleteOutcome::Deleted => "Recipe deleted",
            DeleteOutcome::NotFound => "Recipe not found",
            DeleteOutcome::Unauthorized => "Not allowed to delete this recipe",
            DeleteOutcome::Failed(_) => "Recipe not deleted",
        }
    }
}

/// The upload server's side of a failed deletion.
#[derive(Debug, Error)]
pub enum CompensationFailure {
    #[error("upload server refused ({}): {}", .0.status, .0.message)]
    Refused(FileDeletion),

    #[error(transparent)]
    Unreachable(#[from] FileStoreError),

    #[error("upload server gave no answer within {0:?}")]
    TimedOut(Duration),
}

/// Everything that can stop a recipe deletion.
#[derive(Debug, Error)]
pub enum DeleteError {
    #[error("recipe not found")]
    NotFound,

    #[error("user {principal_id} may not delete a recipe owned by user {owner_id}")]
    Unauthorized { principal_id: i32, owner_id: i32 },

    #[error("database connection failed: {0}")]
    Connection(#[source] DbErr),

    #[error("delete transaction failed: {0}")]
    Transaction(#[source] DbErr),

    /// The owner-scoped delete matched no row (concurrent delete or owner mismatch).
    #[error("recipe row was not deleted")]
    NothingDeleted,

    #[error("file deletion failed: {0}")]
    Compensation(#[from] CompensationFailure),
}

impl DeleteError {
    pub fn outcome(&self) -> DeleteOutcome {
        match self {
            DeleteError::NotFound => DeleteOutcome::NotFound,
            DeleteError::Unauthorized { .. } => DeleteOutcome::Unauthorized,
            DeleteError::Connection(_) => DeleteOutcome::Failed(FailureKind::Connection),
            DeleteError::Transaction(_) | DeleteError::NothingDeleted => {
                DeleteOutcome::Failed(FailureKind::StorageTransaction)
            }
            DeleteError::Compensation(_) => DeleteOutcome::Failed(FailureKind::Compensation),
        }
    }
}

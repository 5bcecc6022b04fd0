use std::time::Duration;

use common::{FileStore, UploadConfig, storage_key};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, TransactionTrait,
};
use tracing::{error, info, instrument, warn};

use super::outcome::{CompensationFailure, DeleteError, DeleteOutcome};
use super::ownership::{Principal, resolve_owner};
use crate::entity::{recipe, recipe_comment, recipe_like, recipe_rating};

/// Deletes recipes together with their dependent rows and uploaded file.
///
/// The transaction holds one pooled connection from `begin` until it is
/// committed, rolled back, or dropped (a dropped transaction rolls back), so
/// the connection goes back to the pool on every path, including
/// cancellation of the request future.
pub struct RecipeDeleter<'a> {
    db: &'a DatabaseConnection,
    files: &'a dyn FileStore,
    public_url: &'a str,
    file_timeout: Duration,
}

impl<'a> RecipeDeleter<'a> {
    pub fn new(
        db: &'a DatabaseConnection,
        files: &'a dyn FileStore,
        upload: &'a UploadConfig,
    ) -> Self {
        Self {
            db,
            files,
            public_url: &upload.public_url,
            file_timeout: upload.timeout(),
        }
    }

    /// Override the bound on the upload server call.
    pub fn with_file_timeout(mut self, timeout: Duration) -> Self {
        self.file_timeout = timeout;
        self
    }

    /// Delete one recipe on behalf of `principal`.
    ///
    /// Errors are logged here and folded into the outcome; callers never see
    /// partial results.
    #[instrument(skip(self, principal, auth_token), fields(principal_id = principal.id))]
    pub async fn delete(
        &self,
        recipe_id: i32,
        principal: &Principal,
        auth_token: &str,
    ) -> DeleteOutcome {
        match self.try_delete(recipe_id, principal, auth_token).await {
            Ok(()) => {
                info!(recipe_id, "Recipe deleted");
                DeleteOutcome::Deleted
            }
            Err(err @ (DeleteError::NotFound | DeleteError::Unauthorized { .. })) => {
                info!(recipe_id, reason = %err, "Recipe deletion rejected");
                err.outcome()
            }
            Err(err) => {
                error!(recipe_id, error = %err, "Recipe deletion failed, nothing was removed");
                err.outcome()
            }
        }
    }

    async fn try_delete(
        &self,
        recipe_id: i32,
        principal: &Principal,
        auth_token: &str,
    ) -> Result<(), DeleteError> {
        let recipe = recipe::Entity::find_by_id(recipe_id)
            .one(self.db)
            .await
            .map_err(DeleteError::Connection)?
            .ok_or(DeleteError::NotFound)?;

        let owner_id =
            resolve_owner(recipe.user_id, principal).ok_or(DeleteError::Unauthorized {
                principal_id: principal.id,
                owner_id: recipe.user_id,
            })?;

        let key = storage_key::normalize(self.public_url, &recipe.filename);

        let txn = self.db.begin().await.map_err(DeleteError::Connection)?;

        if let Err(err) = self
            .remove_with_file(&txn, recipe_id, owner_id, key, auth_token)
            .await
        {
            if let Err(rollback_err) = txn.rollback().await {
                // The connection is discarded either way; the server rolls back on its own.
                warn!(recipe_id, error = %rollback_err, "Rollback failed");
            }
            return Err(err);
        }

        txn.commit().await.map_err(|e| {
            error!(
                recipe_id,
                storage_key = key,
                error = %e,
                "CRITICAL: file removed from upload server but DB commit failed. \
                 Recipe rows remain and reference a missing file."
            );
            DeleteError::Transaction(e)
        })
    }

    async fn remove_with_file(
        &self,
        txn: &DatabaseTransaction,
        recipe_id: i32,
        owner_id: i32,
        storage_key: &str,
        auth_token: &str,
    ) -> Result<(), DeleteError> {
        delete_dependents(txn, recipe_id)
            .await
            .map_err(DeleteError::Transaction)?;

        let removed = delete_owned_recipe(txn, recipe_id, owner_id)
            .await
            .map_err(DeleteError::Transaction)?;
        if removed == 0 {
            return Err(DeleteError::NothingDeleted);
        }

        self.delete_file(storage_key, auth_token).await
    }

    async fn delete_file(&self, storage_key: &str, auth_token: &str) -> Result<(), DeleteError> {
        let reply = tokio::time::timeout(
            self.file_timeout,
            self.files.delete_file(storage_key, auth_token),
        )
        .await
        .map_err(|_| CompensationFailure::TimedOut(self.file_timeout))?
        .map_err(CompensationFailure::from)?;

        if !reply.is_confirmed() {
            return Err(CompensationFailure::Refused(reply).into());
        }
        Ok(())
    }
}

/// Delete every like, comment and rating of a recipe, in that order.
pub async fn delete_dependents<C: ConnectionTrait>(conn: &C, recipe_id: i32) -> Result<(), DbErr> {
    recipe_like::Entity::delete_many()
        .filter(recipe_like::Column::RecipeId.eq(recipe_id))
        .exec(conn)
        .await?;
    recipe_comment::Entity::delete_many()
        .filter(recipe_comment::Column::RecipeId.eq(recipe_id))
        .exec(conn)
        .await?;
    recipe_rating::Entity::delete_many()
        .filter(recipe_rating::Column::RecipeId.eq(recipe_id))
        .exec(conn)
        .await?;
    Ok(())
}

/// Delete the recipe row only if it still belongs to `owner_id`. Returns the affected row count.
pub async fn delete_owned_recipe<C: ConnectionTrait>(
    conn: &C,
    recipe_id: i32,
    owner_id: i32,
) -> Result<u64, DbErr> {
    let result = recipe::Entity::delete_many()
        .filter(recipe::Column::Id.eq(recipe_id))
        .filter(recipe::Column::UserId.eq(owner_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

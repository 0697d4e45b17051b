//! Database transaction utilities
//!
//! Multi-row writes that must become visible together go through a
//! [`TransactionGuard`].

use quill_core::AppError;
use sqlx::{PgPool, Postgres, Transaction};

/// A database transaction that must be committed explicitly
///
/// A guard that is dropped without `commit` is rolled back by sqlx when the
/// inner transaction is dropped; the guard only adds a warning so that an
/// early return is visible in the logs.
///
/// # Example
///
/// ```ignore
/// use quill_db::TransactionGuard;
///
/// async fn example(pool: &sqlx::PgPool) -> Result<(), quill_core::AppError> {
///     let mut tx = TransactionGuard::begin(pool).await?;
///     sqlx::query("INSERT INTO ...").execute(&mut **tx.as_mut()?).await?;
///     tx.commit().await?;
///     Ok(())
/// }
/// ```
pub struct TransactionGuard<'a> {
    transaction: Option<Transaction<'a, Postgres>>,
}

impl<'a> TransactionGuard<'a> {
    /// Begin a new database transaction
    pub async fn begin(pool: &'a PgPool) -> Result<Self, AppError> {
        let transaction = pool.begin().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to begin database transaction");
            AppError::Database(e)
        })?;

        Ok(Self {
            transaction: Some(transaction),
        })
    }

    /// Commit the transaction
    pub async fn commit(mut self) -> Result<(), AppError> {
        if let Some(tx) = self.transaction.take() {
            tx.commit().await.map_err(|e| {
                tracing::error!(error = %e, "Failed to commit database transaction");
                AppError::Database(e)
            })?;
        }
        Ok(())
    }

    /// Get a mutable reference to the underlying transaction
    pub fn as_mut(&mut self) -> Result<&mut Transaction<'a, Postgres>, AppError> {
        self.transaction
            .as_mut()
            .ok_or_else(|| AppError::Internal("Transaction already finished".to_string()))
    }
}

impl Drop for TransactionGuard<'_> {
    fn drop(&mut self) {
        if self.transaction.is_some() {
            tracing::warn!(
                "Transaction dropped before commit, rolling back"
            );
        }
    }
}

//! Document number allocation.
//!
//! Each `(document type, year, month)` scope has one counter row in
//! `document_sequences`. Allocation is an atomic upsert-and-return executed
//! on the caller's database transaction, so the row lock is held until the
//! consuming insert commits and a rollback gives the number back. Scopes of
//! different types or months never contend.

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, DbBackend, DbErr, EntityTrait, IntoActiveModel, SqlErr, Statement,
    TransactionTrait,
};
use tracing::{info, warn};

use tourbook_core::numbering::{DocumentNumber, DocumentType, NumberingError, Period};

use super::error::EngineError;

/// Extra attempts after a number collides with an existing document.
const MAX_RETRIES: usize = 1;

const ALLOCATE_SQL: &str = r"
INSERT INTO document_sequences (doc_type, period_year, period_month, last_value, updated_at)
VALUES ($1, $2, $3, 1, NOW())
ON CONFLICT (doc_type, period_year, period_month)
DO UPDATE SET last_value = document_sequences.last_value + 1, updated_at = NOW()
RETURNING last_value
";

/// Repository for document number sequences.
#[derive(Debug, Clone)]
pub struct SequenceRepository {
    db: DatabaseConnection,
}

impl SequenceRepository {
    /// Creates a new sequence repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Allocates and commits one number on its own database transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn next_number(
        &self,
        doc_type: DocumentType,
        period: Period,
    ) -> Result<DocumentNumber, EngineError> {
        let txn = self.db.begin().await?;
        let number = Self::allocate(&txn, doc_type, period).await?;
        txn.commit().await?;
        Ok(number)
    }

    /// Allocates the next number of a scope on `conn`.
    ///
    /// # Errors
    ///
    /// Returns an error if the upsert fails.
    pub async fn allocate<C: ConnectionTrait>(
        conn: &C,
        doc_type: DocumentType,
        period: Period,
    ) -> Result<DocumentNumber, DbErr> {
        let month = i32::try_from(period.month).map_err(|e| DbErr::Custom(e.to_string()))?;
        let row = conn
            .query_one(Statement::from_sql_and_values(
                DbBackend::Postgres,
                ALLOCATE_SQL,
                [doc_type.as_str().into(), period.year.into(), month.into()],
            ))
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("document_sequences".to_string()))?;

        let last_value: i32 = row.try_get("", "last_value")?;
        let sequence = u32::try_from(last_value).map_err(|e| DbErr::Custom(e.to_string()))?;

        Ok(DocumentNumber::new(doc_type, period, sequence))
    }

    /// Allocates a number, builds a row with it and inserts the row inside a
    /// savepoint.
    ///
    /// If the insert hits a unique violation on a number column, the savepoint
    /// is rolled back and one fresh number is tried. A second collision
    /// surfaces as `AllocationConflict`.
    ///
    /// # Errors
    ///
    /// Returns `AllocationConflict` after the retry, or the insert's own error.
    pub async fn insert_with_number<A>(
        txn: &DatabaseTransaction,
        doc_type: DocumentType,
        period: Period,
        build: impl Fn(String) -> A + Send + Sync,
    ) -> Result<(<A::Entity as EntityTrait>::Model, DocumentNumber), EngineError>
    where
        A: ActiveModelTrait + ActiveModelBehavior + Send,
        <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    {
        for attempt in 0..=MAX_RETRIES {
            let number = Self::allocate(txn, doc_type, period).await?;
            let savepoint = txn.begin().await?;

            match build(number.to_string()).insert(&savepoint).await {
                Ok(value) => {
                    savepoint.commit().await?;
                    info!(document_number = %number, doc_type = %doc_type, "Allocated document number");
                    return Ok((value, number));
                }
                Err(err) if is_number_collision(&err) => {
                    savepoint.rollback().await?;
                    warn!(
                        document_number = %number,
                        attempt,
                        "Document number already taken, allocating another"
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(NumberingError::AllocationConflict { doc_type }.into())
    }
}

/// True for unique violations on a `*_number` constraint.
///
/// Other unique violations, such as a second live document for the same
/// transaction, are real errors and must not be retried.
fn is_number_collision(err: &DbErr) -> bool {
    matches!(
        err.sql_err(),
        Some(SqlErr::UniqueConstraintViolation(message)) if message.contains("_number")
    )
}

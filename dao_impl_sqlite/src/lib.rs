use std::sync::Arc;

use async_trait::async_trait;
use dao::{DaoError, Transaction};
use sqlx::SqlitePool;
use time::{
    format_description::BorrowedFormatItem, macros::format_description, PrimitiveDateTime,
};
use tokio::sync::Mutex;
use uuid::Uuid;

pub mod booking;
pub mod provider;
pub mod service_definition;
pub mod working_hours;

pub trait ResultDbErrorExt<T, E> {
    fn map_db_error(self) -> Result<T, DaoError>;
}
impl<T, E: std::error::Error + Send + Sync + 'static> ResultDbErrorExt<T, E> for Result<T, E> {
    fn map_db_error(self) -> Result<T, DaoError> {
        self.map_err(|err| DaoError::DatabaseQueryError(Box::new(err)))
    }
}

pub(crate) fn uuid_from_db(column: &str, bytes: &[u8]) -> Result<Uuid, DaoError> {
    Uuid::from_slice(bytes).map_err(|_| DaoError::InvalidStoredValue(column.into()))
}

/// Fixed width so that the stored text sorts like the instants it represents.
/// Sub-second precision is not kept.
const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

pub(crate) fn format_timestamp(datetime: PrimitiveDateTime) -> Result<String, DaoError> {
    datetime.format(TIMESTAMP_FORMAT).map_db_error()
}

pub(crate) fn parse_timestamp(value: &str) -> Result<PrimitiveDateTime, DaoError> {
    Ok(PrimitiveDateTime::parse(value, TIMESTAMP_FORMAT)?)
}

#[derive(Clone, Debug)]
pub struct TransactionImpl {
    tx: Arc<Mutex<sqlx::Transaction<'static, sqlx::Sqlite>>>,
}

impl Transaction for TransactionImpl {}

pub struct TransactionDaoImpl {
    pool: Arc<SqlitePool>,
}
impl TransactionDaoImpl {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}
#[async_trait]
impl dao::TransactionDao for TransactionDaoImpl {
    type Transaction = TransactionImpl;

    async fn new_transaction(&self) -> Result<Self::Transaction, DaoError> {
        let tx = self.pool.begin().await.map_db_error()?;
        Ok(TransactionImpl {
            tx: Arc::new(tx.into()),
        })
    }

    async fn use_transaction(
        &self,
        tx: Option<Self::Transaction>,
    ) -> Result<Self::Transaction, DaoError> {
        match tx {
            Some(tx) => Ok(tx),
            None => self.new_transaction().await,
        }
    }

    /// Only the last holder of a transaction commits it. Callers which passed their
    /// transaction down keep control over the commit.
    async fn commit(&self, transaction: Self::Transaction) -> Result<(), DaoError> {
        if let Some(tx) = Arc::into_inner(transaction.tx) {
            tx.into_inner().commit().await.map_db_error()?;
        } else {
            tracing::trace!("Transaction still shared, commit deferred to the owner");
        }
        Ok(())
    }
}

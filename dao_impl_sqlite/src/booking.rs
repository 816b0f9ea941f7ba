use std::sync::Arc;

use crate::{format_timestamp, parse_timestamp, uuid_from_db, ResultDbErrorExt, TransactionImpl};
use async_trait::async_trait;
use dao::{
    booking::{BookingDao, BookingEntity, BookingStatusEntity},
    DaoError,
};
use sqlx::{query, query_as};
use time::PrimitiveDateTime;
use uuid::Uuid;

const BOOKING_COLUMNS: &str = "id, provider_id, service_id, client_id, start_time, end_time, status, notes, created, deleted, update_version";

#[derive(Debug, sqlx::FromRow)]
struct BookingDb {
    id: Vec<u8>,
    provider_id: Vec<u8>,
    service_id: Vec<u8>,
    client_id: Vec<u8>,
    start_time: String,
    end_time: String,
    status: String,
    notes: Option<String>,
    created: String,
    deleted: Option<String>,
    update_version: Vec<u8>,
}

impl TryFrom<&BookingDb> for BookingEntity {
    type Error = DaoError;

    fn try_from(booking: &BookingDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: uuid_from_db("booking.id", &booking.id)?,
            provider_id: uuid_from_db("booking.provider_id", &booking.provider_id)?,
            service_id: uuid_from_db("booking.service_id", &booking.service_id)?,
            client_id: uuid_from_db("booking.client_id", &booking.client_id)?,
            start_time: parse_timestamp(&booking.start_time)?,
            end_time: parse_timestamp(&booking.end_time)?,
            status: BookingStatusEntity::try_from(booking.status.as_str())?,
            notes: booking.notes.as_deref().map(Arc::from),
            created: parse_timestamp(&booking.created)?,
            deleted: booking.deleted.as_deref().map(parse_timestamp).transpose()?,
            version: uuid_from_db("booking.update_version", &booking.update_version)?,
        })
    }
}

pub struct BookingDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl BookingDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[async_trait]
impl BookingDao for BookingDaoImpl {
    type Transaction = TransactionImpl;

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<BookingEntity>, DaoError> {
        let sql = format!("SELECT {BOOKING_COLUMNS} FROM booking WHERE id = ? AND deleted IS NULL");
        query_as::<_, BookingDb>(&sql)
            .bind(id.as_bytes().to_vec())
            .fetch_optional(tx.tx.lock().await.as_mut())
            .await
            .map_db_error()?
            .as_ref()
            .map(BookingEntity::try_from)
            .transpose()
    }

    async fn find_by_provider_in_range(
        &self,
        provider_id: Uuid,
        from: PrimitiveDateTime,
        to: PrimitiveDateTime,
        statuses: &[BookingStatusEntity],
        tx: Self::Transaction,
    ) -> Result<Arc<[BookingEntity]>, DaoError> {
        if statuses.is_empty() {
            return Ok(Arc::new([]));
        }
        let status_placeholders = vec!["?"; statuses.len()].join(", ");
        let sql = format!(
            "SELECT {BOOKING_COLUMNS} FROM booking WHERE provider_id = ? AND start_time < ? AND end_time > ? AND deleted IS NULL AND status IN ({status_placeholders}) ORDER BY start_time, end_time"
        );
        let mut statement = query_as::<_, BookingDb>(&sql)
            .bind(provider_id.as_bytes().to_vec())
            .bind(format_timestamp(to)?)
            .bind(format_timestamp(from)?);
        for status in statuses {
            statement = statement.bind(status.as_str());
        }
        statement
            .fetch_all(tx.tx.lock().await.as_mut())
            .await
            .map_db_error()?
            .iter()
            .map(BookingEntity::try_from)
            .collect::<Result<Arc<[BookingEntity]>, DaoError>>()
    }

    async fn create(
        &self,
        entity: &BookingEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        let start_time = format_timestamp(entity.start_time)?;
        let end_time = format_timestamp(entity.end_time)?;
        let created = format_timestamp(entity.created)?;
        let deleted = entity.deleted.map(format_timestamp).transpose()?;
        let sql = format!("INSERT INTO booking ({BOOKING_COLUMNS}, update_process) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)");
        query(&sql)
            .bind(entity.id.as_bytes().to_vec())
            .bind(entity.provider_id.as_bytes().to_vec())
            .bind(entity.service_id.as_bytes().to_vec())
            .bind(entity.client_id.as_bytes().to_vec())
            .bind(start_time)
            .bind(end_time)
            .bind(entity.status.as_str())
            .bind(entity.notes.as_deref())
            .bind(created)
            .bind(deleted)
            .bind(entity.version.as_bytes().to_vec())
            .bind(process)
            .execute(tx.tx.lock().await.as_mut())
            .await
            .map_db_error()?;
        Ok(())
    }
}

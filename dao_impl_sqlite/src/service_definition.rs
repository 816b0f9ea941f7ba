use std::sync::Arc;

use crate::{format_timestamp, parse_timestamp, uuid_from_db, ResultDbErrorExt, TransactionImpl};
use async_trait::async_trait;
use dao::{
    service_definition::{ServiceDefinitionDao, ServiceDefinitionEntity},
    DaoError,
};
use sqlx::{query, query_as};
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
struct ServiceDefinitionDb {
    id: Vec<u8>,
    provider_id: Vec<u8>,
    name: String,
    duration_minutes: i64,
    buffer_before_minutes: i64,
    buffer_after_minutes: i64,
    max_advance_booking_days: i64,
    allow_same_day_booking: bool,
    created: String,
    deleted: Option<String>,
    update_version: Vec<u8>,
}

fn unsigned_from_db(column: &str, value: i64) -> Result<u32, DaoError> {
    u32::try_from(value).map_err(|_| DaoError::InvalidStoredValue(column.into()))
}

impl TryFrom<&ServiceDefinitionDb> for ServiceDefinitionEntity {
    type Error = DaoError;

    fn try_from(db: &ServiceDefinitionDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: uuid_from_db("service_definition.id", &db.id)?,
            provider_id: uuid_from_db("service_definition.provider_id", &db.provider_id)?,
            name: db.name.as_str().into(),
            duration_minutes: unsigned_from_db(
                "service_definition.duration_minutes",
                db.duration_minutes,
            )?,
            buffer_before_minutes: unsigned_from_db(
                "service_definition.buffer_before_minutes",
                db.buffer_before_minutes,
            )?,
            buffer_after_minutes: unsigned_from_db(
                "service_definition.buffer_after_minutes",
                db.buffer_after_minutes,
            )?,
            max_advance_booking_days: unsigned_from_db(
                "service_definition.max_advance_booking_days",
                db.max_advance_booking_days,
            )?,
            allow_same_day_booking: db.allow_same_day_booking,
            created: parse_timestamp(&db.created)?,
            deleted: db.deleted.as_deref().map(parse_timestamp).transpose()?,
            version: uuid_from_db("service_definition.update_version", &db.update_version)?,
        })
    }
}

pub struct ServiceDefinitionDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl ServiceDefinitionDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[async_trait]
impl ServiceDefinitionDao for ServiceDefinitionDaoImpl {
    type Transaction = TransactionImpl;

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<ServiceDefinitionEntity>, DaoError> {
        query_as::<_, ServiceDefinitionDb>(
            "SELECT id, provider_id, name, duration_minutes, buffer_before_minutes, buffer_after_minutes, max_advance_booking_days, allow_same_day_booking, created, deleted, update_version FROM service_definition WHERE id = ? AND deleted IS NULL",
        )
        .bind(id.as_bytes().to_vec())
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .as_ref()
        .map(ServiceDefinitionEntity::try_from)
        .transpose()
    }

    async fn create(
        &self,
        entity: &ServiceDefinitionEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        let created = format_timestamp(entity.created)?;
        let deleted = entity.deleted.map(format_timestamp).transpose()?;
        query("INSERT INTO service_definition (id, provider_id, name, duration_minutes, buffer_before_minutes, buffer_after_minutes, max_advance_booking_days, allow_same_day_booking, created, deleted, update_version, update_process) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)")
            .bind(entity.id.as_bytes().to_vec())
            .bind(entity.provider_id.as_bytes().to_vec())
            .bind(entity.name.as_ref())
            .bind(i64::from(entity.duration_minutes))
            .bind(i64::from(entity.buffer_before_minutes))
            .bind(i64::from(entity.buffer_after_minutes))
            .bind(i64::from(entity.max_advance_booking_days))
            .bind(entity.allow_same_day_booking)
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

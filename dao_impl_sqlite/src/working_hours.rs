use std::sync::Arc;

use crate::{uuid_from_db, ResultDbErrorExt, TransactionImpl};
use agendum_utils::{format_time, parse_hh_mm, DayOfWeek};
use async_trait::async_trait;
use dao::{
    working_hours::{WorkingHoursBreakEntity, WorkingHoursDao, WorkingHoursEntity},
    DaoError,
};
use sqlx::{query, query_as};
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
struct WorkingHoursDb {
    provider_id: Vec<u8>,
    day_of_week: i64,
    start_time: String,
    end_time: String,
    is_working_day: bool,
    update_version: Vec<u8>,
}

#[derive(Debug, sqlx::FromRow)]
struct WorkingHoursBreakDb {
    id: Vec<u8>,
    provider_id: Vec<u8>,
    day_of_week: i64,
    start_time: String,
    end_time: String,
    update_version: Vec<u8>,
}

fn day_of_week_from_db(value: i64) -> Result<DayOfWeek, DaoError> {
    u8::try_from(value)
        .map_err(|_| DaoError::InvalidStoredValue("day_of_week".into()))
        .and_then(|index| DayOfWeek::from_index(index).map_db_error())
}

impl TryFrom<&WorkingHoursDb> for WorkingHoursEntity {
    type Error = DaoError;

    fn try_from(db: &WorkingHoursDb) -> Result<Self, Self::Error> {
        Ok(Self {
            provider_id: uuid_from_db("working_hours.provider_id", &db.provider_id)?,
            day_of_week: day_of_week_from_db(db.day_of_week)?,
            start: parse_hh_mm(&db.start_time).map_db_error()?,
            end: parse_hh_mm(&db.end_time).map_db_error()?,
            is_working_day: db.is_working_day,
            version: uuid_from_db("working_hours.update_version", &db.update_version)?,
        })
    }
}

impl TryFrom<&WorkingHoursBreakDb> for WorkingHoursBreakEntity {
    type Error = DaoError;

    fn try_from(db: &WorkingHoursBreakDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: uuid_from_db("working_hours_break.id", &db.id)?,
            provider_id: uuid_from_db("working_hours_break.provider_id", &db.provider_id)?,
            day_of_week: day_of_week_from_db(db.day_of_week)?,
            start: parse_hh_mm(&db.start_time).map_db_error()?,
            end: parse_hh_mm(&db.end_time).map_db_error()?,
            version: uuid_from_db("working_hours_break.update_version", &db.update_version)?,
        })
    }
}

pub struct WorkingHoursDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl WorkingHoursDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[async_trait]
impl WorkingHoursDao for WorkingHoursDaoImpl {
    type Transaction = TransactionImpl;

    async fn find_by_provider_id(
        &self,
        provider_id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Arc<[WorkingHoursEntity]>, DaoError> {
        query_as::<_, WorkingHoursDb>(
            "SELECT provider_id, day_of_week, start_time, end_time, is_working_day, update_version FROM working_hours WHERE provider_id = ? ORDER BY day_of_week",
        )
        .bind(provider_id.as_bytes().to_vec())
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(WorkingHoursEntity::try_from)
        .collect::<Result<Arc<[WorkingHoursEntity]>, DaoError>>()
    }

    async fn find_breaks_by_provider_id(
        &self,
        provider_id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Arc<[WorkingHoursBreakEntity]>, DaoError> {
        query_as::<_, WorkingHoursBreakDb>(
            "SELECT id, provider_id, day_of_week, start_time, end_time, update_version FROM working_hours_break WHERE provider_id = ? ORDER BY day_of_week, start_time",
        )
        .bind(provider_id.as_bytes().to_vec())
        .fetch_all(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .iter()
        .map(WorkingHoursBreakEntity::try_from)
        .collect::<Result<Arc<[WorkingHoursBreakEntity]>, DaoError>>()
    }

    async fn upsert(
        &self,
        entity: &WorkingHoursEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        query(
            "INSERT INTO working_hours (provider_id, day_of_week, start_time, end_time, is_working_day, update_version, update_process) VALUES (?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT (provider_id, day_of_week) DO UPDATE SET start_time = excluded.start_time, end_time = excluded.end_time, is_working_day = excluded.is_working_day, update_version = excluded.update_version, update_process = excluded.update_process",
        )
        .bind(entity.provider_id.as_bytes().to_vec())
        .bind(i64::from(entity.day_of_week.index()))
        .bind(format_time(entity.start))
        .bind(format_time(entity.end))
        .bind(entity.is_working_day)
        .bind(entity.version.as_bytes().to_vec())
        .bind(process)
        .execute(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?;
        Ok(())
    }

    async fn create_break(
        &self,
        entity: &WorkingHoursBreakEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        query("INSERT INTO working_hours_break (id, provider_id, day_of_week, start_time, end_time, update_version, update_process) VALUES (?, ?, ?, ?, ?, ?, ?)")
            .bind(entity.id.as_bytes().to_vec())
            .bind(entity.provider_id.as_bytes().to_vec())
            .bind(i64::from(entity.day_of_week.index()))
            .bind(format_time(entity.start))
            .bind(format_time(entity.end))
            .bind(entity.version.as_bytes().to_vec())
            .bind(process)
            .execute(tx.tx.lock().await.as_mut())
            .await
            .map_db_error()?;
        Ok(())
    }
}

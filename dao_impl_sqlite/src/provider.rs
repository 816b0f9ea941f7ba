use std::sync::Arc;

use crate::{format_timestamp, parse_timestamp, uuid_from_db, ResultDbErrorExt, TransactionImpl};
use async_trait::async_trait;
use dao::{
    provider::{ProviderDao, ProviderEntity},
    DaoError,
};
use sqlx::{query, query_as};
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
struct ProviderDb {
    id: Vec<u8>,
    name: String,
    created: String,
    deleted: Option<String>,
    update_version: Vec<u8>,
}

impl TryFrom<&ProviderDb> for ProviderEntity {
    type Error = DaoError;

    fn try_from(db: &ProviderDb) -> Result<Self, Self::Error> {
        Ok(Self {
            id: uuid_from_db("provider.id", &db.id)?,
            name: db.name.as_str().into(),
            created: parse_timestamp(&db.created)?,
            deleted: db.deleted.as_deref().map(parse_timestamp).transpose()?,
            version: uuid_from_db("provider.update_version", &db.update_version)?,
        })
    }
}

pub struct ProviderDaoImpl {
    pub _pool: Arc<sqlx::SqlitePool>,
}
impl ProviderDaoImpl {
    pub fn new(pool: Arc<sqlx::SqlitePool>) -> Self {
        Self { _pool: pool }
    }
}

#[async_trait]
impl ProviderDao for ProviderDaoImpl {
    type Transaction = TransactionImpl;

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<ProviderEntity>, DaoError> {
        let id_vec = id.as_bytes().to_vec();
        query_as::<_, ProviderDb>(
            "SELECT id, name, created, deleted, update_version FROM provider WHERE id = ? AND deleted IS NULL",
        )
        .bind(id_vec)
        .fetch_optional(tx.tx.lock().await.as_mut())
        .await
        .map_db_error()?
        .as_ref()
        .map(ProviderEntity::try_from)
        .transpose()
    }

    async fn create(
        &self,
        entity: &ProviderEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError> {
        let created = format_timestamp(entity.created)?;
        let deleted = entity.deleted.map(format_timestamp).transpose()?;
        query("INSERT INTO provider (id, name, created, deleted, update_version, update_process) VALUES (?, ?, ?, ?, ?, ?)")
            .bind(entity.id.as_bytes().to_vec())
            .bind(entity.name.as_ref())
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

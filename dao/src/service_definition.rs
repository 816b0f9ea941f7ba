use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::DaoError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceDefinitionEntity {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub name: Arc<str>,
    pub duration_minutes: u32,
    pub buffer_before_minutes: u32,
    pub buffer_after_minutes: u32,
    pub max_advance_booking_days: u32,
    pub allow_same_day_booking: bool,
    pub created: PrimitiveDateTime,
    pub deleted: Option<PrimitiveDateTime>,
    pub version: Uuid,
}

#[automock(type Transaction = crate::MockTransaction;)]
#[async_trait]
pub trait ServiceDefinitionDao {
    type Transaction: crate::Transaction;

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<ServiceDefinitionEntity>, DaoError>;
    async fn create(
        &self,
        entity: &ServiceDefinitionEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
}

use std::sync::Arc;

use agendum_utils::DayOfWeek;
use async_trait::async_trait;
use mockall::automock;
use time::Time;
use uuid::Uuid;

use crate::DaoError;

/// One row of a provider's weekly schedule. At most one row exists per provider and day.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkingHoursEntity {
    pub provider_id: Uuid,
    pub day_of_week: DayOfWeek,
    pub start: Time,
    pub end: Time,
    pub is_working_day: bool,
    pub version: Uuid,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkingHoursBreakEntity {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub day_of_week: DayOfWeek,
    pub start: Time,
    pub end: Time,
    pub version: Uuid,
}

#[automock(type Transaction = crate::MockTransaction;)]
#[async_trait]
pub trait WorkingHoursDao {
    type Transaction: crate::Transaction;

    async fn find_by_provider_id(
        &self,
        provider_id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Arc<[WorkingHoursEntity]>, DaoError>;
    async fn find_breaks_by_provider_id(
        &self,
        provider_id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Arc<[WorkingHoursBreakEntity]>, DaoError>;

    /// Inserts the row for the day or replaces the existing one.
    async fn upsert(
        &self,
        entity: &WorkingHoursEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
    async fn create_break(
        &self,
        entity: &WorkingHoursBreakEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;
}

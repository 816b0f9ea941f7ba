use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::DaoError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BookingStatusEntity {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatusEntity {
    pub const BLOCKING: [BookingStatusEntity; 2] =
        [BookingStatusEntity::Pending, BookingStatusEntity::Confirmed];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatusEntity::Pending => "PENDING",
            BookingStatusEntity::Confirmed => "CONFIRMED",
            BookingStatusEntity::Cancelled => "CANCELLED",
            BookingStatusEntity::Completed => "COMPLETED",
        }
    }
}

impl TryFrom<&str> for BookingStatusEntity {
    type Error = DaoError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "PENDING" => Ok(BookingStatusEntity::Pending),
            "CONFIRMED" => Ok(BookingStatusEntity::Confirmed),
            "CANCELLED" => Ok(BookingStatusEntity::Cancelled),
            "COMPLETED" => Ok(BookingStatusEntity::Completed),
            _ => Err(DaoError::EnumValueNotFound(value.into())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookingEntity {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub service_id: Uuid,
    pub client_id: Uuid,
    pub start_time: PrimitiveDateTime,
    pub end_time: PrimitiveDateTime,
    pub status: BookingStatusEntity,
    pub notes: Option<Arc<str>>,
    pub created: PrimitiveDateTime,
    pub deleted: Option<PrimitiveDateTime>,
    pub version: Uuid,
}

#[automock(type Transaction = crate::MockTransaction;)]
#[async_trait]
pub trait BookingDao {
    type Transaction: crate::Transaction;

    async fn find_by_id(
        &self,
        id: Uuid,
        tx: Self::Transaction,
    ) -> Result<Option<BookingEntity>, DaoError>;

    /// Bookings of the provider with one of the given statuses whose `[start, end)`
    /// intersects `[from, to)`, ordered by start time.
    async fn find_by_provider_in_range(
        &self,
        provider_id: Uuid,
        from: PrimitiveDateTime,
        to: PrimitiveDateTime,
        statuses: &[BookingStatusEntity],
        tx: Self::Transaction,
    ) -> Result<Arc<[BookingEntity]>, DaoError>;

    async fn create(
        &self,
        entity: &BookingEntity,
        process: &str,
        tx: Self::Transaction,
    ) -> Result<(), DaoError>;

    /// PENDING and CONFIRMED bookings in the range. Rows with an empty or inverted
    /// interval cannot block anything and are skipped.
    async fn find_blocking_in_range(
        &self,
        provider_id: Uuid,
        from: PrimitiveDateTime,
        to: PrimitiveDateTime,
        tx: Self::Transaction,
    ) -> Result<Arc<[BookingEntity]>, DaoError> {
        Ok(self
            .find_by_provider_in_range(
                provider_id,
                from,
                to,
                &BookingStatusEntity::BLOCKING,
                tx,
            )
            .await?
            .iter()
            .filter(|booking| {
                if booking.end_time <= booking.start_time {
                    tracing::warn!(
                        "Ignoring booking {} with end {} not after start {}",
                        booking.id,
                        booking.end_time,
                        booking.start_time
                    );
                    false
                } else {
                    booking.deleted.is_none()
                }
            })
            .cloned()
            .collect())
    }
}

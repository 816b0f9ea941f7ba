use std::sync::Arc;

use dao::service_definition::ServiceDefinitionEntity;
use uuid::Uuid;

pub const DEFAULT_BUFFER_BEFORE_MINUTES: u32 = 5;
pub const DEFAULT_BUFFER_AFTER_MINUTES: u32 = 10;
pub const DEFAULT_MAX_ADVANCE_BOOKING_DAYS: u32 = 30;
pub const DEFAULT_ALLOW_SAME_DAY_BOOKING: bool = true;

/// Time a service reserves around its own duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Buffers {
    pub before_minutes: u32,
    pub after_minutes: u32,
}

impl Default for Buffers {
    fn default() -> Self {
        Self {
            before_minutes: DEFAULT_BUFFER_BEFORE_MINUTES,
            after_minutes: DEFAULT_BUFFER_AFTER_MINUTES,
        }
    }
}

/// Booking horizon of a service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BookingPolicy {
    pub max_advance_booking_days: u32,
    pub allow_same_day_booking: bool,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            max_advance_booking_days: DEFAULT_MAX_ADVANCE_BOOKING_DAYS,
            allow_same_day_booking: DEFAULT_ALLOW_SAME_DAY_BOOKING,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceDefinition {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub name: Arc<str>,
    pub duration_minutes: u32,
    pub buffers: Buffers,
    pub policy: BookingPolicy,
    pub version: Uuid,
}

impl From<&ServiceDefinitionEntity> for ServiceDefinition {
    fn from(entity: &ServiceDefinitionEntity) -> Self {
        Self {
            id: entity.id,
            provider_id: entity.provider_id,
            name: entity.name.clone(),
            duration_minutes: entity.duration_minutes,
            buffers: Buffers {
                before_minutes: entity.buffer_before_minutes,
                after_minutes: entity.buffer_after_minutes,
            },
            policy: BookingPolicy {
                max_advance_booking_days: entity.max_advance_booking_days,
                allow_same_day_booking: entity.allow_same_day_booking,
            },
            version: entity.version,
        }
    }
}

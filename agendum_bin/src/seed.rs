use std::sync::Arc;

use agendum_utils::DayOfWeek;
use dao::{
    provider::{ProviderDao, ProviderEntity},
    service_definition::{ServiceDefinitionDao, ServiceDefinitionEntity},
    working_hours::{WorkingHoursDao, WorkingHoursEntity},
    DaoError, TransactionDao,
};
use dao_impl_sqlite::{
    provider::ProviderDaoImpl, service_definition::ServiceDefinitionDaoImpl,
    working_hours::WorkingHoursDaoImpl, TransactionDaoImpl,
};
use sqlx::SqlitePool;
use time::{macros::time, PrimitiveDateTime};
use uuid::{uuid, Uuid};

pub const DEMO_PROVIDER_ID: Uuid = uuid!("3E8F0C5A-7D21-4B9E-A6C3-1F0D2E4B5A60");
pub const DEMO_SERVICE_ID: Uuid = uuid!("9A1B2C3D-4E5F-4A6B-8C7D-0E1F2A3B4C70");

const SEED_PROCESS: &str = "demo-seed";

/// Creates a demo provider open Monday to Saturday 09:00-18:00 with one 30 minute
/// service. Returns `false` if the provider already exists.
pub async fn seed_demo_data(
    pool: Arc<SqlitePool>,
    now: PrimitiveDateTime,
) -> Result<bool, DaoError> {
    let transaction_dao = TransactionDaoImpl::new(pool.clone());
    let provider_dao = ProviderDaoImpl::new(pool.clone());
    let tx = transaction_dao.new_transaction().await?;

    if provider_dao
        .find_by_id(DEMO_PROVIDER_ID, tx.clone())
        .await?
        .is_some()
    {
        transaction_dao.commit(tx).await?;
        return Ok(false);
    }

    provider_dao
        .create(
            &ProviderEntity {
                id: DEMO_PROVIDER_ID,
                name: "Demo Studio".into(),
                created: now,
                deleted: None,
                version: Uuid::new_v4(),
            },
            SEED_PROCESS,
            tx.clone(),
        )
        .await?;
    ServiceDefinitionDaoImpl::new(pool.clone())
        .create(
            &ServiceDefinitionEntity {
                id: DEMO_SERVICE_ID,
                provider_id: DEMO_PROVIDER_ID,
                name: "Consultation".into(),
                duration_minutes: 30,
                buffer_before_minutes: 5,
                buffer_after_minutes: 10,
                max_advance_booking_days: 30,
                allow_same_day_booking: true,
                created: now,
                deleted: None,
                version: Uuid::new_v4(),
            },
            SEED_PROCESS,
            tx.clone(),
        )
        .await?;
    let working_hours_dao = WorkingHoursDaoImpl::new(pool);
    for day_of_week in DayOfWeek::ALL {
        working_hours_dao
            .upsert(
                &WorkingHoursEntity {
                    provider_id: DEMO_PROVIDER_ID,
                    day_of_week,
                    start: time!(9:00),
                    end: time!(18:00),
                    is_working_day: day_of_week != DayOfWeek::Sunday,
                    version: Uuid::new_v4(),
                },
                SEED_PROCESS,
                tx.clone(),
            )
            .await?;
    }

    transaction_dao.commit(tx).await?;
    tracing::info!("Seeded demo provider {}", DEMO_PROVIDER_ID);
    Ok(true)
}

mod availability;
mod booking_commit;
mod rest_api;

use std::sync::Arc;

use agendum_utils::DayOfWeek;
use dao::{
    booking::{BookingDao, BookingEntity, BookingStatusEntity},
    service_definition::{ServiceDefinitionDao, ServiceDefinitionEntity},
    working_hours::{WorkingHoursBreakEntity, WorkingHoursDao},
    TransactionDao,
};
use dao_impl_sqlite::{
    booking::BookingDaoImpl, service_definition::ServiceDefinitionDaoImpl,
    working_hours::WorkingHoursDaoImpl, TransactionDaoImpl,
};
use service::config::Config;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime, Time, Weekday};
use uuid::Uuid;

use crate::{
    seed::{seed_demo_data, DEMO_PROVIDER_ID, DEMO_SERVICE_ID},
    RestStateImpl,
};

const TEST_PROCESS: &str = "integration-test";

pub struct TestSetup {
    pub rest_state: RestStateImpl,
    pub pool: Arc<SqlitePool>,
}

impl TestSetup {
    /// In-memory database with the demo provider: Monday to Saturday 09:00-18:00,
    /// a 30 minute service with 5/10 minute buffers.
    pub async fn new() -> Self {
        let pool = Arc::new(
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect("sqlite::memory:")
                .await
                .unwrap(),
        );
        sqlx::migrate!("../migrations/sqlite")
            .run(pool.as_ref())
            .await
            .unwrap();
        assert!(seed_demo_data(pool.clone(), now()).await.unwrap());

        let rest_state = RestStateImpl::new(pool.clone(), &Config::default());
        Self { rest_state, pool }
    }

    pub fn provider_id(&self) -> Uuid {
        DEMO_PROVIDER_ID
    }

    pub fn service_id(&self) -> Uuid {
        DEMO_SERVICE_ID
    }

    pub async fn create_service(
        &self,
        max_advance_booking_days: u32,
        allow_same_day_booking: bool,
    ) -> Uuid {
        let transaction_dao = TransactionDaoImpl::new(self.pool.clone());
        let tx = transaction_dao.new_transaction().await.unwrap();
        let id = Uuid::new_v4();
        ServiceDefinitionDaoImpl::new(self.pool.clone())
            .create(
                &ServiceDefinitionEntity {
                    id,
                    provider_id: DEMO_PROVIDER_ID,
                    name: "Restricted consultation".into(),
                    duration_minutes: 30,
                    buffer_before_minutes: 5,
                    buffer_after_minutes: 10,
                    max_advance_booking_days,
                    allow_same_day_booking,
                    created: now(),
                    deleted: None,
                    version: Uuid::new_v4(),
                },
                TEST_PROCESS,
                tx.clone(),
            )
            .await
            .unwrap();
        transaction_dao.commit(tx).await.unwrap();
        id
    }

    pub async fn add_break(&self, day_of_week: DayOfWeek, start: Time, end: Time) {
        let transaction_dao = TransactionDaoImpl::new(self.pool.clone());
        let tx = transaction_dao.new_transaction().await.unwrap();
        WorkingHoursDaoImpl::new(self.pool.clone())
            .create_break(
                &WorkingHoursBreakEntity {
                    id: Uuid::new_v4(),
                    provider_id: DEMO_PROVIDER_ID,
                    day_of_week,
                    start,
                    end,
                    version: Uuid::new_v4(),
                },
                TEST_PROCESS,
                tx.clone(),
            )
            .await
            .unwrap();
        transaction_dao.commit(tx).await.unwrap();
    }

    pub async fn insert_booking(
        &self,
        start_time: PrimitiveDateTime,
        end_time: PrimitiveDateTime,
        status: BookingStatusEntity,
    ) -> Uuid {
        let transaction_dao = TransactionDaoImpl::new(self.pool.clone());
        let tx = transaction_dao.new_transaction().await.unwrap();
        let id = Uuid::new_v4();
        BookingDaoImpl::new(self.pool.clone())
            .create(
                &BookingEntity {
                    id,
                    provider_id: DEMO_PROVIDER_ID,
                    service_id: DEMO_SERVICE_ID,
                    client_id: Uuid::new_v4(),
                    start_time,
                    end_time,
                    status,
                    notes: None,
                    created: now(),
                    deleted: None,
                    version: Uuid::new_v4(),
                },
                TEST_PROCESS,
                tx.clone(),
            )
            .await
            .unwrap();
        transaction_dao.commit(tx).await.unwrap();
        id
    }
}

pub fn now() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc();
    PrimitiveDateTime::new(now.date(), now.time())
}

pub fn today() -> Date {
    now().date()
}

/// The next given weekday strictly after today, always inside the booking window.
pub fn next(weekday: Weekday) -> Date {
    today().next_occurrence(weekday)
}

pub fn at(date: Date, time: Time) -> PrimitiveDateTime {
    PrimitiveDateTime::new(date, time)
}

pub fn plus_minutes(datetime: PrimitiveDateTime, minutes: i64) -> PrimitiveDateTime {
    datetime + Duration::minutes(minutes)
}

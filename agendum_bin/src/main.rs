#[cfg(test)]
mod integration_test;
mod seed;

use std::{str::FromStr, sync::Arc};

use dao_impl_sqlite::{
    booking::BookingDaoImpl, provider::ProviderDaoImpl,
    service_definition::ServiceDefinitionDaoImpl, working_hours::WorkingHoursDaoImpl,
    TransactionDaoImpl, TransactionImpl,
};
use service::{
    clock::ClockService as _,
    config::{Config, ConfigService as _},
};
use service_impl::{
    availability::{AvailabilityServiceDeps, AvailabilityServiceImpl},
    booking_commit::{BookingCommitServiceDeps, BookingCommitServiceImpl},
    commit_guard::CommitGuard,
};
use sqlx::{sqlite::SqliteConnectOptions, SqlitePool};
#[cfg(feature = "json_logging")]
use tracing_subscriber::fmt::format::FmtSpan;

type Transaction = TransactionImpl;
type TransactionDao = TransactionDaoImpl;
type ProviderDao = ProviderDaoImpl;
type ServiceDefinitionDao = ServiceDefinitionDaoImpl;
type WorkingHoursDao = WorkingHoursDaoImpl;
type BookingDao = BookingDaoImpl;

type ClockService = service_impl::clock::ClockServiceImpl;
type UuidService = service_impl::uuid_service::UuidServiceImpl;
type ConfigService = service_impl::config::ConfigServiceImpl;

const DEFAULT_DATABASE_URL: &str = "sqlite:./localdb.sqlite3";
const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3000";

pub struct AvailabilityServiceDependencies;
impl AvailabilityServiceDeps for AvailabilityServiceDependencies {
    type Transaction = Transaction;
    type ServiceDefinitionDao = ServiceDefinitionDao;
    type ProviderDao = ProviderDao;
    type WorkingHoursDao = WorkingHoursDao;
    type BookingDao = BookingDao;
    type ClockService = ClockService;
    type ConfigService = ConfigService;
    type TransactionDao = TransactionDao;
}
type AvailabilityService = AvailabilityServiceImpl<AvailabilityServiceDependencies>;

pub struct BookingCommitServiceDependencies;
impl BookingCommitServiceDeps for BookingCommitServiceDependencies {
    type Transaction = Transaction;
    type AvailabilityService = AvailabilityService;
    type ServiceDefinitionDao = ServiceDefinitionDao;
    type BookingDao = BookingDao;
    type ClockService = ClockService;
    type UuidService = UuidService;
    type ConfigService = ConfigService;
    type TransactionDao = TransactionDao;
}
type BookingCommitService = BookingCommitServiceImpl<BookingCommitServiceDependencies>;

#[derive(Clone)]
pub struct RestStateImpl {
    availability_service: Arc<AvailabilityService>,
    booking_commit_service: Arc<BookingCommitService>,
}
impl rest::RestStateDef for RestStateImpl {
    type AvailabilityService = AvailabilityService;
    type BookingCommitService = BookingCommitService;

    fn availability_service(&self) -> Arc<Self::AvailabilityService> {
        self.availability_service.clone()
    }
    fn booking_commit_service(&self) -> Arc<Self::BookingCommitService> {
        self.booking_commit_service.clone()
    }
}
impl RestStateImpl {
    pub fn new(pool: Arc<SqlitePool>, config: &Config) -> Self {
        let transaction_dao = Arc::new(TransactionDao::new(pool.clone()));
        let service_definition_dao = Arc::new(ServiceDefinitionDao::new(pool.clone()));
        let booking_dao = Arc::new(BookingDao::new(pool.clone()));

        let clock_service = Arc::new(ClockService::new(&config.timezone));
        let uuid_service = Arc::new(service_impl::uuid_service::UuidServiceImpl);
        let config_service = Arc::new(service_impl::config::ConfigServiceImpl);

        let availability_service = Arc::new(AvailabilityService {
            service_definition_dao: service_definition_dao.clone(),
            provider_dao: Arc::new(ProviderDao::new(pool.clone())),
            working_hours_dao: Arc::new(WorkingHoursDao::new(pool.clone())),
            booking_dao: booking_dao.clone(),
            clock_service: clock_service.clone(),
            config_service: config_service.clone(),
            transaction_dao: transaction_dao.clone(),
        });
        let booking_commit_service = Arc::new(BookingCommitService {
            availability_service: availability_service.clone(),
            service_definition_dao,
            booking_dao,
            clock_service,
            uuid_service,
            config_service,
            transaction_dao,
            commit_guard: Arc::new(CommitGuard::new()),
        });

        Self {
            availability_service,
            booking_commit_service,
        }
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|value| matches!(value.trim(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

#[tokio::main]
async fn main() {
    let version = env!("CARGO_PKG_VERSION");

    #[cfg(feature = "local_logging")]
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::TRACE)
        .pretty()
        .with_file(true)
        .finish();

    #[cfg(feature = "json_logging")]
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .json()
        .with_span_events(FmtSpan::CLOSE)
        .with_span_list(true)
        .with_file(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    tracing::info!("Agendum backend version: {}", version);
    dotenvy::dotenv().ok();

    let config = service_impl::config::ConfigServiceImpl
        .get_config()
        .await
        .expect("Invalid configuration");
    tracing::info!("Configuration: {:?}", config);

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
    let connect_options = SqliteConnectOptions::from_str(&database_url)
        .expect("Invalid DATABASE_URL")
        .create_if_missing(true);
    let pool = Arc::new(
        SqlitePool::connect_with(connect_options)
            .await
            .expect("Could not connect to database"),
    );

    sqlx::migrate!("../migrations/sqlite")
        .run(pool.as_ref())
        .await
        .expect("Failed to run migrations");

    if env_flag("SEED_DEMO_DATA") {
        let now = ClockService::new(&config.timezone).date_time_now();
        seed::seed_demo_data(pool.clone(), now)
            .await
            .expect("Expected being able to seed the demo data");
    }

    let rest_state = RestStateImpl::new(pool.clone(), &config);
    let bind_address =
        std::env::var("BIND_ADDRESS").unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string());
    rest::start_server(rest_state, &bind_address).await
}

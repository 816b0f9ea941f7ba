use std::sync::Arc;
use std::time::Duration;

use crate::ServiceError;
use async_trait::async_trait;
use mockall::automock;

pub const DEFAULT_SLOT_GRANULARITY_MINUTES: u32 = 15;
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_millis(5000);
pub const DEFAULT_COMMIT_LOCK_TIMEOUT: Duration = Duration::from_millis(2000);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// IANA name of the timezone "today" is evaluated in.
    pub timezone: Arc<str>,
    pub slot_granularity_minutes: u32,
    pub store_timeout: Duration,
    pub commit_lock_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: "UTC".into(),
            slot_granularity_minutes: DEFAULT_SLOT_GRANULARITY_MINUTES,
            store_timeout: DEFAULT_STORE_TIMEOUT,
            commit_lock_timeout: DEFAULT_COMMIT_LOCK_TIMEOUT,
        }
    }
}

#[automock]
#[async_trait]
pub trait ConfigService {
    async fn get_config(&self) -> Result<Config, ServiceError>;
}

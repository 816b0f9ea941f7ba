use std::{env, str::FromStr, sync::Arc, time::Duration};

use async_trait::async_trait;
use service::{
    config::{
        Config, ConfigService, DEFAULT_COMMIT_LOCK_TIMEOUT, DEFAULT_SLOT_GRANULARITY_MINUTES,
        DEFAULT_STORE_TIMEOUT,
    },
    ServiceError, ValidationFailureItem,
};

/// Reads the configuration from environment variables.
pub struct ConfigServiceImpl;

fn env_number<T: FromStr>(name: &str) -> Result<Option<T>, ServiceError> {
    match env::var(name) {
        Ok(value) => value.trim().parse::<T>().map(Some).map_err(|_| {
            ServiceError::ValidationError(Arc::new([ValidationFailureItem::InvalidValue(
                name.into(),
            )]))
        }),
        Err(_) => Ok(None),
    }
}

#[async_trait]
impl ConfigService for ConfigServiceImpl {
    async fn get_config(&self) -> Result<Config, ServiceError> {
        let timezone = env::var("TIMEZONE").unwrap_or("UTC".to_string());
        let slot_granularity_minutes = env_number::<u32>("SLOT_GRANULARITY_MINUTES")?
            .unwrap_or(DEFAULT_SLOT_GRANULARITY_MINUTES);
        if slot_granularity_minutes == 0 {
            return Err(ServiceError::ValidationError(Arc::new([
                ValidationFailureItem::InvalidValue("SLOT_GRANULARITY_MINUTES".into()),
            ])));
        }
        let store_timeout = env_number::<u64>("STORE_TIMEOUT_MS")?
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_STORE_TIMEOUT);
        let commit_lock_timeout = env_number::<u64>("COMMIT_LOCK_TIMEOUT_MS")?
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_COMMIT_LOCK_TIMEOUT);

        Ok(Config {
            timezone: Arc::from(timezone),
            slot_granularity_minutes,
            store_timeout,
            commit_lock_timeout,
        })
    }
}

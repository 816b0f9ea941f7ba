use std::future::Future;
use std::time::Duration;

use service::ServiceError;

pub mod availability;
pub mod booking_commit;
pub mod booking_window;
pub mod clock;
pub mod commit_guard;
pub mod config;
pub mod conflict;
pub mod macros;
pub mod slot_generator;
pub mod uuid_service;
pub mod working_hours;

#[cfg(test)]
mod test;

/// Bounds a store round trip. Running out of time is reported as
/// [`ServiceError::StoreTimeout`] and never as an empty result.
pub async fn with_store_timeout<T, F>(timeout: Duration, future: F) -> Result<T, ServiceError>
where
    F: Future<Output = Result<T, ServiceError>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!("Store did not answer within {:?}", timeout);
            Err(ServiceError::StoreTimeout(timeout))
        }
    }
}

use std::sync::Arc;

use agendum_utils::dates_between;
use async_trait::async_trait;
use dao::{
    booking::{BookingDao, BookingEntity},
    service_definition::ServiceDefinitionDao,
    TransactionDao,
};
use service::{
    availability::{AvailabilityService, ConflictVerdict},
    booking::{Booking, BookingCommitService, BookingRequest, BookingStatus, CommitPhase},
    clock::ClockService,
    config::ConfigService,
    service_definition::ServiceDefinition,
    uuid_service::UuidService,
    ServiceError, ValidationFailureItem,
};
use time::{Date, Duration, PrimitiveDateTime};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::{
    booking_window::check_commit_window, commit_guard::CommitGuard, gen_service_impl,
    with_store_timeout,
};

const BOOKING_COMMIT_SERVICE_PROCESS: &str = "booking-commit-service";

gen_service_impl! {
    struct BookingCommitServiceImpl: BookingCommitService = BookingCommitServiceDeps {
        AvailabilityService: AvailabilityService<Transaction = Self::Transaction> = availability_service,
        ServiceDefinitionDao: ServiceDefinitionDao<Transaction = Self::Transaction> = service_definition_dao,
        BookingDao: BookingDao<Transaction = Self::Transaction> = booking_dao,
        ClockService: ClockService = clock_service,
        UuidService: UuidService = uuid_service,
        ConfigService: ConfigService = config_service,
        TransactionDao: TransactionDao<Transaction = Self::Transaction> = transaction_dao,
    }
    with {
        commit_guard: Arc<CommitGuard>,
    }
}

/// Calendar dates touched by `[start, end)`.
fn touched_dates(start: PrimitiveDateTime, end: PrimitiveDateTime) -> Vec<Date> {
    let last = if end > start {
        (end - Duration::minutes(1)).date()
    } else {
        start.date()
    };
    dates_between(start.date(), last)
}

fn invalid_value(field: &str) -> ServiceError {
    ServiceError::ValidationError(Arc::new([ValidationFailureItem::InvalidValue(
        field.into(),
    )]))
}

impl<Deps: BookingCommitServiceDeps> BookingCommitServiceImpl<Deps> {
    /// Loads the service in a short transaction of its own, so no store connection is
    /// held while waiting for the commit lock.
    async fn load_service(&self, service_id: Uuid) -> Result<ServiceDefinition, ServiceError> {
        let tx = self.transaction_dao.new_transaction().await?;
        let service = self
            .service_definition_dao
            .find_by_id(service_id, tx.clone())
            .await?
            .ok_or(ServiceError::EntityNotFound(service_id))?;
        self.transaction_dao.commit(tx).await?;
        Ok((&service).into())
    }

    /// Re-checks the candidate against the current calendar and inserts it in the same
    /// transaction. Must only run while the commit lock is held.
    async fn validate_and_insert(
        &self,
        service: &ServiceDefinition,
        request: &BookingRequest,
        end_time: PrimitiveDateTime,
    ) -> Result<Booking, ServiceError> {
        let tx = self.transaction_dao.new_transaction().await?;
        let verdict = self
            .availability_service
            .compute_conflict(
                service.provider_id,
                request.start_time,
                end_time,
                service.buffers,
                Some(tx.clone()),
            )
            .await?;
        if let ConflictVerdict::Conflicting(conflicts) = verdict {
            return Err(
                if conflicts.iter().any(|conflict| conflict.kind.is_booking_conflict()) {
                    ServiceError::BookingConflict(conflicts)
                } else {
                    ServiceError::NotBookable(conflicts)
                },
            );
        }

        let booking = Booking {
            id: self
                .uuid_service
                .new_uuid("BookingCommitServiceImpl::commit id"),
            provider_id: service.provider_id,
            service_id: service.id,
            client_id: request.client_id,
            start_time: request.start_time,
            end_time,
            status: BookingStatus::Pending,
            notes: request.notes.clone(),
            created: Some(self.clock_service.date_time_now()),
            version: self
                .uuid_service
                .new_uuid("BookingCommitServiceImpl::commit version"),
        };
        self.booking_dao
            .create(
                &BookingEntity::try_from(&booking)?,
                BOOKING_COMMIT_SERVICE_PROCESS,
                tx.clone(),
            )
            .await?;
        self.transaction_dao.commit(tx).await?;
        Ok(booking)
    }

    async fn run_commit(
        &self,
        request: &BookingRequest,
        log_phase: impl Fn(CommitPhase),
    ) -> Result<Booking, ServiceError> {
        if request.duration_minutes == Some(0) {
            return Err(invalid_value("durationMinutes"));
        }
        let config = self.config_service.get_config().await?;
        let service =
            with_store_timeout(config.store_timeout, self.load_service(request.service_id))
                .await?;
        let duration = request.duration_minutes.unwrap_or(service.duration_minutes);
        let end_time = request
            .start_time
            .checked_add(Duration::minutes(i64::from(duration)))
            .ok_or_else(|| invalid_value("startTime"))?;

        check_commit_window(
            request.start_time,
            &service.policy,
            self.clock_service.date_time_now(),
        )
        .map_err(ServiceError::BookingWindowViolation)?;

        let dates = touched_dates(
            request
                .start_time
                .saturating_sub(Duration::minutes(i64::from(service.buffers.before_minutes))),
            end_time.saturating_add(Duration::minutes(i64::from(service.buffers.after_minutes))),
        );
        let _permit = self
            .commit_guard
            .acquire(service.provider_id, &dates, config.commit_lock_timeout)
            .await?;
        log_phase(CommitPhase::Validating);
        with_store_timeout(
            config.store_timeout,
            self.validate_and_insert(&service, request, end_time),
        )
        .await
    }
}

#[async_trait]
impl<Deps: BookingCommitServiceDeps> BookingCommitService for BookingCommitServiceImpl<Deps> {
    type Transaction = Deps::Transaction;

    #[instrument(skip(self), fields(service_id = %request.service_id, start_time = %request.start_time))]
    async fn commit(&self, request: &BookingRequest) -> Result<Booking, ServiceError> {
        let log_phase = |phase: CommitPhase| debug!(%phase, "Booking commit phase changed");
        log_phase(CommitPhase::Requested);
        match self.run_commit(request, log_phase).await {
            Ok(booking) => {
                log_phase(CommitPhase::Committed);
                debug!("Committed booking {}", booking.id);
                Ok(booking)
            }
            Err(err) => {
                warn!(phase = %CommitPhase::Rejected, "Booking commit rejected: {}", err);
                Err(err)
            }
        }
    }

    async fn get(&self, id: Uuid, tx: Option<Self::Transaction>) -> Result<Booking, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let booking = self
            .booking_dao
            .find_by_id(id, tx.clone())
            .await?
            .as_ref()
            .map(Booking::from)
            .ok_or(ServiceError::EntityNotFound(id))?;
        self.transaction_dao.commit(tx).await?;
        Ok(booking)
    }
}

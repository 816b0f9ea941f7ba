use std::sync::Arc;

use agendum_utils::{datetime_at_minute, minutes_relative_to};
use async_trait::async_trait;
use dao::{
    booking::BookingDao, provider::ProviderDao, service_definition::ServiceDefinitionDao,
    working_hours::WorkingHoursDao, TransactionDao,
};
use service::{
    availability::{
        AvailabilityResult, AvailabilityService, AvailabilityStatus, Conflict, ConflictVerdict,
        SuggestedSlot, TimeSlot,
    },
    booking::Booking,
    clock::ClockService,
    config::ConfigService,
    service_definition::{BookingPolicy, Buffers, ServiceDefinition},
    working_hours::{MinuteRange, WeeklySchedule},
    ServiceError, ValidationFailureItem,
};
use time::{Date, PrimitiveDateTime};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::{
    booking_window::check_booking_window, conflict::BlockedCalendar, gen_service_impl,
    slot_generator::CandidateSlots, with_store_timeout, working_hours::resolve_day_window,
};

pub const SUGGESTION_DAYS: u32 = 7;
pub const SUGGESTIONS_PER_DAY: usize = 3;
pub const MAX_SUGGESTIONS: usize = 10;

/// Everything the availability of one service on one date depends on.
#[derive(Clone, Debug)]
pub struct AvailabilityQuery<'a> {
    pub service_id: Uuid,
    pub date: Date,
    pub duration_minutes: u32,
    pub buffers: Buffers,
    pub policy: BookingPolicy,
    pub schedule: Option<&'a WeeklySchedule>,
    pub bookings: &'a [Booking],
    pub granularity_minutes: u32,
    pub today: Date,
}

/// Pure availability computation. Identical queries give identical results.
///
/// A policy rejection wins over a closed day, the resolved window is reported in
/// both cases.
pub fn compute_availability(query: &AvailabilityQuery) -> AvailabilityResult {
    let window = resolve_day_window(query.schedule, query.date);
    let status = match check_booking_window(query.date, &query.policy, query.today) {
        Err(reason) => AvailabilityStatus::PolicyRejected(reason),
        Ok(()) if !window.is_working_day => AvailabilityStatus::ClosedDay,
        Ok(()) => AvailabilityStatus::Open,
    };
    if status != AvailabilityStatus::Open {
        return AvailabilityResult {
            service_id: query.service_id,
            date: query.date,
            duration_minutes: query.duration_minutes,
            status,
            slots: Arc::new([]),
            working_hours: window,
            blocked: Arc::new([]),
        };
    }

    let calendar = BlockedCalendar::new(query.date, query.bookings, &window.breaks);
    let slots = CandidateSlots::new(&window, query.duration_minutes, query.granularity_minutes)
        .map(|range| TimeSlot {
            range,
            is_available: calendar.is_free(&range, &query.buffers),
        })
        .collect::<Arc<[TimeSlot]>>();
    AvailabilityResult {
        service_id: query.service_id,
        date: query.date,
        duration_minutes: query.duration_minutes,
        status,
        slots,
        blocked: calendar.blocked_intervals().into(),
        working_hours: window,
    }
}

/// A loaded service with the provider's schedule, shared by the per-date lookups.
struct ServiceCalendar<'a> {
    service: &'a ServiceDefinition,
    schedule: Option<&'a WeeklySchedule>,
    granularity_minutes: u32,
    today: Date,
}

gen_service_impl! {
    struct AvailabilityServiceImpl: AvailabilityService = AvailabilityServiceDeps {
        ServiceDefinitionDao: ServiceDefinitionDao<Transaction = Self::Transaction> = service_definition_dao,
        ProviderDao: ProviderDao<Transaction = Self::Transaction> = provider_dao,
        WorkingHoursDao: WorkingHoursDao<Transaction = Self::Transaction> = working_hours_dao,
        BookingDao: BookingDao<Transaction = Self::Transaction> = booking_dao,
        ClockService: ClockService = clock_service,
        ConfigService: ConfigService = config_service,
        TransactionDao: TransactionDao<Transaction = Self::Transaction> = transaction_dao,
    }
}

impl<Deps: AvailabilityServiceDeps> AvailabilityServiceImpl<Deps> {
    async fn load_service(
        &self,
        service_id: Uuid,
        tx: Deps::Transaction,
    ) -> Result<ServiceDefinition, ServiceError> {
        let service = self
            .service_definition_dao
            .find_by_id(service_id, tx.clone())
            .await?
            .ok_or(ServiceError::EntityNotFound(service_id))?;
        self.provider_dao
            .find_by_id(service.provider_id, tx)
            .await?
            .ok_or(ServiceError::EntityNotFound(service.provider_id))?;
        Ok((&service).into())
    }

    /// `None` if the provider has no working hours configured at all.
    async fn load_schedule(
        &self,
        provider_id: Uuid,
        tx: Deps::Transaction,
    ) -> Result<Option<WeeklySchedule>, ServiceError> {
        let hours = self
            .working_hours_dao
            .find_by_provider_id(provider_id, tx.clone())
            .await?;
        if hours.is_empty() {
            return Ok(None);
        }
        let breaks = self
            .working_hours_dao
            .find_breaks_by_provider_id(provider_id, tx)
            .await?;
        Ok(Some(WeeklySchedule::from_entities(&hours, &breaks)?))
    }

    /// Blocking bookings whose buffer-expanded interval can reach `range` on `date`.
    async fn load_bookings(
        &self,
        provider_id: Uuid,
        date: Date,
        range: MinuteRange,
        buffers: &Buffers,
        tx: Deps::Transaction,
    ) -> Result<Arc<[Booking]>, ServiceError> {
        let from = datetime_at_minute(date, range.start - i64::from(buffers.after_minutes));
        let to = datetime_at_minute(date, range.end + i64::from(buffers.before_minutes));
        Ok(self
            .booking_dao
            .find_blocking_in_range(provider_id, from, to, tx)
            .await?
            .iter()
            .map(Booking::from)
            .collect())
    }

    /// Availability of a loaded service on `date`. Bookings are only read for
    /// open days.
    async fn availability_for_date(
        &self,
        calendar: &ServiceCalendar<'_>,
        date: Date,
        duration_minutes: u32,
        tx: Deps::Transaction,
    ) -> Result<AvailabilityResult, ServiceError> {
        let service = calendar.service;
        let window = resolve_day_window(calendar.schedule, date);
        let bookings = if window.is_working_day
            && check_booking_window(date, &service.policy, calendar.today).is_ok()
        {
            self.load_bookings(
                service.provider_id,
                date,
                window.span(),
                &service.buffers,
                tx,
            )
            .await?
        } else {
            Arc::new([])
        };
        Ok(compute_availability(&AvailabilityQuery {
            service_id: service.id,
            date,
            duration_minutes,
            buffers: service.buffers,
            policy: service.policy,
            schedule: calendar.schedule,
            bookings: &bookings,
            granularity_minutes: calendar.granularity_minutes,
            today: calendar.today,
        }))
    }
}

#[async_trait]
impl<Deps: AvailabilityServiceDeps> AvailabilityService for AvailabilityServiceImpl<Deps> {
    type Transaction = Deps::Transaction;

    #[instrument(skip(self, tx))]
    async fn get_availability(
        &self,
        service_id: Uuid,
        date: Date,
        duration_minutes: Option<u32>,
        tx: Option<Self::Transaction>,
    ) -> Result<AvailabilityResult, ServiceError> {
        if duration_minutes == Some(0) {
            return Err(ServiceError::ValidationError(Arc::new([
                ValidationFailureItem::InvalidValue("durationMinutes".into()),
            ])));
        }
        let config = self.config_service.get_config().await?;
        let today = self.clock_service.date_now();
        with_store_timeout(config.store_timeout, async {
            let tx = self.transaction_dao.use_transaction(tx).await?;
            let service = self.load_service(service_id, tx.clone()).await?;
            let schedule = self.load_schedule(service.provider_id, tx.clone()).await?;
            let calendar = ServiceCalendar {
                service: &service,
                schedule: schedule.as_ref(),
                granularity_minutes: config.slot_granularity_minutes,
                today,
            };
            let result = self
                .availability_for_date(
                    &calendar,
                    date,
                    duration_minutes.unwrap_or(service.duration_minutes),
                    tx.clone(),
                )
                .await?;
            self.transaction_dao.commit(tx).await?;
            debug!(
                "Availability for {} on {}: {} with {} of {} slots available",
                service_id,
                date,
                result.status.code(),
                result.available_slots().count(),
                result.slots.len()
            );
            Ok(result)
        })
        .await
    }

    #[instrument(skip(self, tx))]
    async fn suggest_slots(
        &self,
        service_id: Uuid,
        from: Date,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[SuggestedSlot]>, ServiceError> {
        let config = self.config_service.get_config().await?;
        let today = self.clock_service.date_now();
        with_store_timeout(config.store_timeout, async {
            let tx = self.transaction_dao.use_transaction(tx).await?;
            let service = self.load_service(service_id, tx.clone()).await?;
            let schedule = self.load_schedule(service.provider_id, tx.clone()).await?;
            let calendar = ServiceCalendar {
                service: &service,
                schedule: schedule.as_ref(),
                granularity_minutes: config.slot_granularity_minutes,
                today,
            };

            let mut suggestions = Vec::new();
            let mut date = Some(from);
            for _ in 0..SUGGESTION_DAYS {
                let Some(current) = date else { break };
                let result = self
                    .availability_for_date(
                        &calendar,
                        current,
                        service.duration_minutes,
                        tx.clone(),
                    )
                    .await?;
                suggestions.extend(
                    result
                        .available_slots()
                        .take(SUGGESTIONS_PER_DAY)
                        .map(|slot| SuggestedSlot {
                            date: current,
                            start_time: datetime_at_minute(current, slot.range.start),
                            end_time: datetime_at_minute(current, slot.range.end),
                        }),
                );
                if suggestions.len() >= MAX_SUGGESTIONS {
                    suggestions.truncate(MAX_SUGGESTIONS);
                    break;
                }
                date = current.next_day();
            }
            self.transaction_dao.commit(tx).await?;
            Ok(suggestions.into())
        })
        .await
    }

    #[instrument(skip(self, tx))]
    async fn compute_conflict(
        &self,
        provider_id: Uuid,
        start_time: PrimitiveDateTime,
        end_time: PrimitiveDateTime,
        buffers: Buffers,
        tx: Option<Self::Transaction>,
    ) -> Result<ConflictVerdict, ServiceError> {
        let tx = self.transaction_dao.use_transaction(tx).await?;
        let date = start_time.date();
        let candidate = MinuteRange::new(
            minutes_relative_to(date, start_time),
            minutes_relative_to(date, end_time),
        );
        let schedule = self.load_schedule(provider_id, tx.clone()).await?;
        let window = resolve_day_window(schedule.as_ref(), date);
        let bookings = self
            .load_bookings(provider_id, date, candidate, &buffers, tx.clone())
            .await?;
        self.transaction_dao.commit(tx).await?;

        let conflicts = BlockedCalendar::new(date, &bookings, &window.breaks)
            .classify(&candidate, &buffers, &window)
            .into_iter()
            .map(|conflict| Conflict {
                kind: conflict.kind,
                start_time: datetime_at_minute(date, conflict.range.start),
                end_time: datetime_at_minute(date, conflict.range.end),
                booking_id: conflict.booking_id,
            })
            .collect::<Arc<[Conflict]>>();
        if conflicts.is_empty() {
            Ok(ConflictVerdict::Clear)
        } else {
            debug!(
                "{} conflicts for provider {} between {} and {}",
                conflicts.len(),
                provider_id,
                start_time,
                end_time
            );
            Ok(ConflictVerdict::Conflicting(conflicts))
        }
    }
}

use service::{availability::RejectionReason, service_definition::BookingPolicy};
use time::{Date, Duration, PrimitiveDateTime};

/// Checks whether `date` lies inside the booking horizon of a service.
///
/// `today + max_advance_booking_days` is still bookable, the day after is not.
pub fn check_booking_window(
    date: Date,
    policy: &BookingPolicy,
    today: Date,
) -> Result<(), RejectionReason> {
    if date < today {
        return Err(RejectionReason::PastDate);
    }
    if date == today && !policy.allow_same_day_booking {
        return Err(RejectionReason::SameDayNotAllowed);
    }
    let last_bookable_day =
        today.checked_add(Duration::days(i64::from(policy.max_advance_booking_days)));
    if matches!(last_bookable_day, Some(last) if date > last) {
        return Err(RejectionReason::BeyondAdvanceWindow {
            max_advance_booking_days: policy.max_advance_booking_days,
        });
    }
    Ok(())
}

/// Full commit-time check: the booking window of the start date and a start which
/// has not passed yet.
pub fn check_commit_window(
    start_time: PrimitiveDateTime,
    policy: &BookingPolicy,
    now: PrimitiveDateTime,
) -> Result<(), RejectionReason> {
    check_booking_window(start_time.date(), policy, now.date())?;
    if start_time < now {
        return Err(RejectionReason::StartInPast);
    }
    Ok(())
}

//! Pickup time resolution.

use crate::error::FlowError;
use chrono::{DateTime, Duration, FixedOffset, NaiveTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

/// `H:MM` or `HH:MM`, hours 0-23, minutes 00-59.
static TIME_OF_DAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01]?[0-9]|2[0-3]):([0-5][0-9])$").expect("valid time pattern"));

/// Resolves a customer-typed time of day to an instant.
///
/// The time is read in the stores' local `offset`. Today's occurrence is used unless it is
/// already past, in which case the time is taken to mean tomorrow.
pub fn resolve_custom_time(
    input: &str,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> Result<DateTime<Utc>, FlowError> {
    let invalid = || FlowError::Validation(format!("{input:?} is not a time, use HH:MM (e.g. 14:00)"));
    let caps = TIME_OF_DAY.captures(input.trim()).ok_or_else(invalid)?;
    let hour: u32 = caps[1].parse().map_err(|_| invalid())?;
    let minute: u32 = caps[2].parse().map_err(|_| invalid())?;
    let time = NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)?;

    let local_now = now.with_timezone(&offset);
    let mut target = local_now
        .date_naive()
        .and_time(time)
        .and_local_timezone(offset)
        .single()
        .ok_or_else(invalid)?;
    if target < local_now {
        target += Duration::days(1);
    }
    Ok(target.with_timezone(&Utc))
}

/// Formats an instant as local `HH:MM`.
pub fn local_hhmm(at: DateTime<Utc>, offset: FixedOffset) -> String {
    at.with_timezone(&offset).format("%H:%M").to_string()
}

// bacman/src/prune/mod.rs
pub(crate) mod local;
pub(crate) mod remote;

use chrono::{DateTime, Duration, Utc};
use tracing::warn;

/// Snapshots older than this many hours are pruned unless overridden.
pub const DEFAULT_RETENTION_HOURS: i64 = 720;

/// Longest accepted override, one hundred years.
pub const MAX_RETENTION_HOURS: i64 = 100 * 366 * 24;

/// Validates a retention override given in whole hours.
///
/// Anything that is not a positive integer up to `MAX_RETENTION_HOURS` is
/// reported and replaced by the default, never raised.
pub fn retention_hours(label: &str, override_hours: Option<&str>) -> i64 {
    let Some(raw) = override_hours else {
        return DEFAULT_RETENTION_HOURS;
    };
    match raw.trim().parse::<i64>() {
        Ok(hours) if hours > 0 && hours <= MAX_RETENTION_HOURS => hours,
        Ok(hours) if hours > MAX_RETENTION_HOURS => {
            warn!(
                "Ignoring {} timeout {}: longer than {}h, using {}h",
                label, hours, MAX_RETENTION_HOURS, DEFAULT_RETENTION_HOURS
            );
            DEFAULT_RETENTION_HOURS
        }
        Ok(hours) => {
            warn!(
                "Ignoring {} timeout {}: must be a positive number of hours, using {}h",
                label, hours, DEFAULT_RETENTION_HOURS
            );
            DEFAULT_RETENTION_HOURS
        }
        Err(e) => {
            warn!(
                "Ignoring {} timeout {:?}: {}, using {}h",
                label, raw, e, DEFAULT_RETENTION_HOURS
            );
            DEFAULT_RETENTION_HOURS
        }
    }
}

/// The instant before which snapshots are considered expired. Saturates at
/// the earliest representable time, so nothing is pruned on overflow.
pub fn cutoff(now: DateTime<Utc>, hours: i64) -> DateTime<Utc> {
    Duration::try_hours(hours)
        .and_then(|period| now.checked_sub_signed(period))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

use std::time::Duration;

use serde::Serializer;

/// Mean of `count` durations summing to `total`; zero when `count` is zero.
#[must_use]
pub fn average_duration(total: Duration, count: u64) -> Duration {
    if count == 0 {
        return Duration::ZERO;
    }
    let nanos = total.as_nanos().checked_div(u128::from(count)).unwrap_or(0);
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
}

#[must_use]
pub fn sum_durations<'a, I>(durations: I) -> Duration
where
    I: IntoIterator<Item = &'a Duration>,
{
    durations
        .into_iter()
        .fold(Duration::ZERO, |total, value| total.saturating_add(*value))
}

#[must_use]
pub fn as_micros_u64(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}

/// Serializes a duration as whole microseconds.
///
/// # Errors
///
/// Propagates serializer errors.
pub fn serialize_micros<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u64(as_micros_u64(*duration))
}

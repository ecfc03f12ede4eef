use derive_more::{Deref, From, Into};
use std::time::Duration;

const MICROS_PER_MILLI: i64 = 1_000;

/// A signed span of time in microseconds. 64 bits wide on the wire.
#[derive(Deref, From, Into, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Default, Debug)]
pub struct TimeDuration(i64);

impl TimeDuration {
    pub const ZERO: Self = Self(0);

    pub fn from_micros(micros: i64) -> Self {
        Self(micros)
    }

    pub fn micros(&self) -> i64 {
        self.0
    }

    /// Saturates at the `i64` microsecond range.
    pub fn from_millis(millis: i64) -> Self {
        Self(millis.saturating_mul(MICROS_PER_MILLI))
    }

    /// Truncates toward zero.
    pub fn millis(&self) -> i64 {
        self.0 / MICROS_PER_MILLI
    }

    /// `None` for negative spans.
    pub fn to_duration(&self) -> Option<Duration> {
        u64::try_from(self.0).ok().map(Duration::from_micros)
    }

    /// `None` if `d` exceeds the `i64` microsecond range.
    pub fn from_duration(d: Duration) -> Option<Self> {
        i64::try_from(d.as_micros()).ok().map(Self)
    }
}

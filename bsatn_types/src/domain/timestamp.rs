use derive_more::{Deref, From, Into};
use std::time::{Duration, SystemTime};

/// A point in time, as microseconds since the unix epoch.
#[derive(Deref, From, Into, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Default, Debug)]
pub struct Timestamp(i64);

impl Timestamp {
    pub const UNIX_EPOCH: Self = Self(0);

    pub fn from_micros_since_unix_epoch(micros: i64) -> Self {
        Self(micros)
    }

    pub fn micros_since_unix_epoch(&self) -> i64 {
        self.0
    }

    /// Falls back to the epoch only if the system clock is beyond the representable range.
    pub fn now() -> Self {
        Self::from_system_time(SystemTime::now()).unwrap_or(Self::UNIX_EPOCH)
    }

    /// `None` if `t` is too far from the epoch for an `i64` microsecond count.
    pub fn from_system_time(t: SystemTime) -> Option<Self> {
        match t.duration_since(SystemTime::UNIX_EPOCH) {
            Ok(after) => i64::try_from(after.as_micros()).ok().map(Self),
            Err(before) => {
                let micros = i64::try_from(before.duration().as_micros()).ok()?;
                Some(Self(-micros))
            }
        }
    }

    /// `None` if the platform's `SystemTime` cannot represent this timestamp.
    pub fn to_system_time(&self) -> Option<SystemTime> {
        let magnitude = Duration::from_micros(self.0.unsigned_abs());
        if self.0 >= 0 {
            SystemTime::UNIX_EPOCH.checked_add(magnitude)
        } else {
            SystemTime::UNIX_EPOCH.checked_sub(magnitude)
        }
    }
}

//! Time source abstraction.
//!
//! Every time-dependent decision in this crate takes an explicit timestamp or
//! reads an injected [`Clock`], never the wall clock directly. Tests drive
//! lockout windows and session expiry deterministically with [`FixedClock`].

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Duration, Utc};

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// # Example
///
/// ```rust
/// use chrono::Duration;
/// use keygate::{Clock, FixedClock};
///
/// let clock = FixedClock::default();
/// let t0 = clock.now();
/// clock.advance(Duration::seconds(30));
/// assert_eq!(clock.now(), t0 + Duration::seconds(30));
/// ```
#[derive(Debug, Clone)]
pub struct FixedClock {
    current: Arc<RwLock<DateTime<Utc>>>,
}

impl FixedClock {
    /// Creates a clock frozen at the given instant.
    #[must_use]
    pub fn at(time: DateTime<Utc>) -> Self {
        Self {
            current: Arc::new(RwLock::new(time)),
        }
    }

    /// Moves the clock to a specific instant.
    pub fn set(&self, time: DateTime<Utc>) {
        if let Ok(mut current) = self.current.write() {
            *current = time;
        }
    }

    /// Moves the clock forward (or backward, with a negative duration).
    pub fn advance(&self, by: Duration) {
        if let Ok(mut current) = self.current.write() {
            *current += by;
        }
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        Self::at(Utc::now())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.current.read().map(|t| *t).unwrap_or_else(|_| Utc::now())
    }
}

/// Serializes `chrono::Duration` as whole milliseconds.
///
/// Policy and session durations are persisted inside entity records; chrono
/// durations have no built-in serde support, so they travel as `i64`.
pub(crate) mod duration_millis {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.num_milliseconds().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = i64::deserialize(deserializer)?;
        Duration::try_milliseconds(millis)
            .ok_or_else(|| serde::de::Error::custom(format!("duration out of range: {millis}ms")))
    }
}

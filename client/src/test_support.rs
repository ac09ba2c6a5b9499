//! Shared test doubles.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

/// Clock that only moves when told to.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn at_epoch() -> Self {
        Self::new(DateTime::<Utc>::UNIX_EPOCH)
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn clock_keeps_working_after_a_panicking_holder() {
        let clock = Arc::new(MutableClock::at_epoch());
        let holder = Arc::clone(&clock);
        let outcome = thread::spawn(move || {
            let _guard = holder.lock_clock();
            panic!("holder panics while the clock is locked");
        })
        .join();
        assert!(outcome.is_err());
        assert!(clock.0.is_poisoned());

        clock.advance_seconds(5);
        assert_eq!(
            clock.utc(),
            DateTime::<Utc>::UNIX_EPOCH + TimeDelta::seconds(5)
        );
    }
}

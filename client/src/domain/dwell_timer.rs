//! Foreground dwell time for a detail view.
//!
//! The timer starts when a view appears, pauses while the app is in the
//! background and stops on dismissal or termination. Only foreground time
//! is counted.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;

/// Application lifecycle notifications relevant to dwell time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppLifecycle {
    /// The app is about to leave the foreground.
    WillResignActive,
    /// The app is returning to the foreground.
    WillEnterForeground,
    /// The process is about to exit.
    WillTerminate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Foreground { since: DateTime<Utc> },
    Background,
    Finished,
}

/// Accumulates foreground time across lifecycle transitions.
pub struct DwellTimer {
    clock: Arc<dyn Clock>,
    accumulated: TimeDelta,
    phase: Phase,
}

impl std::fmt::Debug for DwellTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DwellTimer")
            .field("accumulated", &self.accumulated)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl DwellTimer {
    /// Start timing now.
    pub fn start(clock: Arc<dyn Clock>) -> Self {
        let since = clock.utc();
        Self {
            clock,
            accumulated: TimeDelta::zero(),
            phase: Phase::Foreground { since },
        }
    }

    /// React to a lifecycle notification. Termination finishes the timer
    /// and returns the measured seconds.
    pub fn on_lifecycle(&mut self, event: AppLifecycle) -> Option<u64> {
        match (event, self.phase) {
            (AppLifecycle::WillResignActive, Phase::Foreground { since }) => {
                self.bank(since);
                self.phase = Phase::Background;
                None
            }
            (AppLifecycle::WillEnterForeground, Phase::Background) => {
                self.phase = Phase::Foreground {
                    since: self.clock.utc(),
                };
                None
            }
            (AppLifecycle::WillTerminate, _) => self.finish(),
            _ => None,
        }
    }

    /// Stop timing and return whole foreground seconds. Returns `None` when
    /// the timer already finished.
    pub fn finish(&mut self) -> Option<u64> {
        match self.phase {
            Phase::Finished => return None,
            Phase::Foreground { since } => self.bank(since),
            Phase::Background => {}
        }
        self.phase = Phase::Finished;
        Some(u64::try_from(self.accumulated.num_seconds()).unwrap_or(0))
    }

    /// Whether the app is currently counted as foreground.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Foreground { .. })
    }

    fn bank(&mut self, since: DateTime<Utc>) {
        let elapsed = self.clock.utc() - since;
        if elapsed > TimeDelta::zero() {
            self.accumulated += elapsed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MutableClock;
    use rstest::{fixture, rstest};

    #[fixture]
    fn clock() -> Arc<MutableClock> {
        Arc::new(MutableClock::at_epoch())
    }

    fn timer(clock: &Arc<MutableClock>) -> DwellTimer {
        DwellTimer::start(Arc::clone(clock) as Arc<dyn Clock>)
    }

    #[rstest]
    fn counts_uninterrupted_foreground_time(clock: Arc<MutableClock>) {
        let mut dwell = timer(&clock);
        clock.advance_seconds(12);
        assert_eq!(dwell.finish(), Some(12));
    }

    #[rstest]
    fn excludes_background_time(clock: Arc<MutableClock>) {
        let mut dwell = timer(&clock);
        clock.advance_seconds(10);
        assert_eq!(dwell.on_lifecycle(AppLifecycle::WillResignActive), None);
        clock.advance_seconds(300);
        dwell.on_lifecycle(AppLifecycle::WillEnterForeground);
        clock.advance_seconds(5);
        assert_eq!(dwell.finish(), Some(15));
    }

    #[rstest]
    fn terminate_while_backgrounded_ignores_time_away(clock: Arc<MutableClock>) {
        let mut dwell = timer(&clock);
        clock.advance_seconds(8);
        dwell.on_lifecycle(AppLifecycle::WillResignActive);
        clock.advance_seconds(60);
        assert_eq!(dwell.on_lifecycle(AppLifecycle::WillTerminate), Some(8));
    }

    #[rstest]
    fn terminate_in_foreground_includes_current_stretch(clock: Arc<MutableClock>) {
        let mut dwell = timer(&clock);
        clock.advance_seconds(4);
        assert_eq!(dwell.on_lifecycle(AppLifecycle::WillTerminate), Some(4));
    }

    #[rstest]
    fn finishes_once(clock: Arc<MutableClock>) {
        let mut dwell = timer(&clock);
        clock.advance_seconds(1);
        assert_eq!(dwell.finish(), Some(1));
        assert_eq!(dwell.finish(), None);
        assert_eq!(dwell.on_lifecycle(AppLifecycle::WillTerminate), None);
    }

    #[rstest]
    fn redundant_notifications_are_ignored(clock: Arc<MutableClock>) {
        let mut dwell = timer(&clock);
        dwell.on_lifecycle(AppLifecycle::WillEnterForeground);
        clock.advance_seconds(3);
        dwell.on_lifecycle(AppLifecycle::WillResignActive);
        dwell.on_lifecycle(AppLifecycle::WillResignActive);
        assert!(!dwell.is_running());
        clock.advance_seconds(3);
        assert_eq!(dwell.finish(), Some(3));
    }

    #[test]
    fn reads_the_clock_once_at_start_and_once_at_finish() {
        let mut readings = vec![
            DateTime::<Utc>::UNIX_EPOCH + TimeDelta::seconds(90),
            DateTime::<Utc>::UNIX_EPOCH,
        ];
        let mut clock = mockable::MockClock::new();
        clock
            .expect_utc()
            .times(2)
            .returning(move || readings.pop().unwrap_or_default());

        let mut dwell = DwellTimer::start(Arc::new(clock));
        assert_eq!(dwell.finish(), Some(90));
    }
}

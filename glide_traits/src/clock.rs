use std::thread;
use std::time::{Duration, Instant};

/// Monotonic time source used by the dispatch and pacing code.
///
/// Abstracting `now()`/`sleep()` keeps everything that measures or waits on
/// wall time testable with a simulated clock.
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, d: Duration);

    /// Milliseconds elapsed since `epoch`, saturating at 0 on underflow.
    fn ms_since(&self, epoch: Instant) -> u64 {
        self.now().saturating_duration_since(epoch).as_millis() as u64
    }
}

/// Real monotonic clock backed by `std::time::Instant`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicClock;

impl MonotonicClock {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }

    #[inline]
    fn sleep(&self, d: Duration) {
        if d.is_zero() {
            return;
        }
        thread::sleep(d);
    }
}

#[cfg(test)]
pub mod test_clock {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Deterministic clock that only moves when told to.
    ///
    /// `now()` is a fixed origin plus an offset; `sleep(d)` advances the
    /// offset instead of blocking.
    #[derive(Debug, Clone)]
    pub struct TestClock {
        origin: Instant,
        offset_nanos: Arc<AtomicU64>,
    }

    impl Default for TestClock {
        fn default() -> Self {
            Self::new()
        }
    }

    impl TestClock {
        pub fn new() -> Self {
            Self {
                origin: Instant::now(),
                offset_nanos: Arc::new(AtomicU64::new(0)),
            }
        }

        /// Move the clock forward by `d`.
        pub fn advance(&self, d: Duration) {
            self.offset_nanos
                .fetch_add(d.as_nanos() as u64, Ordering::SeqCst);
        }
    }

    impl Clock for TestClock {
        fn now(&self) -> Instant {
            self.origin + Duration::from_nanos(self.offset_nanos.load(Ordering::SeqCst))
        }

        fn sleep(&self, d: Duration) {
            self.advance(d);
        }
    }

    #[test]
    fn sleep_advances_without_blocking() {
        let clock = TestClock::new();
        let t0 = clock.now();
        clock.sleep(Duration::from_secs(3600));
        assert_eq!(clock.now().duration_since(t0), Duration::from_secs(3600));
    }

    #[test]
    fn ms_since_saturates() {
        let clock = TestClock::new();
        let future = clock.now() + Duration::from_millis(10);
        assert_eq!(clock.ms_since(future), 0);
        clock.advance(Duration::from_millis(25));
        assert_eq!(clock.ms_since(future), 15);
    }
}

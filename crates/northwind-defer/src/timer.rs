//! Timer sources for the artificial delay.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll, Waker};
use std::time::Duration;

/// A source of delay futures.
///
/// The deadline of the returned future is fixed when `sleep` is called,
/// not when the future is first polled.
pub trait Timer {
    /// Future completing once the delay has elapsed.
    type Sleep: Future<Output = ()>;

    /// Start a delay of `duration` measured from now.
    fn sleep(&self, duration: Duration) -> Self::Sleep;
}

impl<T: Timer + ?Sized> Timer for &T {
    type Sleep = T::Sleep;

    fn sleep(&self, duration: Duration) -> Self::Sleep {
        (**self).sleep(duration)
    }
}

/// Timer backed by the tokio time driver.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

#[cfg(not(target_arch = "wasm32"))]
impl Timer for TokioTimer {
    type Sleep = tokio::time::Sleep;

    fn sleep(&self, duration: Duration) -> Self::Sleep {
        tokio::time::sleep(duration)
    }
}

/// A monotonic clock that can schedule a wakeup.
///
/// Executors that only resume on registered events (the Spin executor
/// blocks on WASI pollables) need the sleep to hand its waker to the
/// clock; waking itself is not enough.
pub trait Clock: Clone {
    /// Current reading in nanoseconds.
    fn now(&self) -> u64;

    /// Arrange for `waker` to be woken once `now() >= deadline`.
    fn wake_at(&self, deadline: u64, waker: &Waker);
}

/// Timer over a [`Clock`] instead of a runtime timer driver.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeadlineTimer<C> {
    clock: C,
}

impl<C: Clock> DeadlineTimer<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }
}

impl<C: Clock> Timer for DeadlineTimer<C> {
    type Sleep = DeadlineSleep<C>;

    fn sleep(&self, duration: Duration) -> Self::Sleep {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        DeadlineSleep {
            deadline: self.clock.now().saturating_add(nanos),
            clock: self.clock.clone(),
        }
    }
}

/// Future returned by [`DeadlineTimer::sleep`].
#[derive(Debug)]
pub struct DeadlineSleep<C> {
    clock: C,
    deadline: u64,
}

impl<C> DeadlineSleep<C> {
    /// Clock reading at which this sleep completes.
    pub fn deadline(&self) -> u64 {
        self.deadline
    }
}

impl<C: Clock> Future for DeadlineSleep<C> {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.clock.now() >= self.deadline {
            return Poll::Ready(());
        }
        // Registered on every pending poll: the executor drops its
        // registrations each time it wakes.
        self.clock.wake_at(self.deadline, cx.waker());
        Poll::Pending
    }
}

/// The WASI monotonic clock, woken through the Spin executor.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct WasiClock;

#[cfg(target_arch = "wasm32")]
impl Clock for WasiClock {
    fn now(&self) -> u64 {
        wasi::clocks::monotonic_clock::now()
    }

    fn wake_at(&self, deadline: u64, waker: &Waker) {
        use spin_executor::bindings::wasi::io::poll::Pollable;

        let pollable = wasi::clocks::monotonic_clock::subscribe_instant(deadline);
        // Both bindings describe the same `wasi:io/poll` resource; ownership
        // of the handle moves to the executor's type.
        let pollable = unsafe { Pollable::from_handle(pollable.take_handle()) };
        spin_executor::push_waker(pollable, waker.clone());
    }
}

/// Timer for the Spin component.
#[cfg(target_arch = "wasm32")]
pub type SpinTimer = DeadlineTimer<WasiClock>;


#[cfg(test)]
mod tests {
    use super::manual::ManualClock;
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_deadline_sleep_registers_wakeup() {
        let clock = ManualClock::default();
        let timer = DeadlineTimer::new(clock.clone());
        clock.run(timer.sleep(ms(20)));
        assert_eq!(clock.elapsed(), ms(20));
    }

    #[test]
    fn test_deadline_fixed_at_creation() {
        let clock = ManualClock::default();
        let timer = DeadlineTimer::new(clock.clone());
        let sleep = timer.sleep(ms(50));
        assert_eq!(sleep.deadline(), 50_000_000);

        clock.advance(ms(30));
        clock.run(sleep);
        assert_eq!(clock.elapsed(), ms(50));
    }

    #[test]
    fn test_zero_deadline_is_immediate() {
        let clock = ManualClock::default();
        clock.run(DeadlineTimer::new(clock.clone()).sleep(Duration::ZERO));
        assert_eq!(clock.elapsed(), Duration::ZERO);
    }

    #[test]
    #[should_panic(expected = "without a registered wakeup")]
    fn test_self_waking_future_is_rejected() {
        struct SpinsOnWake;

        impl Future for SpinsOnWake {
            type Output = ();

            fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
                cx.waker().wake_by_ref();
                Poll::Pending
            }
        }

        ManualClock::default().run(SpinsOnWake);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_timer_anchored_at_call() {
        let start = tokio::time::Instant::now();
        let sleep = TokioTimer.sleep(ms(100));
        tokio::time::sleep(ms(60)).await;
        sleep.await;
        // Anchored at call: total wait is 100ms, not 160ms.
        let elapsed = start.elapsed();
        assert!(elapsed >= ms(100));
        assert!(elapsed < ms(150));
    }
}

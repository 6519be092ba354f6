//! Delayed-callback service.
//!
//! Timers do not own callbacks. The host advances time, gets back the handles that fired, and
//! dispatches each one to whoever armed it. On the server the same trait is backed by a
//! scheduled table.

use std::{collections::BTreeMap, time::Duration};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub u64);

pub trait TimerService {
    /// Starts a repeating timer.
    ///
    /// If `handle` refers to a timer that is still active, that timer is re-armed with
    /// `interval` and the same handle is returned. Otherwise a new handle is allocated.
    fn start_repeating(&mut self, handle: Option<TimerHandle>, interval: Duration)
    -> TimerHandle;

    /// Stops a timer. Stopping an inactive timer is a no-op.
    fn stop(&mut self, handle: TimerHandle);

    fn is_active(&self, handle: TimerHandle) -> bool;
}

#[derive(Clone, Copy, Debug)]
struct Repeating {
    interval: Duration,
    next_fire: Duration,
}

/// In-process timer manager driven by an explicit clock.
#[derive(Debug, Default)]
pub struct TimerManager {
    now: Duration,
    next_handle: u64,
    timers: BTreeMap<TimerHandle, Repeating>,
}

impl TimerManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn active_count(&self) -> usize {
        self.timers.len()
    }

    /// Advances the clock by `dt` and returns every firing in chronological order.
    ///
    /// A timer whose interval fits several times into `dt` appears several times. Handles
    /// stopped while the caller dispatches earlier entries are still listed, so callers must
    /// check [`TimerService::is_active`] before dispatching each one.
    pub fn advance(&mut self, dt: Duration) -> Vec<TimerHandle> {
        let end = self.now + dt;
        let mut fired: Vec<(Duration, TimerHandle)> = Vec::new();

        for (handle, timer) in self.timers.iter_mut() {
            if timer.interval.is_zero() {
                continue;
            }
            while timer.next_fire <= end {
                fired.push((timer.next_fire, *handle));
                timer.next_fire += timer.interval;
            }
        }

        self.now = end;
        fired.sort();
        fired.into_iter().map(|(_, handle)| handle).collect()
    }
}

impl TimerService for TimerManager {
    fn start_repeating(
        &mut self,
        handle: Option<TimerHandle>,
        interval: Duration,
    ) -> TimerHandle {
        let handle = match handle {
            Some(h) if self.timers.contains_key(&h) => h,
            _ => {
                let h = TimerHandle(self.next_handle);
                self.next_handle += 1;
                h
            }
        };

        self.timers.insert(
            handle,
            Repeating {
                interval,
                next_fire: self.now + interval,
            },
        );
        handle
    }

    fn stop(&mut self, handle: TimerHandle) {
        self.timers.remove(&handle);
    }

    fn is_active(&self, handle: TimerHandle) -> bool {
        self.timers.contains_key(&handle)
    }
}

//! Cancellable timers and trailing debounce.
//!
//! Timers live in named [`TimerSlot`]s. Scheduling into an occupied slot
//! supersedes the pending timer, which is exactly trailing-debounce
//! behaviour when the same slot is rescheduled on every input.
//!
//! [`TimerQueue`] is a virtual-time implementation of [`Scheduler`] used by
//! the native runtime and by tests; the browser runtime provides its own on
//! top of `setTimeout`.

use std::collections::HashMap;
use std::time::Duration;

/// Default quiet interval for the search box.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(200);

/// Default quiet interval for window resizes.
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(150);

/// Named timer slot. At most one timer is pending per slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerSlot {
    /// Search text settling
    Search,
    /// Viewport resize settling
    Resize,
    /// Delay between dataset arrival and revealing the table
    Reveal,
}

/// Handle to one scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken {
    /// Slot the timer occupies
    pub slot: TimerSlot,
    /// Monotonic sequence number; later tokens supersede earlier ones
    pub sequence: u64,
}

/// Something that can run a message after a delay.
pub trait Scheduler<M> {
    /// Schedule `message` after `delay`, superseding any timer in `slot`.
    fn schedule(&mut self, slot: TimerSlot, delay: Duration, message: M) -> TimerToken;

    /// Cancel the timer in `slot`, if any.
    fn cancel(&mut self, slot: TimerSlot);

    /// Cancel every pending timer.
    fn cancel_all(&mut self);
}

#[derive(Debug)]
struct Pending<M> {
    deadline: Duration,
    token: TimerToken,
    message: M,
}

/// Virtual-time timer queue.
///
/// Time only moves when [`TimerQueue::advance`] is called, which makes
/// debounce behaviour fully deterministic under test.
#[derive(Debug)]
pub struct TimerQueue<M> {
    now: Duration,
    sequence: u64,
    pending: HashMap<TimerSlot, Pending<M>>,
}

impl<M> Default for TimerQueue<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> TimerQueue<M> {
    /// Create an empty queue at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            sequence: 0,
            pending: HashMap::new(),
        }
    }

    /// Current virtual time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Whether a timer is pending in `slot`.
    #[must_use]
    pub fn is_pending(&self, slot: TimerSlot) -> bool {
        self.pending.contains_key(&slot)
    }

    /// Number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no timers are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.values().map(|p| p.deadline).min()
    }

    /// Advance virtual time by `by`, returning due messages in deadline order.
    pub fn advance(&mut self, by: Duration) -> Vec<M> {
        self.now = self.now.saturating_add(by);
        self.drain_due()
    }

    /// Advance to the next deadline (if any) and return what fires there.
    pub fn advance_to_next(&mut self) -> Vec<M> {
        match self.next_deadline() {
            Some(deadline) => {
                self.now = self.now.max(deadline);
                self.drain_due()
            }
            None => Vec::new(),
        }
    }

    fn drain_due(&mut self) -> Vec<M> {
        let now = self.now;
        let mut due: Vec<TimerSlot> = self
            .pending
            .iter()
            .filter(|(_, p)| p.deadline <= now)
            .map(|(slot, _)| *slot)
            .collect();
        due.sort_by_key(|slot| {
            let p = &self.pending[slot];
            (p.deadline, p.token.sequence)
        });

        let fired: Vec<M> = due
            .into_iter()
            .filter_map(|slot| self.pending.remove(&slot))
            .map(|p| p.message)
            .collect();
        if !fired.is_empty() {
            tracing::trace!(count = fired.len(), now_ms = now.as_millis() as u64, "timers fired");
        }
        fired
    }
}

impl<M> Scheduler<M> for TimerQueue<M> {
    fn schedule(&mut self, slot: TimerSlot, delay: Duration, message: M) -> TimerToken {
        self.sequence += 1;
        let token = TimerToken {
            slot,
            sequence: self.sequence,
        };
        let superseded = self
            .pending
            .insert(
                slot,
                Pending {
                    deadline: self.now.saturating_add(delay),
                    token,
                    message,
                },
            )
            .is_some();
        tracing::trace!(?slot, delay_ms = delay.as_millis() as u64, superseded, "timer scheduled");
        token
    }

    fn cancel(&mut self, slot: TimerSlot) {
        if self.pending.remove(&slot).is_some() {
            tracing::trace!(?slot, "timer cancelled");
        }
    }

    fn cancel_all(&mut self) {
        self.pending.clear();
    }
}

/// Trailing debounce over a value.
///
/// Every [`Debouncer::input`] bumps a generation number; only a settle
/// request carrying the latest generation publishes the raw value. A timer
/// that fires late, after newer input or after [`Debouncer::cancel`], is
/// therefore a no-op even if the scheduler failed to drop it.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    quiet: Duration,
    raw: T,
    settled: T,
    generation: u64,
    pending: bool,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    /// Create a debouncer whose raw and settled values start at `initial`.
    pub fn new(initial: T, quiet: Duration) -> Self {
        Self {
            quiet,
            raw: initial.clone(),
            settled: initial,
            generation: 0,
            pending: false,
        }
    }

    /// Quiet interval.
    pub const fn quiet(&self) -> Duration {
        self.quiet
    }

    /// Most recent raw input.
    pub const fn raw(&self) -> &T {
        &self.raw
    }

    /// Most recent settled value.
    pub const fn settled(&self) -> &T {
        &self.settled
    }

    /// Whether an input is waiting to settle.
    pub const fn is_pending(&self) -> bool {
        self.pending
    }

    /// Record raw input; returns the generation the caller's timer must carry.
    pub fn input(&mut self, value: T) -> u64 {
        self.raw = value;
        self.generation += 1;
        self.pending = true;
        self.generation
    }

    /// Settle `generation`. Returns `true` when the settled value changed.
    pub fn settle(&mut self, generation: u64) -> bool {
        if !self.pending || generation != self.generation {
            return false;
        }
        self.pending = false;
        if self.settled == self.raw {
            return false;
        }
        self.settled = self.raw.clone();
        true
    }

    /// Replace both values at once, dropping any pending input.
    pub fn reset(&mut self, value: T) {
        self.settled = value.clone();
        self.raw = value;
        self.cancel();
    }

    /// Drop any pending input without settling it.
    pub fn cancel(&mut self) {
        self.pending = false;
        self.generation += 1;
    }
}

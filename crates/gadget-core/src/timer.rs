//! Timer table for gadget views.
//!
//! Every view owns one [`TimerTable`]. Timers are identified by small integer
//! [`TimerToken`]s that increase monotonically, wrap at [`MAX_TIMER_TOKEN`],
//! and never collide with a token that is still in use.
//!
//! Three kinds of timers exist:
//!
//! - **Timeout**: fires once after a delay.
//! - **Interval**: fires repeatedly with a fixed period.
//! - **Animation**: interpolates an integer from a start value to an end value
//!   over a duration. Progress is computed from wall-clock time, not from the
//!   number of ticks, so the firing cadence adapts to how often the host
//!   manages to process timers. The callback only fires when the interpolated
//!   value actually changes.
//!
//! The table never calls anything itself. The owner repeatedly asks for the
//! next due timer with [`TimerTable::take_due`] and invokes the returned slot,
//! which keeps the table free of re-entrancy concerns: a slot may cancel any
//! timer, including its own, while it runs.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::time::{Duration, Instant};

use crate::error::{Result, TimerError};

/// The largest token value handed out before wrapping back to 1.
pub const MAX_TIMER_TOKEN: u32 = 0x7fff_ffff;

/// Re-registration period of animation timers.
pub const DEFAULT_ANIMATION_INTERVAL: Duration = Duration::from_millis(10);

/// Shortest accepted interval period.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Stale queue entries tolerated beyond twice the live timer count before
/// the queue is compacted.
const QUEUE_SLACK: usize = 64;

/// A unique identifier for a live timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u32);

impl TimerToken {
    /// Create a token from its raw value, e.g. one stored by a host.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw token value.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// The type of timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Fires once after the specified delay.
    Timeout,
    /// Fires repeatedly at the specified period.
    Interval,
    /// Interpolates an integer value over a duration.
    Animation,
}

/// A timer that came due, handed back to the owner for invocation.
#[derive(Debug, Clone)]
pub struct DueTimer<S> {
    /// The token of the timer.
    pub token: TimerToken,
    /// The kind of the timer.
    pub kind: TimerKind,
    /// The interpolated value for animations, `0` otherwise.
    pub value: i32,
    /// The owner's payload, typically a callback.
    pub slot: S,
}

#[derive(Debug)]
struct AnimationState {
    start_value: i32,
    end_value: i32,
    spread: i64,
    last_value: i32,
    duration: Duration,
    start_time: Instant,
}

/// Internal timer data.
#[derive(Debug)]
struct TimerData<S> {
    kind: TimerKind,
    slot: S,
    /// Period for intervals.
    interval: Duration,
    /// Sequence number of the queue entry that is currently valid.
    seq: u64,
    animation: Option<AnimationState>,
}

/// An entry in the timer queue (min-heap by fire time).
#[derive(Debug, Clone, Copy)]
struct TimerQueueEntry {
    token: TimerToken,
    fire_time: Instant,
    seq: u64,
}

impl PartialEq for TimerQueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.fire_time == other.fire_time && self.seq == other.seq
    }
}

impl Eq for TimerQueueEntry {}

impl PartialOrd for TimerQueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerQueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap; ties fire in registration order.
        other
            .fire_time
            .cmp(&self.fire_time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Token based timer scheduler.
///
/// `S` is the payload stored with each timer and cloned out when the timer
/// fires. Views store reference-counted callbacks here.
#[derive(Debug)]
pub struct TimerTable<S> {
    timers: HashMap<TimerToken, TimerData<S>>,
    queue: BinaryHeap<TimerQueueEntry>,
    next_token: u32,
    next_seq: u64,
    animation_interval: Duration,
}

impl<S> Default for TimerTable<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> TimerTable<S> {
    /// Create an empty table with the default animation interval.
    pub fn new() -> Self {
        Self::with_animation_interval(DEFAULT_ANIMATION_INTERVAL)
    }

    /// Create an empty table that re-registers animations at `interval`.
    pub fn with_animation_interval(interval: Duration) -> Self {
        Self {
            timers: HashMap::new(),
            queue: BinaryHeap::new(),
            next_token: 1,
            next_seq: 0,
            animation_interval: interval.max(MIN_INTERVAL),
        }
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register a one-shot timer firing `delay` after `now`.
    pub fn set_timeout(&mut self, delay: Duration, slot: S, now: Instant) -> Result<TimerToken> {
        self.register(TimerKind::Timeout, slot, delay, None, now + delay)
    }

    /// Register a repeating timer firing every `period`, first at `now + period`.
    ///
    /// Periods shorter than one millisecond are raised to one millisecond.
    pub fn set_interval(&mut self, period: Duration, slot: S, now: Instant) -> Result<TimerToken> {
        let period = period.max(MIN_INTERVAL);
        self.register(TimerKind::Interval, slot, period, None, now + period)
    }

    /// Register an animation interpolating from `start` to `end` over `duration`.
    pub fn begin_animation(
        &mut self,
        start: i32,
        end: i32,
        duration: Duration,
        slot: S,
        now: Instant,
    ) -> Result<TimerToken> {
        let animation = AnimationState {
            start_value: start,
            end_value: end,
            spread: i64::from(end) - i64::from(start),
            last_value: start,
            duration,
            start_time: now,
        };
        let interval = self.animation_interval;
        self.register(TimerKind::Animation, slot, interval, Some(animation), now + interval)
    }

    fn register(
        &mut self,
        kind: TimerKind,
        slot: S,
        interval: Duration,
        animation: Option<AnimationState>,
        fire_time: Instant,
    ) -> Result<TimerToken> {
        let token = self.allocate_token()?;
        let seq = self.bump_seq();
        self.timers.insert(
            token,
            TimerData {
                kind,
                slot,
                interval,
                seq,
                animation,
            },
        );
        self.queue.push(TimerQueueEntry {
            token,
            fire_time,
            seq,
        });
        tracing::trace!(target: "gadget_core::timer", token = token.get(), ?kind, "timer registered");
        Ok(token)
    }

    fn allocate_token(&mut self) -> Result<TimerToken> {
        if self.timers.len() >= MAX_TIMER_TOKEN as usize {
            return Err(TimerError::TokensExhausted.into());
        }
        loop {
            let candidate = TimerToken(self.next_token);
            self.next_token = if self.next_token >= MAX_TIMER_TOKEN {
                1
            } else {
                self.next_token + 1
            };
            if !self.timers.contains_key(&candidate) {
                return Ok(candidate);
            }
        }
    }

    fn bump_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    // =========================================================================
    // Cancellation and queries
    // =========================================================================

    /// Cancel a timer of any kind.
    ///
    /// Cancelling an unknown or already finished token is a no-op and
    /// returns `false`.
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        if self.timers.remove(&token).is_some() {
            tracing::trace!(target: "gadget_core::timer", token = token.get(), "timer cancelled");
            self.compact_queue();
            true
        } else {
            tracing::trace!(target: "gadget_core::timer", token = token.get(), "cancel of unknown timer ignored");
            false
        }
    }

    /// Cancel a timer, reporting unknown tokens as an error.
    pub fn try_cancel(&mut self, token: TimerToken) -> Result<()> {
        if self.cancel(token) {
            Ok(())
        } else {
            Err(TimerError::UnknownToken(token).into())
        }
    }

    /// Check if a token names a live timer.
    pub fn is_active(&self, token: TimerToken) -> bool {
        self.timers.contains_key(&token)
    }

    /// Get the kind of a live timer.
    pub fn kind(&self, token: TimerToken) -> Option<TimerKind> {
        self.timers.get(&token).map(|t| t.kind)
    }

    /// Number of live timers.
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// Whether no timer is live.
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Remove every timer.
    pub fn clear(&mut self) {
        self.timers.clear();
        self.queue.clear();
    }

    /// The earliest instant at which a live timer is scheduled.
    pub fn next_deadline(&mut self) -> Option<Instant> {
        self.discard_stale_front();
        self.queue.peek().map(|entry| entry.fire_time)
    }

    /// Duration from `now` until the next timer is due, if any.
    pub fn time_until_next(&mut self, now: Instant) -> Option<Duration> {
        self.next_deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Number of entries in the fire queue, stale ones included.
    pub fn queued_entries(&self) -> usize {
        self.queue.len()
    }

    /// Drop queue entries of cancelled timers once they outnumber the live
    /// ones.
    fn compact_queue(&mut self) {
        if self.queue.len() <= 2 * self.timers.len() + QUEUE_SLACK {
            return;
        }
        let timers = &self.timers;
        self.queue
            .retain(|entry| timers.get(&entry.token).is_some_and(|t| t.seq == entry.seq));
        tracing::trace!(target: "gadget_core::timer", remaining = self.queue.len(), "timer queue compacted");
    }

    fn discard_stale_front(&mut self) {
        while let Some(entry) = self.queue.peek() {
            let live = self
                .timers
                .get(&entry.token)
                .is_some_and(|t| t.seq == entry.seq);
            if live {
                break;
            }
            self.queue.pop();
        }
    }
}

impl<S: Clone> TimerTable<S> {
    /// Take the next timer that is due at `now`.
    ///
    /// Timeouts are removed before they are returned. Intervals are
    /// rescheduled one period after `now`. Animations are rescheduled one
    /// animation interval after `now` until their progress reaches 1.0, and
    /// are only returned when the interpolated value changed.
    ///
    /// Call repeatedly until `None` to drain everything that is due.
    #[tracing::instrument(skip(self), target = "gadget_core::timer", level = "trace")]
    pub fn take_due(&mut self, now: Instant) -> Option<DueTimer<S>> {
        loop {
            let entry = *self.queue.peek()?;
            if entry.fire_time > now {
                return None;
            }
            self.queue.pop();

            let Some(timer) = self.timers.get_mut(&entry.token) else {
                continue;
            };
            if timer.seq != entry.seq {
                continue;
            }

            let token = entry.token;
            match timer.kind {
                TimerKind::Timeout => {
                    let timer = self.timers.remove(&token)?;
                    tracing::trace!(target: "gadget_core::timer", token = token.get(), "timeout fired");
                    return Some(DueTimer {
                        token,
                        kind: TimerKind::Timeout,
                        value: 0,
                        slot: timer.slot,
                    });
                }
                TimerKind::Interval => {
                    let fire_time = now + timer.interval;
                    let slot = timer.slot.clone();
                    let seq = self.reschedule(token, fire_time);
                    if let Some(timer) = self.timers.get_mut(&token) {
                        timer.seq = seq;
                    }
                    tracing::trace!(target: "gadget_core::timer", token = token.get(), "interval fired");
                    return Some(DueTimer {
                        token,
                        kind: TimerKind::Interval,
                        value: 0,
                        slot,
                    });
                }
                TimerKind::Animation => {
                    let Some(anim) = timer.animation.as_mut() else {
                        self.timers.remove(&token);
                        continue;
                    };
                    let progress = animation_progress(anim, now);
                    let value = animation_value(anim, progress);
                    let changed = value != anim.last_value;
                    anim.last_value = value;

                    let slot = timer.slot.clone();
                    if progress >= 1.0 {
                        self.timers.remove(&token);
                        tracing::trace!(target: "gadget_core::timer", token = token.get(), value, "animation finished");
                    } else {
                        let fire_time = now + self.animation_interval;
                        let seq = self.reschedule(token, fire_time);
                        if let Some(timer) = self.timers.get_mut(&token) {
                            timer.seq = seq;
                        }
                    }

                    if changed {
                        return Some(DueTimer {
                            token,
                            kind: TimerKind::Animation,
                            value,
                            slot,
                        });
                    }
                }
            }
        }
    }

    fn reschedule(&mut self, token: TimerToken, fire_time: Instant) -> u64 {
        let seq = self.bump_seq();
        self.queue.push(TimerQueueEntry {
            token,
            fire_time,
            seq,
        });
        seq
    }
}

/// Interpolated value at `progress`; exactly the end value once complete.
fn animation_value(anim: &AnimationState, progress: f64) -> i32 {
    if progress >= 1.0 {
        return anim.end_value;
    }
    let offset = (anim.spread as f64 * progress).round() as i64;
    i32::try_from(i64::from(anim.start_value) + offset).unwrap_or(anim.end_value)
}

fn animation_progress(anim: &AnimationState, now: Instant) -> f64 {
    if anim.duration.is_zero() {
        return 1.0;
    }
    let elapsed = now.saturating_duration_since(anim.start_time);
    (elapsed.as_secs_f64() / anim.duration.as_secs_f64()).min(1.0)
}

static_assertions::assert_impl_all!(TimerToken: Send, Sync, Copy);

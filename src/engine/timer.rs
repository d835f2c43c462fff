/*
Cooperative Timer Queue
=======================

Playback is driven by one-shot timeouts and repeating intervals on a single
thread, with no threads and no sleeping inside the library. The host owns the clock
and pushes it forward; the queue only answers "what is due next?".

  host loop                       TimerQueue
  ─────────                       ──────────
  run_until(now + dt)   ───────→  pop_due(until) ─→ (id, event) or None
      dispatch(event)               │
      (may arm/cancel timers)       └─ interval? re-arm at due + period
  advance_to(until)     ───────→  clock = until

Timers are popped one at a time, so a handler that cancels another timer due
at the same instant prevents it from firing. Ties fire in the order they were
armed; a re-armed interval counts as newly armed.

Handles are plain ids. Cancelling an id that already fired, was already
cancelled, or was never armed is a no-op.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Smallest interval period; keeps a zero-length interval from spinning.
pub const MIN_INTERVAL_MS: f64 = 1e-3;

#[derive(Debug, Clone)]
struct Timer<E> {
    id: TimerId,
    due_ms: f64,
    period_ms: Option<f64>,
    /// Arming order, for tie-breaking
    seq: u64,
    event: E,
}

#[derive(Debug, Clone)]
pub struct TimerQueue<E> {
    now_ms: f64,
    next_id: u64,
    next_seq: u64,
    timers: Vec<Timer<E>>,
}

impl<E: Copy> TimerQueue<E> {
    pub fn new() -> Self {
        Self {
            now_ms: 0.0,
            next_id: 0,
            next_seq: 0,
            timers: Vec::with_capacity(8),
        }
    }

    /// Current clock in milliseconds
    pub fn now(&self) -> f64 {
        self.now_ms
    }

    /// Number of armed timers
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn is_armed(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    /// Fire `event` once, `delay_ms` from now (negative delays fire immediately).
    pub fn set_timeout(&mut self, delay_ms: f64, event: E) -> TimerId {
        self.arm(delay_ms.max(0.0), None, event)
    }

    /// Fire `event` every `period_ms`, first time one period from now.
    pub fn set_interval(&mut self, period_ms: f64, event: E) -> TimerId {
        let period = period_ms.max(MIN_INTERVAL_MS);
        self.arm(period, Some(period), event)
    }

    fn arm(&mut self, delay_ms: f64, period_ms: Option<f64>, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let seq = self.bump_seq();
        self.timers.push(Timer {
            id,
            due_ms: self.now_ms + delay_ms,
            period_ms,
            seq,
            event,
        });
        id
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Disarm a timer. Returns whether anything was actually armed.
    pub fn cancel(&mut self, id: Option<TimerId>) -> bool {
        let Some(id) = id else {
            return false;
        };
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    /// Disarm and clear the caller's handle in one step.
    pub fn cancel_handle(&mut self, handle: &mut Option<TimerId>) -> bool {
        self.cancel(handle.take())
    }

    /// Pop the earliest timer due at or before `until_ms`, moving the clock
    /// to its due time. Intervals are re-armed before being returned.
    pub fn pop_due(&mut self, until_ms: f64) -> Option<(TimerId, E)> {
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= until_ms)
            .min_by(|(_, a), (_, b)| {
                a.due_ms
                    .total_cmp(&b.due_ms)
                    .then_with(|| a.seq.cmp(&b.seq))
            })
            .map(|(i, _)| i)?;

        let due = self.timers[idx].due_ms;
        if due > self.now_ms {
            self.now_ms = due;
        }

        let id = self.timers[idx].id;
        let event = self.timers[idx].event;
        match self.timers[idx].period_ms {
            Some(period) => {
                let seq = self.bump_seq();
                let timer = &mut self.timers[idx];
                timer.due_ms += period;
                timer.seq = seq;
            }
            None => {
                self.timers.swap_remove(idx);
            }
        }

        Some((id, event))
    }

    /// Move the clock forward without firing anything. Never moves backwards.
    pub fn advance_to(&mut self, until_ms: f64) {
        if until_ms > self.now_ms {
            self.now_ms = until_ms;
        }
    }

    /// Due time of the next armed timer, if any.
    pub fn next_due(&self) -> Option<f64> {
        self.timers
            .iter()
            .map(|t| t.due_ms)
            .min_by(|a, b| a.total_cmp(b))
    }
}

impl<E: Copy> Default for TimerQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Ev {
        A,
        B,
        C,
    }

    fn drain(q: &mut TimerQueue<Ev>, until: f64) -> Vec<(f64, Ev)> {
        let mut fired = Vec::new();
        while let Some((_, ev)) = q.pop_due(until) {
            fired.push((q.now(), ev));
        }
        q.advance_to(until);
        fired
    }

    #[test]
    fn timeout_fires_once_at_due_time() {
        let mut q = TimerQueue::new();
        q.set_timeout(10.0, Ev::A);

        assert!(drain(&mut q, 9.9).is_empty());
        assert_eq!(drain(&mut q, 10.0), vec![(10.0, Ev::A)]);
        assert!(drain(&mut q, 100.0).is_empty());
        assert!(q.is_empty());
    }

    #[test]
    fn interval_repeats_until_cancelled() {
        let mut q = TimerQueue::new();
        let id = q.set_interval(5.0, Ev::B);

        let fired = drain(&mut q, 16.0);
        assert_eq!(fired, vec![(5.0, Ev::B), (10.0, Ev::B), (15.0, Ev::B)]);

        assert!(q.cancel(Some(id)));
        assert!(drain(&mut q, 50.0).is_empty());
    }

    #[test]
    fn ties_fire_in_arming_order() {
        let mut q = TimerQueue::new();
        q.set_timeout(3.0, Ev::C);
        q.set_timeout(3.0, Ev::A);
        q.set_timeout(1.0, Ev::B);

        let order: Vec<Ev> = drain(&mut q, 3.0).into_iter().map(|(_, e)| e).collect();
        assert_eq!(order, vec![Ev::B, Ev::C, Ev::A]);
    }

    #[test]
    fn cancelling_stale_handles_is_a_noop() {
        let mut q = TimerQueue::new();
        let id = q.set_timeout(1.0, Ev::A);
        drain(&mut q, 2.0);

        assert!(!q.cancel(Some(id)));
        assert!(!q.cancel(Some(id)));
        assert!(!q.cancel(None));

        let mut handle = None;
        assert!(!q.cancel_handle(&mut handle));
    }

    #[test]
    fn handler_can_cancel_a_timer_due_at_the_same_instant() {
        let mut q = TimerQueue::new();
        q.set_timeout(5.0, Ev::A);
        let victim = q.set_timeout(5.0, Ev::B);

        let (_, first) = q.pop_due(5.0).unwrap();
        assert_eq!(first, Ev::A);
        q.cancel(Some(victim));
        assert!(q.pop_due(5.0).is_none());
    }

    #[test]
    fn zero_period_interval_is_clamped() {
        let mut q = TimerQueue::new();
        q.set_interval(0.0, Ev::A);
        let fired = drain(&mut q, 0.0105);
        assert_eq!(fired.len(), 10);
    }

    #[test]
    fn clock_never_runs_backwards() {
        let mut q: TimerQueue<Ev> = TimerQueue::new();
        q.advance_to(10.0);
        q.advance_to(5.0);
        assert_eq!(q.now(), 10.0);

        q.set_timeout(-3.0, Ev::A);
        assert_eq!(q.next_due(), Some(10.0));
    }
}

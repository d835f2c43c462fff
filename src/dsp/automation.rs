/*
Parameter Automation
====================

An `AudioParam` is a value that changes over (audio-clock) time according to
a small list of scheduled events. Two kinds of event exist:

  SetValue(v, t)     jump to v at time t
  LinearRamp(v, t)   arrive at v at time t, moving in a straight line from
                     the previous event's value and time

    value
      v1 ┤         ●━━━━━━━━━━●
         │        ╱            ╲
         │       ╱              ╲
      0  ┤━━━━━━●                ●━━━━
         └──────┬───┬──────────┬──┬──→ time
               t0  t1         t2 t3
          Set(0,t0) Ramp(v1,t1) Set(v1,t2) Ramp(0,t3)

`value_at(t)` finds the last event at or before t. If the event after it is a
ramp, the value is interpolated toward that ramp's target; otherwise the
last event's value holds.

`cancel_scheduled_values(t)` drops every event at or after t. A ramp that was
in flight at t is removed with it, so the value snaps back to the preceding
event. Callers that want to continue smoothly read `value_at(t)` first and
re-anchor with `set_value_at_time`.

Events in the past are folded away by `prune` so the list stays tiny no
matter how long playback runs.
*/

#[derive(Debug, Clone, Copy, PartialEq)]
enum EventKind {
    SetValue,
    LinearRamp,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct AutomationEvent {
    time: f64,
    value: f32,
    kind: EventKind,
}

#[derive(Debug, Clone)]
pub struct AudioParam {
    /// Value before the first event
    intrinsic: f32,
    /// Sorted by time; equal times keep insertion order
    events: Vec<AutomationEvent>,
}

impl AudioParam {
    pub fn new(value: f32) -> Self {
        Self {
            intrinsic: value,
            events: Vec::with_capacity(8),
        }
    }

    pub fn set_value_at_time(&mut self, value: f32, time: f64) {
        self.insert(AutomationEvent {
            time,
            value,
            kind: EventKind::SetValue,
        });
    }

    pub fn linear_ramp_to_value_at_time(&mut self, value: f32, time: f64) {
        self.insert(AutomationEvent {
            time,
            value,
            kind: EventKind::LinearRamp,
        });
    }

    pub fn cancel_scheduled_values(&mut self, time: f64) {
        self.events.retain(|e| e.time < time);
    }

    fn insert(&mut self, event: AutomationEvent) {
        let idx = self.events.partition_point(|e| e.time <= event.time);
        self.events.insert(idx, event);
    }

    /// Computed value at `time`.
    pub fn value_at(&self, time: f64) -> f32 {
        let next_idx = self.events.partition_point(|e| e.time <= time);

        let (prev_time, prev_value) = match next_idx.checked_sub(1) {
            Some(i) => (self.events[i].time, self.events[i].value),
            None => (f64::NEG_INFINITY, self.intrinsic),
        };

        match self.events.get(next_idx) {
            Some(next) if next.kind == EventKind::LinearRamp => {
                if !prev_time.is_finite() || next.time <= prev_time {
                    // ramp with no anchor: hold the intrinsic value until it lands
                    return prev_value;
                }
                let progress = ((time - prev_time) / (next.time - prev_time)) as f32;
                prev_value + (next.value - prev_value) * progress
            }
            _ => prev_value,
        }
    }

    /// Drop events that can no longer influence `value_at(t)` for t >= `now`.
    pub fn prune(&mut self, now: f64) {
        let passed = self.events.partition_point(|e| e.time <= now);
        if passed > 1 {
            // keep the most recent past event as the anchor for any ramp
            let anchor = passed - 1;
            self.intrinsic = self.events[anchor - 1].value;
            self.events.drain(..anchor);
        }
    }

    /// Number of events still scheduled (past anchor included).
    pub fn scheduled_len(&self) -> usize {
        self.events.len()
    }
}

impl Default for AudioParam {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn holds_intrinsic_value_without_events() {
        let param = AudioParam::new(0.25);
        assert!(close(param.value_at(0.0), 0.25));
        assert!(close(param.value_at(100.0), 0.25));
    }

    #[test]
    fn linear_ramp_interpolates_from_previous_event() {
        let mut param = AudioParam::new(0.0);
        param.set_value_at_time(0.0, 1.0);
        param.linear_ramp_to_value_at_time(0.8, 2.0);

        assert!(close(param.value_at(0.5), 0.0));
        assert!(close(param.value_at(1.0), 0.0));
        assert!(close(param.value_at(1.5), 0.4));
        assert!(close(param.value_at(2.0), 0.8));
        assert!(close(param.value_at(3.0), 0.8));
    }

    #[test]
    fn cancel_removes_future_ramp() {
        let mut param = AudioParam::new(0.0);
        param.set_value_at_time(0.0, 0.0);
        param.linear_ramp_to_value_at_time(1.0, 1.0);

        let halfway = param.value_at(0.5);
        param.cancel_scheduled_values(0.5);
        param.set_value_at_time(halfway, 0.5);
        param.linear_ramp_to_value_at_time(0.0, 1.5);

        assert!(close(param.value_at(0.5), 0.5));
        assert!(close(param.value_at(1.0), 0.25));
        assert!(close(param.value_at(2.0), 0.0));
    }

    #[test]
    fn later_set_wins_at_same_time() {
        let mut param = AudioParam::new(0.0);
        param.set_value_at_time(0.3, 1.0);
        param.set_value_at_time(0.7, 1.0);
        assert!(close(param.value_at(1.0), 0.7));
    }

    #[test]
    fn prune_keeps_values_stable() {
        let mut param = AudioParam::new(0.0);
        param.set_value_at_time(0.0, 0.0);
        param.linear_ramp_to_value_at_time(1.0, 1.0);
        param.set_value_at_time(1.0, 2.0);
        param.linear_ramp_to_value_at_time(0.0, 3.0);

        let before: Vec<f32> = [2.0, 2.5, 3.0, 4.0].iter().map(|&t| param.value_at(t)).collect();
        param.prune(2.2);
        let after: Vec<f32> = [2.0, 2.5, 3.0, 4.0].iter().map(|&t| param.value_at(t)).collect();

        assert_eq!(param.scheduled_len(), 2);
        for (b, a) in before.iter().zip(after.iter()) {
            assert!(close(*a, *b), "{b} != {a}");
        }
    }
}

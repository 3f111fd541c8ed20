/*
Parameter Automation
====================

A timeline of scheduled changes for one scalar parameter, evaluated against
the render clock. This is the scheduling model host audio graphs expose for
gains, frequencies and delay times, and the envelope generator is built on
it.

Vocabulary
----------

  event           A scheduled change with a time in seconds on the render
                  clock. Events are kept sorted by time; events with equal
                  times keep insertion order.

  set value       Jump to a value at a time and hold it.

  linear ramp     Ramp linearly from the previous event's time and value,
                  reaching `value` exactly at the event time.

  set target      Starting at the event time, approach `target`
                  exponentially:
                      v(t) = target + (v0 - target) * e^(-(t - t0) / τ)
                  τ is the time constant. After 1τ the value has covered
                  63% of the distance; after 7τ it is within 0.1%.

  value curve     Linear interpolation through a fixed list of values
                  spread evenly over a duration. Holds the last value
                  afterwards.

  cancel          Drop every event scheduled at or after a time.


Evaluation
----------

`value_at(t)` walks the events in order, carrying the value reached at the
end of each one, until it finds the segment containing `t`:

    value
      1 ┤      ╱╲
        │     ╱  ╲___________ set target (sustain)
        │    ╱ linear ramp
      0 ┼───●───────────────────→ time
           set value

All scheduling allocates, so it belongs on the control thread. Evaluation
does not.
*/

#[derive(Debug, Clone, PartialEq)]
enum Event {
    SetValue {
        time: f64,
        value: f32,
    },
    LinearRamp {
        time: f64,
        value: f32,
    },
    SetTarget {
        time: f64,
        target: f32,
        time_constant: f64,
    },
    Curve {
        time: f64,
        duration: f64,
        values: Box<[f32]>,
    },
}

impl Event {
    fn time(&self) -> f64 {
        match *self {
            Event::SetValue { time, .. }
            | Event::LinearRamp { time, .. }
            | Event::SetTarget { time, .. }
            | Event::Curve { time, .. } => time,
        }
    }
}

/// How the value evolves after the last event that has already started.
#[derive(Debug, Clone, Copy)]
enum Segment {
    Hold,
    Target { target: f32, time_constant: f64 },
}

impl Segment {
    fn eval(self, value: f32, start: f64, time: f64) -> f32 {
        match self {
            Segment::Hold => value,
            Segment::Target {
                target,
                time_constant,
            } => {
                if time_constant <= 0.0 {
                    return target;
                }
                let decay = (-(time - start) / time_constant).exp() as f32;
                target + (value - target) * decay
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParamTimeline {
    default: f32,
    events: Vec<Event>,
}

impl ParamTimeline {
    pub fn new(value: f32) -> Self {
        Self {
            default: value,
            events: Vec::new(),
        }
    }

    /// Set the value immediately and drop the whole schedule.
    pub fn set_value(&mut self, value: f32) {
        self.events.clear();
        self.default = value;
    }

    pub fn set_value_at_time(&mut self, value: f32, time: f64) {
        self.insert(Event::SetValue { time, value });
    }

    pub fn linear_ramp_to_value_at_time(&mut self, value: f32, end_time: f64) {
        self.insert(Event::LinearRamp {
            time: end_time,
            value,
        });
    }

    pub fn set_target_at_time(&mut self, target: f32, start_time: f64, time_constant: f64) {
        self.insert(Event::SetTarget {
            time: start_time,
            target,
            time_constant: time_constant.max(0.0),
        });
    }

    pub fn set_value_curve_at_time(&mut self, values: &[f32], start_time: f64, duration: f64) {
        if values.is_empty() {
            return;
        }

        self.insert(Event::Curve {
            time: start_time,
            duration: duration.max(0.0),
            values: values.into(),
        });
    }

    /// Drop every event scheduled at or after `time`.
    pub fn cancel_scheduled_values(&mut self, time: f64) {
        self.events.retain(|event| event.time() < time);
    }

    /// Number of events still on the timeline.
    pub fn scheduled(&self) -> usize {
        self.events.len()
    }

    pub fn value_at(&self, time: f64) -> f32 {
        let mut value = self.default;
        let mut start = 0.0f64;
        let mut segment = Segment::Hold;

        for event in &self.events {
            match *event {
                Event::SetValue {
                    time: at,
                    value: next,
                } => {
                    if time < at {
                        return segment.eval(value, start, time);
                    }
                    value = next;
                    start = at;
                    segment = Segment::Hold;
                }
                Event::LinearRamp {
                    time: end,
                    value: next,
                } => {
                    // The ramp begins where the previous event left off
                    let from = segment.eval(value, start, start);
                    if time < end {
                        let span = end - start;
                        if span <= 0.0 {
                            return next;
                        }
                        let progress = ((time - start) / span).clamp(0.0, 1.0) as f32;
                        return from + (next - from) * progress;
                    }
                    value = next;
                    start = end;
                    segment = Segment::Hold;
                }
                Event::SetTarget {
                    time: at,
                    target,
                    time_constant,
                } => {
                    if time < at {
                        return segment.eval(value, start, time);
                    }
                    value = segment.eval(value, start, at);
                    start = at;
                    segment = Segment::Target {
                        target,
                        time_constant,
                    };
                }
                Event::Curve {
                    time: at,
                    duration,
                    ref values,
                } => {
                    if time < at {
                        return segment.eval(value, start, time);
                    }
                    let last = values[values.len() - 1];
                    if time < at + duration && values.len() > 1 {
                        let position =
                            ((time - at) / duration) as f32 * (values.len() - 1) as f32;
                        let index = position.floor() as usize;
                        let frac = position - index as f32;
                        let a = values[index];
                        let b = values[(index + 1).min(values.len() - 1)];
                        return a + (b - a) * frac;
                    }
                    value = last;
                    start = at + duration;
                    segment = Segment::Hold;
                }
            }
        }

        segment.eval(value, start, time)
    }

    fn insert(&mut self, event: Event) {
        let at = event.time();
        let index = self.events.partition_point(|existing| existing.time() <= at);
        self.events.insert(index, event);
    }
}

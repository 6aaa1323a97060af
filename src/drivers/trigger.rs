use log::debug;
use crate::drivers::SampleBatch;
/// Allowed trigger lengths in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerWindowRange {
    pub min: f64,
    pub max: f64,
}
/// Trigger parameters and arming state.
///
/// A trigger fires on a rising crossing of `level` and captures `length_ms`
/// of current from the crossing on. Single-shot arming disarms after one
/// capture; continuous arming keeps firing until stopped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerSettings {
    /// Microamperes.
    pub level: f64,
    pub length_ms: f64,
    pub window_range: TriggerWindowRange,
    pub single_waiting: bool,
    pub running: bool,
}
impl Default for TriggerSettings {
    fn default() -> Self {
        Self {
            level: 1_000.0,
            length_ms: 10.0,
            window_range: TriggerWindowRange {
                min: 1.0,
                max: 100.0,
            },
            single_waiting: false,
            running: false,
        }
    }
}
impl TriggerSettings {
    #[must_use]
    pub fn with_level(self, level: f64) -> Self {
        Self { level, ..self }
    }
    /// Length clamped into the window range.
    #[must_use]
    pub fn with_length(self, length_ms: f64) -> Self {
        let length_ms = length_ms.clamp(self.window_range.min, self.window_range.max);
        Self { length_ms, ..self }
    }
    #[must_use]
    pub fn with_window_range(self, min: f64, max: f64) -> Self {
        let (min, max) = if max < min { (max, min) } else { (min, max) };
        Self {
            window_range: TriggerWindowRange { min, max },
            ..self
        }
        .with_length(self.length_ms)
    }
    #[must_use]
    pub fn arm_single(self) -> Self {
        Self {
            single_waiting: true,
            running: false,
            ..self
        }
    }
    #[must_use]
    pub fn clear_single(self) -> Self {
        Self {
            single_waiting: false,
            ..self
        }
    }
    #[must_use]
    pub fn start_continuous(self) -> Self {
        Self {
            single_waiting: false,
            running: true,
            ..self
        }
    }
    #[must_use]
    pub fn stop(self) -> Self {
        Self {
            single_waiting: false,
            running: false,
            ..self
        }
    }
    pub fn is_armed(&self) -> bool {
        self.single_waiting || self.running
    }
}
/// Time span of one completed trigger capture, in microseconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Capture {
    pub begin: f64,
    pub end: f64,
}
#[derive(Clone, Copy, Debug, PartialEq)]
enum Phase {
    Waiting { previous: Option<f32> },
    Recording { begin: f64, end: f64 },
}
/// Watches incoming batches for trigger crossings.
pub struct TriggerCapture {
    phase: Phase,
}
impl Default for TriggerCapture {
    fn default() -> Self {
        Self::new()
    }
}
impl TriggerCapture {
    pub fn new() -> Self {
        Self {
            phase: Phase::Waiting { previous: None },
        }
    }
    pub fn is_recording(&self) -> bool {
        matches!(self.phase, Phase::Recording { .. })
    }
    /// Scans one batch and returns the captures it completed. A single-shot
    /// trigger is disarmed in `settings` once its capture completes.
    pub fn feed(&mut self, settings: &mut TriggerSettings, batch: &SampleBatch) -> Vec<Capture> {
        let mut captures = Vec::new();
        if !settings.is_armed() {
            self.phase = Phase::Waiting { previous: None };
            return captures;
        }
        let interval = 1e6 / batch.samples_per_second;
        let level = settings.level;
        for (i, &value) in batch.values.iter().enumerate() {
            let timestamp = batch.first_timestamp + i as f64 * interval;
            match self.phase {
                Phase::Waiting { previous } => {
                    if value.is_nan() {
                        self.phase = Phase::Waiting { previous: None };
                        continue;
                    }
                    let rising = previous.is_some_and(|p| f64::from(p) < level)
                        && f64::from(value) >= level;
                    self.phase = if rising {
                        debug!("trigger at {timestamp} us, level {level} uA");
                        Phase::Recording {
                            begin: timestamp,
                            end: timestamp + settings.length_ms * 1e3,
                        }
                    } else {
                        Phase::Waiting {
                            previous: Some(value),
                        }
                    };
                }
                Phase::Recording { begin, end } => {
                    if timestamp < end {
                        continue;
                    }
                    captures.push(Capture { begin, end });
                    self.phase = Phase::Waiting {
                        previous: (!value.is_nan()).then_some(value),
                    };
                    if settings.single_waiting {
                        *settings = settings.clear_single();
                        self.phase = Phase::Waiting { previous: None };
                        break;
                    }
                }
            }
        }
        captures
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    /// 1 kS/s, so each sample is one millisecond apart.
    fn batch(first_timestamp: f64, values: Vec<f32>) -> SampleBatch {
        SampleBatch {
            first_timestamp,
            samples_per_second: 1_000.0,
            values,
            bits: None,
        }
    }
    fn pulses(count: usize) -> Vec<f32> {
        (0..count)
            .map(|i| if i % 20 < 5 { 5_000.0 } else { 10.0 })
            .collect()
    }
    #[test]
    fn sets_level_length_and_window_range() {
        let settings = TriggerSettings::default().with_level(5.0);
        assert_eq!(settings.level, 5.0);
        let settings = settings.with_length(37.85);
        assert_eq!(settings.length_ms, 37.85);
        let settings = settings.with_window_range(5.0, 50.0);
        assert_eq!(settings.window_range, TriggerWindowRange { min: 5.0, max: 50.0 });
        assert_eq!(settings.with_length(80.0).length_ms, 50.0);
        assert_eq!(settings.with_window_range(40.0, 20.0).length_ms, 37.85);
        assert_eq!(settings.with_window_range(1.0, 10.0).length_ms, 10.0);
    }
    #[test]
    fn single_arming_starts_waiting_and_clears() {
        let waiting = TriggerSettings::default().start_continuous().arm_single();
        assert!(waiting.single_waiting);
        assert!(!waiting.running);
        let cleared = waiting.clear_single();
        assert!(!cleared.single_waiting);
        assert!(!cleared.is_armed());
    }
    #[test]
    fn disarmed_trigger_ignores_crossings() {
        let mut settings = TriggerSettings::default();
        let mut capture = TriggerCapture::new();
        assert!(capture.feed(&mut settings, &batch(0.0, pulses(100))).is_empty());
        assert!(!capture.is_recording());
    }
    #[test]
    fn single_shot_captures_once_and_disarms() {
        let mut settings = TriggerSettings::default().with_length(3.0).arm_single();
        let mut capture = TriggerCapture::new();
        // first rising edge is at sample 20
        let captures = capture.feed(&mut settings, &batch(0.0, pulses(100)));
        assert_eq!(captures, vec![Capture { begin: 20_000.0, end: 23_000.0 }]);
        assert!(!settings.is_armed());
        assert!(capture.feed(&mut settings, &batch(100_000.0, pulses(100))).is_empty());
    }
    #[test]
    fn continuous_trigger_keeps_firing() {
        let mut settings = TriggerSettings::default().with_length(3.0).start_continuous();
        let mut capture = TriggerCapture::new();
        let captures = capture.feed(&mut settings, &batch(0.0, pulses(100)));
        let begins: Vec<f64> = captures.iter().map(|c| c.begin).collect();
        assert_eq!(begins, vec![20_000.0, 40_000.0, 60_000.0, 80_000.0]);
        assert!(settings.running);
    }
    #[test]
    fn capture_spans_batches_and_gaps_break_edges() {
        let mut settings = TriggerSettings::default().with_length(4.0).arm_single();
        let mut capture = TriggerCapture::new();
        // a gap right before the step is not a rising edge
        let first = vec![10.0, f32::NAN, 5_000.0, 10.0, 5_000.0, 5_000.0];
        assert!(capture.feed(&mut settings, &batch(0.0, first)).is_empty());
        assert!(capture.is_recording());
        let second = vec![10.0, 10.0, 10.0];
        let captures = capture.feed(&mut settings, &batch(6_000.0, second));
        assert_eq!(captures, vec![Capture { begin: 4_000.0, end: 8_000.0 }]);
        assert!(!settings.single_waiting);
    }
}

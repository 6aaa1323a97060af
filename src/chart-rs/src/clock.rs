/// Maps absolute timestamps (microseconds) onto sample-buffer indices.
///
/// The returned index may be fractional and is allowed to run past the
/// buffer length; readers wrap it modulo the buffer length.
pub trait SampleClock {
    fn index_for_timestamp(&self, timestamp_us: f64) -> f64;
    fn samples_per_second(&self) -> f64;
}
/// Linear mapping anchored at the most recently written sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearClock {
    /// Absolute index of the newest sample.
    pub latest_index: f64,
    /// Timestamp of the newest sample in microseconds.
    pub latest_timestamp: f64,
    pub samples_per_second: f64,
}
impl LinearClock {
    pub fn new(latest_index: f64, latest_timestamp: f64, samples_per_second: f64) -> Self {
        Self {
            latest_index,
            latest_timestamp,
            samples_per_second,
        }
    }
    /// Time between two consecutive samples, in microseconds.
    pub fn sampling_interval_us(&self) -> f64 {
        1e6 / self.samples_per_second
    }
}
impl SampleClock for LinearClock {
    fn index_for_timestamp(&self, timestamp_us: f64) -> f64 {
        self.latest_index
            - (self.latest_timestamp - timestamp_us) * self.samples_per_second / 1e6
    }
    fn samples_per_second(&self) -> f64 {
        self.samples_per_second
    }
}
/// Read-only snapshot of the circular sample store for one frame.
#[derive(Clone, Copy, Debug)]
pub struct Samples<'a> {
    /// Current values; `NaN` marks a gap.
    pub values: &'a [f32],
    /// Per-sample digital bitmask, same indexing as `values`.
    pub bits: Option<&'a [u16]>,
}
impl<'a> Samples<'a> {
    pub fn new(values: &'a [f32], bits: Option<&'a [u16]>) -> Self {
        Self { values, bits }
    }
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
    /// Wraps an absolute index onto the buffer. Caller guarantees a non-empty buffer.
    pub(crate) fn slot(&self, n: i64) -> usize {
        n.rem_euclid(self.values.len() as i64) as usize
    }
    /// Value at an absolute index, `None` for gaps.
    pub(crate) fn value_at(&self, n: i64) -> Option<f32> {
        let v = self.values[self.slot(n)];
        if v.is_nan() {
            None
        } else {
            Some(v)
        }
    }
    pub(crate) fn bits_at(&self, n: i64) -> u16 {
        match self.bits {
            Some(bits) => bits.get(self.slot(n)).copied().unwrap_or(0),
            None => 0,
        }
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn linear_clock_maps_latest_timestamp_to_latest_index() {
        let clock = LinearClock::new(999.0, 10_000.0, 100_000.0);
        assert_eq!(clock.index_for_timestamp(10_000.0), 999.0);
        // 100 kHz -> 10 us per sample
        assert_eq!(clock.index_for_timestamp(9_990.0), 998.0);
        assert_eq!(clock.index_for_timestamp(9_995.0), 998.5);
        assert_eq!(clock.sampling_interval_us(), 10.0);
    }
    #[test]
    fn samples_wrap_negative_and_overflowing_indices() {
        let values = [1.0, 2.0, f32::NAN, 4.0];
        let bits = [0b01, 0b10, 0b11, 0b00];
        let samples = Samples::new(&values, Some(&bits));
        assert_eq!(samples.value_at(-1), Some(4.0));
        assert_eq!(samples.value_at(5), Some(2.0));
        assert_eq!(samples.value_at(2), None);
        assert_eq!(samples.bits_at(-2), 0b11);
    }
}

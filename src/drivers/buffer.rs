use crate::chart::{Horizon, LinearClock, Samples};
use crate::drivers::{ProfilerError, SampleBatch};
/// Fixed-capacity circular store of measured current plus digital bit masks.
///
/// The write cursor counts every sample ever written; slots are reused modulo
/// the capacity, so readers index it with absolute sample numbers.
pub struct SampleRing {
    values: Vec<f32>,
    bits: Option<Vec<u16>>,
    samples_per_second: f64,
    /// Absolute index of the next sample to write.
    write_index: u64,
    latest_timestamp: f64,
}
impl SampleRing {
    pub fn with_history_seconds(
        samples_per_second: f64,
        history_seconds: f64,
        with_bits: bool,
    ) -> Result<Self, ProfilerError> {
        if !(samples_per_second > 0.0) {
            return Err(ProfilerError::InvalidSampleRate);
        }
        let capacity = (samples_per_second * history_seconds).ceil() as usize;
        if capacity == 0 {
            return Err(ProfilerError::ZeroCapacity);
        }
        Ok(Self {
            values: vec![f32::NAN; capacity],
            bits: with_bits.then(|| vec![0; capacity]),
            samples_per_second,
            write_index: 0,
            latest_timestamp: 0.0,
        })
    }
    pub fn capacity(&self) -> usize {
        self.values.len()
    }
    pub fn samples_per_second(&self) -> f64 {
        self.samples_per_second
    }
    pub fn has_bits(&self) -> bool {
        self.bits.is_some()
    }
    pub fn written(&self) -> u64 {
        self.write_index
    }
    pub fn latest_timestamp(&self) -> f64 {
        self.latest_timestamp
    }
    pub fn push_batch(&mut self, batch: &SampleBatch) -> Result<(), ProfilerError> {
        batch.validate()?;
        if batch.samples_per_second != self.samples_per_second {
            return Err(ProfilerError::SampleRateMismatch {
                expected: self.samples_per_second,
                actual: batch.samples_per_second,
            });
        }
        if batch.values.is_empty() {
            return Ok(());
        }
        let capacity = self.values.len() as u64;
        for (offset, &value) in batch.values.iter().enumerate() {
            let slot = ((self.write_index + offset as u64) % capacity) as usize;
            self.values[slot] = value;
            if let Some(bits) = self.bits.as_mut() {
                bits[slot] = batch.bits.as_ref().map_or(0, |b| b[offset]);
            }
        }
        self.write_index += batch.values.len() as u64;
        let interval = 1e6 / self.samples_per_second;
        self.latest_timestamp =
            batch.first_timestamp + (batch.values.len() - 1) as f64 * interval;
        Ok(())
    }
    /// Borrowed view of the current contents for one frame.
    pub fn samples(&self) -> Samples<'_> {
        Samples::new(&self.values, self.bits.as_deref())
    }
    /// Mapping from timestamps to absolute indices, anchored at the newest sample.
    pub fn clock(&self) -> LinearClock {
        LinearClock::new(
            self.write_index as f64 - 1.0,
            self.latest_timestamp,
            self.samples_per_second,
        )
    }
    /// Pan/zoom limits. The oldest bound always spans the full capacity, so
    /// a ring that is still filling can be zoomed over slots not yet written.
    pub fn horizon(&self) -> Horizon {
        Horizon::new(self.latest_timestamp, self.samples_per_second, self.values.len())
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{ChartState, SampleClock, WindowMode};
    fn batch(first_timestamp: f64, values: Vec<f32>, bits: Option<Vec<u16>>) -> SampleBatch {
        SampleBatch {
            first_timestamp,
            samples_per_second: 1e5,
            values,
            bits,
        }
    }
    #[test]
    fn rejects_bad_construction() {
        assert!(matches!(
            SampleRing::with_history_seconds(0.0, 1.0, false),
            Err(ProfilerError::InvalidSampleRate)
        ));
        assert!(matches!(
            SampleRing::with_history_seconds(1e5, 0.0, false),
            Err(ProfilerError::ZeroCapacity)
        ));
    }
    #[test]
    fn wraps_and_tracks_the_newest_sample() {
        // 10 slots at 100 kHz
        let mut ring = SampleRing::with_history_seconds(1e5, 1e-4, true).unwrap();
        assert_eq!(ring.capacity(), 10);
        let values: Vec<f32> = (0..14).map(|v| v as f32).collect();
        let bits: Vec<u16> = (0..14).map(|v| v as u16 & 1).collect();
        ring.push_batch(&batch(0.0, values, Some(bits))).unwrap();
        assert_eq!(ring.written(), 14);
        assert_eq!(ring.latest_timestamp(), 130.0);
        let samples = ring.samples();
        assert_eq!(samples.values[3], 13.0);
        assert_eq!(samples.values[4], 4.0);
        let clock = ring.clock();
        assert_eq!(clock.index_for_timestamp(130.0), 13.0);
        assert_eq!(clock.index_for_timestamp(120.0), 12.0);
        let horizon = ring.horizon();
        assert_eq!(horizon.now, 130.0);
        assert_eq!(horizon.earliest, 30.0);
    }
    #[test]
    fn partially_filled_ring_zooms_over_its_full_capacity() {
        // 100 slots, 30 written
        let mut ring = SampleRing::with_history_seconds(1e5, 1e-3, false).unwrap();
        ring.push_batch(&batch(0.0, vec![2.0; 30], None)).unwrap();
        let horizon = ring.horizon();
        assert_eq!(horizon.now, 290.0);
        assert_eq!(horizon.earliest, -710.0);
        let paused = ChartState::live(700.0).pause(&horizon);
        assert_eq!(paused.window, WindowMode::Fixed { begin: -410.0, end: 290.0 });
        let zoomed = paused.pan_zoom(&horizon, -300.0, 250.0, None);
        assert_eq!(zoomed.window, WindowMode::Fixed { begin: -300.0, end: 250.0 });
    }
    #[test]
    fn batch_shape_is_checked() {
        let mut ring = SampleRing::with_history_seconds(1e5, 1e-3, true).unwrap();
        let err = ring
            .push_batch(&batch(0.0, vec![1.0, 2.0], Some(vec![0])))
            .unwrap_err();
        assert!(matches!(err, ProfilerError::BitsMismatch { values: 2, bits: 1 }));
        let mut wrong_rate = batch(0.0, vec![1.0], None);
        wrong_rate.samples_per_second = 1e3;
        assert!(matches!(
            ring.push_batch(&wrong_rate),
            Err(ProfilerError::SampleRateMismatch { .. })
        ));
        ring.push_batch(&batch(0.0, vec![1.0], None)).unwrap();
        assert_eq!(ring.samples().bits.map(|b| b[0]), Some(0));
    }
}

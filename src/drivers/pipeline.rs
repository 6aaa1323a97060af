use std::time::Instant;
use crate::drivers::error::ProfilerError;
use crate::drivers::source::{SampleBatch, SampleSource};
/// Paces a source so samples are delivered at wall-clock rate.
pub struct AcquisitionPipeline<S: SampleSource> {
    source: S,
    started_at: Option<Instant>,
    delivered: u64,
}
impl<S: SampleSource> AcquisitionPipeline<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            started_at: None,
            delivered: 0,
        }
    }
    pub fn samples_per_second(&self) -> f64 {
        self.source.samples_per_second()
    }
    pub fn has_digital(&self) -> bool {
        self.source.has_digital()
    }
    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }
    pub fn start(&mut self, now: Instant) {
        self.started_at = Some(now);
        self.delivered = 0;
    }
    pub fn stop(&mut self) {
        self.started_at = None;
    }
    /// Pulls every batch that is due at `now`. An exhausted source stops the
    /// pipeline; whatever it delivered before that is still returned.
    pub fn pump_due(&mut self, now: Instant) -> Result<Vec<SampleBatch>, ProfilerError> {
        let Some(started_at) = self.started_at else {
            return Ok(Vec::new());
        };
        let elapsed = now.saturating_duration_since(started_at).as_secs_f64();
        let due = (elapsed * self.source.samples_per_second()) as u64;
        let mut batches = Vec::new();
        while self.delivered < due {
            match self.source.next_batch()? {
                Some(batch) if !batch.is_empty() => {
                    self.delivered += batch.len() as u64;
                    batches.push(batch);
                }
                _ => {
                    self.stop();
                    break;
                }
            }
        }
        Ok(batches)
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::source::ManualSource;
    use std::time::Duration;
    fn batch(first_timestamp: f64) -> SampleBatch {
        SampleBatch {
            first_timestamp,
            samples_per_second: 1_000.0,
            values: vec![1.0; 100],
            bits: None,
        }
    }
    #[test]
    fn delivers_only_what_is_due() {
        let source = ManualSource::new(1_000.0, (0..5).map(|i| batch(i as f64 * 1e5)));
        let mut pipeline = AcquisitionPipeline::new(source);
        let t0 = Instant::now();
        assert!(pipeline.pump_due(t0).unwrap().is_empty());
        pipeline.start(t0);
        assert!(pipeline.pump_due(t0).unwrap().is_empty());
        // 250 ms at 1 kHz -> 250 samples due -> three batches of 100
        let batches = pipeline.pump_due(t0 + Duration::from_millis(250)).unwrap();
        assert_eq!(batches.len(), 3);
        assert!(pipeline.pump_due(t0 + Duration::from_millis(290)).unwrap().is_empty());
    }
    #[test]
    fn exhausted_source_stops_the_pipeline() {
        let source = ManualSource::new(1_000.0, vec![batch(0.0)]);
        let mut pipeline = AcquisitionPipeline::new(source);
        let t0 = Instant::now();
        pipeline.start(t0);
        let batches = pipeline.pump_due(t0 + Duration::from_secs(1)).unwrap();
        assert_eq!(batches.len(), 1);
        assert!(!pipeline.is_running());
        assert!(pipeline.pump_due(t0 + Duration::from_secs(2)).unwrap().is_empty());
    }
}

use std::collections::VecDeque;
use std::time::Duration;
use rand::{rngs::StdRng, Rng, SeedableRng};
use crate::drivers::ProfilerError;
/// Contiguous run of current samples (microamperes) starting at `first_timestamp` (us).
#[derive(Clone, Debug, PartialEq)]
pub struct SampleBatch {
    pub first_timestamp: f64,
    pub samples_per_second: f64,
    /// `NaN` marks a sample the device did not deliver.
    pub values: Vec<f32>,
    /// Logic port state per sample, bit i = channel i.
    pub bits: Option<Vec<u16>>,
}
impl SampleBatch {
    pub fn validate(&self) -> Result<(), ProfilerError> {
        if !(self.samples_per_second > 0.0) {
            return Err(ProfilerError::InvalidSampleRate);
        }
        if let Some(bits) = &self.bits {
            if bits.len() != self.values.len() {
                return Err(ProfilerError::BitsMismatch {
                    values: self.values.len(),
                    bits: bits.len(),
                });
            }
        }
        Ok(())
    }
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.values.len() as f64 / self.samples_per_second)
    }
}
/// Anything that can deliver measurement batches on demand.
pub trait SampleSource {
    fn samples_per_second(&self) -> f64;
    fn has_digital(&self) -> bool;
    fn next_batch(&mut self) -> Result<Option<SampleBatch>, ProfilerError>;
}
/// In-memory source for tests and deterministic playback.
pub struct ManualSource {
    samples_per_second: f64,
    queue: VecDeque<SampleBatch>,
}
impl ManualSource {
    pub fn new(samples_per_second: f64, batches: impl IntoIterator<Item = SampleBatch>) -> Self {
        Self {
            samples_per_second,
            queue: batches.into_iter().collect(),
        }
    }
}
impl SampleSource for ManualSource {
    fn samples_per_second(&self) -> f64 {
        self.samples_per_second
    }
    fn has_digital(&self) -> bool {
        self.queue.iter().any(|b| b.bits.is_some())
    }
    fn next_batch(&mut self) -> Result<Option<SampleBatch>, ProfilerError> {
        Ok(self.queue.pop_front())
    }
}
/// Shape of the synthetic device-under-test current.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationProfile {
    pub samples_per_second: f64,
    pub batch_len: usize,
    pub sleep_current_ua: f32,
    pub burst_current_ua: f32,
    pub burst_period_ms: f64,
    pub burst_length_ms: f64,
    pub noise_ua: f32,
    /// Chance that a sample is dropped and reported as a gap.
    pub gap_probability: f64,
}
impl Default for SimulationProfile {
    fn default() -> Self {
        Self {
            samples_per_second: 100_000.0,
            batch_len: 1_000,
            sleep_current_ua: 3.0,
            burst_current_ua: 8_000.0,
            burst_period_ms: 100.0,
            burst_length_ms: 4.0,
            noise_ua: 0.8,
            gap_probability: 0.0005,
        }
    }
}
/// Periodic radio bursts on top of a sleep floor, with logic lines that follow the bursts.
pub struct SimulatedSource {
    profile: SimulationProfile,
    next_index: u64,
    rng: StdRng,
}
impl SimulatedSource {
    pub fn new(profile: SimulationProfile) -> Self {
        Self::with_rng(profile, StdRng::from_entropy())
    }
    pub fn with_seed(profile: SimulationProfile, seed: u64) -> Self {
        Self::with_rng(profile, StdRng::seed_from_u64(seed))
    }
    fn with_rng(profile: SimulationProfile, rng: StdRng) -> Self {
        Self {
            profile,
            next_index: 0,
            rng,
        }
    }
    fn sample(&mut self, index: u64) -> (f32, u16) {
        let p = &self.profile;
        let t_ms = index as f64 * 1e3 / p.samples_per_second;
        let period = p.burst_period_ms.max(f64::EPSILON);
        let burst_number = (t_ms / period).floor() as u64;
        let in_burst = t_ms - burst_number as f64 * period < p.burst_length_ms;
        let mut bits = u16::from(in_burst);
        if in_burst && burst_number % 2 == 0 {
            bits |= 0b10;
        }
        // Slow square waves on the remaining lines.
        for line in 2..8 {
            bits |= (((index >> (10 + line)) & 1) as u16) << line;
        }
        if self.rng.gen_bool(p.gap_probability.clamp(0.0, 1.0)) {
            return (f32::NAN, bits);
        }
        let base = if in_burst {
            p.burst_current_ua
        } else {
            p.sleep_current_ua
        };
        let noise = if p.noise_ua > 0.0 {
            self.rng.gen_range(-p.noise_ua..p.noise_ua)
        } else {
            0.0
        };
        ((base + noise).max(0.0), bits)
    }
}
impl SampleSource for SimulatedSource {
    fn samples_per_second(&self) -> f64 {
        self.profile.samples_per_second
    }
    fn has_digital(&self) -> bool {
        true
    }
    fn next_batch(&mut self) -> Result<Option<SampleBatch>, ProfilerError> {
        let start = self.next_index;
        let len = self.profile.batch_len.max(1);
        let mut values = Vec::with_capacity(len);
        let mut bits = Vec::with_capacity(len);
        for index in start..start + len as u64 {
            let (value, mask) = self.sample(index);
            values.push(value);
            bits.push(mask);
        }
        self.next_index += len as u64;
        Ok(Some(SampleBatch {
            first_timestamp: start as f64 * 1e6 / self.profile.samples_per_second,
            samples_per_second: self.profile.samples_per_second,
            values,
            bits: Some(bits),
        }))
    }
}

use log::trace;
use super::{
    clock::{SampleClock, Samples},
    config::ChartConfig,
    view::{ChartFrame, DigitalPoint, LinePoint},
};
/// Width of the per-sample bitmask.
const MAX_DIGITAL_CHANNELS: usize = u16::BITS as usize;
#[derive(Clone, Copy, Debug, Default)]
struct BitSeen {
    on: bool,
    off: bool,
}
/// Turns a time range of the sample store into a bounded set of drawable points.
///
/// Output storage is owned here and reused across calls, so the frame returned
/// by [`Accumulator::process`] borrows the accumulator until the next call.
pub struct Accumulator {
    line: Vec<LinePoint>,
    digital: Vec<Vec<DigitalPoint>>,
    seen: Vec<BitSeen>,
    held_bits: Vec<Option<f64>>,
    on_level: f64,
    off_level: f64,
}
impl Accumulator {
    pub fn new(config: &ChartConfig) -> Self {
        let capacity = config.output_slots * 2;
        let channels = config.digital_channel_count.min(MAX_DIGITAL_CHANNELS);
        Self {
            line: Vec::with_capacity(capacity),
            digital: (0..channels)
                .map(|_| Vec::with_capacity(capacity))
                .collect(),
            seen: vec![BitSeen::default(); channels],
            held_bits: vec![None; channels],
            on_level: config.digital_on_level,
            off_level: config.digital_off_level(),
        }
    }
    /// Downsamples `[begin, end)` onto `output_slots` buckets.
    ///
    /// When a bucket spans more than one sample the line carries a min/max
    /// envelope per bucket and every logic channel gets at most one on and one
    /// off point per bucket. Otherwise every sample is emitted and logic
    /// channels become a run-length compressed step function.
    #[allow(clippy::too_many_arguments)]
    pub fn process<C: SampleClock>(
        &mut self,
        samples: Samples<'_>,
        clock: &C,
        begin: f64,
        end: f64,
        number_of_bits: usize,
        output_slots: usize,
        window_duration: f64,
    ) -> ChartFrame<'_> {
        let (begin, end) = if end < begin { (end, begin) } else { (begin, end) };
        let bits = if samples.bits.is_some() {
            number_of_bits.min(MAX_DIGITAL_CHANNELS)
        } else {
            0
        };
        self.reserve_channels(bits);
        self.line.clear();
        for series in &mut self.digital {
            series.clear();
        }
        if output_slots == 0 || samples.is_empty() {
            return self.frame(bits, 0.0);
        }
        let index_begin = clock.index_for_timestamp(begin);
        let index_end = clock.index_for_timestamp(end);
        let step = (index_end - index_begin) / output_slots as f64;
        if !step.is_finite() {
            trace!("non-finite index range [{index_begin}, {index_end}], emitting gaps");
            self.fill_gaps(begin, output_slots, window_duration);
            return self.frame(bits, step);
        }
        if step > 1.0 {
            trace!("decimating {step:.2} samples per bucket");
            self.decimate(&samples, index_begin, step, bits, output_slots, begin, window_duration);
        } else {
            trace!("interpolating {step:.2} samples per bucket");
            let interval_us = match clock.samples_per_second() {
                sps if sps > 0.0 => 1e6 / sps,
                _ => 0.0,
            };
            self.interpolate(&samples, index_begin, index_end, bits, begin, interval_us);
        }
        self.frame(bits, step)
    }
    fn frame(&self, bits: usize, step: f64) -> ChartFrame<'_> {
        ChartFrame {
            line: &self.line,
            digital: &self.digital[..bits],
            step,
        }
    }
    fn reserve_channels(&mut self, bits: usize) {
        if self.digital.len() < bits {
            let capacity = self.line.capacity();
            self.digital.resize_with(bits, || Vec::with_capacity(capacity));
            self.seen.resize(bits, BitSeen::default());
            self.held_bits.resize(bits, None);
        }
    }
    fn level(&self, set: bool) -> f64 {
        if set {
            self.on_level
        } else {
            self.off_level
        }
    }
    fn fill_gaps(&mut self, begin: f64, output_slots: usize, window_duration: f64) {
        for bucket in 0..output_slots {
            let timestamp = begin + window_duration * (bucket as f64 / output_slots as f64);
            self.line.push(LinePoint::gap(timestamp));
            self.line.push(LinePoint::gap(timestamp));
        }
    }
    #[allow(clippy::too_many_arguments)]
    fn decimate(
        &mut self,
        samples: &Samples<'_>,
        index_begin: f64,
        step: f64,
        bits: usize,
        output_slots: usize,
        begin: f64,
        window_duration: f64,
    ) {
        let capacity = samples.len() as i64;
        for bucket in 0..output_slots {
            let timestamp = begin + window_duration * (bucket as f64 / output_slots as f64);
            let k = (index_begin + bucket as f64 * step).floor() as i64;
            // A bucket never rescans the ring more than once.
            let l = ((index_begin + (bucket + 1) as f64 * step).floor() as i64)
                .min(k.saturating_add(capacity));
            let mut envelope: Option<(f32, f32)> = None;
            self.seen[..bits].fill(BitSeen::default());
            for n in k..l {
                let Some(v) = samples.value_at(n) else {
                    continue;
                };
                envelope = Some(match envelope {
                    Some((lo, hi)) => (lo.min(v), hi.max(v)),
                    None => (v, v),
                });
                if bits > 0 {
                    let mask = samples.bits_at(n);
                    for (i, seen) in self.seen[..bits].iter_mut().enumerate() {
                        if (mask >> i) & 1 == 1 {
                            seen.on = true;
                        } else {
                            seen.off = true;
                        }
                    }
                }
            }
            let (min, max) = match envelope {
                Some((lo, hi)) => (Some(f64::from(lo)), Some(f64::from(hi))),
                None => (None, None),
            };
            self.line.push(LinePoint::new(timestamp, min));
            self.line.push(LinePoint::new(timestamp, max));
            let (on, off) = (self.level(true), self.level(false));
            for (series, seen) in self.digital.iter_mut().zip(&self.seen[..bits]) {
                if seen.on {
                    series.push(DigitalPoint {
                        timestamp,
                        value: Some(on),
                    });
                }
                if seen.off {
                    series.push(DigitalPoint {
                        timestamp,
                        value: Some(off),
                    });
                }
            }
        }
    }
    fn interpolate(
        &mut self,
        samples: &Samples<'_>,
        index_begin: f64,
        index_end: f64,
        bits: usize,
        begin: f64,
        interval_us: f64,
    ) {
        let first = index_begin.floor() as i64;
        let last = index_end.ceil() as i64;
        let mut held: Option<f64> = None;
        self.held_bits[..bits].fill(None);
        for n in first..=last {
            let timestamp = begin + (n as f64 - index_begin) * interval_us;
            let sample = samples.value_at(n);
            // The closing point repeats the last value instead of starting a new segment.
            if n < last {
                held = sample.map(f64::from);
            }
            self.line.push(LinePoint::new(timestamp, held));
            let mask = samples.bits_at(n);
            for i in 0..bits {
                if n == last {
                    let value = self.held_bits[i];
                    self.digital[i].push(DigitalPoint { timestamp, value });
                    continue;
                }
                let level = sample.map(|_| self.level((mask >> i) & 1 == 1));
                let previous = self.digital[i].last().and_then(|p| p.value);
                if previous != level {
                    self.digital[i].push(DigitalPoint {
                        timestamp,
                        value: level,
                    });
                    self.held_bits[i] = level;
                }
            }
        }
    }
}

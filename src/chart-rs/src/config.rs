/// Fixed parameters of one chart view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartConfig {
    /// Number of display buckets; the line series holds up to twice this many points.
    pub output_slots: usize,
    /// Logic channels carried in the per-sample bitmask.
    pub digital_channel_count: usize,
    /// Plot level of a set bit. A cleared bit is drawn at the negated level.
    pub digital_on_level: f64,
    /// Digital channels are skipped for windows longer than this (microseconds).
    pub digital_max_window_us: f64,
    pub wheel_zoom_factor: f64,
    pub min_zoom_factor: f64,
    /// Duration of the live window when the chart starts (microseconds).
    pub default_window_us: f64,
}
impl ChartConfig {
    pub fn digital_off_level(&self) -> f64 {
        -self.digital_on_level
    }
    pub fn with_output_slots(mut self, output_slots: usize) -> Self {
        self.output_slots = output_slots;
        self
    }
    pub fn with_default_window_us(mut self, default_window_us: f64) -> Self {
        // A zero-width live window would never satisfy end > begin.
        if default_window_us > 0.0 {
            self.default_window_us = default_window_us;
        }
        self
    }
}
impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            output_slots: 4000,
            digital_channel_count: 8,
            digital_on_level: 0.4,
            digital_max_window_us: 3_000_000.0,
            wheel_zoom_factor: 1.25,
            min_zoom_factor: 0.1,
            default_window_us: 7_000_000.0,
        }
    }
}

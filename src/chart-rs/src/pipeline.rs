use super::{
    accumulator::Accumulator,
    clock::{SampleClock, Samples},
    config::ChartConfig,
    digital::DigitalChannels,
    stats::calc_stats,
    view::{ChartFrame, RangeStats},
    window::{ChartState, Horizon, Span},
};
/// Everything a renderer needs for one frame.
#[derive(Debug)]
pub struct ChartOutput<'a> {
    pub span: Span,
    pub frame: ChartFrame<'a>,
    pub window_stats: Option<RangeStats>,
    pub selection_stats: Option<RangeStats>,
}
/// One chart view: window state, channel selection and reusable output buffers.
pub struct ChartPipeline {
    config: ChartConfig,
    state: ChartState,
    digital: DigitalChannels,
    accumulator: Accumulator,
}
impl ChartPipeline {
    pub fn new(config: ChartConfig) -> Self {
        Self {
            state: ChartState::live(config.default_window_us),
            digital: DigitalChannels::new(config.digital_channel_count),
            accumulator: Accumulator::new(&config),
            config,
        }
    }
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }
    pub fn state(&self) -> &ChartState {
        &self.state
    }
    /// Replaces the window/cursor state with the result of one of its operations.
    pub fn apply(&mut self, state: ChartState) {
        self.state = state;
    }
    pub fn digital_channels(&self) -> &DigitalChannels {
        &self.digital
    }
    pub fn digital_channels_mut(&mut self) -> &mut DigitalChannels {
        &mut self.digital
    }
    /// Recomputes line, digital series and both statistics from the current samples.
    pub fn render<C: SampleClock>(
        &mut self,
        samples: Samples<'_>,
        clock: &C,
        horizon: &Horizon,
    ) -> ChartOutput<'_> {
        let span = self.state.resolve(horizon);
        let duration = span.duration();
        let number_of_bits = self.digital.channels_to_process(
            duration,
            samples.bits.is_some(),
            self.config.digital_max_window_us,
        );
        let window_stats = calc_stats(samples.values, Some(span.begin), Some(span.end), clock);
        let cursor = self.state.cursor;
        let selection_stats = calc_stats(samples.values, cursor.begin, cursor.end, clock);
        let frame = self.accumulator.process(
            samples,
            clock,
            span.begin,
            span.end,
            number_of_bits,
            self.config.output_slots,
            duration,
        );
        ChartOutput {
            span,
            frame,
            window_stats,
            selection_stats,
        }
    }
}

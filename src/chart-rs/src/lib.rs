pub mod accumulator;
pub mod clock;
pub mod config;
pub mod digital;
pub mod pipeline;
pub mod stats;
pub mod view;
pub mod window;
pub use accumulator::Accumulator;
pub use clock::{LinearClock, SampleClock, Samples};
pub use config::ChartConfig;
pub use digital::DigitalChannels;
pub use pipeline::{ChartOutput, ChartPipeline};
pub use stats::calc_stats;
pub use view::{contiguous_runs, step_runs, ChartFrame, DigitalPoint, LinePoint, RangeStats};
pub use window::{
    drag_pan, drag_zoom_factor, wheel_zoom_factor, zoom_at_origin, ChartState, Cursor, Horizon,
    Span, ValueRange, WindowMode,
};

// src/drivers/mod.rs
pub mod buffer;
pub mod error;
pub mod pipeline;
pub mod source;
pub mod trigger;
pub use buffer::SampleRing;
pub use error::ProfilerError;
pub use pipeline::AcquisitionPipeline;
pub use source::{ManualSource, SampleBatch, SampleSource, SimulatedSource, SimulationProfile};
pub use trigger::{Capture, TriggerCapture, TriggerSettings};

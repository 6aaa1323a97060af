// src/types.rs
use crate::drivers::SampleBatch;
/// Commands from the GUI to the acquisition engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuiCommand {
    StartSampling,
    StopSampling,
    Shutdown,
}
/// Messages from the acquisition engine to the GUI.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineMessage {
    Log(String),
    SamplingStatus(bool),
    Samples(SampleBatch),
}

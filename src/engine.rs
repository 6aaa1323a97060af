// src/engine.rs
use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use log::{info, warn};
use crate::drivers::{AcquisitionPipeline, SampleSource, SimulatedSource, SimulationProfile};
use crate::types::{EngineMessage, GuiCommand};
const ACTIVE_POLL: Duration = Duration::from_millis(5);
const IDLE_POLL: Duration = Duration::from_millis(50);
pub fn spawn_thread(
    tx: Sender<EngineMessage>,
    rx_cmd: Receiver<GuiCommand>,
    profile: SimulationProfile,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let pipeline = AcquisitionPipeline::new(SimulatedSource::new(profile));
        run(pipeline, &tx, &rx_cmd);
        info!("acquisition engine stopped");
    })
}
/// Drives the pipeline until the GUI asks to shut down or hangs up.
pub fn run<S: SampleSource>(
    mut pipeline: AcquisitionPipeline<S>,
    tx: &Sender<EngineMessage>,
    rx_cmd: &Receiver<GuiCommand>,
) {
    let ready = format!(
        "Engine ready: {} S/s{}",
        pipeline.samples_per_second(),
        if pipeline.has_digital() { ", digital channels" } else { "" }
    );
    info!("{ready}");
    tx.send(EngineMessage::Log(ready)).ok();
    loop {
        loop {
            let cmd = match rx_cmd.try_recv() {
                Ok(cmd) => cmd,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return,
            };
            match cmd {
                GuiCommand::StartSampling => {
                    if !pipeline.is_running() {
                        pipeline.start(Instant::now());
                        info!("sampling started");
                        tx.send(EngineMessage::Log("Sampling started".to_owned())).ok();
                        tx.send(EngineMessage::SamplingStatus(true)).ok();
                    }
                }
                GuiCommand::StopSampling => {
                    if pipeline.is_running() {
                        pipeline.stop();
                        info!("sampling stopped");
                        tx.send(EngineMessage::Log("Sampling stopped".to_owned())).ok();
                        tx.send(EngineMessage::SamplingStatus(false)).ok();
                    }
                }
                GuiCommand::Shutdown => return,
            }
        }
        if !pipeline.is_running() {
            thread::sleep(IDLE_POLL);
            continue;
        }
        match pipeline.pump_due(Instant::now()) {
            Ok(batches) => {
                for batch in batches {
                    if tx.send(EngineMessage::Samples(batch)).is_err() {
                        return;
                    }
                }
            }
            Err(err) => {
                warn!("sample source failed: {err}");
                pipeline.stop();
                tx.send(EngineMessage::Log(format!("Source error: {err}"))).ok();
            }
        }
        if !pipeline.is_running() {
            tx.send(EngineMessage::Log("Source ended".to_owned())).ok();
            tx.send(EngineMessage::SamplingStatus(false)).ok();
        }
        thread::sleep(ACTIVE_POLL);
    }
}

// src/main.rs
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
mod chart;
mod drivers;
mod engine;
mod gui;
mod settings;
mod types;
use anyhow::{anyhow, Context, Result};
use eframe::egui;
use log::info;
use drivers::SampleRing;
use settings::AppSettings;
fn main() -> Result<()> {
    env_logger::init();
    let settings = AppSettings::load()?;
    // 模拟源始终带数字通道
    let ring = SampleRing::with_history_seconds(
        settings.samples_per_second,
        settings.buffer_seconds,
        true,
    )
    .context("allocating sample ring")?;
    info!(
        "sample ring holds {} samples ({} s at {} S/s{})",
        ring.capacity(),
        settings.buffer_seconds,
        ring.samples_per_second(),
        if ring.has_bits() { ", with digital bits" } else { "" }
    );
    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([1280.0, 800.0])
        .with_min_inner_size([900.0, 600.0])
        .with_title("Power Profiler");
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    eframe::run_native(
        "PowerProfiler",
        options,
        Box::new(move |_cc| Box::new(gui::PowerProfilerApp::new(&settings, ring))),
    )
    .map_err(|e| anyhow!("window failed: {e}"))
}

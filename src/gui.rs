// src/gui.rs
use std::sync::mpsc::{channel, Receiver, Sender};
use eframe::egui;
use egui::{Color32, PointerButton, RichText, Vec2};
use egui_plot::{Line, Plot, PlotBounds, PlotPoint, PlotPoints, PlotTransform, VLine};
use log::{info, warn};
use crate::chart::{
    contiguous_runs, drag_pan, drag_zoom_factor, step_runs, wheel_zoom_factor, zoom_at_origin,
    ChartPipeline, ChartState, Horizon, RangeStats, Span, ValueRange,
};
use crate::drivers::{Capture, SampleRing, TriggerCapture, TriggerSettings};
use crate::engine;
use crate::settings::AppSettings;
use crate::types::{EngineMessage, GuiCommand};
const ZOOM_PRESETS: [(f64, &str); 6] = [
    (10e3, "10 ms"),
    (100e3, "100 ms"),
    (1e6, "1 s"),
    (3e6, "3 s"),
    (10e6, "10 s"),
    (60e6, "60 s"),
];
const LINE_COLOR: Color32 = Color32::from_rgb(0x5b, 0x8f, 0xff);
const CURSOR_COLOR: Color32 = Color32::from_rgb(0xff, 0x8c, 0x42);
const DIGITAL_COLOR: Color32 = Color32::from_rgb(0x54, 0xc7, 0x6b);
const MAX_LOG_LINES: usize = 8;
#[derive(Clone, Copy)]
enum Drag {
    Pan,
    Select { origin: f64 },
    /// Right-button zoom, measured from the press point against the bounds at press time.
    Zoom {
        press: egui::Pos2,
        origin: PlotPoint,
        span: Span,
        values: (f64, f64),
    },
}
/// Owned copy of one rendered frame, so the chart state can change while drawing.
struct FrameData {
    span: Span,
    line_runs: Vec<Vec<[f64; 2]>>,
    /// (channel, step polylines) for enabled channels only.
    digital_runs: Vec<(usize, Vec<Vec<[f64; 2]>>)>,
    window_stats: Option<RangeStats>,
    selection_stats: Option<RangeStats>,
    value_bounds: (f64, f64),
}
pub struct PowerProfilerApp {
    chart: ChartPipeline,
    ring: SampleRing,
    is_sampling: bool,
    drag: Option<Drag>,
    trigger: TriggerSettings,
    capture: TriggerCapture,
    log_messages: Vec<String>,
    rx: Receiver<EngineMessage>,
    tx_cmd: Sender<GuiCommand>,
}
impl PowerProfilerApp {
    pub fn new(settings: &AppSettings, ring: SampleRing) -> Self {
        let (tx, rx) = channel();
        let (tx_cmd, rx_cmd) = channel();
        // 启动采集线程
        engine::spawn_thread(tx, rx_cmd, settings.simulation_profile());
        Self {
            chart: ChartPipeline::new(settings.chart_config()),
            ring,
            is_sampling: false,
            drag: None,
            trigger: settings.trigger_settings(),
            capture: TriggerCapture::new(),
            log_messages: vec!["Power Profiler ready.".to_owned()],
            rx,
            tx_cmd,
        }
    }
    fn log(&mut self, msg: &str) {
        self.log_messages.push(format!("> {}", msg));
        if self.log_messages.len() > MAX_LOG_LINES {
            self.log_messages.remove(0);
        }
    }
    fn send(&self, cmd: GuiCommand) {
        if self.tx_cmd.send(cmd).is_err() {
            warn!("acquisition engine is gone, {cmd:?} not delivered");
        }
    }
    fn drain_engine(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                EngineMessage::Log(s) => self.log(&s),
                EngineMessage::SamplingStatus(b) => self.is_sampling = b,
                EngineMessage::Samples(batch) => {
                    if let Err(err) = self.ring.push_batch(&batch) {
                        warn!("dropping batch of {} samples: {err}", batch.len());
                        self.log(&format!("Dropped batch: {err}"));
                        continue;
                    }
                    for capture in self.capture.feed(&mut self.trigger, &batch) {
                        self.show_capture(capture);
                    }
                }
            }
        }
    }
    /// Freezes the chart on a finished trigger capture.
    fn show_capture(&mut self, capture: Capture) {
        let horizon = self.ring.horizon();
        let next = self
            .chart
            .state()
            .pan_zoom(&horizon, capture.begin, capture.end, None);
        self.chart.apply(next);
        info!("trigger capture [{}, {}] us", capture.begin, capture.end);
        self.log(&format!("Triggered at {}", format_duration(capture.begin)));
    }
    fn compute_frame(&mut self, horizon: &Horizon) -> FrameData {
        let clock = self.ring.clock();
        let value_range = self.chart.state().value_range;
        let (span, line_runs, digital_runs, window_stats, selection_stats) = {
            let out = self.chart.render(self.ring.samples(), &clock, horizon);
            let digital_runs: Vec<_> = out.frame.digital.iter().map(|s| step_runs(s)).collect();
            (
                out.span,
                contiguous_runs(out.frame.line),
                digital_runs,
                out.window_stats,
                out.selection_stats,
            )
        };
        let channels = self.chart.digital_channels();
        let digital_runs = digital_runs
            .into_iter()
            .enumerate()
            .filter(|(i, _)| channels.is_enabled(*i))
            .collect();
        let value_bounds = value_range.map_or_else(|| autoscale(&line_runs), |r| (r.min, r.max));
        FrameData {
            span,
            line_runs,
            digital_runs,
            window_stats,
            selection_stats,
            value_bounds,
        }
    }
    /// Translates wheel, drag and click gestures on the main plot into a new chart state.
    #[allow(clippy::too_many_arguments)]
    fn handle_plot_input(
        &mut self,
        ui: &egui::Ui,
        response: &egui::Response,
        transform: &PlotTransform,
        pointer: Option<PlotPoint>,
        drag_delta: Vec2,
        frame: &FrameData,
        horizon: &Horizon,
    ) -> Option<ChartState> {
        let state = *self.chart.state();
        let config = *self.chart.config();
        let (shift, command, scroll) =
            ui.input(|i| (i.modifiers.shift, i.modifiers.command, i.scroll_delta.y));
        if response.clicked_by(PointerButton::Middle)
            || response.double_clicked()
            || response.secondary_clicked()
        {
            self.drag = None;
            return Some(state.reset_to_live());
        }
        if response.drag_started_by(PointerButton::Primary) {
            self.drag = match pointer {
                Some(p) if shift => Some(Drag::Select { origin: p.x }),
                _ => Some(Drag::Pan),
            };
        }
        if response.drag_started_by(PointerButton::Secondary) {
            self.drag = ui.input(|i| i.pointer.press_origin()).map(|press| Drag::Zoom {
                press,
                origin: transform.value_from_position(press),
                span: frame.span,
                values: frame.value_bounds,
            });
        }
        if response.drag_released() {
            self.drag = None;
            return None;
        }
        if response.dragged_by(PointerButton::Primary) {
            match self.drag {
                Some(Drag::Pan) if drag_delta.x != 0.0 => {
                    let (begin, end) = drag_pan(
                        0.0,
                        f64::from(drag_delta.x),
                        frame.span.begin,
                        frame.span.end,
                    );
                    return Some(state.pan_zoom(horizon, begin, end, None));
                }
                Some(Drag::Select { origin }) => {
                    return pointer.map(|p| state.with_cursor(Some(origin), Some(p.x)));
                }
                _ => {}
            }
        }
        if response.dragged_by(PointerButton::Secondary) {
            if let (Some(Drag::Zoom { press, origin, span, values }), Some(pos)) =
                (self.drag, response.interact_pointer_pos())
            {
                let rect = transform.frame();
                let fx = f64::from((pos.x - press.x) / rect.width());
                let fy = f64::from((pos.y - press.y) / rect.height());
                let base = config.wheel_zoom_factor;
                let (begin, end) = zoom_at_origin(
                    origin.x,
                    drag_zoom_factor(fx, base),
                    span.begin,
                    span.end,
                    config.min_zoom_factor,
                );
                let (min, max) = zoom_at_origin(
                    origin.y,
                    drag_zoom_factor(fy, base),
                    values.0,
                    values.1,
                    config.min_zoom_factor,
                );
                return Some(state.pan_zoom(horizon, begin, end, Some(ValueRange { min, max })));
            }
            return None;
        }
        if !response.hovered() {
            return None;
        }
        let p = pointer?;
        let factor = wheel_zoom_factor(-f64::from(scroll), config.wheel_zoom_factor)?;
        if command {
            let (min, max) = zoom_at_origin(
                p.y,
                factor,
                frame.value_bounds.0,
                frame.value_bounds.1,
                config.min_zoom_factor,
            );
            let range = ValueRange { min, max };
            return Some(state.pan_zoom(horizon, frame.span.begin, frame.span.end, Some(range)));
        }
        let (begin, end) = zoom_at_origin(
            p.x,
            factor,
            frame.span.begin,
            frame.span.end,
            config.min_zoom_factor,
        );
        Some(state.pan_zoom(horizon, begin, end, None))
    }
}
impl eframe::App for PowerProfilerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_engine();
        if self.is_sampling {
            ctx.request_repaint();
        }
        egui::SidePanel::left("controls").min_width(220.0).show(ctx, |ui| {
            ui.add_space(10.0);
            ui.heading("Power Profiler");
            ui.separator();
            let label = if self.is_sampling {
                "Stop sampling"
            } else {
                "Start sampling"
            };
            if ui.button(label).clicked() {
                self.send(if self.is_sampling {
                    GuiCommand::StopSampling
                } else {
                    GuiCommand::StartSampling
                });
            }
            ui.label(format!(
                "{} samples | t = {}",
                self.ring.written(),
                format_duration(self.ring.latest_timestamp())
            ));
            ui.add_space(20.0);
            ui.label("TRIGGER");
            let mut level = self.trigger.level;
            ui.horizontal(|ui| {
                ui.label("Level");
                let edit = egui::DragValue::new(&mut level).speed(10.0).suffix(" uA");
                if ui.add(edit).changed() {
                    self.trigger = self.trigger.with_level(level);
                }
            });
            let mut length = self.trigger.length_ms;
            let range = self.trigger.window_range;
            ui.horizontal(|ui| {
                ui.label("Length");
                let edit = egui::DragValue::new(&mut length)
                    .speed(0.1)
                    .clamp_range(range.min..=range.max)
                    .suffix(" ms");
                if ui.add(edit).changed() {
                    self.trigger = self.trigger.with_length(length);
                }
            });
            ui.horizontal(|ui| {
                if ui
                    .selectable_label(self.trigger.single_waiting, "Single")
                    .clicked()
                {
                    self.trigger = self.trigger.arm_single();
                }
                if ui
                    .selectable_label(self.trigger.running, "Continuous")
                    .clicked()
                {
                    self.trigger = self.trigger.start_continuous();
                }
                if ui
                    .add_enabled(self.trigger.is_armed(), egui::Button::new("Stop"))
                    .clicked()
                {
                    self.trigger = self.trigger.stop();
                }
            });
            ui.label(trigger_status(&self.trigger, self.capture.is_recording()));
            ui.add_space(20.0);
            ui.label("DIGITAL CHANNELS");
            let channels = self.chart.digital_channels_mut();
            ui.checkbox(&mut channels.visible, "Show digital channels");
            ui.horizontal_wrapped(|ui| {
                for i in 0..channels.count() {
                    if ui
                        .selectable_label(channels.is_enabled(i), i.to_string())
                        .clicked()
                    {
                        channels.toggle(i);
                    }
                }
            });
            ui.add_space(20.0);
            ui.separator();
            egui::ScrollArea::vertical().max_height(160.0).show(ui, |ui| {
                for m in &self.log_messages {
                    ui.monospace(m);
                }
            });
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            let horizon = self.ring.horizon();
            let state = *self.chart.state();
            let mut next = None;
            ui.horizontal(|ui| {
                if state.window.is_live() {
                    if ui.button("Pause").clicked() {
                        next = Some(state.pause(&horizon));
                    }
                } else if ui.button("Live").clicked() {
                    next = Some(state.reset_to_live());
                }
                ui.separator();
                for (duration, label) in ZOOM_PRESETS {
                    let selected = (state.window.duration() - duration).abs() < 1.0;
                    if ui.selectable_label(selected, label).clicked() {
                        next = Some(state.zoom_to_duration(duration));
                    }
                }
            });
            if let Some(next) = next {
                self.chart.apply(next);
            }
            let frame = self.compute_frame(&horizon);
            let cursor = self.chart.state().cursor;
            let plot = Plot::new("current")
                .height(320.0)
                .allow_drag(false)
                .allow_zoom(false)
                .allow_scroll(false)
                .allow_boxed_zoom(false)
                .allow_double_click_reset(false)
                .show(ui, |plot_ui| {
                    plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                        [frame.span.begin, frame.value_bounds.0],
                        [frame.span.end, frame.value_bounds.1],
                    ));
                    for run in &frame.line_runs {
                        plot_ui.line(Line::new(PlotPoints::new(run.clone())).color(LINE_COLOR));
                    }
                    for x in [cursor.begin, cursor.end].into_iter().flatten() {
                        plot_ui.vline(VLine::new(x).color(CURSOR_COLOR));
                    }
                    (
                        plot_ui.pointer_coordinate(),
                        plot_ui.pointer_coordinate_drag_delta(),
                    )
                });
            let (pointer, drag_delta) = plot.inner;
            if let Some(next) =
                self.handle_plot_input(
                    ui,
                    &plot.response,
                    &plot.transform,
                    pointer,
                    drag_delta,
                    &frame,
                    &horizon,
                )
            {
                self.chart.apply(next);
            }
            for (channel, runs) in &frame.digital_runs {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(format!("D{channel}")).monospace());
                    Plot::new(("digital", *channel))
                        .height(36.0)
                        .show_axes([false, false])
                        .allow_drag(false)
                        .allow_zoom(false)
                        .allow_scroll(false)
                        .allow_boxed_zoom(false)
                        .allow_double_click_reset(false)
                        .show(ui, |plot_ui| {
                            plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                                [frame.span.begin, -0.6],
                                [frame.span.end, 0.6],
                            ));
                            for run in runs {
                                plot_ui.line(
                                    Line::new(PlotPoints::new(run.clone())).color(DIGITAL_COLOR),
                                );
                            }
                        });
                });
            }
            ui.separator();
            ui.horizontal(|ui| {
                stat_box(ui, "Window", frame.window_stats);
                stat_box(ui, "Selection", frame.selection_stats);
                if ui
                    .add_enabled(cursor.is_active(), egui::Button::new("CLEAR"))
                    .clicked()
                {
                    let cleared = self.chart.state().clear_cursor();
                    self.chart.apply(cleared);
                }
            });
            ui.label(
                RichText::new(
                    "Drag: pan | Shift+drag: select | Wheel: zoom | Ctrl+wheel: value zoom | \
                     Right-drag: zoom both axes | Right or double click: live",
                )
                .small(),
            );
        });
    }
}
impl Drop for PowerProfilerApp {
    fn drop(&mut self) {
        self.tx_cmd.send(GuiCommand::Shutdown).ok();
    }
}
fn stat_box(ui: &mut egui::Ui, label: &str, stats: Option<RangeStats>) {
    ui.group(|ui| {
        ui.vertical(|ui| {
            ui.label(RichText::new(label).strong());
            ui.monospace(stats_text(stats));
        });
    });
}
/// Value axis bounds around the visible line, padded so a flat line stays visible.
fn autoscale(runs: &[Vec<[f64; 2]>]) -> (f64, f64) {
    let mut bounds: Option<(f64, f64)> = None;
    for [_, v] in runs.iter().flatten().copied() {
        bounds = Some(match bounds {
            Some((lo, hi)) => (lo.min(v), hi.max(v)),
            None => (v, v),
        });
    }
    match bounds {
        Some((min, max)) => {
            let pad = ((max - min) * 0.1).max(1.0);
            (min - pad, max + pad)
        }
        None => (-1.0, 1.0),
    }
}
fn format_current(microamps: f64) -> String {
    if microamps.abs() >= 1e3 {
        format!("{:.2} mA", microamps / 1e3)
    } else {
        format!("{:.2} uA", microamps)
    }
}
fn format_duration(micros: f64) -> String {
    let abs = micros.abs();
    if abs >= 1e6 {
        format!("{:.2} s", micros / 1e6)
    } else if abs >= 1e3 {
        format!("{:.2} ms", micros / 1e3)
    } else {
        format!("{:.0} us", micros)
    }
}
fn trigger_status(trigger: &TriggerSettings, recording: bool) -> &'static str {
    if !trigger.is_armed() {
        "Trigger idle"
    } else if recording {
        "Recording"
    } else if trigger.single_waiting {
        "Waiting for single trigger"
    } else {
        "Continuous trigger armed"
    }
}
fn stats_text(stats: Option<RangeStats>) -> String {
    match stats {
        Some(s) => format!(
            "avg {} | max {} | span {}",
            format_current(s.average),
            s.max.map_or_else(|| "-".to_owned(), format_current),
            format_duration(s.delta)
        ),
        None => "no range".to_owned(),
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn units_switch_at_thousand() {
        assert_eq!(format_current(999.0), "999.00 uA");
        assert_eq!(format_current(2_500.0), "2.50 mA");
        assert_eq!(format_duration(250.0), "250 us");
        assert_eq!(format_duration(1_500.0), "1.50 ms");
        assert_eq!(format_duration(7_000_000.0), "7.00 s");
    }
    #[test]
    fn stats_text_marks_missing_values() {
        assert_eq!(stats_text(None), "no range");
        let stats = RangeStats {
            average: 0.0,
            max: None,
            delta: 2_000.0,
        };
        assert_eq!(stats_text(Some(stats)), "avg 0.00 uA | max - | span 2.00 ms");
    }
    #[test]
    fn trigger_status_follows_arming() {
        let idle = TriggerSettings::default();
        assert_eq!(trigger_status(&idle, false), "Trigger idle");
        assert_eq!(trigger_status(&idle.arm_single(), false), "Waiting for single trigger");
        assert_eq!(trigger_status(&idle.start_continuous(), true), "Recording");
        assert_eq!(trigger_status(&idle.start_continuous(), false), "Continuous trigger armed");
    }
    #[test]
    fn autoscale_pads_flat_lines() {
        assert_eq!(autoscale(&[]), (-1.0, 1.0));
        assert_eq!(autoscale(&[vec![[0.0, 5.0], [1.0, 5.0]]]), (4.0, 6.0));
        assert_eq!(autoscale(&[vec![[0.0, 0.0]], vec![[2.0, 100.0]]]), (-10.0, 110.0));
    }
}

// Adapter module to surface the chart pipeline that lives under `chart-rs/`.
#[path = "chart-rs/src/lib.rs"]
#[allow(unused_imports)]
mod chart_rs;

pub use chart_rs::*;

/// One point of the current/voltage line. `value == None` breaks the line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinePoint {
    pub timestamp: f64,
    pub value: Option<f64>,
}
impl LinePoint {
    pub fn new(timestamp: f64, value: Option<f64>) -> Self {
        Self { timestamp, value }
    }
    pub fn gap(timestamp: f64) -> Self {
        Self {
            timestamp,
            value: None,
        }
    }
}
/// One corner of a logic channel's step function.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DigitalPoint {
    pub timestamp: f64,
    /// The on or off level, `None` while the underlying samples are gaps.
    pub value: Option<f64>,
}
/// Summary of a sample range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RangeStats {
    /// Mean of the valid samples, `0.0` when there are none.
    pub average: f64,
    pub max: Option<f64>,
    /// Requested span `end - begin` in microseconds.
    pub delta: f64,
}
/// Borrowed output of one accumulator pass. Valid until the next call.
#[derive(Clone, Copy, Debug)]
pub struct ChartFrame<'a> {
    pub line: &'a [LinePoint],
    /// One series per processed logic channel.
    pub digital: &'a [Vec<DigitalPoint>],
    /// Average number of samples per bucket.
    pub step: f64,
}
impl ChartFrame<'_> {
    pub fn is_decimated(&self) -> bool {
        self.step > 1.0
    }
}
/// Splits a line series into runs without gaps, ready for a polyline renderer.
pub fn contiguous_runs(line: &[LinePoint]) -> Vec<Vec<[f64; 2]>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for point in line {
        match point.value {
            Some(v) => current.push([point.timestamp, v]),
            None => {
                if !current.is_empty() {
                    runs.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}
/// Turns a logic channel series into horizontal-then-vertical polylines.
///
/// Each level is held until the next point; gaps end the current run.
pub fn step_runs(series: &[DigitalPoint]) -> Vec<Vec<[f64; 2]>> {
    let mut runs = Vec::new();
    let mut current: Vec<[f64; 2]> = Vec::new();
    for point in series {
        if let Some(&[_, held]) = current.last() {
            current.push([point.timestamp, held]);
        }
        match point.value {
            Some(v) => current.push([point.timestamp, v]),
            None => {
                if current.len() > 1 {
                    runs.push(std::mem::take(&mut current));
                }
                current.clear();
            }
        }
    }
    if current.len() > 1 {
        runs.push(current);
    }
    runs
}

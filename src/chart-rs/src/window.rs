use log::debug;
/// Vertical axis range. Absent means autoscale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}
/// Either a rolling window anchored at the newest sample, or fixed timestamps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WindowMode {
    Live { duration: f64 },
    Fixed { begin: f64, end: f64 },
}
impl WindowMode {
    /// Fixed window with its bounds put in order.
    pub fn fixed(begin: f64, end: f64) -> Self {
        if end < begin {
            WindowMode::Fixed {
                begin: end,
                end: begin,
            }
        } else {
            WindowMode::Fixed { begin, end }
        }
    }
    pub fn duration(&self) -> f64 {
        match *self {
            WindowMode::Live { duration } => duration,
            WindowMode::Fixed { begin, end } => end - begin,
        }
    }
    pub fn is_live(&self) -> bool {
        matches!(self, WindowMode::Live { .. })
    }
}
/// What the sample store currently holds, in microseconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Horizon {
    /// Timestamp of the newest sample.
    pub now: f64,
    /// Timestamp of the oldest retained sample.
    pub earliest: f64,
}
impl Horizon {
    pub fn new(now: f64, samples_per_second: f64, buffer_len: usize) -> Self {
        let retained = if samples_per_second > 0.0 {
            buffer_len as f64 / samples_per_second * 1e6
        } else {
            0.0
        };
        Self {
            now,
            earliest: now - retained,
        }
    }
}
/// A resolved, ordered time span.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Span {
    pub begin: f64,
    pub end: f64,
}
impl Span {
    pub fn duration(&self) -> f64 {
        self.end - self.begin
    }
}
/// Secondary selection used for the selection statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Cursor {
    pub begin: Option<f64>,
    pub end: Option<f64>,
}
impl Cursor {
    pub fn is_active(&self) -> bool {
        self.begin.is_some() || self.end.is_some()
    }
}
/// Window, value range and cursor of one chart.
///
/// Every operation is a pure function of the current state returning the next one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartState {
    pub window: WindowMode,
    pub value_range: Option<ValueRange>,
    pub cursor: Cursor,
}
impl ChartState {
    pub fn live(duration: f64) -> Self {
        Self {
            window: WindowMode::Live { duration },
            value_range: None,
            cursor: Cursor::default(),
        }
    }
    pub fn resolve(&self, horizon: &Horizon) -> Span {
        match self.window {
            WindowMode::Live { duration } => Span {
                begin: horizon.now - duration,
                end: horizon.now,
            },
            WindowMode::Fixed { begin, end } => Span { begin, end },
        }
    }
    /// Moves the window to `[begin, end]`, shifted rigidly back inside the
    /// retained data. Requests wider than the retained data are ignored.
    /// `value_range == None` keeps the current vertical range.
    #[must_use]
    pub fn pan_zoom(
        &self,
        horizon: &Horizon,
        begin: f64,
        end: f64,
        value_range: Option<ValueRange>,
    ) -> Self {
        let (begin, end) = if end < begin { (end, begin) } else { (begin, end) };
        let width = end - begin;
        let valid = horizon.now - horizon.earliest;
        if !(width > 0.0) || width > valid {
            debug!("rejecting window [{begin}, {end}]: width {width} outside (0, {valid}]");
            return *self;
        }
        let past = (horizon.earliest - begin).max(0.0);
        let future = (end - horizon.now).max(0.0);
        let shift = past - future;
        Self {
            window: WindowMode::Fixed {
                begin: begin + shift,
                end: end + shift,
            },
            value_range: value_range.or(self.value_range),
            cursor: self.cursor,
        }
    }
    /// Shows `duration` around the middle of a fixed window without moving
    /// past its end; a live window just changes its length.
    #[must_use]
    pub fn zoom_to_duration(&self, duration: f64) -> Self {
        if !(duration > 0.0) {
            return *self;
        }
        let window = match self.window {
            WindowMode::Live { .. } => WindowMode::Live { duration },
            WindowMode::Fixed { begin, end } => {
                let mid = (begin + end) / 2.0;
                let mut a = mid - duration / 2.0;
                let mut b = mid + duration / 2.0;
                if b > end {
                    a -= b - end;
                    b = end;
                }
                WindowMode::Fixed { begin: a, end: b }
            }
        };
        Self { window, ..*self }
    }
    /// Back to a rolling window of the current length. Drops cursor and value range.
    #[must_use]
    pub fn reset_to_live(&self) -> Self {
        Self::live(self.window.duration())
    }
    /// Freezes the window at `[now - duration, now]`.
    #[must_use]
    pub fn pause(&self, horizon: &Horizon) -> Self {
        let duration = self.window.duration();
        Self {
            window: WindowMode::fixed(horizon.now - duration, horizon.now),
            ..*self
        }
    }
    #[must_use]
    pub fn with_cursor(&self, begin: Option<f64>, end: Option<f64>) -> Self {
        Self {
            cursor: Cursor { begin, end },
            ..*self
        }
    }
    #[must_use]
    pub fn clear_cursor(&self) -> Self {
        self.with_cursor(None, None)
    }
}
/// Scales `[min, max]` around `origin`. Factors above one zoom in.
pub fn zoom_at_origin(origin: f64, factor: f64, min: f64, max: f64, min_factor: f64) -> (f64, f64) {
    let z = factor.max(min_factor);
    (origin - (origin - min) / z, origin + (max - origin) / z)
}
/// Zoom factor for one mouse wheel notch; scrolling up zooms in.
pub fn wheel_zoom_factor(delta_y: f64, base: f64) -> Option<f64> {
    if delta_y < 0.0 {
        Some(base)
    } else if delta_y > 0.0 {
        Some(1.0 / base)
    } else {
        None
    }
}
/// Zoom factor for a zoom drag covering `fraction` of the plot extent.
/// Dragging across the whole plot zooms by four wheel notches.
pub fn drag_zoom_factor(fraction: f64, base: f64) -> f64 {
    (base * 4.0).powf(fraction)
}
/// Window after dragging the point under `origin` to `current`.
pub fn drag_pan(origin: f64, current: f64, min: f64, max: f64) -> (f64, f64) {
    let shift = origin - current;
    (min + shift, max + shift)
}
#[cfg(test)]
mod tests {
    use super::*;
    /// One second of history at 1 MS/s, newest sample at t = 1 s.
    fn horizon() -> Horizon {
        Horizon::new(1_000_000.0, 1e6, 1_000_000)
    }
    fn fixed(state: &ChartState) -> (f64, f64) {
        match state.window {
            WindowMode::Fixed { begin, end } => (begin, end),
            other => panic!("expected a fixed window, got {other:?}"),
        }
    }
    #[test]
    fn live_window_ends_now() {
        let span = ChartState::live(200_000.0).resolve(&horizon());
        assert_eq!(span, Span { begin: 800_000.0, end: 1_000_000.0 });
        assert_eq!(horizon().earliest, 0.0);
    }
    #[test]
    fn pan_into_the_future_is_translated() {
        let state = ChartState::live(200_000.0).pan_zoom(&horizon(), 900_000.0, 1_100_000.0, None);
        assert_eq!(fixed(&state), (800_000.0, 1_000_000.0));
    }
    #[test]
    fn pan_before_oldest_sample_is_translated() {
        let state = ChartState::live(200_000.0).pan_zoom(&horizon(), -50_000.0, 150_000.0, None);
        assert_eq!(fixed(&state), (0.0, 200_000.0));
    }
    #[test]
    fn successful_pans_keep_the_width() {
        let h = horizon();
        let mut state = ChartState::live(250_000.0);
        for begin in [-400_000.0, -10.0, 0.0, 123_456.0, 760_000.0, 990_000.0, 2e6] {
            state = state.pan_zoom(&h, begin, begin + 250_000.0, None);
            let (a, b) = fixed(&state);
            assert_eq!(b - a, 250_000.0);
            assert!(a >= h.earliest && b <= h.now);
        }
    }
    #[test]
    fn window_wider_than_history_is_rejected() {
        let before = ChartState::live(200_000.0).pan_zoom(&horizon(), 100.0, 200_100.0, None);
        let after = before.pan_zoom(&horizon(), -100_000.0, 1_200_000.0, None);
        assert_eq!(after, before);
        let empty = before.pan_zoom(&horizon(), 5.0, 5.0, None);
        assert_eq!(empty, before);
    }
    #[test]
    fn reversed_request_is_swapped() {
        let range = ValueRange { min: -1.0, max: 5.0 };
        let state = ChartState::live(1.0).pan_zoom(&horizon(), 600_000.0, 400_000.0, Some(range));
        assert_eq!(fixed(&state), (400_000.0, 600_000.0));
        assert_eq!(state.value_range, Some(range));
        let panned = state.pan_zoom(&horizon(), 500_000.0, 700_000.0, None);
        assert_eq!(panned.value_range, Some(range));
    }
    #[test]
    fn zoom_to_duration_keeps_midpoint_and_end() {
        let state = ChartState::live(1.0).pan_zoom(&horizon(), 400_000.0, 600_000.0, None);
        assert_eq!(fixed(&state.zoom_to_duration(100_000.0)), (450_000.0, 550_000.0));
        assert_eq!(fixed(&state.zoom_to_duration(400_000.0)), (200_000.0, 600_000.0));
        let live = ChartState::live(1.0).zoom_to_duration(3_000_000.0);
        assert_eq!(live.window, WindowMode::Live { duration: 3_000_000.0 });
        assert_eq!(live.zoom_to_duration(0.0), live);
    }
    #[test]
    fn pause_and_reset_round_trip() {
        let h = horizon();
        let paused = ChartState::live(200_000.0).pause(&h);
        assert_eq!(fixed(&paused), (800_000.0, 1_000_000.0));
        let selected = paused
            .pan_zoom(&h, 100_000.0, 400_000.0, Some(ValueRange { min: 0.0, max: 1.0 }))
            .with_cursor(Some(150_000.0), Some(250_000.0));
        assert!(selected.cursor.is_active());
        let live = selected.reset_to_live();
        assert_eq!(live.window, WindowMode::Live { duration: 300_000.0 });
        assert_eq!(live.value_range, None);
        assert!(!live.cursor.is_active());
    }
    #[test]
    fn cursor_is_independent_of_window() {
        let state = ChartState::live(10.0).with_cursor(Some(3.0), None);
        assert!(state.cursor.is_active());
        assert_eq!(state.window, WindowMode::Live { duration: 10.0 });
        assert_eq!(state.clear_cursor().cursor, Cursor::default());
    }
    #[test]
    fn zoom_math() {
        assert_eq!(zoom_at_origin(50.0, 2.0, 0.0, 100.0, 0.1), (25.0, 75.0));
        assert_eq!(zoom_at_origin(50.0, 0.01, 0.0, 100.0, 0.5), (-50.0, 150.0));
        assert_eq!(wheel_zoom_factor(-3.0, 1.25), Some(1.25));
        assert_eq!(wheel_zoom_factor(3.0, 1.25), Some(0.8));
        assert_eq!(wheel_zoom_factor(0.0, 1.25), None);
        assert_eq!(drag_pan(10.0, 4.0, 0.0, 100.0), (6.0, 106.0));
        assert_eq!(drag_zoom_factor(0.0, 1.25), 1.0);
        assert_eq!(drag_zoom_factor(1.0, 1.25), 5.0);
        assert_eq!(drag_zoom_factor(-0.5, 1.0), 0.5);
    }
}

/// Which logic channels the user wants to see.
#[derive(Clone, Debug, PartialEq)]
pub struct DigitalChannels {
    pub enabled: Vec<bool>,
    /// Master switch for the whole digital panel.
    pub visible: bool,
}
impl DigitalChannels {
    pub fn new(count: usize) -> Self {
        Self {
            enabled: vec![true; count],
            visible: true,
        }
    }
    pub fn count(&self) -> usize {
        self.enabled.len()
    }
    pub fn toggle(&mut self, index: usize) {
        if let Some(channel) = self.enabled.get_mut(index) {
            *channel = !*channel;
        }
    }
    pub fn is_enabled(&self, index: usize) -> bool {
        self.enabled.get(index).copied().unwrap_or(false)
    }
    /// Number of bits the accumulator should decode for a window of `window_duration` us.
    ///
    /// Long windows skip digital decoding entirely; every channel is decoded
    /// otherwise and hiding disabled ones is left to the renderer.
    pub fn channels_to_process(
        &self,
        window_duration: f64,
        bits_present: bool,
        max_window_us: f64,
    ) -> usize {
        if self.visible && bits_present && window_duration <= max_window_us {
            self.count()
        } else {
            0
        }
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn toggling_flips_one_channel() {
        let mut channels = DigitalChannels::new(8);
        channels.toggle(3);
        assert!(!channels.is_enabled(3));
        assert!(channels.is_enabled(2));
        channels.toggle(3);
        assert!(channels.is_enabled(3));
        channels.toggle(42);
        assert!(!channels.is_enabled(42));
    }
    #[test]
    fn long_windows_and_missing_bits_disable_decoding() {
        let mut channels = DigitalChannels::new(8);
        assert_eq!(channels.channels_to_process(3e6, true, 3e6), 8);
        assert_eq!(channels.channels_to_process(3e6 + 1.0, true, 3e6), 0);
        assert_eq!(channels.channels_to_process(1e3, false, 3e6), 0);
        channels.visible = false;
        assert_eq!(channels.channels_to_process(1e3, true, 3e6), 0);
    }
}

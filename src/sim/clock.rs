//! Frame timing

/// Turns animation-frame timestamps into per-frame deltas
///
/// The first frame has no predecessor and yields a zero delta.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds elapsed since the previous call
    ///
    /// A timestamp older than the previous one (clock reset) yields zero.
    pub fn tick(&mut self, timestamp: f64) -> f64 {
        let dt = match self.last {
            Some(last) => (timestamp - last).max(0.0),
            None => 0.0,
        };
        self.last = Some(timestamp);
        dt
    }

    /// Forget the previous frame, e.g. after the page was hidden
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(1234.0), 0.0);
        assert_eq!(clock.tick(1250.5), 16.5);
        assert_eq!(clock.tick(1267.0), 16.5);
    }

    #[test]
    fn test_reset_and_backwards_time() {
        let mut clock = FrameClock::new();
        clock.tick(100.0);
        assert_eq!(clock.tick(50.0), 0.0);
        clock.reset();
        assert_eq!(clock.tick(5000.0), 0.0);
    }
}

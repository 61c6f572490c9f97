//! Frame clock snapshot

/// Snapshot of the external driver's frame clock.
///
/// The scheduler advances this exactly once per tick; every other component
/// treats it as read-only. `time` is the sum of all deltas the driver has
/// delivered, so a zero or negative delta produces no forward progress.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Clock {
    /// Seconds accumulated over all ticks
    pub time: f32,
    /// `time` as of the previous tick
    pub time_old: f32,
    /// Seconds between the previous tick and this one
    pub delta_time: f32,
    /// Number of ticks delivered so far
    pub frame: u64,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `delta_time` seconds. Called once per external tick.
    pub fn advance(&mut self, delta_time: f32) {
        self.time_old = self.time;
        self.time += delta_time;
        self.delta_time = delta_time;
        self.frame += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_accumulates() {
        let mut clock = Clock::new();
        clock.advance(0.1);
        clock.advance(0.25);

        assert!((clock.time - 0.35).abs() < 1e-6);
        assert!((clock.time_old - 0.1).abs() < 1e-6);
        assert!((clock.delta_time - 0.25).abs() < 1e-6);
        assert_eq!(clock.frame, 2);
    }

    #[test]
    fn test_non_positive_delta_accepted() {
        let mut clock = Clock::new();
        clock.advance(1.0);
        clock.advance(0.0);
        clock.advance(-0.5);

        // Frames still count; time simply regresses.
        assert_eq!(clock.frame, 3);
        assert!((clock.time - 0.5).abs() < 1e-6);
    }
}

use serde::{Deserialize, Serialize};

/// Interval of allowed operation start times, in seconds from the planning origin.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    start: f64,
    end: f64,
}

impl TimeWindow {
    pub const UNBOUNDED: TimeWindow = TimeWindow {
        start: 0.0,
        end: f64::MAX,
    };

    pub fn new(start: f64, end: f64) -> Self {
        TimeWindow { start, end }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn is_satisfied(&self, arrival: f64) -> bool {
        arrival <= self.end
    }

    pub fn overtime(&self, arrival: f64) -> f64 {
        (arrival - self.end).max(0.0)
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

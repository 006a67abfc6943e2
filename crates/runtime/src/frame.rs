use foundation::time::Time;

/// Frame metadata for host-driven ticks.
///
/// The host (an animation-frame callback, or a test) supplies timestamps;
/// the frame counter and delta are derived from them so runs can be replayed.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Seconds since the previous frame (0 for the first).
    pub dt_s: f64,
    /// Host time at the start of the frame.
    pub time: Time,
}

impl Frame {
    pub fn first(time: Time) -> Self {
        Self {
            index: 0,
            dt_s: 0.0,
            time,
        }
    }

    /// Next frame at `time`. Timestamps that go backwards yield `dt_s == 0`.
    pub fn next_at(self, time: Time) -> Self {
        Self {
            index: self.index + 1,
            dt_s: time.since(self.time),
            time,
        }
    }
}

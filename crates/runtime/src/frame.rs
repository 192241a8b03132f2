use foundation::time::Time;

/// Per-frame timing handed to the animation loop.
///
/// Frames are driven by the host's render callback, so `dt_s` varies from
/// frame to frame; `time` is the sum of all previous deltas.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Seconds since the previous frame.
    pub dt_s: f64,
    /// Time at the start of the frame (seconds since the first frame).
    pub time: Time,
}

impl Default for Frame {
    fn default() -> Self {
        Self::new(0, 0.0)
    }
}

impl Frame {
    pub fn new(index: u64, dt_s: f64) -> Self {
        Self {
            index,
            dt_s,
            time: Time(index as f64 * dt_s),
        }
    }

    /// The frame after this one, `dt_s` seconds later. Negative deltas clamp to zero.
    pub fn advance(self, dt_s: f64) -> Self {
        let dt_s = dt_s.max(0.0);
        Self {
            index: self.index + 1,
            dt_s,
            time: Time(self.time.0 + self.dt_s),
        }
    }
}

use foundation::math::Vec2;
use foundation::time::Time;

pub const DEFAULT_TAP_MAX_DISTANCE_PX: f64 = 12.0;
pub const DEFAULT_TAP_MAX_DURATION_MS: f64 = 400.0;

/// One pointer event as delivered by the host.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerSample {
    pub position: Vec2,
    pub time: Time,
    pub pointer_id: i32,
    /// `false` for secondary touch contacts (e.g. the second finger of a pinch).
    pub is_primary: bool,
}

impl PointerSample {
    pub fn primary(position: Vec2, time: Time, pointer_id: i32) -> Self {
        Self {
            position,
            time,
            pointer_id,
            is_primary: true,
        }
    }
}

/// A classified click or tap.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TapEvent {
    /// Position of the pointer-up.
    pub position: Vec2,
    pub pointer_id: i32,
    pub distance_px: f64,
    pub duration_ms: f64,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TapThresholds {
    pub max_distance_px: f64,
    pub max_duration_ms: f64,
}

impl Default for TapThresholds {
    fn default() -> Self {
        Self {
            max_distance_px: DEFAULT_TAP_MAX_DISTANCE_PX,
            max_duration_ms: DEFAULT_TAP_MAX_DURATION_MS,
        }
    }
}

/// Tells taps apart from drags and pinches.
///
/// Tracks a single pending pointer-down. A pointer-up completes a tap when
/// both movement and elapsed time are strictly below the thresholds.
/// Non-primary pointers are ignored entirely; a cancel drops the pending
/// down; a new down replaces whatever was pending.
#[derive(Debug, Clone, Default)]
pub struct PointerClassifier {
    thresholds: TapThresholds,
    pending: Option<PointerSample>,
}

impl PointerClassifier {
    pub fn new(thresholds: TapThresholds) -> Self {
        Self {
            thresholds,
            pending: None,
        }
    }

    pub fn thresholds(&self) -> TapThresholds {
        self.thresholds
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn on_pointer_down(&mut self, sample: PointerSample) {
        if !sample.is_primary {
            return;
        }
        self.pending = Some(sample);
    }

    pub fn on_pointer_up(&mut self, sample: PointerSample) -> Option<TapEvent> {
        if !sample.is_primary {
            return None;
        }
        let down = self.pending?;
        if down.pointer_id != sample.pointer_id {
            return None;
        }
        self.pending = None;

        let distance_px = down.position.distance(sample.position);
        let duration_ms = sample.time.since(down.time) * 1000.0;
        let is_tap = distance_px < self.thresholds.max_distance_px
            && duration_ms < self.thresholds.max_duration_ms;
        is_tap.then_some(TapEvent {
            position: sample.position,
            pointer_id: sample.pointer_id,
            distance_px,
            duration_ms,
        })
    }

    pub fn on_pointer_cancel(&mut self) {
        self.pending = None;
    }
}

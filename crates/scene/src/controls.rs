//! Orbit camera controls with damping.
//!
//! Drags with the primary pointer rotate the camera around its target, the
//! wheel dollies in and out. Input only accumulates deltas; `update` is
//! called once per frame and eases a fraction of the pending motion into the
//! camera, so motion continues smoothly for a few frames after release.

use std::f64::consts::PI;

use foundation::math::{Vec2, Vec3};

use crate::camera::PerspectiveCamera;

/// Fraction of the pending rotation applied per frame.
pub const DEFAULT_DAMPING: f64 = 0.08;

/// Pending motion below this is dropped.
const EPS: f64 = 1e-6;

/// Keeps the camera off the poles so `up` stays well defined.
const MIN_POLAR: f64 = 1e-3;

#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    pub enabled: bool,
    pub damping: f64,
    pub min_distance: f64,
    pub max_distance: f64,
    pub target: Vec3,
    delta_theta: f64,
    delta_phi: f64,
    scale: f64,
    drag: Option<Drag>,
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct Drag {
    pointer_id: i32,
    last: Vec2,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            enabled: true,
            damping: DEFAULT_DAMPING,
            min_distance: 1.0,
            max_distance: 200.0,
            target: Vec3::ZERO,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            drag: None,
        }
    }
}

impl OrbitControls {
    pub fn new(damping: f64) -> Self {
        Self {
            damping: damping.clamp(0.0, 1.0),
            ..Self::default()
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn on_pointer_down(&mut self, pos_px: Vec2, pointer_id: i32, is_primary: bool) {
        if !self.enabled || !is_primary {
            return;
        }
        self.drag = Some(Drag {
            pointer_id,
            last: pos_px,
        });
    }

    /// Rotates by the drag delta; a full viewport height is one full turn.
    pub fn on_pointer_move(&mut self, pos_px: Vec2, pointer_id: i32, viewport_height: f64) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        if drag.pointer_id != pointer_id || viewport_height <= 0.0 {
            return;
        }
        let delta = pos_px - drag.last;
        drag.last = pos_px;

        self.delta_theta -= 2.0 * PI * delta.x / viewport_height;
        self.delta_phi -= 2.0 * PI * delta.y / viewport_height;
    }

    pub fn on_pointer_up(&mut self, pointer_id: i32) {
        if self.drag.is_some_and(|d| d.pointer_id == pointer_id) {
            self.drag = None;
        }
    }

    pub fn on_pointer_cancel(&mut self) {
        self.drag = None;
    }

    /// Positive `delta` zooms out.
    pub fn on_wheel(&mut self, delta: f64) {
        if !self.enabled {
            return;
        }
        self.scale *= (delta * 0.002).exp();
    }

    /// Eases pending motion into `camera`. Returns `true` if the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let offset = camera.position - self.target;
        let radius = offset.length();
        if radius <= 0.0 {
            return false;
        }

        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        let step_theta = self.delta_theta * self.damping;
        let step_phi = self.delta_phi * self.damping;
        theta += step_theta;
        phi = (phi + step_phi).clamp(MIN_POLAR, PI - MIN_POLAR);
        let new_radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);

        self.delta_theta -= step_theta;
        self.delta_phi -= step_phi;
        if self.delta_theta.abs() < EPS {
            self.delta_theta = 0.0;
        }
        if self.delta_phi.abs() < EPS {
            self.delta_phi = 0.0;
        }
        self.scale = 1.0;

        let sin_phi = phi.sin();
        let next = self.target
            + Vec3::new(
                new_radius * sin_phi * theta.sin(),
                new_radius * phi.cos(),
                new_radius * sin_phi * theta.cos(),
            );
        let moved = (next - camera.position).length() > EPS;
        camera.position = next;
        camera.look_at(self.target);
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::OrbitControls;
    use crate::camera::PerspectiveCamera;
    use foundation::math::{Vec2, Vec3};

    fn camera() -> PerspectiveCamera {
        let mut cam = PerspectiveCamera::new(35.0, 1.0, 0.1, 1000.0);
        cam.position = Vec3::new(0.0, 0.0, 30.0);
        cam.look_at(Vec3::ZERO);
        cam
    }

    #[test]
    fn idle_update_keeps_camera_still() {
        let mut cam = camera();
        let mut controls = OrbitControls::default();
        assert!(!controls.update(&mut cam));
        assert!((cam.position - Vec3::new(0.0, 0.0, 30.0)).length() < 1e-9);
    }

    #[test]
    fn drag_rotation_is_damped_over_frames() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(0.5);
        controls.on_pointer_down(Vec2::new(100.0, 100.0), 1, true);
        controls.on_pointer_move(Vec2::new(150.0, 100.0), 1, 600.0);
        controls.on_pointer_up(1);
        assert!(!controls.is_dragging());

        assert!(controls.update(&mut cam));
        let first = cam.position;
        assert!(controls.update(&mut cam));
        // Radius is preserved while orbiting.
        assert!((cam.position.length() - 30.0).abs() < 1e-9);
        assert!((cam.position - first).length() > 0.0);
    }

    #[test]
    fn secondary_pointers_do_not_drag() {
        let mut controls = OrbitControls::default();
        controls.on_pointer_down(Vec2::new(0.0, 0.0), 2, false);
        assert!(!controls.is_dragging());
    }

    #[test]
    fn wheel_dollies_within_limits() {
        let mut cam = camera();
        let mut controls = OrbitControls::default();
        controls.on_wheel(500.0);
        controls.update(&mut cam);
        assert!(cam.position.length() > 30.0);

        controls.on_wheel(-100_000.0);
        controls.update(&mut cam);
        assert!((cam.position.length() - controls.min_distance).abs() < 1e-9);
    }
}

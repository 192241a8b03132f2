use foundation::math::{Mat4, Vec2, Vec3, mat4_look_at_rh, mat4_perspective_rh_z0, mat4_mul};

use crate::picking::Ray;

/// Perspective camera looking at a target point.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub fov_y_deg: f64,
    pub near: f64,
    pub far: f64,
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    aspect: f64,
    projection: Mat4,
}

impl PerspectiveCamera {
    pub fn new(fov_y_deg: f64, aspect: f64, near: f64, far: f64) -> Self {
        let mut cam = Self {
            fov_y_deg,
            near,
            far,
            position: Vec3::new(0.0, 0.0, 1.0),
            target: Vec3::ZERO,
            up: Vec3::new(0.0, 1.0, 0.0),
            aspect,
            projection: [[0.0; 4]; 4],
        };
        cam.update_projection_matrix();
        cam
    }

    pub fn aspect(&self) -> f64 {
        self.aspect
    }

    /// Updates the aspect ratio and rebuilds the projection matrix.
    pub fn set_aspect(&mut self, aspect: f64) {
        self.aspect = aspect;
        self.update_projection_matrix();
    }

    pub fn update_projection_matrix(&mut self) {
        self.projection =
            mat4_perspective_rh_z0(self.fov_y_deg.to_radians(), self.aspect, self.near, self.far);
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn view_matrix(&self) -> Mat4 {
        mat4_look_at_rh(self.position, self.target, self.up)
    }

    pub fn view_proj_matrix(&self) -> Mat4 {
        mat4_mul(self.projection, self.view_matrix())
    }

    /// Ray from the eye through a point in normalized device coordinates.
    pub fn ray_through_ndc(&self, ndc: Vec2) -> Option<Ray> {
        let forward = (self.target - self.position).normalized()?;
        let right = forward.cross(self.up).normalized()?;
        let up = right.cross(forward);

        let tan_half = (0.5 * self.fov_y_deg.to_radians()).tan();
        let dir = forward
            + right.scale(ndc.x * tan_half * self.aspect)
            + up.scale(ndc.y * tan_half);
        Some(Ray::new(self.position, dir.normalized()?))
    }
}

/// Bounding rectangle of the rendering surface in page pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewportRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// The element the scene is rendered into.
///
/// The viewport may be embedded anywhere on the page, so pointer positions
/// are normalized against `rect`, not the window.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub rect: ViewportRect,
}

impl Viewport {
    /// A viewport filling the window from the top-left corner.
    pub fn full_window(width: f64, height: f64) -> Self {
        Self::embedded(0.0, 0.0, width, height)
    }

    pub fn embedded(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            rect: ViewportRect {
                left,
                top,
                width,
                height,
            },
        }
    }

    pub fn width(&self) -> f64 {
        self.rect.width
    }

    pub fn height(&self) -> f64 {
        self.rect.height
    }

    pub fn aspect(&self) -> f64 {
        self.rect.width / self.rect.height
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.rect.width = width;
        self.rect.height = height;
    }

    /// Page pixels to normalized device coordinates (`y` up).
    ///
    /// Returns `None` for a zero-sized viewport.
    pub fn to_ndc(&self, page_x: f64, page_y: f64) -> Option<Vec2> {
        if self.rect.width <= 0.0 || self.rect.height <= 0.0 {
            return None;
        }
        let x = ((page_x - self.rect.left) / self.rect.width) * 2.0 - 1.0;
        let y = -((page_y - self.rect.top) / self.rect.height) * 2.0 + 1.0;
        Some(Vec2::new(x, y))
    }
}

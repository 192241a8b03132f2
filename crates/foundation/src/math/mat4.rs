//! Column-major 4x4 matrices (`m[col][row]`), right-handed, depth range [0, 1].

use super::Vec3;

pub type Mat4 = [[f64; 4]; 4];

pub const MAT4_IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

pub fn mat4_mul(a: Mat4, b: Mat4) -> Mat4 {
    let mut c = [[0.0f64; 4]; 4];
    for col in 0..4 {
        for row in 0..4 {
            c[col][row] = a[0][row] * b[col][0]
                + a[1][row] * b[col][1]
                + a[2][row] * b[col][2]
                + a[3][row] * b[col][3];
        }
    }
    c
}

pub fn mat4_perspective_rh_z0(fov_y_rad: f64, aspect: f64, near: f64, far: f64) -> Mat4 {
    let f = 1.0 / (0.5 * fov_y_rad).tan();
    let m00 = f / aspect;
    let m11 = f;
    let m22 = far / (near - far);
    let m23 = (near * far) / (near - far);

    [
        [m00, 0.0, 0.0, 0.0],
        [0.0, m11, 0.0, 0.0],
        [0.0, 0.0, m22, -1.0],
        [0.0, 0.0, m23, 0.0],
    ]
}

pub fn mat4_look_at_rh(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    let f = (target - eye).normalized().unwrap_or(Vec3::new(0.0, 0.0, -1.0));
    let s = f.cross(up).normalized().unwrap_or(Vec3::new(1.0, 0.0, 0.0));
    let u = s.cross(f);

    let ex = -s.dot(eye);
    let ey = -u.dot(eye);
    let ez = f.dot(eye);

    [
        [s.x, u.x, -f.x, 0.0],
        [s.y, u.y, -f.y, 0.0],
        [s.z, u.z, -f.z, 0.0],
        [ex, ey, ez, 1.0],
    ]
}

/// Transforms a point and performs the perspective divide.
pub fn mat4_project_point(m: Mat4, p: Vec3) -> Option<Vec3> {
    let x = m[0][0] * p.x + m[1][0] * p.y + m[2][0] * p.z + m[3][0];
    let y = m[0][1] * p.x + m[1][1] * p.y + m[2][1] * p.z + m[3][1];
    let z = m[0][2] * p.x + m[1][2] * p.y + m[2][2] * p.z + m[3][2];
    let w = m[0][3] * p.x + m[1][3] * p.y + m[2][3] * p.z + m[3][3];
    if w.abs() < 1e-12 {
        return None;
    }
    Some(Vec3::new(x / w, y / w, z / w))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn identity_is_neutral() {
        let m = mat4_perspective_rh_z0(1.0, 1.5, 0.1, 100.0);
        assert_eq!(mat4_mul(MAT4_IDENTITY, m), m);
        assert_eq!(mat4_mul(m, MAT4_IDENTITY), m);
    }

    #[test]
    fn look_at_moves_target_onto_negative_z() {
        let view = mat4_look_at_rh(
            Vec3::new(0.0, 0.0, 30.0),
            Vec3::ZERO,
            Vec3::new(0.0, 1.0, 0.0),
        );
        let p = mat4_project_point(view, Vec3::ZERO).expect("finite");
        assert_close(p.x, 0.0, 1e-12);
        assert_close(p.y, 0.0, 1e-12);
        assert_close(p.z, -30.0, 1e-12);
    }

    #[test]
    fn perspective_maps_near_and_far_to_depth_range() {
        let proj = mat4_perspective_rh_z0(1.0, 1.0, 0.5, 50.0);
        let near = mat4_project_point(proj, Vec3::new(0.0, 0.0, -0.5)).expect("near");
        let far = mat4_project_point(proj, Vec3::new(0.0, 0.0, -50.0)).expect("far");
        assert_close(near.z, 0.0, 1e-12);
        assert_close(far.z, 1.0, 1e-12);
    }
}

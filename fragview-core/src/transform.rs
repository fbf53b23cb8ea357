//! 4x4 homogeneous transforms and rotation state
use nalgebra::{Matrix4, Point3, Vector3};

/// Rotation state around three axes (in radians)
#[derive(Debug, Clone, Copy)]
pub struct RotationState {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl RotationState {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f64, dy: f64, dz: f64) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Create a rotation matrix from a rotation state
    pub fn rotation_matrix(rotation: &RotationState) -> Matrix4<f64> {
        let rx = Matrix4::new_rotation(Vector3::new(rotation.x, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, rotation.y, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, rotation.z));

        // Apply rotations in order: Z, Y, X
        rz * ry * rx
    }

    /// Create a translation matrix
    pub fn translation_matrix(x: f64, y: f64, z: f64) -> Matrix4<f64> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    /// Create a scale matrix
    pub fn scale_matrix(sx: f64, sy: f64, sz: f64) -> Matrix4<f64> {
        Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz))
    }

    /// Create a model-view-projection matrix
    pub fn mvp_matrix(
        model: &Matrix4<f64>,
        view: &Matrix4<f64>,
        projection: &Matrix4<f64>,
    ) -> Matrix4<f64> {
        projection * view * model
    }
}

/// Apply `m` to `p` as a homogeneous point (w = 1) and divide by the
/// resulting w.
///
/// The divide is unconditional: a zero w gives infinities or NaN, which the
/// finiteness filters downstream treat as missing geometry.
pub fn project(m: &Matrix4<f64>, p: &Point3<f64>) -> Point3<f64> {
    let v = m * p.to_homogeneous();
    let inv_w = 1.0 / v.w;
    Point3::new(v.x * inv_w, v.y * inv_w, v.z * inv_w)
}

/// Camera-facing test shared by facing triangles and facing containers.
///
/// The normal is pushed through `m` as if it were a point and its depth is
/// compared with the projected local origin; +z is toward the viewer.
pub fn faces_viewer(m: &Matrix4<f64>, normal: &Vector3<f64>) -> bool {
    let origin = project(m, &Point3::origin());
    let tip = project(m, &Point3::from(*normal));
    tip.z > origin.z
}

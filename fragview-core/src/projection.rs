//! Camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3};

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// Camera configuration producing the outer transform handed to
/// `get_fragments`
pub struct Camera {
    pub position: Point3<f64>,
    pub target: Point3<f64>,
    pub up: Vector3<f64>,
    pub fov: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
    pub mode: ProjectionMode,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 5.0),
            target: Point3::new(0.0, 0.0, 0.0),
            up: Vector3::new(0.0, 1.0, 0.0),
            fov: std::f64::consts::PI / 4.0, // 45 degrees
            aspect: f64::from(width) / f64::from(height.max(1)),
            near: 0.1,
            far: 100.0,
            mode: ProjectionMode::Perspective,
        }
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f64> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f64> {
        match self.mode {
            ProjectionMode::Perspective => {
                Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let height = (self.position - self.target).norm();
                let width = height * self.aspect;
                Matrix4::new_orthographic(
                    -width / 2.0,
                    width / 2.0,
                    -height / 2.0,
                    height / 2.0,
                    self.near,
                    self.far,
                )
            }
        }
    }

    /// Map normalized device coordinates onto a `width` x `height` pixel
    /// grid with y growing downward. Depth is negated so that larger z is
    /// nearer to the viewer.
    pub fn viewport_matrix(width: u32, height: u32) -> Matrix4<f64> {
        let hw = f64::from(width) * 0.5;
        let hh = f64::from(height) * 0.5;
        Matrix4::new(
            hw, 0.0, 0.0, hw,
            0.0, -hh, 0.0, hh,
            0.0, 0.0, -1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Full scene transform: viewport * projection * view.
    ///
    /// Nothing is clipped; points behind the camera come out wherever the
    /// projection puts them.
    pub fn scene_matrix(&self, width: u32, height: u32) -> Matrix4<f64> {
        Self::viewport_matrix(width, height) * self.projection_matrix() * self.view_matrix()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::project;
    use approx::assert_relative_eq;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(800, 600);
        assert_eq!(camera.mode, ProjectionMode::Perspective);
        assert_relative_eq!(camera.aspect, 800.0 / 600.0);
    }

    #[test]
    fn test_view_matrix() {
        let camera = Camera::new(800, 600);
        let view = camera.view_matrix();
        // View matrix should be non-zero
        assert!(view.norm() > 0.0);
    }

    #[test]
    fn test_target_lands_in_screen_centre() {
        let camera = Camera::new(80, 40);
        let p = project(&camera.scene_matrix(80, 40), &camera.target);
        assert_relative_eq!(p.x, 40.0, epsilon = 1e-9);
        assert_relative_eq!(p.y, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_nearer_points_have_larger_depth() {
        let camera = Camera::new(80, 40);
        let m = camera.scene_matrix(80, 40);
        let near = project(&m, &Point3::new(0.0, 0.0, 1.0));
        let far = project(&m, &Point3::new(0.0, 0.0, -1.0));
        assert!(near.z > far.z);
    }

    #[test]
    fn test_screen_y_grows_downward() {
        let camera = Camera::new(80, 40);
        let m = camera.scene_matrix(80, 40);
        let up = project(&m, &Point3::new(0.0, 1.0, 0.0));
        let down = project(&m, &Point3::new(0.0, -1.0, 0.0));
        assert!(up.y < down.y);
    }
}

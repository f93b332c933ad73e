/// Fixed viewing camera and screen projection
use nalgebra::{Matrix4, Point3, Vector3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

impl ProjectionMode {
    pub fn toggled(self) -> Self {
        match self {
            ProjectionMode::Orthographic => ProjectionMode::Perspective,
            ProjectionMode::Perspective => ProjectionMode::Orthographic,
        }
    }
}

/// Screen-space position of a projected point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    /// Normalized device depth, smaller is closer
    pub depth: f32,
}

#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in radians
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub mode: ProjectionMode,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 4.0),
            target: Point3::origin(),
            up: Vector3::y(),
            fov: std::f32::consts::FRAC_PI_4,
            aspect: aspect_ratio(width, height),
            near: 0.1,
            far: 100.0,
            mode: ProjectionMode::Perspective,
        }
    }

    /// Track a viewport resize
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = aspect_ratio(width, height);
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        match self.mode {
            ProjectionMode::Perspective => {
                Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                // Match the perspective view's extent at the target distance
                let distance = (self.position - self.target).norm();
                let height = 2.0 * distance * (self.fov / 2.0).tan();
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

    /// Combined projection * view matrix
    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    /// Project a world-space point into a `width x height` viewport.
    ///
    /// Returns `None` for points behind the camera or outside the view volume.
    pub fn project_to_screen(
        &self,
        view_projection: &Matrix4<f32>,
        point: &Point3<f32>,
        width: u32,
        height: u32,
    ) -> Option<ScreenPoint> {
        let clip = view_projection * point.to_homogeneous();
        if clip.w <= 1e-6 {
            return None;
        }

        let ndc = clip.xyz() / clip.w;
        if ndc.x.abs() > 1.0 || ndc.y.abs() > 1.0 || ndc.z.abs() > 1.0 {
            return None;
        }

        Some(ScreenPoint {
            x: (ndc.x + 1.0) * 0.5 * width as f32,
            y: (1.0 - ndc.y) * 0.5 * height as f32,
            depth: ndc.z,
        })
    }
}

fn aspect_ratio(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(800, 600);
        assert_eq!(camera.mode, ProjectionMode::Perspective);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
        assert_eq!(camera.position, Point3::new(0.0, 0.0, 4.0));
    }

    #[test]
    fn test_zero_height_viewport() {
        let mut camera = Camera::new(80, 0);
        assert!(camera.aspect.is_finite());
        camera.resize(100, 50);
        assert!((camera.aspect - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_origin_projects_to_center() {
        for mode in [ProjectionMode::Perspective, ProjectionMode::Orthographic] {
            let mut camera = Camera::new(800, 600);
            camera.mode = mode;
            let vp = camera.view_projection();
            let p = camera.project_to_screen(&vp, &Point3::origin(), 800, 600).unwrap();
            assert!((p.x - 400.0).abs() < 1e-3, "{:?}", mode);
            assert!((p.y - 300.0).abs() < 1e-3, "{:?}", mode);
        }
    }

    #[test]
    fn test_up_is_screen_up() {
        let camera = Camera::new(800, 600);
        let vp = camera.view_projection();
        let p = camera.project_to_screen(&vp, &Point3::new(0.0, 0.5, 0.0), 800, 600).unwrap();
        assert!(p.y < 300.0);
    }

    #[test]
    fn test_point_behind_camera_is_clipped() {
        let camera = Camera::new(800, 600);
        let vp = camera.view_projection();
        assert!(camera.project_to_screen(&vp, &Point3::new(0.0, 0.0, 10.0), 800, 600).is_none());
    }

    #[test]
    fn test_toggle_mode() {
        assert_eq!(ProjectionMode::Perspective.toggled(), ProjectionMode::Orthographic);
        assert_eq!(ProjectionMode::Orthographic.toggled(), ProjectionMode::Perspective);
    }
}

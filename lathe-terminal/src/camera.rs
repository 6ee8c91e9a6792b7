/// Camera, projection and model orientation for the terminal viewer
use nalgebra::{Matrix4, Perspective3, Point3, Rotation3, Unit, Vector3};

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f32 = 0.5;

/// Auto-spin speed in radians per second (10°/s)
const SPIN_SPEED: f32 = 10.0 * std::f32::consts::PI / 180.0;

/// Model orientation: a continuous spin about `(1, 1, 0)` composed with
/// user-controlled pitch and yaw (in radians)
#[derive(Debug, Clone, Copy)]
pub struct Orientation {
    pub spin: f32,
    pub pitch: f32,
    pub yaw: f32,
}

impl Orientation {
    pub fn new(pitch: f32, yaw: f32) -> Self {
        Self {
            spin: 0.0,
            pitch,
            yaw,
        }
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dpitch: f32, dyaw: f32) {
        self.pitch += dpitch;
        self.yaw += dyaw;
    }

    /// Advance the auto-spin by `seconds`
    pub fn advance(&mut self, seconds: f32) {
        self.spin = (self.spin + SPIN_SPEED * seconds) % std::f32::consts::TAU;
    }

    pub fn rotation(&self) -> Rotation3<f32> {
        let axis = Unit::new_normalize(Vector3::new(1.0, 1.0, 0.0));
        let user = Rotation3::from_euler_angles(self.pitch, self.yaw, 0.0);
        user * Rotation3::from_axis_angle(&axis, self.spin)
    }

    /// Model matrix that centres a mesh with bounding sphere
    /// `(center, radius)` at the origin, scales it to unit size and rotates it
    pub fn model_matrix(&self, center: &Point3<f32>, radius: f32) -> Matrix4<f32> {
        let scale = if radius > f32::EPSILON { 1.0 / radius } else { 1.0 };
        self.rotation().to_homogeneous()
            * Matrix4::new_scaling(scale)
            * Matrix4::new_translation(&-center.coords)
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::new(0.3, 0.3)
    }
}

/// Perspective camera looking at the origin
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        let mut camera = Self {
            position: Point3::new(0.0, 0.0, 3.0),
            target: Point3::origin(),
            up: Vector3::y(),
            fov: std::f32::consts::PI / 4.0, // 45 degrees
            aspect: 1.0,
            near: 0.1,
            far: 100.0,
        };
        camera.resize(width, height);
        camera
    }

    /// Update the aspect ratio for a terminal of `width` × `height` cells
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 * CELL_ASPECT / height.max(1) as f32;
    }

    /// Move back along +Z until a sphere of `radius` around the target fits
    /// the narrower field of view
    pub fn frame(&mut self, radius: f32) {
        let half_fov = 0.5 * self.fov;
        let narrow = if self.aspect < 1.0 {
            (half_fov.tan() * self.aspect).atan()
        } else {
            half_fov
        };
        let distance = radius / narrow.sin() * 1.05;
        self.position = self.target + Vector3::z() * distance.max(self.near * 2.0);
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Perspective3::new(self.aspect, self.fov, self.near, self.far).to_homogeneous()
    }

    /// Combined projection × view × model matrix
    pub fn mvp_matrix(&self, model: &Matrix4<f32>) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix() * model
    }

    /// Project a model-space point to `(x, y, depth)` in screen cells.
    ///
    /// Returns `None` for points behind the camera; points outside the
    /// viewport are returned and clipped by the rasterizer.
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        mvp: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let clip = mvp * point.to_homogeneous();

        // Prevent division by near-zero depth values
        if clip.w < 1e-6 {
            return None;
        }

        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        let depth = clip.z / clip.w;

        let screen_x = (ndc_x + 1.0) * 0.5 * width as f32;
        let screen_y = (1.0 - ndc_y) * 0.5 * height as f32;

        Some((screen_x, screen_y, depth))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

use glam::{vec3, Mat4, Vec3};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub const DISTANCE: f32 = 500.0;

    pub fn new(aspect_ratio: f32) -> Self {
        Self {
            position: vec3(0.0, 0.0, Self::DISTANCE),
            target: Vec3::ZERO,
            fov: 75.0,
            aspect_ratio,
            near: 1.0,
            far: 1000.0,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov.to_radians(),
            self.aspect_ratio,
            self.near,
            self.far,
        )
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(1.0)
    }
}

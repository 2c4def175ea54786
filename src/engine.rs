use std::time::SystemTime;

use glam::{vec2, Mat4, Vec2, Vec3};
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

use crate::{
    config::FieldConfig,
    entity::Camera,
    error::EngineError,
    field::{Field, Rotation},
    window::Size,
};

/// How far the camera drifts per pixel of pointer offset.
pub const POINTER_FOLLOW: f32 = 0.5;
/// Fraction of the remaining distance the camera covers each tick.
pub const CAMERA_SMOOTHING: f32 = 0.05;

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct PointerState {
    pub offset: Vec2,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    size: Size,
    half: Vec2,
}

impl Viewport {
    pub fn new(size: Size) -> Result<Self, EngineError> {
        if size.is_empty() {
            return Err(EngineError::InvalidConfiguration(format!(
                "viewport {}x{} has a zero dimension",
                size.width, size.height
            )));
        }
        Ok(Self {
            size,
            half: vec2(size.width as f32, size.height as f32) * 0.5,
        })
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn half(&self) -> Vec2 {
        self.half
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.size.aspect_ratio()
    }

    /// Offset of a viewport position from the viewport center, in pixels.
    pub fn offset_from_center(&self, x: f64, y: f64) -> Vec2 {
        vec2(x as f32, y as f32) - self.half
    }
}

/// Owns the particle field, the camera following the pointer, and the viewport
/// the pointer is measured against.
#[derive(Debug)]
pub struct Engine {
    field: Field,
    camera: Camera,
    pointer: PointerState,
    viewport: Viewport,
    point_size: f32,
}

impl Engine {
    pub fn new(config: &FieldConfig) -> Result<Self, EngineError> {
        let seed = config.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(SystemTime::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or_default()
        });
        info!("Seeded RNG with {}", seed);

        Self::with_rng(config, &mut Pcg64Mcg::seed_from_u64(seed))
    }

    pub fn with_rng(config: &FieldConfig, rng: &mut impl Rng) -> Result<Self, EngineError> {
        config.validate()?;

        let viewport = Viewport::new(config.viewport)?;
        let field = Field::generate(rng, config.count, config.hue_range());
        info!(
            "Generated {} points, hue {:?}, size {}",
            field.len(),
            config.hue_range(),
            config.point_size
        );

        Ok(Self {
            field,
            camera: Camera::new(viewport.aspect_ratio()),
            pointer: PointerState::default(),
            viewport,
            point_size: config.point_size,
        })
    }

    /// Advances rotation to `elapsed_seconds` and moves the camera one smoothing
    /// step toward the position `pointer_offset` asks for.
    pub fn tick(&mut self, elapsed_seconds: f64, pointer_offset: Vec2) {
        self.field.rotation = Rotation::at(elapsed_seconds);

        let target = self.camera_target(pointer_offset);
        let position = &mut self.camera.position;
        position.x += (target.x - position.x) * CAMERA_SMOOTHING;
        position.y += (target.y - position.y) * CAMERA_SMOOTHING;

        self.camera.target = Vec3::ZERO;
    }

    /// Ticks with the last pointer offset seen by [`Engine::on_pointer_move`].
    pub fn update(&mut self, elapsed_seconds: f64) {
        self.tick(elapsed_seconds, self.pointer.offset);
    }

    pub fn camera_target(&self, pointer_offset: Vec2) -> Vec3 {
        Vec3::new(
            pointer_offset.x * POINTER_FOLLOW,
            -pointer_offset.y * POINTER_FOLLOW,
            Camera::DISTANCE,
        )
    }

    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        self.pointer.offset = self.viewport.offset_from_center(x, y);
    }

    /// Zero-sized viewports are rejected and the current viewport is kept.
    pub fn resize(&mut self, size: Size) -> Result<(), EngineError> {
        self.viewport = Viewport::new(size)?;
        self.camera.aspect_ratio = self.viewport.aspect_ratio();
        debug!(
            "Resized to {}x{}, aspect ratio {}",
            size.width, size.height, self.camera.aspect_ratio
        );
        Ok(())
    }

    /// Follows a host window resize. A zero-sized (minimized) window hides the
    /// field until a drawable size arrives. Returns whether the field is visible.
    pub fn fit_viewport(&mut self, size: Size) -> bool {
        match self.resize(size) {
            Ok(()) => self.set_visible(true),
            Err(e) => {
                debug!("{}", e);
                self.set_visible(false);
            }
        }
        self.field.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        if self.field.visible != visible {
            debug!("Field visible: {}", visible);
        }
        self.field.visible = visible;
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn rotation(&self) -> Rotation {
        self.field.rotation
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn point_size(&self) -> f32 {
        self.point_size
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_quat(self.field.rotation.to_quat())
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.camera.view_matrix()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.camera.projection_matrix()
    }
}

use std::time::{Duration, Instant};

use anyhow::Result;
use log::{error, info};
use winit::{dpi::PhysicalSize, window::Window};

use crate::{
    config::FieldConfig,
    engine::Engine,
    renderer::Renderer,
    window::{HasSize, Size},
};

pub struct App {
    window: Window,
    engine: Engine,
    renderer: Renderer,
    started_at: Instant,
    last_render_at: Option<Instant>,
    frame_interval: Duration,
}

impl App {
    pub async fn new(window: Window, config: &FieldConfig) -> Result<Self> {
        let mut engine = Engine::new(config)?;
        // The window may not match the requested size; a minimized one starts hidden.
        engine.fit_viewport(window.size());
        info!("{:#?}", engine.camera());

        let renderer = Renderer::new(&window, &engine, config.background).await?;

        Ok(Self {
            window,
            engine,
            renderer,
            started_at: Instant::now(),
            last_render_at: None,
            frame_interval: Duration::from_secs_f64(1.0 / config.target_frame_rate),
        })
    }

    pub fn on_resize(&mut self, size: PhysicalSize<u32>) {
        let size: Size = size.into();
        if self.engine.fit_viewport(size) {
            self.renderer.resize(size);
        }
    }

    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        self.engine.on_pointer_move(x, y);
    }

    /// Time left until the next frame is due, or `None` if it is due now.
    pub fn until_next_frame(&self) -> Option<Duration> {
        let elapsed = self.last_render_at?.elapsed();
        self.frame_interval.checked_sub(elapsed).filter(|d| !d.is_zero())
    }

    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }

    pub fn render(&mut self) {
        self.engine.update(self.started_at.elapsed().as_secs_f64());
        self.last_render_at = Some(Instant::now());

        if !self.engine.field().visible {
            return;
        }

        if let Err(e) = self.renderer.render(&self.engine) {
            error!("{:#}", e);
        }
    }
}

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::{
    color::srgb_channel_to_linear,
    renderer::{
        is_srgb,
        particle::{ParticleRenderer, ParticleRendererBuilder},
        render_target::{RenderTarget, DEPTH_TEXTURE_FORMAT},
    },
    window::{Size, Window},
    Engine,
};

pub struct Renderer {
    surface: wgpu::Surface,
    surface_format: wgpu::TextureFormat,
    surface_size: Size,
    device: wgpu::Device,
    queue: wgpu::Queue,
    depth: Option<RenderTarget>,
    particle_renderer: ParticleRenderer,
    clear_color: wgpu::Color,
}

impl Renderer {
    pub async fn new(window: &impl Window, engine: &Engine, background: [f64; 3]) -> Result<Self> {
        let instance = wgpu::Instance::new(wgpu::Backends::PRIMARY);
        let surface = unsafe { instance.create_surface(window) };

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No adapter found")?;
        info!("Using adapter {:?}", adapter.get_info());

        let surface_format = surface
            .get_preferred_format(&adapter)
            .context("No preferred format found")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default(), None)
            .await
            .context("No device found")?;

        let particle_renderer = ParticleRendererBuilder::new(engine)
            .color_target_format(surface_format)
            .depth_format(DEPTH_TEXTURE_FORMAT)
            .build(&device)?;

        let mut renderer = Self {
            surface,
            surface_format,
            surface_size: Size::default(),
            device,
            queue,
            depth: None,
            particle_renderer,
            clear_color: clear_color(background, is_srgb(surface_format)),
        };
        // A window created minimized is configured on its first real resize.
        renderer.resize(window.size());

        Ok(renderer)
    }

    fn configure_surface(
        surface: &wgpu::Surface,
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: Size,
    ) {
        surface.configure(
            device,
            &wgpu::SurfaceConfiguration {
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                format,
                width: size.width,
                height: size.height,
                present_mode: wgpu::PresentMode::Fifo,
            },
        )
    }

    /// Zero-sized surfaces cannot be configured, so those sizes are ignored.
    pub fn resize(&mut self, size: Size) {
        if size.is_empty() {
            warn!("Ignoring resize to {}x{}", size.width, size.height);
            return;
        }
        debug!("Reconfiguring surface to {}x{}", size.width, size.height);
        Self::configure_surface(&self.surface, &self.device, self.surface_format, size);
        self.surface_size = size;
        self.depth = Some(RenderTarget::depth(&self.device, size));
    }

    pub fn render(&mut self, engine: &Engine) -> Result<()> {
        if self.depth.is_none() {
            debug!("Surface not configured yet, skipping frame");
            return Ok(());
        }

        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost or outdated, reconfiguring");
                let size = self.surface_size;
                self.resize(size);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("Timed out acquiring surface texture, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(e).context("Failed to get next surface texture"),
        };

        let surface_texture_view = surface_texture.texture.create_view(&Default::default());
        let depth = self.depth.as_ref().context("No depth target")?;

        self.particle_renderer.update(&self.queue, engine);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Particle Command Encoder"),
            });

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Particle Render Pass"),
                color_attachments: &[wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: true,
                    },
                }],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &depth.texture_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: false,
                    }),
                    stencil_ops: None,
                }),
            });
            self.particle_renderer.draw(&mut rpass);
        }

        self.queue.submit(Some(encoder.finish()));

        surface_texture.present();

        Ok(())
    }
}

/// Background colors are sRGB, like CSS colors; sRGB targets need them decoded.
fn clear_color([r, g, b]: [f64; 3], srgb: bool) -> wgpu::Color {
    let decode = |c: f64| {
        if srgb {
            srgb_channel_to_linear(c as f32) as f64
        } else {
            c
        }
    };
    wgpu::Color {
        r: decode(r),
        g: decode(g),
        b: decode(b),
        a: 1.0,
    }
}

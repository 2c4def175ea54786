use std::time::Instant;

use anyhow::{Context, Result};
use log::{info, trace};
use particle_field::{app::App, FieldConfig};
use pollster::FutureExt as _;
use winit::{
    dpi::LogicalSize,
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

fn main() -> Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(arg) => FieldConfig::from_arg(&arg)
            .with_context(|| format!("Failed to load configuration from {:?}", arg))?,
        None => FieldConfig::default(),
    };
    info!("{:#?}", config);

    let event_loop = EventLoop::new();

    let window = WindowBuilder::new()
        .with_title(&config.window_title)
        .with_inner_size(LogicalSize::<u32> {
            width: config.viewport.width,
            height: config.viewport.height,
        })
        .build(&event_loop)
        .context("Failed to build window")?;

    let mut app = App::new(window, &config).block_on()?;

    event_loop.run(move |e, _, control_flow| {
        trace!("{:?}", e);

        match e {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,
                WindowEvent::Resized(size) => app.on_resize(size),
                WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                    app.on_resize(*new_inner_size)
                }
                WindowEvent::CursorMoved { position, .. } => {
                    app.on_pointer_move(position.x, position.y)
                }
                _ => (),
            },
            Event::MainEventsCleared => match app.until_next_frame() {
                Some(wait) => *control_flow = ControlFlow::WaitUntil(Instant::now() + wait),
                None => app.request_redraw(),
            },
            Event::RedrawRequested(..) => app.render(),
            _ => (),
        }
    });
}

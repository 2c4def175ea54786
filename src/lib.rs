pub mod app;
pub mod color;
pub mod config;
pub mod engine;
pub mod entity;
pub mod error;
pub mod field;
pub mod renderer;
pub mod window;

pub use config::FieldConfig;
pub use engine::{Engine, PointerState, Viewport};
pub use error::{ConfigError, EngineError};
pub use field::{Field, Point, Rotation};

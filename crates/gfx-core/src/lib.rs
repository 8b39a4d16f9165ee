pub mod backend;
pub mod config;
pub mod facade;
pub mod types;
pub mod viewport;

pub use backend::{DrawTarget, RenderContext2d};
pub use config::{ConfigError, SurfaceConfig};
pub use facade::Gfx;
pub use types::*;
pub use viewport::{
    DisplaySurface, ResizeChannel, ResizeHandler, ResizeHub, ViewportSize, ViewportSync,
};

// Re-export kurbo's transform so backends don't need a direct dependency
pub use kurbo::Affine;

//! Headless backend for `gfx-core`.
//!
//! `HeadlessCanvas` hands out a `HeadlessContext` that tracks context
//! state and logs every forwarded call, for hosts without a browser and
//! for tests.

pub mod canvas;
pub mod context;
pub mod error;
pub mod path;
pub mod pixels;

pub use canvas::HeadlessCanvas;
pub use context::{Arg, Call, DrawState, HeadlessContext, HeadlessElement, HeadlessGradient};
pub use error::HeadlessError;
pub use path::HeadlessPath;
pub use pixels::ImageData;

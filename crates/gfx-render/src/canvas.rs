//! `HeadlessCanvas`: an in-memory drawable target.

use crate::context::HeadlessContext;
use gfx_core::{ContextOptions, DisplaySurface, DrawTarget, ViewportSize};
use std::cell::Cell;
use std::rc::Rc;

/// A canvas with a fixed bitmap size and a displayed size that the
/// viewport sync can change.
///
/// Clones share the displayed size.
#[derive(Debug, Clone)]
pub struct HeadlessCanvas {
    width: u32,
    height: u32,
    available: bool,
    display: Rc<Cell<Option<ViewportSize>>>,
}

impl HeadlessCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            available: true,
            display: Rc::new(Cell::new(None)),
        }
    }

    /// A canvas whose context request fails; it hands out a lost context.
    pub fn unavailable(width: u32, height: u32) -> Self {
        Self {
            available: false,
            ..Self::new(width, height)
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Displayed size, `None` until something sets it.
    pub fn display_size(&self) -> Option<ViewportSize> {
        self.display.get()
    }
}

impl DrawTarget for HeadlessCanvas {
    type Context = HeadlessContext;

    fn get_context_2d(&self, options: &ContextOptions) -> HeadlessContext {
        if !self.available {
            log::warn!("headless: 2D context unavailable, handing out a lost context");
            return HeadlessContext::lost(options);
        }
        HeadlessContext::new(self.width, self.height, options)
    }
}

impl DisplaySurface for HeadlessCanvas {
    fn set_display_size(&self, size: ViewportSize) {
        self.display.set(Some(size));
    }
}

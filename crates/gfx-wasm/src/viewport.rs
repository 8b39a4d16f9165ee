//! Window resize channel.

use gfx_core::{ResizeChannel, ResizeHandler, ViewportSize};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Window;

/// Resize notifications from the window's `resize` event.
pub struct WindowResize {
    window: Window,
}

/// A live `resize` listener. Dropping it without unsubscribing leaves the
/// listener pointing at a freed closure, so always hand it back.
pub struct ResizeListener {
    closure: Closure<dyn FnMut()>,
}

impl WindowResize {
    pub fn new(window: Window) -> Self {
        Self { window }
    }

    /// Channel for the global `window`, if there is one.
    pub fn global() -> Option<Self> {
        web_sys::window().map(Self::new)
    }
}

/// Inner size of `window`, zero for dimensions the host fails to report.
pub(crate) fn inner_size(window: &Window) -> ViewportSize {
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    ViewportSize::new(dim(window.inner_width()), dim(window.inner_height()))
}

impl ResizeChannel for WindowResize {
    type Registration = ResizeListener;

    fn current_size(&self) -> ViewportSize {
        inner_size(&self.window)
    }

    fn subscribe(&mut self, mut handler: ResizeHandler) -> ResizeListener {
        let window = self.window.clone();
        let closure = Closure::<dyn FnMut()>::new(move || handler(inner_size(&window)));
        if let Err(e) = self
            .window
            .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
        {
            log::error!("gfx: could not listen for window resize: {e:?}");
        }
        ResizeListener { closure }
    }

    fn unsubscribe(&mut self, registration: ResizeListener) {
        if let Err(e) = self.window.remove_event_listener_with_callback(
            "resize",
            registration.closure.as_ref().unchecked_ref(),
        ) {
            log::warn!("gfx: could not remove resize listener: {e:?}");
        }
    }
}

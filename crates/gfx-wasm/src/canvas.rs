//! `WebCanvas`: a `<canvas>` element as a draw target and display surface.

use crate::context::WebContext;
use gfx_core::{ContextOptions, DisplaySurface, DrawTarget, ViewportSize};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// Handle to a canvas element. Clones refer to the same element.
#[derive(Debug, Clone)]
pub struct WebCanvas {
    element: HtmlCanvasElement,
}

impl WebCanvas {
    pub fn new(element: HtmlCanvasElement) -> Self {
        Self { element }
    }

    pub fn element(&self) -> &HtmlCanvasElement {
        &self.element
    }
}

impl From<HtmlCanvasElement> for WebCanvas {
    fn from(element: HtmlCanvasElement) -> Self {
        Self::new(element)
    }
}

fn context_attributes(options: &ContextOptions) -> js_sys::Object {
    let attrs = js_sys::Object::new();
    for (key, value) in [
        ("alpha", options.alpha),
        ("desynchronized", options.desynchronized),
        ("willReadFrequently", options.will_read_frequently),
    ] {
        if let Err(e) = js_sys::Reflect::set(&attrs, &JsValue::from_str(key), &value.into()) {
            log::warn!("gfx: could not set context attribute {key}: {e:?}");
        }
    }
    attrs
}

impl DrawTarget for WebCanvas {
    type Context = WebContext;

    /// Request `getContext("2d", options)`.
    ///
    /// On failure the returned context wraps the failure value (`null` or
    /// the thrown exception) unchecked; calls on it throw in the browser.
    fn get_context_2d(&self, options: &ContextOptions) -> WebContext {
        let ctx = match self
            .element
            .get_context_with_context_options("2d", &context_attributes(options))
        {
            Ok(Some(obj)) => obj.unchecked_into::<CanvasRenderingContext2d>(),
            Ok(None) => {
                log::error!("gfx: canvas has no 2D context");
                JsValue::NULL.unchecked_into()
            }
            Err(e) => {
                log::error!("gfx: getContext(\"2d\") threw: {e:?}");
                e.unchecked_into()
            }
        };
        WebContext::new(ctx)
    }
}

pub(crate) fn css_px(value: f64) -> String {
    format!("{value}px")
}

impl DisplaySurface for WebCanvas {
    /// Set the CSS box; the bitmap size (`width`/`height` attributes) is
    /// left alone.
    fn set_display_size(&self, size: ViewportSize) {
        let style = self.element.style();
        for (prop, value) in [("width", size.width), ("height", size.height)] {
            if let Err(e) = style.set_property(prop, &css_px(value)) {
                log::warn!("gfx: could not set canvas {prop}: {e:?}");
            }
        }
    }
}

//! Browser bridge for gfx: canvas element backend plus page glue.
//!
//! Compiled via `wasm-pack build --target web`.

mod canvas;
mod context;
mod viewport;

pub use canvas::WebCanvas;
pub use context::{WebContext, WebImage};
pub use viewport::{ResizeListener, WindowResize};

use gfx_core::{Gfx, SurfaceConfig, ViewportSync};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

/// Look up a `<canvas>` by element id.
pub fn canvas_by_id(canvas_id: &str) -> Result<HtmlCanvasElement, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| JsValue::from_str(&format!("no element with id `{canvas_id}`")))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| JsValue::from_str(&format!("`{canvas_id}` is not a canvas")))
}

/// Open a facade over the canvas with id `canvas_id`.
///
/// `config_json` is `{"width": .., "height": ..}`, the declared drawing size.
pub fn open_surface(canvas_id: &str, config_json: &str) -> Result<Gfx<WebCanvas>, JsValue> {
    console_error_panic_hook_setup();
    let config =
        SurfaceConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(Gfx::new(WebCanvas::new(canvas_by_id(canvas_id)?), config))
}

// ─── Viewport glue ───────────────────────────────────────────────────────

/// Keeps a canvas's CSS size equal to the window's inner size.
///
/// Listening stops on `detach` or when JS frees the object.
#[wasm_bindgen]
pub struct CanvasViewport {
    sync: ViewportSync<WindowResize, WebCanvas>,
}

#[wasm_bindgen]
impl CanvasViewport {
    pub fn attach(&mut self) {
        self.sync.attach();
    }

    pub fn detach(&mut self) {
        self.sync.detach();
    }

    #[wasm_bindgen(js_name = isAttached)]
    pub fn is_attached(&self) -> bool {
        self.sync.is_attached()
    }

    /// Resize to the current window size without waiting for an event.
    #[wasm_bindgen(js_name = syncNow)]
    pub fn sync_now(&mut self) {
        self.sync.sync_now();
    }
}

/// Resize the canvas with id `canvas_id` to the window on every window
/// resize. The first resize happens on the first event.
#[wasm_bindgen(js_name = maximizeCanvas)]
pub fn maximize_canvas(canvas_id: &str) -> Result<CanvasViewport, JsValue> {
    console_error_panic_hook_setup();
    let canvas = WebCanvas::new(canvas_by_id(canvas_id)?);
    let channel = WindowResize::global().ok_or_else(|| JsValue::from_str("no window"))?;
    let mut sync = ViewportSync::new(channel, canvas);
    sync.attach();
    log::debug!("gfx: maximizing canvas `{canvas_id}`");
    Ok(CanvasViewport { sync })
}

// ─── Standalone validation ───────────────────────────────────────────────

/// Validate a surface config. Returns JSON: `{"ok":true}` or
/// `{"ok":false,"error":"..."}`.
#[wasm_bindgen(js_name = validateSurfaceConfig)]
pub fn validate_surface_config(json: &str) -> String {
    validation_report(SurfaceConfig::from_json(json).map(|_| ()))
}

fn validation_report(result: Result<(), gfx_core::ConfigError>) -> String {
    let report = match result {
        Ok(()) => serde_json::json!({ "ok": true }),
        Err(e) => serde_json::json!({ "ok": false, "error": e.to_string() }),
    };
    report.to_string()
}

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("gfx WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

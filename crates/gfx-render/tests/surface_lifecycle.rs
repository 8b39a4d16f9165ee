//! Integration tests: clear-region defaults, chaining order, context
//! acquisition, and viewport sync against the headless canvas.

use gfx_core::viewport::{ResizeHub, ViewportSize, ViewportSync};
use gfx_core::{Gfx, Region, SurfaceConfig};
use gfx_render::pixels::OPAQUE_BLACK;
use gfx_render::{Call, HeadlessCanvas, HeadlessError, ImageData};
use pretty_assertions::assert_eq;

const WHITE: [u8; 4] = [255, 255, 255, 255];

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn ops(calls: &[Call]) -> Vec<String> {
    calls.iter().map(ToString::to_string).collect()
}

/// 800x600 facade whose bitmap has been painted white.
fn white_surface() -> Gfx<HeadlessCanvas> {
    let mut gfx = Gfx::new(HeadlessCanvas::new(800, 600), SurfaceConfig::new(800.0, 600.0));
    gfx.put_image_data(&ImageData::filled(800, 600, WHITE), 0.0, 0.0, None)
        .unwrap();
    gfx.ctx_mut().take_calls();
    gfx
}

// ─── clear_rect ─────────────────────────────────────────────────────────

#[test]
fn clear_without_region_clears_declared_surface() {
    init_logging();
    let mut gfx = white_surface();
    gfx.clear_rect(None);

    assert_eq!(ops(gfx.ctx().calls()), vec!["clearRect(0, 0, 800, 600)"]);
    let bitmap = gfx.ctx().bitmap();
    for (x, y) in [(0, 0), (799, 0), (0, 599), (799, 599), (400, 300)] {
        assert_eq!(bitmap.pixel(x, y), OPAQUE_BLACK, "pixel ({x}, {y})");
    }
}

#[test]
fn clear_with_region_clears_only_that_region() {
    let mut gfx = white_surface();
    gfx.clear_rect(Some(Region::new(10.0, 20.0, 30.0, 40.0)));

    assert_eq!(ops(gfx.ctx().calls()), vec!["clearRect(10, 20, 30, 40)"]);
    let bitmap = gfx.ctx().bitmap();
    assert_eq!(bitmap.pixel(10, 20), OPAQUE_BLACK);
    assert_eq!(bitmap.pixel(39, 59), OPAQUE_BLACK);
    assert_eq!(bitmap.pixel(40, 59), WHITE);
    assert_eq!(bitmap.pixel(39, 60), WHITE);
    assert_eq!(bitmap.pixel(9, 20), WHITE);
}

#[test]
fn default_clear_uses_declared_size_not_bitmap_size() {
    let mut gfx = Gfx::new(HeadlessCanvas::new(200, 200), SurfaceConfig::new(100.0, 50.0));
    gfx.put_image_data(&ImageData::filled(200, 200, WHITE), 0.0, 0.0, None)
        .unwrap();
    gfx.clear_rect(None);

    let bitmap = gfx.ctx().bitmap();
    assert_eq!(bitmap.pixel(99, 49), OPAQUE_BLACK);
    assert_eq!(bitmap.pixel(100, 49), WHITE);
    assert_eq!(bitmap.pixel(99, 50), WHITE);
}

#[test]
fn default_clear_goes_through_current_transform() {
    let mut gfx = white_surface();
    gfx.translate(700.0, 500.0).unwrap().clear_rect(None);

    let bitmap = gfx.ctx().bitmap();
    assert_eq!(bitmap.pixel(699, 499), WHITE);
    assert_eq!(bitmap.pixel(700, 500), OPAQUE_BLACK);
}

// ─── Chaining ───────────────────────────────────────────────────────────

#[test]
fn chain_executes_in_listed_order() -> Result<(), HeadlessError> {
    let mut gfx = Gfx::new(HeadlessCanvas::new(64, 64), SurfaceConfig::new(64.0, 64.0));
    let start: *const Gfx<HeadlessCanvas> = &gfx;
    let end: *const Gfx<HeadlessCanvas> = gfx
        .save()
        .translate(5.0, 5.0)?
        .begin_path()
        .move_to(0.0, 0.0)
        .line_to(10.0, 10.0)
        .stroke(None)
        .restore();

    assert!(std::ptr::eq(start, end));
    assert_eq!(
        ops(gfx.ctx().calls()),
        vec![
            "save()",
            "translate(5, 5)",
            "beginPath()",
            "moveTo(0, 0)",
            "lineTo(10, 10)",
            "stroke(-)",
            "restore()",
        ]
    );
    // restore() popped the translation; the path kept its device points.
    assert_eq!(gfx.get_transform()?, gfx_core::Affine::IDENTITY);
    assert!(gfx.is_point_in_stroke(None, 10.0, 10.0));
    Ok(())
}

// ─── Context acquisition ────────────────────────────────────────────────

#[test]
fn facade_is_opaque() {
    let gfx = Gfx::new(HeadlessCanvas::new(8, 8), SurfaceConfig::new(8.0, 8.0));
    assert!(!gfx.get_context_attributes().unwrap().alpha);
    assert_eq!(gfx.ctx().bitmap().pixel(0, 0), OPAQUE_BLACK);
}

#[test]
fn unavailable_target_still_yields_a_facade() {
    init_logging();
    let mut gfx = Gfx::new(
        HeadlessCanvas::unavailable(8, 8),
        SurfaceConfig::new(8.0, 8.0),
    );
    assert!(gfx.is_context_lost());
    assert_eq!(gfx.width(), 8.0);

    // Infallible calls are swallowed by the lost context, fallible ones
    // surface its error untouched.
    gfx.clear_rect(None).fill_rect(0.0, 0.0, 1.0, 1.0);
    assert!(gfx.ctx().calls().is_empty());
    assert!(matches!(
        gfx.scale(2.0, 2.0).err(),
        Some(HeadlessError::InvalidState(_))
    ));
}

// ─── Viewport sync ──────────────────────────────────────────────────────

#[test]
fn viewport_sync_resizes_canvas_until_detached() {
    init_logging();
    let hub = ResizeHub::new(ViewportSize::new(1280.0, 720.0));
    let canvas = HeadlessCanvas::new(800, 600);
    let gfx = Gfx::new(canvas.clone(), SurfaceConfig::new(800.0, 600.0));

    let mut sync = ViewportSync::new(hub.clone(), canvas.clone());
    sync.attach();
    assert_eq!(canvas.display_size(), None);

    hub.notify(ViewportSize::new(1024.0, 768.0));
    assert_eq!(gfx.target().display_size(), Some(ViewportSize::new(1024.0, 768.0)));

    sync.detach();
    hub.notify(ViewportSize::new(320.0, 240.0));
    assert_eq!(canvas.display_size(), Some(ViewportSize::new(1024.0, 768.0)));

    // The declared drawing size never follows the display size.
    assert_eq!((gfx.width(), gfx.height()), (800.0, 600.0));
}

#[test]
fn dropping_sync_unregisters_handler() {
    let hub = ResizeHub::new(ViewportSize::default());
    {
        let mut sync = ViewportSync::new(hub.clone(), HeadlessCanvas::new(1, 1));
        sync.attach();
        assert_eq!(hub.handler_count(), 1);
    }
    assert_eq!(hub.handler_count(), 0);
}

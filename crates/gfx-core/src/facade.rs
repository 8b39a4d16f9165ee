//! `Gfx`: a chainable wrapper around a 2D rendering context.
//!
//! Every method forwards its arguments unchanged to the operation of the
//! same name on the owned context. Drawing and state operations return the
//! facade so calls chain; queries return the context's result directly.
//!
//! ```ignore
//! gfx.save()
//!     .translate(5.0, 5.0)?
//!     .begin_path()
//!     .move_to(0.0, 0.0)
//!     .line_to(10.0, 10.0)
//!     .stroke(None)
//!     .restore();
//! ```

use crate::backend::{DrawTarget, RenderContext2d};
use crate::config::SurfaceConfig;
use crate::types::{
    ContextAttributes, ContextOptions, FillRule, ImagePlacement, Region, Repetition, TextMetrics,
};
use kurbo::Affine;

/// The context type a target hands out.
pub type Ctx<T> = <T as DrawTarget>::Context;
/// Error type of a target's context.
pub type CtxError<T> = <Ctx<T> as RenderContext2d>::Error;
pub type CtxPath<T> = <Ctx<T> as RenderContext2d>::Path;
pub type CtxImage<T> = <Ctx<T> as RenderContext2d>::Image;
pub type CtxElement<T> = <Ctx<T> as RenderContext2d>::Element;
pub type CtxGradient<T> = <Ctx<T> as RenderContext2d>::Gradient;
pub type CtxPattern<T> = <Ctx<T> as RenderContext2d>::Pattern;
pub type CtxImageData<T> = <Ctx<T> as RenderContext2d>::ImageData;

/// Chainable drawing surface.
///
/// Holds the target, the declared logical size, and the one context
/// acquired from the target at construction.
pub struct Gfx<T: DrawTarget> {
    target: T,
    width: f64,
    height: f64,
    ctx: Ctx<T>,
}

impl<T: DrawTarget> Gfx<T> {
    /// Wrap `target`, acquiring an opaque 2D context from it.
    ///
    /// Never fails: a target that cannot produce a context hands back its
    /// own failure value, and that value becomes the context.
    pub fn new(target: T, config: SurfaceConfig) -> Self {
        let ctx = target.get_context_2d(&ContextOptions::opaque());
        log::debug!(
            "gfx: wrapped 2D context for {}x{} surface",
            config.width,
            config.height
        );
        Self {
            target,
            width: config.width,
            height: config.height,
            ctx,
        }
    }

    /// Declared logical width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Declared logical height.
    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    /// The wrapped context, for properties (fill style, font, line width)
    /// that are not method calls.
    pub fn ctx(&self) -> &Ctx<T> {
        &self.ctx
    }

    pub fn ctx_mut(&mut self) -> &mut Ctx<T> {
        &mut self.ctx
    }

    // ─── State ──────────────────────────────────────────────────────────

    pub fn save(&mut self) -> &mut Self {
        self.ctx.save();
        self
    }

    pub fn restore(&mut self) -> &mut Self {
        self.ctx.restore();
        self
    }

    pub fn reset(&mut self) -> Result<&mut Self, CtxError<T>> {
        self.ctx.reset()?;
        Ok(self)
    }

    pub fn is_context_lost(&self) -> bool {
        self.ctx.is_context_lost()
    }

    pub fn get_context_attributes(&self) -> Result<ContextAttributes, CtxError<T>> {
        self.ctx.get_context_attributes()
    }

    // ─── Transforms ─────────────────────────────────────────────────────

    pub fn scale(&mut self, x: f64, y: f64) -> Result<&mut Self, CtxError<T>> {
        self.ctx.scale(x, y)?;
        Ok(self)
    }

    pub fn rotate(&mut self, angle: f64) -> Result<&mut Self, CtxError<T>> {
        self.ctx.rotate(angle)?;
        Ok(self)
    }

    pub fn translate(&mut self, x: f64, y: f64) -> Result<&mut Self, CtxError<T>> {
        self.ctx.translate(x, y)?;
        Ok(self)
    }

    pub fn transform(
        &mut self,
        a: f64,
        b: f64,
        c: f64,
        d: f64,
        e: f64,
        f: f64,
    ) -> Result<&mut Self, CtxError<T>> {
        self.ctx.transform(a, b, c, d, e, f)?;
        Ok(self)
    }

    pub fn set_transform(
        &mut self,
        a: f64,
        b: f64,
        c: f64,
        d: f64,
        e: f64,
        f: f64,
    ) -> Result<&mut Self, CtxError<T>> {
        self.ctx.set_transform(a, b, c, d, e, f)?;
        Ok(self)
    }

    pub fn get_transform(&self) -> Result<Affine, CtxError<T>> {
        self.ctx.get_transform()
    }

    pub fn reset_transform(&mut self) -> Result<&mut Self, CtxError<T>> {
        self.ctx.reset_transform()?;
        Ok(self)
    }

    // ─── Line dash ──────────────────────────────────────────────────────

    pub fn set_line_dash(&mut self, segments: &[f64]) -> Result<&mut Self, CtxError<T>> {
        self.ctx.set_line_dash(segments)?;
        Ok(self)
    }

    pub fn get_line_dash(&self) -> Vec<f64> {
        self.ctx.get_line_dash()
    }

    // ─── Rectangles ─────────────────────────────────────────────────────

    /// Clear `region`, or the whole declared surface when `region` is
    /// `None`.
    pub fn clear_rect(&mut self, region: Option<Region>) -> &mut Self {
        let Region {
            x,
            y,
            width,
            height,
        } = region.unwrap_or(Region::new(0.0, 0.0, self.width, self.height));
        self.ctx.clear_rect(x, y, width, height);
        self
    }

    pub fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        self.ctx.fill_rect(x, y, width, height);
        self
    }

    pub fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        self.ctx.stroke_rect(x, y, width, height);
        self
    }

    // ─── Path construction ──────────────────────────────────────────────

    pub fn begin_path(&mut self) -> &mut Self {
        self.ctx.begin_path();
        self
    }

    pub fn close_path(&mut self) -> &mut Self {
        self.ctx.close_path();
        self
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.ctx.move_to(x, y);
        self
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.ctx.line_to(x, y);
        self
    }

    pub fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64) -> &mut Self {
        self.ctx.quadratic_curve_to(cpx, cpy, x, y);
        self
    }

    pub fn bezier_curve_to(
        &mut self,
        cp1x: f64,
        cp1y: f64,
        cp2x: f64,
        cp2y: f64,
        x: f64,
        y: f64,
    ) -> &mut Self {
        self.ctx.bezier_curve_to(cp1x, cp1y, cp2x, cp2y, x, y);
        self
    }

    pub fn arc_to(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        radius: f64,
    ) -> Result<&mut Self, CtxError<T>> {
        self.ctx.arc_to(x1, y1, x2, y2, radius)?;
        Ok(self)
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        self.ctx.rect(x, y, width, height);
        self
    }

    pub fn round_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        radii: Option<&[f64]>,
    ) -> Result<&mut Self, CtxError<T>> {
        self.ctx.round_rect(x, y, width, height, radii)?;
        Ok(self)
    }

    pub fn arc(
        &mut self,
        x: f64,
        y: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        anticlockwise: bool,
    ) -> Result<&mut Self, CtxError<T>> {
        self.ctx
            .arc(x, y, radius, start_angle, end_angle, anticlockwise)?;
        Ok(self)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn ellipse(
        &mut self,
        x: f64,
        y: f64,
        radius_x: f64,
        radius_y: f64,
        rotation: f64,
        start_angle: f64,
        end_angle: f64,
        anticlockwise: bool,
    ) -> Result<&mut Self, CtxError<T>> {
        self.ctx.ellipse(
            x,
            y,
            radius_x,
            radius_y,
            rotation,
            start_angle,
            end_angle,
            anticlockwise,
        )?;
        Ok(self)
    }

    // ─── Path drawing ───────────────────────────────────────────────────

    pub fn fill(&mut self, path: Option<&CtxPath<T>>, rule: FillRule) -> &mut Self {
        self.ctx.fill(path, rule);
        self
    }

    pub fn stroke(&mut self, path: Option<&CtxPath<T>>) -> &mut Self {
        self.ctx.stroke(path);
        self
    }

    pub fn clip(&mut self, path: Option<&CtxPath<T>>, rule: FillRule) -> &mut Self {
        self.ctx.clip(path, rule);
        self
    }

    pub fn draw_focus_if_needed(
        &mut self,
        path: Option<&CtxPath<T>>,
        element: &CtxElement<T>,
    ) -> &mut Self {
        self.ctx.draw_focus_if_needed(path, element);
        self
    }

    pub fn is_point_in_path(
        &self,
        path: Option<&CtxPath<T>>,
        x: f64,
        y: f64,
        rule: FillRule,
    ) -> bool {
        self.ctx.is_point_in_path(path, x, y, rule)
    }

    pub fn is_point_in_stroke(&self, path: Option<&CtxPath<T>>, x: f64, y: f64) -> bool {
        self.ctx.is_point_in_stroke(path, x, y)
    }

    // ─── Text ───────────────────────────────────────────────────────────

    pub fn fill_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        max_width: Option<f64>,
    ) -> Result<&mut Self, CtxError<T>> {
        self.ctx.fill_text(text, x, y, max_width)?;
        Ok(self)
    }

    pub fn stroke_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        max_width: Option<f64>,
    ) -> Result<&mut Self, CtxError<T>> {
        self.ctx.stroke_text(text, x, y, max_width)?;
        Ok(self)
    }

    pub fn measure_text(&self, text: &str) -> Result<TextMetrics, CtxError<T>> {
        self.ctx.measure_text(text)
    }

    // ─── Images and pixels ──────────────────────────────────────────────

    pub fn draw_image(
        &mut self,
        image: &CtxImage<T>,
        placement: ImagePlacement,
    ) -> Result<&mut Self, CtxError<T>> {
        self.ctx.draw_image(image, placement)?;
        Ok(self)
    }

    pub fn create_image_data(
        &self,
        width: f64,
        height: f64,
    ) -> Result<CtxImageData<T>, CtxError<T>> {
        self.ctx.create_image_data(width, height)
    }

    pub fn get_image_data(
        &self,
        sx: f64,
        sy: f64,
        sw: f64,
        sh: f64,
    ) -> Result<CtxImageData<T>, CtxError<T>> {
        self.ctx.get_image_data(sx, sy, sw, sh)
    }

    pub fn put_image_data(
        &mut self,
        data: &CtxImageData<T>,
        dx: f64,
        dy: f64,
        dirty: Option<Region>,
    ) -> Result<&mut Self, CtxError<T>> {
        self.ctx.put_image_data(data, dx, dy, dirty)?;
        Ok(self)
    }

    // ─── Paint servers ──────────────────────────────────────────────────

    pub fn create_linear_gradient(&self, x0: f64, y0: f64, x1: f64, y1: f64) -> CtxGradient<T> {
        self.ctx.create_linear_gradient(x0, y0, x1, y1)
    }

    pub fn create_radial_gradient(
        &self,
        x0: f64,
        y0: f64,
        r0: f64,
        x1: f64,
        y1: f64,
        r1: f64,
    ) -> Result<CtxGradient<T>, CtxError<T>> {
        self.ctx.create_radial_gradient(x0, y0, r0, x1, y1, r1)
    }

    pub fn create_conic_gradient(
        &self,
        start_angle: f64,
        x: f64,
        y: f64,
    ) -> Result<CtxGradient<T>, CtxError<T>> {
        self.ctx.create_conic_gradient(start_angle, x, y)
    }

    pub fn create_pattern(
        &self,
        image: &CtxImage<T>,
        repetition: Repetition,
    ) -> Result<Option<CtxPattern<T>>, CtxError<T>> {
        self.ctx.create_pattern(image, repetition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::ptr;

    /// Logs every call by name and arguments.
    #[derive(Default)]
    struct Spy {
        calls: Vec<String>,
        options: ContextOptions,
        acquired: bool,
    }

    impl Spy {
        fn log(&mut self, call: String) {
            self.calls.push(call);
        }
    }

    struct SpyTarget {
        available: bool,
    }

    impl DrawTarget for SpyTarget {
        type Context = Spy;

        fn get_context_2d(&self, options: &ContextOptions) -> Spy {
            Spy {
                options: *options,
                acquired: self.available,
                ..Spy::default()
            }
        }
    }

    impl RenderContext2d for Spy {
        type Error = String;
        type Path = &'static str;
        type Image = &'static str;
        type Element = &'static str;
        type Gradient = String;
        type Pattern = String;
        type ImageData = (f64, f64);

        fn save(&mut self) {
            self.log("save".into());
        }
        fn restore(&mut self) {
            self.log("restore".into());
        }
        fn reset(&mut self) -> Result<(), String> {
            self.log("reset".into());
            Ok(())
        }
        fn is_context_lost(&self) -> bool {
            !self.acquired
        }
        fn get_context_attributes(&self) -> Result<ContextAttributes, String> {
            Ok(self.options.into())
        }
        fn scale(&mut self, x: f64, y: f64) -> Result<(), String> {
            self.log(format!("scale({x}, {y})"));
            Ok(())
        }
        fn rotate(&mut self, angle: f64) -> Result<(), String> {
            self.log(format!("rotate({angle})"));
            Ok(())
        }
        fn translate(&mut self, x: f64, y: f64) -> Result<(), String> {
            if !x.is_finite() {
                return Err("non-finite translate".into());
            }
            self.log(format!("translate({x}, {y})"));
            Ok(())
        }
        fn transform(
            &mut self,
            a: f64,
            b: f64,
            c: f64,
            d: f64,
            e: f64,
            f: f64,
        ) -> Result<(), String> {
            self.log(format!("transform({a}, {b}, {c}, {d}, {e}, {f})"));
            Ok(())
        }
        fn set_transform(
            &mut self,
            a: f64,
            b: f64,
            c: f64,
            d: f64,
            e: f64,
            f: f64,
        ) -> Result<(), String> {
            self.log(format!("setTransform({a}, {b}, {c}, {d}, {e}, {f})"));
            Ok(())
        }
        fn get_transform(&self) -> Result<Affine, String> {
            Ok(Affine::translate((3.0, 4.0)))
        }
        fn reset_transform(&mut self) -> Result<(), String> {
            self.log("resetTransform".into());
            Ok(())
        }
        fn set_line_dash(&mut self, segments: &[f64]) -> Result<(), String> {
            self.log(format!("setLineDash({segments:?})"));
            Ok(())
        }
        fn get_line_dash(&self) -> Vec<f64> {
            vec![4.0, 2.0]
        }
        fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
            self.log(format!("clearRect({x}, {y}, {w}, {h})"));
        }
        fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
            self.log(format!("fillRect({x}, {y}, {w}, {h})"));
        }
        fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
            self.log(format!("strokeRect({x}, {y}, {w}, {h})"));
        }
        fn begin_path(&mut self) {
            self.log("beginPath".into());
        }
        fn close_path(&mut self) {
            self.log("closePath".into());
        }
        fn move_to(&mut self, x: f64, y: f64) {
            self.log(format!("moveTo({x}, {y})"));
        }
        fn line_to(&mut self, x: f64, y: f64) {
            self.log(format!("lineTo({x}, {y})"));
        }
        fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64) {
            self.log(format!("quadraticCurveTo({cpx}, {cpy}, {x}, {y})"));
        }
        fn bezier_curve_to(&mut self, a: f64, b: f64, c: f64, d: f64, x: f64, y: f64) {
            self.log(format!("bezierCurveTo({a}, {b}, {c}, {d}, {x}, {y})"));
        }
        fn arc_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, r: f64) -> Result<(), String> {
            self.log(format!("arcTo({x1}, {y1}, {x2}, {y2}, {r})"));
            Ok(())
        }
        fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
            self.log(format!("rect({x}, {y}, {w}, {h})"));
        }
        fn round_rect(
            &mut self,
            x: f64,
            y: f64,
            w: f64,
            h: f64,
            radii: Option<&[f64]>,
        ) -> Result<(), String> {
            self.log(format!("roundRect({x}, {y}, {w}, {h}, {radii:?})"));
            Ok(())
        }
        fn arc(&mut self, x: f64, y: f64, r: f64, s: f64, e: f64, ccw: bool) -> Result<(), String> {
            if r < 0.0 {
                return Err(format!("negative radius {r}"));
            }
            self.log(format!("arc({x}, {y}, {r}, {s}, {e}, {ccw})"));
            Ok(())
        }
        fn ellipse(
            &mut self,
            x: f64,
            y: f64,
            rx: f64,
            ry: f64,
            rot: f64,
            s: f64,
            e: f64,
            ccw: bool,
        ) -> Result<(), String> {
            self.log(format!("ellipse({x}, {y}, {rx}, {ry}, {rot}, {s}, {e}, {ccw})"));
            Ok(())
        }
        fn fill(&mut self, path: Option<&&'static str>, rule: FillRule) {
            self.log(format!("fill({path:?}, {rule})"));
        }
        fn stroke(&mut self, path: Option<&&'static str>) {
            self.log(format!("stroke({path:?})"));
        }
        fn clip(&mut self, path: Option<&&'static str>, rule: FillRule) {
            self.log(format!("clip({path:?}, {rule})"));
        }
        fn draw_focus_if_needed(&mut self, path: Option<&&'static str>, element: &&'static str) {
            self.log(format!("drawFocusIfNeeded({path:?}, {element})"));
        }
        fn is_point_in_path(&self, _: Option<&&'static str>, x: f64, y: f64, _: FillRule) -> bool {
            x >= 0.0 && y >= 0.0
        }
        fn is_point_in_stroke(&self, _: Option<&&'static str>, x: f64, _: f64) -> bool {
            x == 0.0
        }
        fn fill_text(&mut self, t: &str, x: f64, y: f64, m: Option<f64>) -> Result<(), String> {
            self.log(format!("fillText({t}, {x}, {y}, {m:?})"));
            Ok(())
        }
        fn stroke_text(&mut self, t: &str, x: f64, y: f64, m: Option<f64>) -> Result<(), String> {
            self.log(format!("strokeText({t}, {x}, {y}, {m:?})"));
            Ok(())
        }
        fn measure_text(&self, text: &str) -> Result<TextMetrics, String> {
            Ok(TextMetrics {
                width: text.len() as f64,
                ..TextMetrics::default()
            })
        }
        fn draw_image(
            &mut self,
            image: &&'static str,
            placement: ImagePlacement,
        ) -> Result<(), String> {
            self.log(format!("drawImage({image}, {placement:?})"));
            Ok(())
        }
        fn create_image_data(&self, w: f64, h: f64) -> Result<(f64, f64), String> {
            Ok((w, h))
        }
        fn get_image_data(&self, _: f64, _: f64, w: f64, h: f64) -> Result<(f64, f64), String> {
            Ok((w, h))
        }
        fn put_image_data(
            &mut self,
            data: &(f64, f64),
            dx: f64,
            dy: f64,
            dirty: Option<Region>,
        ) -> Result<(), String> {
            self.log(format!("putImageData({data:?}, {dx}, {dy}, {dirty:?})"));
            Ok(())
        }
        fn create_linear_gradient(&self, x0: f64, y0: f64, x1: f64, y1: f64) -> String {
            format!("linear({x0}, {y0}, {x1}, {y1})")
        }
        fn create_radial_gradient(
            &self,
            x0: f64,
            y0: f64,
            r0: f64,
            x1: f64,
            y1: f64,
            r1: f64,
        ) -> Result<String, String> {
            Ok(format!("radial({x0}, {y0}, {r0}, {x1}, {y1}, {r1})"))
        }
        fn create_conic_gradient(&self, a: f64, x: f64, y: f64) -> Result<String, String> {
            Ok(format!("conic({a}, {x}, {y})"))
        }
        fn create_pattern(
            &self,
            image: &&'static str,
            rep: Repetition,
        ) -> Result<Option<String>, String> {
            Ok(Some(format!("pattern({image}, {})", rep.as_str())))
        }
    }

    fn make_gfx() -> Gfx<SpyTarget> {
        Gfx::new(SpyTarget { available: true }, SurfaceConfig::new(800.0, 600.0))
    }

    #[test]
    fn construction_requests_opaque_context() {
        let gfx = make_gfx();
        assert!(!gfx.get_context_attributes().unwrap().alpha);
        assert_eq!(gfx.width(), 800.0);
        assert_eq!(gfx.height(), 600.0);
        assert!(gfx.ctx().calls.is_empty());
    }

    #[test]
    fn clear_without_region_covers_declared_size() {
        let mut gfx = make_gfx();
        gfx.clear_rect(None);
        assert_eq!(gfx.ctx().calls, vec!["clearRect(0, 0, 800, 600)"]);
    }

    #[test]
    fn clear_with_region_is_forwarded_verbatim() {
        let mut gfx = make_gfx();
        gfx.clear_rect(Some(Region::new(10.0, 20.0, 30.0, 40.0)));
        assert_eq!(gfx.ctx().calls, vec!["clearRect(10, 20, 30, 40)"]);
    }

    #[test]
    fn chain_runs_in_order_and_ends_on_facade() -> Result<(), String> {
        let mut gfx = make_gfx();
        let start: *const Gfx<SpyTarget> = &gfx;
        let end: *const Gfx<SpyTarget> = gfx
            .save()
            .translate(5.0, 5.0)?
            .begin_path()
            .move_to(0.0, 0.0)
            .line_to(10.0, 10.0)
            .stroke(None)
            .restore();
        assert!(ptr::eq(start, end));
        assert_eq!(
            gfx.ctx().calls,
            vec![
                "save",
                "translate(5, 5)",
                "beginPath",
                "moveTo(0, 0)",
                "lineTo(10, 10)",
                "stroke(None)",
                "restore",
            ]
        );
        Ok(())
    }

    #[test]
    fn fill_forwards_to_singular_fill() {
        let mut gfx = make_gfx();
        gfx.fill(None, FillRule::EvenOdd).fill(Some(&"p"), FillRule::NonZero);
        assert_eq!(
            gfx.ctx().calls,
            vec!["fill(None, evenodd)", r#"fill(Some("p"), nonzero)"#]
        );
    }

    #[test]
    fn arguments_are_forwarded_without_validation() {
        let mut gfx = make_gfx();
        gfx.fill_rect(-5.0, f64::NAN, 0.0, -1.0)
            .stroke_rect(1.0, 2.0, 3.0, 4.0)
            .quadratic_curve_to(1.0, 2.0, 3.0, 4.0)
            .bezier_curve_to(1.0, 2.0, 3.0, 4.0, 5.0, 6.0)
            .rect(0.0, 0.0, 1.0, 1.0)
            .close_path()
            .clip(None, FillRule::NonZero)
            .draw_focus_if_needed(None, &"button");
        assert_eq!(
            gfx.ctx().calls,
            vec![
                "fillRect(-5, NaN, 0, -1)",
                "strokeRect(1, 2, 3, 4)",
                "quadraticCurveTo(1, 2, 3, 4)",
                "bezierCurveTo(1, 2, 3, 4, 5, 6)",
                "rect(0, 0, 1, 1)",
                "closePath",
                "clip(None, nonzero)",
                "drawFocusIfNeeded(None, button)",
            ]
        );
    }

    #[test]
    fn fallible_calls_chain_and_return_facade() -> Result<(), String> {
        let mut gfx = make_gfx();
        let start: *const Gfx<SpyTarget> = &gfx;
        let end: *const Gfx<SpyTarget> = gfx
            .arc(1.0, 2.0, 3.0, 0.0, 1.5, true)?
            .arc_to(0.0, 0.0, 1.0, 1.0, 2.0)?
            .ellipse(1.0, 2.0, 3.0, 4.0, 0.5, 0.0, 1.0, false)?
            .round_rect(0.0, 0.0, 10.0, 10.0, Some(&[2.0, 4.0]))?
            .scale(2.0, 3.0)?
            .rotate(0.25)?
            .transform(1.0, 0.0, 0.0, 1.0, 5.0, 6.0)?
            .set_transform(2.0, 0.0, 0.0, 2.0, 0.0, 0.0)?
            .reset_transform()?
            .set_line_dash(&[1.0, 2.0])?
            .fill_text("hi", 1.0, 2.0, Some(50.0))?
            .stroke_text("yo", 3.0, 4.0, None)?
            .draw_image(&"img", ImagePlacement::At { dx: 1.0, dy: 2.0 })?
            .put_image_data(&(2.0, 2.0), 5.0, 6.0, None)?
            .reset()?;
        assert!(ptr::eq(start, end));
        assert_eq!(gfx.ctx().calls.len(), 15);
        assert_eq!(gfx.ctx().calls[0], "arc(1, 2, 3, 0, 1.5, true)");
        assert_eq!(gfx.ctx().calls[14], "reset");
        Ok(())
    }

    #[test]
    fn host_errors_pass_through_untouched() {
        let mut gfx = make_gfx();
        let err = gfx.arc(0.0, 0.0, -1.0, 0.0, 1.0, false).err();
        assert_eq!(err.as_deref(), Some("negative radius -1"));
        let err = gfx.translate(f64::NAN, 0.0).err();
        assert_eq!(err.as_deref(), Some("non-finite translate"));
    }

    #[test]
    fn queries_return_context_results() {
        let gfx = make_gfx();
        assert_eq!(gfx.measure_text("abcd").unwrap().width, 4.0);
        assert_eq!(gfx.get_transform().unwrap(), Affine::translate((3.0, 4.0)));
        assert_eq!(gfx.get_line_dash(), vec![4.0, 2.0]);
        assert!(gfx.is_point_in_path(None, 1.0, 1.0, FillRule::NonZero));
        assert!(!gfx.is_point_in_stroke(Some(&"p"), 1.0, 1.0));
        assert!(!gfx.is_context_lost());
        assert_eq!(gfx.create_image_data(3.0, 4.0).unwrap(), (3.0, 4.0));
        assert_eq!(gfx.get_image_data(0.0, 0.0, 5.0, 6.0).unwrap(), (5.0, 6.0));
        assert_eq!(gfx.create_linear_gradient(0.0, 0.0, 1.0, 1.0), "linear(0, 0, 1, 1)");
        assert_eq!(
            gfx.create_radial_gradient(0.0, 0.0, 1.0, 2.0, 2.0, 3.0).unwrap(),
            "radial(0, 0, 1, 2, 2, 3)"
        );
        assert_eq!(gfx.create_conic_gradient(0.5, 1.0, 2.0).unwrap(), "conic(0.5, 1, 2)");
        assert_eq!(
            gfx.create_pattern(&"img", Repetition::RepeatY).unwrap().as_deref(),
            Some("pattern(img, repeat-y)")
        );
        // Queries never touch the call log.
        assert!(gfx.ctx().calls.is_empty());
    }

    #[test]
    fn unavailable_context_still_builds_facade() {
        let gfx = Gfx::new(SpyTarget { available: false }, SurfaceConfig::new(1.0, 1.0));
        assert!(gfx.is_context_lost());
        assert!(!gfx.ctx().acquired);
    }
}

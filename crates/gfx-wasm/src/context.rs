//! `RenderContext2d` over the browser's `CanvasRenderingContext2d`.
//!
//! Operations that `web-sys` binds are called directly. The newer ones
//! (`reset`, `roundRect`, `isContextLost`, `getContextAttributes`,
//! `createConicGradient`) are looked up on the context object at call time,
//! so older engines report a `TypeError` instead of failing to link.

use gfx_core::{
    Affine, ContextAttributes, FillRule, ImagePlacement, Region, RenderContext2d, Repetition,
    TextMetrics,
};
use std::fmt;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    CanvasGradient, CanvasPattern, CanvasRenderingContext2d, CanvasWindingRule, Element,
    HtmlCanvasElement, HtmlImageElement, ImageData, Path2d,
};

/// Image sources accepted by `draw_image` and `create_pattern`.
#[derive(Debug, Clone)]
pub enum WebImage {
    Image(HtmlImageElement),
    Canvas(HtmlCanvasElement),
}

/// A browser 2D context.
pub struct WebContext {
    ctx: CanvasRenderingContext2d,
}

impl WebContext {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    /// The `web-sys` context, for style properties (`fillStyle`, `font`,
    /// `lineWidth`, ...).
    pub fn raw(&self) -> &CanvasRenderingContext2d {
        &self.ctx
    }

    fn call(&self, name: &str, args: &[JsValue]) -> Result<JsValue, JsValue> {
        call_method(self.ctx.as_ref(), name, args)
    }
}

/// Call `target[name](...args)`.
fn call_method(target: &JsValue, name: &str, args: &[JsValue]) -> Result<JsValue, JsValue> {
    let method: js_sys::Function = js_sys::Reflect::get(target, &JsValue::from_str(name))?
        .dyn_into()
        .map_err(|_| JsValue::from(js_sys::TypeError::new(&format!("{name} is not a function"))))?;
    let args: js_sys::Array = args.iter().collect();
    method.apply(target, &args)
}

/// `obj[name]` as a boolean. The host fills in every attribute member.
fn bool_field(obj: &JsValue, name: &str) -> Result<bool, JsValue> {
    Ok(js_sys::Reflect::get(obj, &JsValue::from_str(name))?.is_truthy())
}

/// Lost unless the context answered `isContextLost()` with `false`.
/// A context that cannot answer (the `null` stored by a failed
/// acquisition) is lost.
pub(crate) fn lost_from<E: fmt::Debug>(answer: Result<Option<bool>, E>) -> bool {
    match answer {
        Ok(lost) => lost.unwrap_or(true),
        Err(e) => {
            log::warn!("gfx: isContextLost failed: {e:?}");
            true
        }
    }
}

pub(crate) fn winding(rule: FillRule) -> CanvasWindingRule {
    match rule {
        FillRule::NonZero => CanvasWindingRule::Nonzero,
        FillRule::EvenOdd => CanvasWindingRule::Evenodd,
    }
}

impl RenderContext2d for WebContext {
    type Error = JsValue;
    type Path = Path2d;
    type Image = WebImage;
    type Element = Element;
    type Gradient = CanvasGradient;
    type Pattern = CanvasPattern;
    type ImageData = ImageData;

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn reset(&mut self) -> Result<(), JsValue> {
        self.call("reset", &[]).map(|_| ())
    }

    fn is_context_lost(&self) -> bool {
        lost_from(self.call("isContextLost", &[]).map(|v| v.as_bool()))
    }

    fn get_context_attributes(&self) -> Result<ContextAttributes, JsValue> {
        let obj = self.call("getContextAttributes", &[])?;
        Ok(ContextAttributes {
            alpha: bool_field(&obj, "alpha")?,
            desynchronized: bool_field(&obj, "desynchronized")?,
            will_read_frequently: bool_field(&obj, "willReadFrequently")?,
        })
    }

    fn scale(&mut self, x: f64, y: f64) -> Result<(), JsValue> {
        self.ctx.scale(x, y)
    }

    fn rotate(&mut self, angle: f64) -> Result<(), JsValue> {
        self.ctx.rotate(angle)
    }

    fn translate(&mut self, x: f64, y: f64) -> Result<(), JsValue> {
        self.ctx.translate(x, y)
    }

    fn transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Result<(), JsValue> {
        self.ctx.transform(a, b, c, d, e, f)
    }

    fn set_transform(
        &mut self,
        a: f64,
        b: f64,
        c: f64,
        d: f64,
        e: f64,
        f: f64,
    ) -> Result<(), JsValue> {
        self.ctx.set_transform(a, b, c, d, e, f)
    }

    fn get_transform(&self) -> Result<Affine, JsValue> {
        let m = self.ctx.get_transform()?;
        Ok(Affine::new([m.a(), m.b(), m.c(), m.d(), m.e(), m.f()]))
    }

    fn reset_transform(&mut self) -> Result<(), JsValue> {
        self.ctx.reset_transform()
    }

    fn set_line_dash(&mut self, segments: &[f64]) -> Result<(), JsValue> {
        let segments: js_sys::Array = segments.iter().map(|s| JsValue::from_f64(*s)).collect();
        self.ctx.set_line_dash(&segments)
    }

    fn get_line_dash(&self) -> Vec<f64> {
        self.ctx
            .get_line_dash()
            .iter()
            .filter_map(|v| v.as_f64())
            .collect()
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.clear_rect(x, y, width, height);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.fill_rect(x, y, width, height);
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.stroke_rect(x, y, width, height);
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }

    fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64) {
        self.ctx.quadratic_curve_to(cpx, cpy, x, y);
    }

    fn bezier_curve_to(&mut self, cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64) {
        self.ctx.bezier_curve_to(cp1x, cp1y, cp2x, cp2y, x, y);
    }

    fn arc_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, radius: f64) -> Result<(), JsValue> {
        self.ctx.arc_to(x1, y1, x2, y2, radius)
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.rect(x, y, width, height);
    }

    fn round_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        radii: Option<&[f64]>,
    ) -> Result<(), JsValue> {
        let mut args = vec![x.into(), y.into(), width.into(), height.into()];
        if let Some(radii) = radii {
            let radii: js_sys::Array = radii.iter().map(|r| JsValue::from_f64(*r)).collect();
            args.push(radii.into());
        }
        self.call("roundRect", &args).map(|_| ())
    }

    fn arc(
        &mut self,
        x: f64,
        y: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        anticlockwise: bool,
    ) -> Result<(), JsValue> {
        self.ctx
            .arc_with_anticlockwise(x, y, radius, start_angle, end_angle, anticlockwise)
    }

    fn ellipse(
        &mut self,
        x: f64,
        y: f64,
        radius_x: f64,
        radius_y: f64,
        rotation: f64,
        start_angle: f64,
        end_angle: f64,
        anticlockwise: bool,
    ) -> Result<(), JsValue> {
        self.ctx.ellipse_with_anticlockwise(
            x,
            y,
            radius_x,
            radius_y,
            rotation,
            start_angle,
            end_angle,
            anticlockwise,
        )
    }

    fn fill(&mut self, path: Option<&Path2d>, rule: FillRule) {
        match path {
            Some(p) => self.ctx.fill_with_path_2d_and_winding(p, winding(rule)),
            None => self.ctx.fill_with_canvas_winding_rule(winding(rule)),
        }
    }

    fn stroke(&mut self, path: Option<&Path2d>) {
        match path {
            Some(p) => self.ctx.stroke_with_path(p),
            None => self.ctx.stroke(),
        }
    }

    fn clip(&mut self, path: Option<&Path2d>, rule: FillRule) {
        match path {
            Some(p) => self.ctx.clip_with_path_2d_and_winding(p, winding(rule)),
            None => self.ctx.clip_with_canvas_winding_rule(winding(rule)),
        }
    }

    fn draw_focus_if_needed(&mut self, path: Option<&Path2d>, element: &Element) {
        match path {
            Some(p) => self.ctx.draw_focus_if_needed_with_path_2d_and_element(p, element),
            None => self.ctx.draw_focus_if_needed(element),
        }
    }

    fn is_point_in_path(&self, path: Option<&Path2d>, x: f64, y: f64, rule: FillRule) -> bool {
        match path {
            Some(p) => self.ctx.is_point_in_path_with_path_2d_and_f64_and_winding(
                p,
                x,
                y,
                winding(rule),
            ),
            None => self
                .ctx
                .is_point_in_path_with_f64_and_canvas_winding_rule(x, y, winding(rule)),
        }
    }

    fn is_point_in_stroke(&self, path: Option<&Path2d>, x: f64, y: f64) -> bool {
        match path {
            Some(p) => self.ctx.is_point_in_stroke_with_path_and_x_and_y(p, x, y),
            None => self.ctx.is_point_in_stroke_with_x_and_y(x, y),
        }
    }

    fn fill_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        max_width: Option<f64>,
    ) -> Result<(), JsValue> {
        match max_width {
            Some(max) => self.ctx.fill_text_with_max_width(text, x, y, max),
            None => self.ctx.fill_text(text, x, y),
        }
    }

    fn stroke_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        max_width: Option<f64>,
    ) -> Result<(), JsValue> {
        match max_width {
            Some(max) => self.ctx.stroke_text_with_max_width(text, x, y, max),
            None => self.ctx.stroke_text(text, x, y),
        }
    }

    fn measure_text(&self, text: &str) -> Result<TextMetrics, JsValue> {
        let m = self.ctx.measure_text(text)?;
        Ok(TextMetrics {
            width: m.width(),
            actual_bounding_box_left: m.actual_bounding_box_left(),
            actual_bounding_box_right: m.actual_bounding_box_right(),
            actual_bounding_box_ascent: m.actual_bounding_box_ascent(),
            actual_bounding_box_descent: m.actual_bounding_box_descent(),
            font_bounding_box_ascent: m.font_bounding_box_ascent(),
            font_bounding_box_descent: m.font_bounding_box_descent(),
        })
    }

    fn draw_image(&mut self, image: &WebImage, placement: ImagePlacement) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        match (image, placement) {
            (WebImage::Image(img), ImagePlacement::At { dx, dy }) => {
                ctx.draw_image_with_html_image_element(img, dx, dy)
            }
            (WebImage::Image(img), ImagePlacement::Scaled { dx, dy, dw, dh }) => {
                ctx.draw_image_with_html_image_element_and_dw_and_dh(img, dx, dy, dw, dh)
            }
            (WebImage::Image(img), ImagePlacement::Cropped { source: s, dest: d }) => ctx
                .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                    img, s.x, s.y, s.width, s.height, d.x, d.y, d.width, d.height,
                ),
            (WebImage::Canvas(cv), ImagePlacement::At { dx, dy }) => {
                ctx.draw_image_with_html_canvas_element(cv, dx, dy)
            }
            (WebImage::Canvas(cv), ImagePlacement::Scaled { dx, dy, dw, dh }) => {
                ctx.draw_image_with_html_canvas_element_and_dw_and_dh(cv, dx, dy, dw, dh)
            }
            (WebImage::Canvas(cv), ImagePlacement::Cropped { source: s, dest: d }) => ctx
                .draw_image_with_html_canvas_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                    cv, s.x, s.y, s.width, s.height, d.x, d.y, d.width, d.height,
                ),
        }
    }

    fn create_image_data(&self, width: f64, height: f64) -> Result<ImageData, JsValue> {
        self.ctx.create_image_data_with_sw_and_sh(width, height)
    }

    fn get_image_data(&self, sx: f64, sy: f64, sw: f64, sh: f64) -> Result<ImageData, JsValue> {
        self.ctx.get_image_data(sx, sy, sw, sh)
    }

    fn put_image_data(
        &mut self,
        data: &ImageData,
        dx: f64,
        dy: f64,
        dirty: Option<Region>,
    ) -> Result<(), JsValue> {
        match dirty {
            Some(r) => self
                .ctx
                .put_image_data_with_dirty_x_and_dirty_y_and_dirty_width_and_dirty_height(
                    data, dx, dy, r.x, r.y, r.width, r.height,
                ),
            None => self.ctx.put_image_data(data, dx, dy),
        }
    }

    fn create_linear_gradient(&self, x0: f64, y0: f64, x1: f64, y1: f64) -> CanvasGradient {
        self.ctx.create_linear_gradient(x0, y0, x1, y1)
    }

    fn create_radial_gradient(
        &self,
        x0: f64,
        y0: f64,
        r0: f64,
        x1: f64,
        y1: f64,
        r1: f64,
    ) -> Result<CanvasGradient, JsValue> {
        self.ctx.create_radial_gradient(x0, y0, r0, x1, y1, r1)
    }

    fn create_conic_gradient(
        &self,
        start_angle: f64,
        x: f64,
        y: f64,
    ) -> Result<CanvasGradient, JsValue> {
        self.call("createConicGradient", &[start_angle.into(), x.into(), y.into()])
            .map(JsCast::unchecked_into)
    }

    fn create_pattern(
        &self,
        image: &WebImage,
        repetition: Repetition,
    ) -> Result<Option<CanvasPattern>, JsValue> {
        match image {
            WebImage::Image(img) => self
                .ctx
                .create_pattern_with_html_image_element(img, repetition.as_str()),
            WebImage::Canvas(cv) => self
                .ctx
                .create_pattern_with_html_canvas_element(cv, repetition.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_rules_map_to_canvas_keywords() {
        assert_eq!(winding(FillRule::NonZero), CanvasWindingRule::Nonzero);
        assert_eq!(winding(FillRule::EvenOdd), CanvasWindingRule::Evenodd);
    }

    #[test]
    fn unanswerable_context_is_lost() {
        assert!(lost_from(Err("TypeError: null has no properties")));
        assert!(lost_from::<()>(Ok(None)));
        assert!(lost_from::<()>(Ok(Some(true))));
        assert!(!lost_from::<()>(Ok(Some(false))));
    }
}

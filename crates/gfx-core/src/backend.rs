//! Backend interface: the operations a 2D rendering context exposes.
//!
//! `RenderContext2d` lists the standard 2D context operation set in
//! snake_case, same argument order as the host API. Host objects that the
//! facade only passes around (paths, images, gradients, pixel buffers) are
//! associated types so each backend uses its native handles.
//!
//! Optional trailing arguments of the host overloads are `Option`s:
//! `fill(None, rule)` is `ctx.fill(rule)`, `fill(Some(&path), rule)` is
//! `ctx.fill(path, rule)`.

use crate::types::{
    ContextAttributes, ContextOptions, FillRule, ImagePlacement, Region, Repetition, TextMetrics,
};
use kurbo::Affine;

/// A drawable output that can hand out a 2D rendering context.
pub trait DrawTarget {
    type Context: RenderContext2d;

    /// Acquire the 2D context.
    ///
    /// Acquisition failure is not an error at this level: the returned
    /// value is whatever the host produces for a failed request, and the
    /// caller stores it as is.
    fn get_context_2d(&self, options: &ContextOptions) -> Self::Context;
}

/// The operation set of a 2D rendering context.
pub trait RenderContext2d {
    /// Error raised by the host for rejected arguments.
    type Error;
    type Path;
    type Image;
    type Element;
    type Gradient;
    type Pattern;
    type ImageData;

    // ─── State ──────────────────────────────────────────────────────────

    fn save(&mut self);
    fn restore(&mut self);
    fn reset(&mut self) -> Result<(), Self::Error>;
    fn is_context_lost(&self) -> bool;
    fn get_context_attributes(&self) -> Result<ContextAttributes, Self::Error>;

    // ─── Transforms ─────────────────────────────────────────────────────

    fn scale(&mut self, x: f64, y: f64) -> Result<(), Self::Error>;
    fn rotate(&mut self, angle: f64) -> Result<(), Self::Error>;
    fn translate(&mut self, x: f64, y: f64) -> Result<(), Self::Error>;
    fn transform(
        &mut self,
        a: f64,
        b: f64,
        c: f64,
        d: f64,
        e: f64,
        f: f64,
    ) -> Result<(), Self::Error>;
    fn set_transform(
        &mut self,
        a: f64,
        b: f64,
        c: f64,
        d: f64,
        e: f64,
        f: f64,
    ) -> Result<(), Self::Error>;
    fn get_transform(&self) -> Result<Affine, Self::Error>;
    fn reset_transform(&mut self) -> Result<(), Self::Error>;

    // ─── Line dash ──────────────────────────────────────────────────────

    fn set_line_dash(&mut self, segments: &[f64]) -> Result<(), Self::Error>;
    fn get_line_dash(&self) -> Vec<f64>;

    // ─── Rectangles ─────────────────────────────────────────────────────

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    // ─── Path construction ──────────────────────────────────────────────

    fn begin_path(&mut self);
    fn close_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64);
    fn bezier_curve_to(&mut self, cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64);
    fn arc_to(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        radius: f64,
    ) -> Result<(), Self::Error>;
    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn round_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        radii: Option<&[f64]>,
    ) -> Result<(), Self::Error>;
    fn arc(
        &mut self,
        x: f64,
        y: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        anticlockwise: bool,
    ) -> Result<(), Self::Error>;
    #[allow(clippy::too_many_arguments)]
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
    ) -> Result<(), Self::Error>;

    // ─── Path drawing ───────────────────────────────────────────────────

    fn fill(&mut self, path: Option<&Self::Path>, rule: FillRule);
    fn stroke(&mut self, path: Option<&Self::Path>);
    fn clip(&mut self, path: Option<&Self::Path>, rule: FillRule);
    fn draw_focus_if_needed(&mut self, path: Option<&Self::Path>, element: &Self::Element);
    fn is_point_in_path(&self, path: Option<&Self::Path>, x: f64, y: f64, rule: FillRule) -> bool;
    fn is_point_in_stroke(&self, path: Option<&Self::Path>, x: f64, y: f64) -> bool;

    // ─── Text ───────────────────────────────────────────────────────────

    fn fill_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        max_width: Option<f64>,
    ) -> Result<(), Self::Error>;
    fn stroke_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        max_width: Option<f64>,
    ) -> Result<(), Self::Error>;
    fn measure_text(&self, text: &str) -> Result<TextMetrics, Self::Error>;

    // ─── Images and pixels ──────────────────────────────────────────────

    fn draw_image(
        &mut self,
        image: &Self::Image,
        placement: ImagePlacement,
    ) -> Result<(), Self::Error>;
    fn create_image_data(&self, width: f64, height: f64) -> Result<Self::ImageData, Self::Error>;
    fn get_image_data(
        &self,
        sx: f64,
        sy: f64,
        sw: f64,
        sh: f64,
    ) -> Result<Self::ImageData, Self::Error>;
    fn put_image_data(
        &mut self,
        data: &Self::ImageData,
        dx: f64,
        dy: f64,
        dirty: Option<Region>,
    ) -> Result<(), Self::Error>;

    // ─── Paint servers ──────────────────────────────────────────────────

    fn create_linear_gradient(&self, x0: f64, y0: f64, x1: f64, y1: f64) -> Self::Gradient;
    fn create_radial_gradient(
        &self,
        x0: f64,
        y0: f64,
        r0: f64,
        x1: f64,
        y1: f64,
        r1: f64,
    ) -> Result<Self::Gradient, Self::Error>;
    fn create_conic_gradient(
        &self,
        start_angle: f64,
        x: f64,
        y: f64,
    ) -> Result<Self::Gradient, Self::Error>;
    fn create_pattern(
        &self,
        image: &Self::Image,
        repetition: Repetition,
    ) -> Result<Option<Self::Pattern>, Self::Error>;
}

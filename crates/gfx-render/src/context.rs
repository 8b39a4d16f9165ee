//! Headless 2D context.
//!
//! Tracks what a browser context tracks outside of rasterization: the
//! transform and its save/restore stack, the current path (as a
//! `kurbo::BezPath`), the line dash, and a pixel bitmap for the
//! clear and image-data operations. Fills, strokes, text, and images are
//! not rasterized; they are recorded in the call log with their
//! arguments.

use crate::error::HeadlessError;
use crate::path::{self, HeadlessPath, PathBuilder};
use crate::pixels::{ImageData, OPAQUE_BLACK, TRANSPARENT};
use gfx_core::{
    ContextAttributes, ContextOptions, FillRule, ImagePlacement, Region, RenderContext2d,
    Repetition, TextMetrics,
};
use kurbo::{Affine, BezPath, Point, Shape, Stroke};
use smallvec::SmallVec;
use std::fmt;

/// Tolerance for stroke expansion in `is_point_in_stroke`.
const STROKE_TOLERANCE: f64 = 0.05;

/// Largest image data area, in pixels (16384 x 16384).
const MAX_IMAGE_PIXELS: f64 = 268_435_456.0;

/// One argument of a logged call.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Num(f64),
    Flag(bool),
    Text(String),
    Rule(FillRule),
    Path(BezPath),
    Nums(Vec<f64>),
    Region(Region),
    Placement(ImagePlacement),
    Image { width: u32, height: u32 },
    Element(String),
    Absent,
}

/// A forwarded drawing or state operation, as the host saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub op: &'static str,
    pub args: SmallVec<[Arg; 6]>,
}

impl Call {
    fn new(op: &'static str) -> Self {
        Self {
            op,
            args: SmallVec::new(),
        }
    }

    fn nums(op: &'static str, nums: &[f64]) -> Self {
        Self {
            op,
            args: nums.iter().map(|n| Arg::Num(*n)).collect(),
        }
    }

    fn arg(mut self, arg: Arg) -> Self {
        self.args.push(arg);
        self
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.op)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match arg {
                Arg::Num(n) => write!(f, "{n}")?,
                Arg::Flag(b) => write!(f, "{b}")?,
                Arg::Text(s) => write!(f, "{s:?}")?,
                Arg::Rule(r) => write!(f, "{r}")?,
                Arg::Path(_) => f.write_str("<path>")?,
                Arg::Nums(v) => write!(f, "{v:?}")?,
                Arg::Region(r) => write!(f, "{r:?}")?,
                Arg::Placement(p) => write!(f, "{p:?}")?,
                Arg::Image { width, height } => write!(f, "<image {width}x{height}>")?,
                Arg::Element(id) => write!(f, "#{id}")?,
                Arg::Absent => f.write_str("-")?,
            }
        }
        f.write_str(")")
    }
}

/// A focusable element for `draw_focus_if_needed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessElement {
    pub id: String,
    pub focused: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GradientKind {
    Linear { x0: f64, y0: f64, x1: f64, y1: f64 },
    Radial { x0: f64, y0: f64, r0: f64, x1: f64, y1: f64, r1: f64 },
    Conic { start_angle: f64, x: f64, y: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessGradient {
    pub kind: GradientKind,
    pub stops: Vec<(f64, String)>,
}

impl HeadlessGradient {
    fn new(kind: GradientKind) -> Self {
        Self {
            kind,
            stops: Vec::new(),
        }
    }

    pub fn add_color_stop(&mut self, offset: f64, color: &str) -> Result<(), HeadlessError> {
        if !(0.0..=1.0).contains(&offset) {
            return Err(HeadlessError::IndexSize(format!(
                "color stop offset {offset} outside [0, 1]"
            )));
        }
        self.stops.push((offset, color.to_string()));
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessPattern {
    pub image: ImageData,
    pub repetition: Repetition,
}

/// The part of the context that `save`/`restore` snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawState {
    pub transform: Affine,
    pub line_dash: SmallVec<[f64; 4]>,
    pub line_width: f64,
    pub font: String,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            line_dash: SmallVec::new(),
            line_width: 1.0,
            font: "10px sans-serif".to_string(),
        }
    }
}

impl DrawState {
    /// Pixel size from the font shorthand, 10 when none is given.
    fn font_px(&self) -> f64 {
        self.font
            .split_whitespace()
            .find_map(|tok| tok.strip_suffix("px")?.parse::<f64>().ok())
            .unwrap_or(10.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessContext {
    attributes: ContextAttributes,
    state: DrawState,
    stack: SmallVec<[DrawState; 4]>,
    path: PathBuilder,
    bitmap: ImageData,
    calls: Vec<Call>,
    lost: bool,
}

impl HeadlessContext {
    pub fn new(width: u32, height: u32, options: &ContextOptions) -> Self {
        Self {
            attributes: (*options).into(),
            state: DrawState::default(),
            stack: SmallVec::new(),
            path: PathBuilder::new(),
            bitmap: ImageData::filled(width, height, Self::cleared(options.alpha)),
            calls: Vec::new(),
            lost: false,
        }
    }

    /// A context that was never successfully created.
    pub fn lost(options: &ContextOptions) -> Self {
        Self {
            lost: true,
            ..Self::new(0, 0, options)
        }
    }

    fn cleared(alpha: bool) -> [u8; 4] {
        if alpha { TRANSPARENT } else { OPAQUE_BLACK }
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<Call> {
        std::mem::take(&mut self.calls)
    }

    pub fn state(&self) -> &DrawState {
        &self.state
    }

    pub fn save_depth(&self) -> usize {
        self.stack.len()
    }

    /// The current path, in device space.
    pub fn current_path(&self) -> &BezPath {
        self.path.bez()
    }

    pub fn bitmap(&self) -> &ImageData {
        &self.bitmap
    }

    pub fn line_width(&self) -> f64 {
        self.state.line_width
    }

    /// Ignores non-positive and non-finite widths.
    pub fn set_line_width(&mut self, width: f64) {
        if width.is_finite() && width > 0.0 {
            self.state.line_width = width;
        }
    }

    pub fn font(&self) -> &str {
        &self.state.font
    }

    pub fn set_font(&mut self, font: &str) {
        self.state.font = font.to_string();
    }

    fn record(&mut self, call: Call) {
        if !self.lost {
            log::trace!("headless: {call}");
            self.calls.push(call);
        }
    }

    fn check_alive(&self) -> Result<(), HeadlessError> {
        if self.lost {
            return Err(HeadlessError::InvalidState("context is lost".to_string()));
        }
        Ok(())
    }

    fn path_arg(path: Option<&HeadlessPath>) -> Arg {
        match path {
            Some(p) => Arg::Path(p.bez().clone()),
            None => Arg::Absent,
        }
    }

    fn opt_num(n: Option<f64>) -> Arg {
        n.map_or(Arg::Absent, Arg::Num)
    }

    /// `path` in device space: an explicit path goes through the current
    /// transform, the current path already is.
    fn device_path(&self, path: Option<&HeadlessPath>) -> BezPath {
        match path {
            Some(p) => self.state.transform * p.bez().clone(),
            None => self.path.bez().clone(),
        }
    }

    fn apply_transform(&mut self, op: &'static str, args: &[f64], m: Affine) {
        self.record(Call::nums(op, args));
        if args.iter().all(|v| v.is_finite()) {
            self.state.transform *= m;
        }
    }

    fn image_size(sw: f64, sh: f64) -> Result<(u32, u32), HeadlessError> {
        let (w, h) = (sw.abs(), sh.abs());
        if !w.is_finite() || !h.is_finite() || w < 1.0 || h < 1.0 {
            return Err(HeadlessError::IndexSize(format!(
                "image data size {sw}x{sh} is empty"
            )));
        }
        if w.trunc() * h.trunc() > MAX_IMAGE_PIXELS {
            return Err(HeadlessError::Range(format!(
                "image data size {sw}x{sh} is too large"
            )));
        }
        Ok((w as u32, h as u32))
    }
}

impl RenderContext2d for HeadlessContext {
    type Error = HeadlessError;
    type Path = HeadlessPath;
    type Image = ImageData;
    type Element = HeadlessElement;
    type Gradient = HeadlessGradient;
    type Pattern = HeadlessPattern;
    type ImageData = ImageData;

    fn save(&mut self) {
        self.record(Call::new("save"));
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        self.record(Call::new("restore"));
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn reset(&mut self) -> Result<(), HeadlessError> {
        self.check_alive()?;
        self.record(Call::new("reset"));
        self.state = DrawState::default();
        self.stack.clear();
        self.path = PathBuilder::new();
        self.bitmap.fill(Self::cleared(self.attributes.alpha));
        Ok(())
    }

    fn is_context_lost(&self) -> bool {
        self.lost
    }

    fn get_context_attributes(&self) -> Result<ContextAttributes, HeadlessError> {
        Ok(self.attributes)
    }

    fn scale(&mut self, x: f64, y: f64) -> Result<(), HeadlessError> {
        self.check_alive()?;
        self.apply_transform("scale", &[x, y], Affine::scale_non_uniform(x, y));
        Ok(())
    }

    fn rotate(&mut self, angle: f64) -> Result<(), HeadlessError> {
        self.check_alive()?;
        self.apply_transform("rotate", &[angle], Affine::rotate(angle));
        Ok(())
    }

    fn translate(&mut self, x: f64, y: f64) -> Result<(), HeadlessError> {
        self.check_alive()?;
        self.apply_transform("translate", &[x, y], Affine::translate((x, y)));
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
    ) -> Result<(), HeadlessError> {
        self.check_alive()?;
        self.apply_transform("transform", &[a, b, c, d, e, f], Affine::new([a, b, c, d, e, f]));
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
    ) -> Result<(), HeadlessError> {
        self.check_alive()?;
        let args = [a, b, c, d, e, f];
        self.record(Call::nums("setTransform", &args));
        if args.iter().all(|v| v.is_finite()) {
            self.state.transform = Affine::new(args);
        }
        Ok(())
    }

    fn get_transform(&self) -> Result<Affine, HeadlessError> {
        self.check_alive()?;
        Ok(self.state.transform)
    }

    fn reset_transform(&mut self) -> Result<(), HeadlessError> {
        self.check_alive()?;
        self.record(Call::new("resetTransform"));
        self.state.transform = Affine::IDENTITY;
        Ok(())
    }

    fn set_line_dash(&mut self, segments: &[f64]) -> Result<(), HeadlessError> {
        self.check_alive()?;
        self.record(Call::new("setLineDash").arg(Arg::Nums(segments.to_vec())));
        if segments.iter().any(|s| !s.is_finite() || *s < 0.0) {
            return Ok(());
        }
        let mut dash: SmallVec<[f64; 4]> = segments.iter().copied().collect();
        if dash.len() % 2 == 1 {
            dash.extend_from_slice(segments);
        }
        self.state.line_dash = dash;
        Ok(())
    }

    fn get_line_dash(&self) -> Vec<f64> {
        self.state.line_dash.to_vec()
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.record(Call::nums("clearRect", &[x, y, width, height]));
        if self.lost || ![x, y, width, height].iter().all(|v| v.is_finite()) {
            return;
        }
        let cleared = Self::cleared(self.attributes.alpha);
        self.bitmap.fill_transformed(
            self.state.transform,
            Region::new(x, y, width, height),
            cleared,
        );
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.record(Call::nums("fillRect", &[x, y, width, height]));
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.record(Call::nums("strokeRect", &[x, y, width, height]));
    }

    fn begin_path(&mut self) {
        self.record(Call::new("beginPath"));
        self.path = PathBuilder::new();
    }

    fn close_path(&mut self) {
        self.record(Call::new("closePath"));
        self.path.close_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.record(Call::nums("moveTo", &[x, y]));
        self.path.move_to(self.state.transform, x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.record(Call::nums("lineTo", &[x, y]));
        self.path.line_to(self.state.transform, x, y);
    }

    fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64) {
        self.record(Call::nums("quadraticCurveTo", &[cpx, cpy, x, y]));
        self.path.quad_to(self.state.transform, cpx, cpy, x, y);
    }

    fn bezier_curve_to(&mut self, cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64) {
        self.record(Call::nums("bezierCurveTo", &[cp1x, cp1y, cp2x, cp2y, x, y]));
        self.path
            .curve_to(self.state.transform, cp1x, cp1y, cp2x, cp2y, x, y);
    }

    fn arc_to(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        radius: f64,
    ) -> Result<(), HeadlessError> {
        self.check_alive()?;
        self.record(Call::nums("arcTo", &[x1, y1, x2, y2, radius]));
        self.path.arc_to(self.state.transform, x1, y1, x2, y2, radius)
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.record(Call::nums("rect", &[x, y, width, height]));
        self.path.rect(self.state.transform, x, y, width, height);
    }

    fn round_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        radii: Option<&[f64]>,
    ) -> Result<(), HeadlessError> {
        self.check_alive()?;
        self.record(
            Call::nums("roundRect", &[x, y, width, height])
                .arg(radii.map_or(Arg::Absent, |r| Arg::Nums(r.to_vec()))),
        );
        // Without radii the corners are square.
        let radii = radii.unwrap_or(&[0.0]);
        self.path
            .round_rect(self.state.transform, x, y, width, height, radii)
    }

    fn arc(
        &mut self,
        x: f64,
        y: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        anticlockwise: bool,
    ) -> Result<(), HeadlessError> {
        self.check_alive()?;
        self.record(
            Call::nums("arc", &[x, y, radius, start_angle, end_angle])
                .arg(Arg::Flag(anticlockwise)),
        );
        self.path.ellipse(
            self.state.transform,
            x,
            y,
            radius,
            radius,
            0.0,
            start_angle,
            end_angle,
            anticlockwise,
        )
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
    ) -> Result<(), HeadlessError> {
        self.check_alive()?;
        self.record(
            Call::nums(
                "ellipse",
                &[x, y, radius_x, radius_y, rotation, start_angle, end_angle],
            )
            .arg(Arg::Flag(anticlockwise)),
        );
        self.path.ellipse(
            self.state.transform,
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

    fn fill(&mut self, path: Option<&HeadlessPath>, rule: FillRule) {
        self.record(
            Call::new("fill")
                .arg(Self::path_arg(path))
                .arg(Arg::Rule(rule)),
        );
    }

    fn stroke(&mut self, path: Option<&HeadlessPath>) {
        self.record(Call::new("stroke").arg(Self::path_arg(path)));
    }

    fn clip(&mut self, path: Option<&HeadlessPath>, rule: FillRule) {
        self.record(
            Call::new("clip")
                .arg(Self::path_arg(path))
                .arg(Arg::Rule(rule)),
        );
    }

    /// Only a focused element gets a focus ring, so only that is recorded.
    fn draw_focus_if_needed(&mut self, path: Option<&HeadlessPath>, element: &HeadlessElement) {
        if !element.focused {
            return;
        }
        self.record(
            Call::new("drawFocusIfNeeded")
                .arg(Self::path_arg(path))
                .arg(Arg::Element(element.id.clone())),
        );
    }

    fn is_point_in_path(
        &self,
        path: Option<&HeadlessPath>,
        x: f64,
        y: f64,
        rule: FillRule,
    ) -> bool {
        if self.lost || !x.is_finite() || !y.is_finite() {
            return false;
        }
        let closed = path::closed(&self.device_path(path));
        let winding = closed.winding(Point::new(x, y));
        match rule {
            FillRule::NonZero => winding != 0,
            FillRule::EvenOdd => winding % 2 != 0,
        }
    }

    fn is_point_in_stroke(&self, path: Option<&HeadlessPath>, x: f64, y: f64) -> bool {
        if self.lost || !x.is_finite() || !y.is_finite() {
            return false;
        }
        let device = self.device_path(path);
        // Line width is in user space; scale it by the transform's area factor.
        let width = self.state.line_width * self.state.transform.determinant().abs().sqrt();
        let mut style = Stroke::new(width);
        if !self.state.line_dash.is_empty() {
            style = style.with_dashes(0.0, self.state.line_dash.iter().copied());
        }
        let outline = kurbo::stroke(device, &style, &Default::default(), STROKE_TOLERANCE);
        outline.winding(Point::new(x, y)) != 0
    }

    fn fill_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        max_width: Option<f64>,
    ) -> Result<(), HeadlessError> {
        self.check_alive()?;
        self.record(
            Call::new("fillText")
                .arg(Arg::Text(text.to_string()))
                .arg(Arg::Num(x))
                .arg(Arg::Num(y))
                .arg(Self::opt_num(max_width)),
        );
        Ok(())
    }

    fn stroke_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        max_width: Option<f64>,
    ) -> Result<(), HeadlessError> {
        self.check_alive()?;
        self.record(
            Call::new("strokeText")
                .arg(Arg::Text(text.to_string()))
                .arg(Arg::Num(x))
                .arg(Arg::Num(y))
                .arg(Self::opt_num(max_width)),
        );
        Ok(())
    }

    /// Fixed-advance metrics: every character is half the font size wide.
    fn measure_text(&self, text: &str) -> Result<TextMetrics, HeadlessError> {
        self.check_alive()?;
        let size = self.state.font_px();
        let width = text.chars().count() as f64 * size * 0.5;
        Ok(TextMetrics {
            width,
            actual_bounding_box_left: 0.0,
            actual_bounding_box_right: width,
            actual_bounding_box_ascent: size * 0.7,
            actual_bounding_box_descent: size * 0.2,
            font_bounding_box_ascent: size * 0.8,
            font_bounding_box_descent: size * 0.2,
        })
    }

    fn draw_image(
        &mut self,
        image: &ImageData,
        placement: ImagePlacement,
    ) -> Result<(), HeadlessError> {
        self.check_alive()?;
        self.record(
            Call::new("drawImage")
                .arg(Arg::Image {
                    width: image.width(),
                    height: image.height(),
                })
                .arg(Arg::Placement(placement)),
        );
        Ok(())
    }

    fn create_image_data(&self, width: f64, height: f64) -> Result<ImageData, HeadlessError> {
        self.check_alive()?;
        let (w, h) = Self::image_size(width, height)?;
        Ok(ImageData::new(w, h))
    }

    fn get_image_data(
        &self,
        sx: f64,
        sy: f64,
        sw: f64,
        sh: f64,
    ) -> Result<ImageData, HeadlessError> {
        self.check_alive()?;
        let (w, h) = Self::image_size(sw, sh)?;
        let x = if sw < 0.0 { sx + sw } else { sx };
        let y = if sh < 0.0 { sy + sh } else { sy };
        Ok(self.bitmap.read(x.floor() as i64, y.floor() as i64, w, h))
    }

    fn put_image_data(
        &mut self,
        data: &ImageData,
        dx: f64,
        dy: f64,
        dirty: Option<Region>,
    ) -> Result<(), HeadlessError> {
        self.check_alive()?;
        self.record(
            Call::new("putImageData")
                .arg(Arg::Image {
                    width: data.width(),
                    height: data.height(),
                })
                .arg(Arg::Num(dx))
                .arg(Arg::Num(dy))
                .arg(dirty.map_or(Arg::Absent, Arg::Region)),
        );
        if dx.is_finite() && dy.is_finite() {
            self.bitmap
                .write(data, dx.floor() as i64, dy.floor() as i64, dirty);
        }
        Ok(())
    }

    fn create_linear_gradient(&self, x0: f64, y0: f64, x1: f64, y1: f64) -> HeadlessGradient {
        HeadlessGradient::new(GradientKind::Linear { x0, y0, x1, y1 })
    }

    fn create_radial_gradient(
        &self,
        x0: f64,
        y0: f64,
        r0: f64,
        x1: f64,
        y1: f64,
        r1: f64,
    ) -> Result<HeadlessGradient, HeadlessError> {
        self.check_alive()?;
        if ![x0, y0, r0, x1, y1, r1].iter().all(|v| v.is_finite()) {
            return Err(HeadlessError::Type("non-finite gradient argument".to_string()));
        }
        if r0 < 0.0 || r1 < 0.0 {
            return Err(HeadlessError::IndexSize(format!(
                "gradient radius ({r0}, {r1}) is negative"
            )));
        }
        Ok(HeadlessGradient::new(GradientKind::Radial {
            x0,
            y0,
            r0,
            x1,
            y1,
            r1,
        }))
    }

    fn create_conic_gradient(
        &self,
        start_angle: f64,
        x: f64,
        y: f64,
    ) -> Result<HeadlessGradient, HeadlessError> {
        self.check_alive()?;
        if ![start_angle, x, y].iter().all(|v| v.is_finite()) {
            return Err(HeadlessError::Type("non-finite gradient argument".to_string()));
        }
        Ok(HeadlessGradient::new(GradientKind::Conic { start_angle, x, y }))
    }

    fn create_pattern(
        &self,
        image: &ImageData,
        repetition: Repetition,
    ) -> Result<Option<HeadlessPattern>, HeadlessError> {
        self.check_alive()?;
        if image.width() == 0 || image.height() == 0 {
            return Err(HeadlessError::InvalidState(
                "pattern source image is empty".to_string(),
            ));
        }
        Ok(Some(HeadlessPattern {
            image: image.clone(),
            repetition,
        }))
    }
}

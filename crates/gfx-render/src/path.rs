//! Canvas path construction on top of `kurbo::BezPath`.
//!
//! Points are transformed by the current transform when they are added,
//! so the stored path is in device space. Calls with non-finite arguments
//! are ignored, and `line_to`/curves on an empty path start a subpath at
//! their first point, as the 2D context does.

use crate::error::HeadlessError;
use kurbo::{Affine, Arc, BezPath, PathEl, Point, Rect, RoundedRect, RoundedRectRadii, Shape, Vec2};
use std::f64::consts::{PI, TAU};

/// Flattening tolerance for arcs and rounded corners, in device pixels.
const TOLERANCE: f64 = 0.1;

fn finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

/// Sweep of a canvas arc from `start` to `end`, negative when anticlockwise.
fn arc_sweep(start: f64, end: f64, anticlockwise: bool) -> f64 {
    if !anticlockwise {
        if end - start >= TAU {
            return TAU;
        }
        (end - start).rem_euclid(TAU)
    } else {
        if start - end >= TAU {
            return -TAU;
        }
        -(start - end).rem_euclid(TAU)
    }
}

fn ellipse_point(center: Point, radii: Vec2, rotation: f64, angle: f64) -> Point {
    let (sin_r, cos_r) = rotation.sin_cos();
    let (sin_a, cos_a) = angle.sin_cos();
    let v = Vec2::new(radii.x * cos_a, radii.y * sin_a);
    center + Vec2::new(v.x * cos_r - v.y * sin_r, v.x * sin_r + v.y * cos_r)
}

/// A path under construction, plus its current point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathBuilder {
    path: BezPath,
    current: Option<Point>,
    subpath_start: Option<Point>,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bez(&self) -> &BezPath {
        &self.path
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Current point in device space.
    pub fn current_point(&self) -> Option<Point> {
        self.current
    }

    fn raw_move(&mut self, p: Point) {
        self.path.move_to(p);
        self.current = Some(p);
        self.subpath_start = Some(p);
    }

    fn raw_line(&mut self, p: Point) {
        if self.current.is_none() {
            self.raw_move(p);
        } else {
            self.path.line_to(p);
            self.current = Some(p);
        }
    }

    fn ensure_subpath(&mut self, p: Point) {
        if self.current.is_none() {
            self.raw_move(p);
        }
    }

    pub fn move_to(&mut self, ctm: Affine, x: f64, y: f64) {
        if finite(&[x, y]) {
            self.raw_move(ctm * Point::new(x, y));
        }
    }

    pub fn line_to(&mut self, ctm: Affine, x: f64, y: f64) {
        if finite(&[x, y]) {
            self.raw_line(ctm * Point::new(x, y));
        }
    }

    pub fn quad_to(&mut self, ctm: Affine, cpx: f64, cpy: f64, x: f64, y: f64) {
        if !finite(&[cpx, cpy, x, y]) {
            return;
        }
        let cp = ctm * Point::new(cpx, cpy);
        let end = ctm * Point::new(x, y);
        self.ensure_subpath(cp);
        self.path.quad_to(cp, end);
        self.current = Some(end);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn curve_to(
        &mut self,
        ctm: Affine,
        cp1x: f64,
        cp1y: f64,
        cp2x: f64,
        cp2y: f64,
        x: f64,
        y: f64,
    ) {
        if !finite(&[cp1x, cp1y, cp2x, cp2y, x, y]) {
            return;
        }
        let cp1 = ctm * Point::new(cp1x, cp1y);
        let cp2 = ctm * Point::new(cp2x, cp2y);
        let end = ctm * Point::new(x, y);
        self.ensure_subpath(cp1);
        self.path.curve_to(cp1, cp2, end);
        self.current = Some(end);
    }

    pub fn close_path(&mut self) {
        if self.current.is_some() {
            self.path.close_path();
            // The next subpath starts where the closed one did.
            if let Some(start) = self.subpath_start {
                self.path.move_to(start);
            }
            self.current = self.subpath_start;
        }
    }

    pub fn rect(&mut self, ctm: Affine, x: f64, y: f64, w: f64, h: f64) {
        if !finite(&[x, y, w, h]) {
            return;
        }
        self.raw_move(ctm * Point::new(x, y));
        self.raw_line(ctm * Point::new(x + w, y));
        self.raw_line(ctm * Point::new(x + w, y + h));
        self.raw_line(ctm * Point::new(x, y + h));
        self.close_path();
        self.raw_move(ctm * Point::new(x, y));
    }

    /// Elliptical arc; `arc` is the circular case.
    #[allow(clippy::too_many_arguments)]
    pub fn ellipse(
        &mut self,
        ctm: Affine,
        x: f64,
        y: f64,
        radius_x: f64,
        radius_y: f64,
        rotation: f64,
        start_angle: f64,
        end_angle: f64,
        anticlockwise: bool,
    ) -> Result<(), HeadlessError> {
        if !finite(&[x, y, radius_x, radius_y, rotation, start_angle, end_angle]) {
            return Ok(());
        }
        if radius_x < 0.0 || radius_y < 0.0 {
            return Err(HeadlessError::IndexSize(format!(
                "radius ({radius_x}, {radius_y}) is negative"
            )));
        }

        let center = Point::new(x, y);
        let radii = Vec2::new(radius_x, radius_y);
        let sweep = arc_sweep(start_angle, end_angle, anticlockwise);
        self.append_arc(ctm, center, radii, rotation, start_angle, sweep);
        Ok(())
    }

    fn append_arc(
        &mut self,
        ctm: Affine,
        center: Point,
        radii: Vec2,
        rotation: f64,
        start_angle: f64,
        sweep: f64,
    ) {
        let start = ellipse_point(center, radii, rotation, start_angle);
        self.raw_line(ctm * start);

        let arc = Arc {
            center,
            radii,
            start_angle,
            sweep_angle: sweep,
            x_rotation: rotation,
        };
        for el in arc.append_iter(TOLERANCE) {
            self.path.push(ctm * el);
        }
        let end = ellipse_point(center, radii, rotation, start_angle + sweep);
        self.current = Some(ctm * end);
    }

    pub fn arc_to(
        &mut self,
        ctm: Affine,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        radius: f64,
    ) -> Result<(), HeadlessError> {
        if !finite(&[x1, y1, x2, y2, radius]) {
            return Ok(());
        }
        if radius < 0.0 {
            return Err(HeadlessError::IndexSize(format!(
                "radius {radius} is negative"
            )));
        }

        let p1 = Point::new(x1, y1);
        let p2 = Point::new(x2, y2);
        let Some(device_current) = self.current else {
            self.raw_move(ctm * p1);
            return Ok(());
        };

        // The current point is compared in user space.
        let p0 = if ctm.determinant() != 0.0 {
            ctm.inverse() * device_current
        } else {
            p1
        };

        let v1 = p0 - p1;
        let v2 = p2 - p1;
        let cross = v1.cross(v2);
        if p0 == p1 || p1 == p2 || radius == 0.0 || cross.abs() < 1e-12 {
            self.raw_line(ctm * p1);
            return Ok(());
        }

        let u1 = v1.normalize();
        let u2 = v2.normalize();
        let half = u1.dot(u2).clamp(-1.0, 1.0).acos() / 2.0;
        let tangent_dist = radius / half.tan();
        let t1 = p1 + u1 * tangent_dist;
        let t2 = p1 + u2 * tangent_dist;
        let bisector = (u1 + u2).normalize();
        let center = p1 + bisector * (radius / half.sin());

        let start_angle = (t1 - center).atan2();
        let end_angle = (t2 - center).atan2();
        let mut sweep = end_angle - start_angle;
        while sweep > PI {
            sweep -= TAU;
        }
        while sweep < -PI {
            sweep += TAU;
        }

        self.append_arc(
            ctm,
            center,
            Vec2::new(radius, radius),
            0.0,
            start_angle,
            sweep,
        );
        Ok(())
    }

    /// `roundRect` with one to four radii, in the canvas order
    /// (all), (tl+br, tr+bl), (tl, tr+bl, br), (tl, tr, br, bl).
    pub fn round_rect(
        &mut self,
        ctm: Affine,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        radii: &[f64],
    ) -> Result<(), HeadlessError> {
        if !finite(&[x, y, w, h]) || !finite(radii) {
            return Ok(());
        }
        let (tl, tr, br, bl) = match *radii {
            [r] => (r, r, r, r),
            [a, b] => (a, b, a, b),
            [a, b, c] => (a, b, c, b),
            [a, b, c, d] => (a, b, c, d),
            _ => {
                return Err(HeadlessError::Range(format!(
                    "{} radii given, expected 1 to 4",
                    radii.len()
                )));
            }
        };
        if [tl, tr, br, bl].iter().any(|r| *r < 0.0) {
            return Err(HeadlessError::Range(format!("negative radius in {radii:?}")));
        }

        let shape = RoundedRect::from_rect(
            Rect::new(x, y, x + w, y + h).abs(),
            RoundedRectRadii::new(tl, tr, br, bl),
        );
        let mut first = true;
        for el in shape.path_elements(TOLERANCE) {
            match ctm * el {
                PathEl::MoveTo(p) if first => {
                    self.raw_move(p);
                    first = false;
                }
                PathEl::ClosePath => self.close_path(),
                el => {
                    self.path.push(el);
                    self.current = el.end_point();
                }
            }
        }
        self.raw_move(ctm * Point::new(x, y));
        Ok(())
    }
}

/// A reusable path object (`Path2D`), built in its own coordinate space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadlessPath {
    builder: PathBuilder,
}

impl HeadlessPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(mut self, x: f64, y: f64) -> Self {
        self.builder.move_to(Affine::IDENTITY, x, y);
        self
    }

    pub fn line_to(mut self, x: f64, y: f64) -> Self {
        self.builder.line_to(Affine::IDENTITY, x, y);
        self
    }

    pub fn rect(mut self, x: f64, y: f64, w: f64, h: f64) -> Self {
        self.builder.rect(Affine::IDENTITY, x, y, w, h);
        self
    }

    pub fn arc(
        mut self,
        x: f64,
        y: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        anticlockwise: bool,
    ) -> Result<Self, HeadlessError> {
        self.builder.ellipse(
            Affine::IDENTITY,
            x,
            y,
            radius,
            radius,
            0.0,
            start_angle,
            end_angle,
            anticlockwise,
        )?;
        Ok(self)
    }

    pub fn close_path(mut self) -> Self {
        self.builder.close_path();
        self
    }

    pub fn bez(&self) -> &BezPath {
        self.builder.bez()
    }
}

/// Copy of `path` with every open subpath closed, for fill-rule tests.
pub fn closed(path: &BezPath) -> BezPath {
    let mut out = BezPath::new();
    let mut open = false;
    for el in path.elements() {
        match el {
            PathEl::MoveTo(_) => {
                if open {
                    out.close_path();
                }
                open = true;
            }
            PathEl::ClosePath => open = false,
            _ => {}
        }
        out.push(*el);
    }
    if open {
        out.close_path();
    }
    out
}

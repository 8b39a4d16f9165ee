//! RGBA pixel buffers: `ImageData` and the canvas bitmap.

use crate::error::HeadlessError;
use gfx_core::Region;
use kurbo::{Affine, Point, Rect};

pub type Rgba = [u8; 4];

/// Transparent black, the value of pixels outside the bitmap.
pub const TRANSPARENT: Rgba = [0, 0, 0, 0];
/// What a cleared pixel reads back as on an opaque surface.
pub const OPAQUE_BLACK: Rgba = [0, 0, 0, 255];

/// Row-major RGBA8 pixels, four bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl ImageData {
    /// Transparent black image of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, TRANSPARENT)
    }

    pub fn filled(width: u32, height: u32, rgba: Rgba) -> Self {
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self {
            width,
            height,
            data,
        }
    }

    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, HeadlessError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(HeadlessError::IndexSize(format!(
                "{} bytes for a {width}x{height} image, expected {expected}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn offset(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 4)
    }

    /// Pixel at `(x, y)`, transparent black outside the image.
    pub fn pixel(&self, x: i64, y: i64) -> Rgba {
        match self.offset(x, y) {
            Some(i) => [
                self.data[i],
                self.data[i + 1],
                self.data[i + 2],
                self.data[i + 3],
            ],
            None => TRANSPARENT,
        }
    }

    pub fn set_pixel(&mut self, x: i64, y: i64, rgba: Rgba) {
        if let Some(i) = self.offset(x, y) {
            self.data[i..i + 4].copy_from_slice(&rgba);
        }
    }

    pub fn fill(&mut self, rgba: Rgba) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    /// Set every pixel whose center lies in `rect` (user space, mapped
    /// through `ctm`) to `rgba`.
    pub fn fill_transformed(&mut self, ctm: Affine, rect: Region, rgba: Rgba) {
        if ctm.determinant() == 0.0 {
            return;
        }
        let user = Rect::new(rect.x, rect.y, rect.x + rect.width, rect.y + rect.height).abs();
        let device = ctm.transform_rect_bbox(user);
        let inverse = ctm.inverse();

        let x0 = device.x0.floor().max(0.0) as i64;
        let y0 = device.y0.floor().max(0.0) as i64;
        let x1 = device.x1.ceil().min(self.width as f64) as i64;
        let y1 = device.y1.ceil().min(self.height as f64) as i64;

        for y in y0..y1 {
            for x in x0..x1 {
                let center = inverse * Point::new(x as f64 + 0.5, y as f64 + 0.5);
                if center.x >= user.x0
                    && center.x < user.x1
                    && center.y >= user.y0
                    && center.y < user.y1
                {
                    self.set_pixel(x, y, rgba);
                }
            }
        }
    }

    /// Copy out a `sw`x`sh` block starting at `(sx, sy)`. Coordinates
    /// past `i64` range read as outside the bitmap.
    pub fn read(&self, sx: i64, sy: i64, sw: u32, sh: u32) -> ImageData {
        let mut out = ImageData::new(sw, sh);
        for y in 0..sh as i64 {
            for x in 0..sw as i64 {
                out.set_pixel(x, y, self.pixel(sx.saturating_add(x), sy.saturating_add(y)));
            }
        }
        out
    }

    /// Write the `dirty` part of `src` with its origin at `(dx, dy)`.
    /// No transform, no compositing.
    pub fn write(&mut self, src: &ImageData, dx: i64, dy: i64, dirty: Option<Region>) {
        let (w, h) = (self.width as i64, self.height as i64);
        let (sw, sh) = (src.width as i64, src.height as i64);
        if dx >= w || dy >= h || dx.saturating_add(sw) <= 0 || dy.saturating_add(sh) <= 0 {
            return;
        }
        let full = Region::new(0.0, 0.0, src.width as f64, src.height as f64);
        let Region {
            mut x,
            mut y,
            mut width,
            mut height,
        } = dirty.unwrap_or(full);
        if width < 0.0 {
            x += width;
            width = -width;
        }
        if height < 0.0 {
            y += height;
            height = -height;
        }
        let x0 = x.max(0.0) as i64;
        let y0 = y.max(0.0) as i64;
        let x1 = (x + width).min(src.width as f64) as i64;
        let y1 = (y + height).min(src.height as f64) as i64;

        for sy in y0..y1 {
            for sx in x0..x1 {
                self.set_pixel(dx.saturating_add(sx), dy.saturating_add(sy), src.pixel(sx, sy));
            }
        }
    }
}

use crate::hats::color::Color;
use crate::hats::painter::MarkerSurface;
use crate::hats::resolver::ScreenPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundClearMode {
    Transparent,
    Solid(Color),
}

/// RGBA framebuffer for hosts that composite the overlay as a bitmap.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    rgba: Vec<u8>,
    size: (u32, u32),
    color: Color,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        Self {
            rgba: vec![0; len],
            size: (width, height),
            color: Color::rgb(255, 255, 255),
        }
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn rgba_pixels(&self) -> &[u8] {
        &self.rgba
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.size.0 || y >= self.size.1 {
            return None;
        }
        let idx = ((y * self.size.0 + x) * 4) as usize;
        let px = self.rgba.get(idx..idx + 4)?;
        Some(Color::rgba(px[0], px[1], px[2], px[3]))
    }

    pub fn clear(&mut self, mode: BackgroundClearMode) {
        let clear = match mode {
            BackgroundClearMode::Transparent => Color::rgba(0, 0, 0, 0),
            BackgroundClearMode::Solid(color) => color,
        };
        for px in self.rgba.chunks_exact_mut(4) {
            px.copy_from_slice(&[clear.r, clear.g, clear.b, clear.a]);
        }
    }

    pub fn to_bgra(&self) -> Vec<u8> {
        let mut bgra = vec![0; self.rgba.len()];
        convert_rgba_to_bgra(&self.rgba, &mut bgra);
        bgra
    }

    fn set_pixel(&mut self, x: i32, y: i32) {
        let (width, height) = self.size;
        if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
            return;
        }

        let idx = ((y as u32 * width + x as u32) * 4) as usize;
        if idx + 3 >= self.rgba.len() {
            return;
        }

        self.rgba[idx] = self.color.r;
        self.rgba[idx + 1] = self.color.g;
        self.rgba[idx + 2] = self.color.b;
        self.rgba[idx + 3] = self.color.a;
    }
}

impl MarkerSurface for RasterSurface {
    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Fills every pixel whose center lies inside the circle, clipped to the
    /// surface.
    fn fill_circle(&mut self, center: ScreenPoint, diameter: u32) {
        let radius = diameter.max(1) as f64 * 0.5;
        let r2 = radius * radius;
        let cx = center.x as f64;
        let cy = center.y as f64;
        let reach = radius.ceil() as i64;

        let (width, height) = self.size;
        let x0 = (center.x as i64 - reach).max(0);
        let x1 = (center.x as i64 + reach).min(width as i64 - 1);
        let y0 = (center.y as i64 - reach).max(0);
        let y1 = (center.y as i64 + reach).min(height as i64 - 1);
        if x1 < x0 || y1 < y0 {
            return;
        }

        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f64 + 0.5 - cx;
                let dy = y as f64 + 0.5 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.set_pixel(x as i32, y as i32);
                }
            }
        }
    }
}

pub fn convert_rgba_to_bgra(rgba: &[u8], bgra: &mut [u8]) {
    assert_eq!(rgba.len(), bgra.len());
    for (src, dst) in rgba.chunks_exact(4).zip(bgra.chunks_exact_mut(4)) {
        dst[0] = src[2];
        dst[1] = src[1];
        dst[2] = src[0];
        dst[3] = src[3];
    }
}

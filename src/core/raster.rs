//! CPU rasterizer for [`TimelineFrame`]
//!
//! Fills, grid lines, traces and the pause tint are rendered into an RGBA8
//! buffer. Labels carry no glyphs here; text is painted by the egui backend.

use super::timeline::{palette, TimelineFrame};

/// RGBA8 pixel buffer, row-major, top-left origin
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Raster {
    pub fn new(width: u32, height: u32, fill: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(count * 4);
        for _ in 0..count {
            pixels.extend_from_slice(&fill);
        }
        Self { width, height, pixels }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.offset(x, y);
        Some([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2], self.pixels[i + 3]])
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Source-over blend of `color` onto one pixel; out-of-bounds is ignored
    pub fn blend(&mut self, x: i64, y: i64, color: [u8; 4]) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let i = self.offset(x as u32, y as u32);
        let alpha = color[3] as u32;
        if alpha == 255 {
            self.pixels[i..i + 4].copy_from_slice(&color);
            return;
        }
        for c in 0..3 {
            let dst = self.pixels[i + c] as u32;
            let src = color[c] as u32;
            self.pixels[i + c] = ((src * alpha + dst * (255 - alpha) + 127) / 255) as u8;
        }
        let dst_a = self.pixels[i + 3] as u32;
        self.pixels[i + 3] = (alpha + dst_a * (255 - alpha) / 255).min(255) as u8;
    }

    pub fn fill(&mut self, color: [u8; 4]) {
        for y in 0..self.height as i64 {
            for x in 0..self.width as i64 {
                self.blend(x, y, color);
            }
        }
    }

    /// 1px column at `x` (clamped so the right edge stays visible)
    pub fn vline(&mut self, x: f32, color: [u8; 4]) {
        let col = clamp_coord(x, self.width);
        for y in 0..self.height as i64 {
            self.blend(col, y, color);
        }
    }

    /// 1px row at `y` (clamped so the bottom edge stays visible)
    pub fn hline(&mut self, y: f32, color: [u8; 4]) {
        let row = clamp_coord(y, self.height);
        for x in 0..self.width as i64 {
            self.blend(x, row, color);
        }
    }

    /// Polyline stroked with a square pen of `thickness` pixels
    pub fn polyline(&mut self, points: &[[f32; 2]], thickness: f32, color: [u8; 4]) {
        let pen = thickness.round().max(1.0) as i64;
        if let [only] = points {
            self.stamp(only[0], only[1], pen, color);
        }
        for pair in points.windows(2) {
            let [x0, y0] = pair[0];
            let [x1, y1] = pair[1];
            let steps = (x1 - x0).abs().max((y1 - y0).abs()).ceil().max(1.0) as i64;
            for s in 0..=steps {
                let t = s as f32 / steps as f32;
                self.stamp(x0 + (x1 - x0) * t, y0 + (y1 - y0) * t, pen, color);
            }
        }
    }

    fn stamp(&mut self, x: f32, y: f32, pen: i64, color: [u8; 4]) {
        let cx = x.round() as i64;
        let cy = y.round() as i64;
        let lo = -(pen / 2);
        for dy in lo..lo + pen {
            for dx in lo..lo + pen {
                self.put(cx + dx, cy + dy, color);
            }
        }
    }

    // Opaque write; a thick pen overlaps itself so blending would double up
    fn put(&mut self, x: i64, y: i64, color: [u8; 4]) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let i = self.offset(x as u32, y as u32);
        self.pixels[i..i + 4].copy_from_slice(&color);
    }

    /// Binary PPM (P6), alpha dropped
    pub fn to_ppm(&self) -> Vec<u8> {
        let header = format!("P6\n{} {}\n255\n", self.width, self.height);
        let mut out = Vec::with_capacity(header.len() + self.pixels.len() / 4 * 3);
        out.extend_from_slice(header.as_bytes());
        for px in self.pixels.chunks_exact(4) {
            out.extend_from_slice(&px[..3]);
        }
        out
    }
}

fn clamp_coord(v: f32, extent: u32) -> i64 {
    (v.round() as i64).clamp(0, extent.saturating_sub(1) as i64)
}

/// Render a frame into a fresh raster
pub fn rasterize(frame: &TimelineFrame) -> Raster {
    let mut raster = Raster::new(frame.width, frame.height, palette::BACKGROUND);

    for &x in &frame.vertical_grid {
        raster.vline(x, palette::GRID);
    }
    for &y in &frame.horizontal_grid {
        raster.hline(y, palette::GRID);
    }
    for lane in &frame.lanes {
        raster.polyline(&lane.trace, frame.trace_width, palette::TRACE);
    }
    if let Some(overlay) = &frame.overlay {
        raster.fill(overlay.tint);
    }
    raster
}

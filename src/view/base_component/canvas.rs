use crate::style::Color;
use image::{Rgba, RgbaImage};
use std::rc::Rc;

/// Pixel buffer of packed `0xRRGGBBAA` values plus the raster it is presented through.
/// The raster is resynchronized after every drawing call.
#[derive(Debug, Clone)]
pub struct CanvasState {
    width: i32,
    height: i32,
    pixels: Vec<u32>,
    texture: Rc<RgbaImage>,
}

impl CanvasState {
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            pixels: vec![0; (width * height) as usize],
            texture: Rc::new(RgbaImage::new(width as u32, height as u32)),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|i| Color::from_u32(self.pixels[i]))
    }

    pub fn texture(&self) -> Rc<RgbaImage> {
        Rc::clone(&self.texture)
    }

    /// Drops the current contents and allocates a cleared buffer of the new size.
    pub fn resize(&mut self, width: i32, height: i32) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color.to_u32());
        self.sync_texture();
    }

    pub fn draw_pixel(&mut self, x: i32, y: i32, color: Color) {
        if self.put(x, y, color) {
            self.sync_texture();
        }
    }

    /// Bresenham line, endpoints included.
    pub fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: Color) {
        let (mut x, mut y) = (x1, y1);
        let dx = (x2 - x1).abs();
        let dy = (y2 - y1).abs();
        let sx = if x1 < x2 { 1 } else { -1 };
        let sy = if y1 < y2 { 1 } else { -1 };
        let mut err = dx - dy;

        loop {
            self.put(x, y, color);
            if x == x2 && y == y2 {
                break;
            }
            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += sx;
            }
            if e2 < dx {
                err += dx;
                y += sy;
            }
        }
        self.sync_texture();
    }

    pub fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color, filled: bool) {
        if filled {
            for py in y..y + h {
                for px in x..x + w {
                    self.put(px, py, color);
                }
            }
        } else {
            for px in x..x + w {
                self.put(px, y, color);
                self.put(px, y + h - 1, color);
            }
            for py in y..y + h {
                self.put(x, py, color);
                self.put(x + w - 1, py, color);
            }
        }
        self.sync_texture();
    }

    /// Filled circles cover every point with `dx² + dy² <= r²`; outlines use the midpoint
    /// algorithm with its eight-way symmetry.
    pub fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Color, filled: bool) {
        if filled {
            for dy in -radius..=radius {
                for dx in -radius..=radius {
                    if dx * dx + dy * dy <= radius * radius {
                        self.put(cx + dx, cy + dy, color);
                    }
                }
            }
        } else {
            let mut x = 0;
            let mut y = radius;
            let mut d = 3 - 2 * radius;
            while y >= x {
                for (px, py) in [
                    (cx + x, cy + y),
                    (cx - x, cy + y),
                    (cx + x, cy - y),
                    (cx - x, cy - y),
                    (cx + y, cy + x),
                    (cx - y, cy + x),
                    (cx + y, cy - x),
                    (cx - y, cy - x),
                ] {
                    self.put(px, py, color);
                }
                x += 1;
                if d > 0 {
                    y -= 1;
                    d += 4 * (x - y) + 10;
                } else {
                    d += 4 * x + 6;
                }
            }
        }
        self.sync_texture();
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        (x >= 0 && x < self.width && y >= 0 && y < self.height)
            .then(|| (y * self.width + x) as usize)
    }

    fn put(&mut self, x: i32, y: i32, color: Color) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.pixels[i] = color.to_u32();
                true
            }
            None => false,
        }
    }

    fn sync_texture(&mut self) {
        let texture = Rc::make_mut(&mut self.texture);
        for (dst, packed) in texture.pixels_mut().zip(self.pixels.iter()) {
            *dst = Rgba(Color::from_u32(*packed).to_rgba_u8());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CanvasState;
    use crate::style::Color;

    const RED: Color = Color::rgb(255, 0, 0);

    fn lit(canvas: &CanvasState) -> usize {
        canvas.pixels().iter().filter(|p| **p == RED.to_u32()).count()
    }

    #[test]
    fn line_covers_both_endpoints_and_stays_in_bounds() {
        let mut canvas = CanvasState::new(10, 10);
        canvas.draw_line(-5, 0, 9, 9, RED);
        assert_eq!(canvas.pixel(9, 9), Some(RED));
        canvas.draw_line(0, 4, 9, 4, RED);
        assert_eq!(canvas.pixel(0, 4), Some(RED));
        assert_eq!(canvas.pixel(9, 4), Some(RED));
    }

    #[test]
    fn filled_circle_matches_the_disc_equation() {
        let mut canvas = CanvasState::new(11, 11);
        canvas.draw_circle(5, 5, 2, RED, true);
        assert_eq!(lit(&canvas), 13);
        assert_eq!(canvas.pixel(5, 3), Some(RED));
        assert_eq!(canvas.pixel(4, 3), Some(Color::from_u32(0)));
    }

    #[test]
    fn outlined_rect_only_touches_the_border() {
        let mut canvas = CanvasState::new(8, 8);
        canvas.draw_rect(1, 1, 4, 3, RED, false);
        assert_eq!(lit(&canvas), 10);
        assert_eq!(canvas.pixel(2, 2), Some(Color::from_u32(0)));
    }

    #[test]
    fn texture_tracks_every_draw_call() {
        let mut canvas = CanvasState::new(4, 4);
        let before = canvas.texture();
        canvas.clear(Color::rgba(1, 2, 3, 4));
        canvas.draw_pixel(3, 0, RED);
        let after = canvas.texture();
        assert_eq!(after.get_pixel(0, 0).0, [1, 2, 3, 4]);
        assert_eq!(after.get_pixel(3, 0).0, [255, 0, 0, 255]);
        assert_eq!(before.get_pixel(0, 0).0, [0, 0, 0, 0]);
    }

    #[test]
    fn resize_reallocates_a_cleared_buffer() {
        let mut canvas = CanvasState::new(2, 2);
        canvas.clear(RED);
        canvas.resize(3, 5);
        assert_eq!(canvas.pixels().len(), 15);
        assert_eq!(lit(&canvas), 0);
        assert_eq!(canvas.texture().dimensions(), (3, 5));
    }
}

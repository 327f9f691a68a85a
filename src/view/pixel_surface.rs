use image::{Rgba, RgbaImage};

use crate::style::Color;
use crate::ui::{DrawSurface, Rect};

/// Software render target backed by an `RgbaImage`. Every draw is source-over blended and
/// clipped to the innermost pushed clip rect.
pub struct PixelSurface {
    image: RgbaImage,
    clip_stack: Vec<Rect>,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            clip_stack: Vec::new(),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        if x < 0 || y < 0 || x as u32 >= self.image.width() || y as u32 >= self.image.height() {
            return None;
        }
        let [r, g, b, a] = self.image.get_pixel(x as u32, y as u32).0;
        Some(Color::rgba(r, g, b, a))
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.image = RgbaImage::new(width, height);
        self.clip_stack.clear();
    }

    fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.image.width() as i32, self.image.height() as i32)
    }

    fn active_clip(&self) -> Rect {
        self.clip_stack.last().copied().unwrap_or_else(|| self.bounds())
    }

    fn blend_pixel(&mut self, x: i32, y: i32, rgba: [u8; 4], alpha: u8) {
        let clip = self.active_clip();
        if x < clip.x || y < clip.y || x >= clip.x + clip.w || y >= clip.y + clip.h {
            return;
        }
        let a = rgba[3] as u32 * alpha as u32 / 255;
        if a == 0 {
            return;
        }
        let inv_a = 255 - a;
        let dst = self.image.get_pixel_mut(x as u32, y as u32);
        let mix = |fg: u8, bg: u8| ((fg as u32 * a + bg as u32 * inv_a) / 255) as u8;
        *dst = Rgba([
            mix(rgba[0], dst[0]),
            mix(rgba[1], dst[1]),
            mix(rgba[2], dst[2]),
            (a + dst[3] as u32 * inv_a / 255) as u8,
        ]);
    }
}

impl DrawSurface for PixelSurface {
    fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn clear(&mut self, color: Color) {
        let fill = Rgba(color.to_rgba_u8());
        for pixel in self.image.pixels_mut() {
            *pixel = fill;
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let area = rect.intersect(&self.active_clip());
        let rgba = color.to_rgba_u8();
        for y in area.y..area.y + area.h {
            for x in area.x..area.x + area.w {
                self.blend_pixel(x, y, rgba, 255);
            }
        }
    }

    fn draw_rect_outline(&mut self, rect: Rect, color: Color) {
        if rect.is_empty() {
            return;
        }
        let Rect { x, y, w, h } = rect;
        self.fill_rect(Rect::new(x, y, w, 1), color);
        if h > 1 {
            self.fill_rect(Rect::new(x, y + h - 1, w, 1), color);
        }
        self.fill_rect(Rect::new(x, y + 1, 1, h - 2), color);
        if w > 1 {
            self.fill_rect(Rect::new(x + w - 1, y + 1, 1, h - 2), color);
        }
    }

    fn draw_point(&mut self, x: i32, y: i32, color: Color) {
        self.blend_pixel(x, y, color.to_rgba_u8(), 255);
    }

    fn push_clip(&mut self, rect: Rect) {
        let clip = rect.intersect(&self.active_clip());
        self.clip_stack.push(clip);
    }

    fn pop_clip(&mut self) {
        self.clip_stack.pop();
    }

    fn draw_image(&mut self, x: i32, y: i32, image: &RgbaImage, alpha: u8) {
        for (sx, sy, pixel) in image.enumerate_pixels() {
            self.blend_pixel(x + sx as i32, y + sy as i32, pixel.0, alpha);
        }
    }

    fn blit_image(&mut self, image: &RgbaImage, dst: Rect, alpha: u8) {
        if dst.is_empty() || image.width() == 0 || image.height() == 0 {
            return;
        }
        let area = dst.intersect(&self.active_clip());
        for y in area.y..area.y + area.h {
            let sy = ((y - dst.y) as u64 * image.height() as u64 / dst.h as u64) as u32;
            for x in area.x..area.x + area.w {
                let sx = ((x - dst.x) as u64 * image.width() as u64 / dst.w as u64) as u32;
                let pixel = image.get_pixel(sx, sy).0;
                self.blend_pixel(x, y, pixel, alpha);
            }
        }
    }
}

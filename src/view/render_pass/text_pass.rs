use std::path::Path;
use std::sync::Arc;

use cosmic_text::fontdb::Source;
use cosmic_text::{
    Align, Attrs, Buffer, Color as TextColor, Family, FontSystem, Metrics, Shaping, SwashCache,
};
use image::{Rgba, RgbaImage};

use crate::error::{Result, WidgetError};
use crate::style::Color;
use crate::ui::TextService;
use crate::view::render_pass::{PassContext, RenderPass};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    /// `x` is the left edge.
    Start,
    /// `x` is the horizontal center.
    Center,
}

/// One line of text, vertically centered on `y`.
pub struct TextPass {
    content: String,
    x: i32,
    y: i32,
    color: Color,
    anchor: TextAnchor,
}

impl TextPass {
    pub fn new(content: impl Into<String>, x: i32, y: i32, color: Color, anchor: TextAnchor) -> Self {
        Self {
            content: content.into(),
            x,
            y,
            color,
            anchor,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

impl RenderPass for TextPass {
    fn execute(&mut self, ctx: &mut PassContext<'_>) {
        if self.content.is_empty() {
            return;
        }
        let Some(raster) = ctx.text.rasterize(&self.content, self.color.with_alpha(255)) else {
            return;
        };
        let (w, h) = (raster.width() as i32, raster.height() as i32);
        let left = match self.anchor {
            TextAnchor::Start => self.x,
            TextAnchor::Center => self.x - w / 2,
        };
        ctx.surface
            .draw_image(left, self.y - h / 2, &raster, self.color.a());
    }
}

/// Shapes and rasterizes text with cosmic-text. Loading a font switches the active family;
/// before any load the system default face is used.
pub struct CosmicTextService {
    font_system: FontSystem,
    swash_cache: SwashCache,
    family: Option<String>,
    font_size: f32,
    line_height: f32,
}

impl CosmicTextService {
    pub fn new(font_size: f32) -> Self {
        let font_size = font_size.max(1.0);
        Self {
            font_system: FontSystem::new(),
            swash_cache: SwashCache::new(),
            family: None,
            font_size,
            line_height: (font_size * 1.25).ceil(),
        }
    }

    pub fn family(&self) -> Option<&str> {
        self.family.as_deref()
    }

    fn prepare_buffer(&mut self, content: &str) -> Buffer {
        let mut buffer = Buffer::new(
            &mut self.font_system,
            Metrics::new(self.font_size, self.line_height),
        );
        buffer.set_size(&mut self.font_system, None, None);
        let attrs = match self.family.as_deref() {
            Some(family) => Attrs::new().family(Family::Name(family)),
            None => Attrs::new(),
        };
        buffer.set_text(
            &mut self.font_system,
            content,
            &attrs,
            Shaping::Advanced,
            Some(Align::Left),
        );
        buffer.shape_until_scroll(&mut self.font_system, false);
        buffer
    }

    fn line_width(buffer: &Buffer) -> f32 {
        buffer
            .layout_runs()
            .map(|run| run.line_w)
            .fold(0.0, f32::max)
    }
}

impl Default for CosmicTextService {
    fn default() -> Self {
        Self::new(16.0)
    }
}

impl TextService for CosmicTextService {
    fn measure(&mut self, text: &str) -> i32 {
        if text.is_empty() {
            return 0;
        }
        let buffer = self.prepare_buffer(text);
        Self::line_width(&buffer).ceil() as i32
    }

    fn line_height(&self) -> i32 {
        self.line_height as i32
    }

    fn rasterize(&mut self, text: &str, color: Color) -> Option<RgbaImage> {
        if text.is_empty() {
            return None;
        }
        let buffer = self.prepare_buffer(text);
        let width = Self::line_width(&buffer).ceil() as u32;
        let height = self.line_height.ceil() as u32;
        if width == 0 || height == 0 {
            return None;
        }

        let mut raster = RgbaImage::new(width, height);
        let [r, g, b, a] = color.to_rgba_u8();
        buffer.draw(
            &mut self.font_system,
            &mut self.swash_cache,
            TextColor::rgba(r, g, b, a),
            |x, y, w, h, glyph| {
                for py in y.max(0)..(y + h as i32).min(height as i32) {
                    for px in x.max(0)..(x + w as i32).min(width as i32) {
                        let dst = raster.get_pixel_mut(px as u32, py as u32);
                        if glyph.a() > dst[3] {
                            *dst = Rgba([glyph.r(), glyph.g(), glyph.b(), glyph.a()]);
                        }
                    }
                }
            },
        );
        Some(raster)
    }

    fn load_font(&mut self, path: &Path, size: f32) -> Result<()> {
        let data = std::fs::read(path).map_err(|source| WidgetError::FontLoad {
            path: path.to_path_buf(),
            source,
        })?;
        let ids = self
            .font_system
            .db_mut()
            .load_font_source(Source::Binary(Arc::new(data)));
        let family = ids
            .iter()
            .filter_map(|id| self.font_system.db().face(*id))
            .find_map(|face| face.families.first().map(|(name, _)| name.clone()))
            .ok_or_else(|| WidgetError::FontFamilyMissing {
                path: path.to_path_buf(),
            })?;

        log::debug!("active font family is now {family:?} at {size}px");
        self.family = Some(family);
        self.font_size = size.max(1.0);
        self.line_height = (self.font_size * 1.25).ceil();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{TextAnchor, TextPass};
    use crate::error::Result;
    use crate::style::Color;
    use crate::ui::{DrawSurface, TextService};
    use crate::view::PixelSurface;
    use crate::view::render_pass::{PassContext, RenderPass};
    use image::{Rgba, RgbaImage};
    use std::path::Path;

    /// Rasterizes every string as a solid block, 2px per character and 4px tall.
    struct BlockText;

    impl TextService for BlockText {
        fn measure(&mut self, text: &str) -> i32 {
            text.chars().count() as i32 * 2
        }

        fn line_height(&self) -> i32 {
            4
        }

        fn rasterize(&mut self, text: &str, color: Color) -> Option<RgbaImage> {
            let w = self.measure(text) as u32;
            Some(RgbaImage::from_pixel(w, 4, Rgba(color.to_rgba_u8())))
        }

        fn load_font(&mut self, _path: &Path, _size: f32) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn centered_text_straddles_its_anchor() {
        let mut surface = PixelSurface::new(20, 10);
        surface.clear(Color::BLACK);
        let mut text = BlockText;
        let mut pass = TextPass::new("abc", 10, 5, Color::WHITE, TextAnchor::Center);
        pass.execute(&mut PassContext {
            surface: &mut surface,
            text: &mut text,
        });
        // 6px wide, 4px tall: columns 7..13, rows 3..7
        assert_eq!(surface.pixel(7, 3), Some(Color::WHITE));
        assert_eq!(surface.pixel(12, 6), Some(Color::WHITE));
        assert_eq!(surface.pixel(6, 3), Some(Color::BLACK));
        assert_eq!(surface.pixel(13, 3), Some(Color::BLACK));
        assert_eq!(surface.pixel(7, 7), Some(Color::BLACK));
    }
}

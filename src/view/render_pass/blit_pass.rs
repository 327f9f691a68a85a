use std::rc::Rc;

use image::RgbaImage;

use crate::ui::Rect;
use crate::view::render_pass::{PassContext, RenderPass};

/// Presents a raster scaled into `dst`.
pub struct BlitPass {
    image: Rc<RgbaImage>,
    dst: Rect,
    alpha: u8,
}

impl BlitPass {
    pub fn new(image: Rc<RgbaImage>, dst: Rect, alpha: u8) -> Self {
        Self { image, dst, alpha }
    }

    pub fn alpha(&self) -> u8 {
        self.alpha
    }
}

impl RenderPass for BlitPass {
    fn execute(&mut self, ctx: &mut PassContext<'_>) {
        if self.dst.is_empty() {
            return;
        }
        ctx.surface.blit_image(&self.image, self.dst, self.alpha);
    }
}

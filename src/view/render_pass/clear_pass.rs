use crate::style::Color;
use crate::view::render_pass::{PassContext, RenderPass};

/// Fills the whole target. The clear is always opaque.
pub struct ClearPass {
    color: Color,
}

impl ClearPass {
    pub fn new(color: Color) -> Self {
        Self {
            color: color.with_alpha(255),
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color.with_alpha(255);
    }
}

impl RenderPass for ClearPass {
    fn execute(&mut self, ctx: &mut PassContext<'_>) {
        ctx.surface.clear(self.color);
    }
}

use crate::style::Color;
use crate::ui::Rect;
use crate::view::render_pass::{PassContext, RenderPass};

/// `width` concentric one-pixel strokes, each inset one pixel from the last.
pub struct OutlinePass {
    rect: Rect,
    width: i32,
    color: Color,
}

impl OutlinePass {
    pub fn new(rect: Rect, width: i32, color: Color) -> Self {
        Self { rect, width, color }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn width(&self) -> i32 {
        self.width
    }
}

impl RenderPass for OutlinePass {
    fn execute(&mut self, ctx: &mut PassContext<'_>) {
        for i in 0..self.width.max(0) {
            ctx.surface
                .draw_rect_outline(self.rect.inset(i), self.color);
        }
    }
}

use crate::style::Color;
use crate::ui::Rect;
use crate::view::render_pass::{PassContext, RenderPass};

pub struct DrawRectPass {
    rect: Rect,
    color: Color,
    radius: Option<i32>,
}

impl DrawRectPass {
    pub fn new(rect: Rect, color: Color) -> Self {
        Self {
            rect,
            color,
            radius: None,
        }
    }

    pub fn rounded(rect: Rect, color: Color, radius: i32) -> Self {
        Self {
            rect,
            color,
            radius: Some(radius),
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn radius(&self) -> Option<i32> {
        self.radius
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Radius clamped to half the shorter side.
    pub fn effective_radius(&self) -> i32 {
        self.radius
            .unwrap_or(0)
            .min(self.rect.w / 2)
            .min(self.rect.h / 2)
            .max(0)
    }
}

impl RenderPass for DrawRectPass {
    fn execute(&mut self, ctx: &mut PassContext<'_>) {
        let r = self.effective_radius();
        if r == 0 {
            ctx.surface.fill_rect(self.rect, self.color);
            return;
        }

        let Rect { x, y, w, h } = self.rect;
        // center band, then the left and right bands between the corners
        ctx.surface.fill_rect(Rect::new(x + r, y, w - 2 * r, h), self.color);
        ctx.surface.fill_rect(Rect::new(x, y + r, r, h - 2 * r), self.color);
        ctx.surface.fill_rect(Rect::new(x + w - r, y + r, r, h - 2 * r), self.color);

        for dy in 0..r {
            for dx in 0..r {
                if dx * dx + dy * dy > r * r {
                    continue;
                }
                ctx.surface.draw_point(x + r - dx, y + r - dy, self.color);
                ctx.surface.draw_point(x + w - r + dx - 1, y + r - dy, self.color);
                ctx.surface.draw_point(x + r - dx, y + h - r + dy - 1, self.color);
                ctx.surface.draw_point(x + w - r + dx - 1, y + h - r + dy - 1, self.color);
            }
        }
    }
}

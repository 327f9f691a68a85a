use crate::ui::Rect;
use crate::view::base_component::Gradient;
use crate::view::render_pass::{PassContext, RenderPass};

/// Linear gradient painted as one-pixel strips: rows for near-vertical angles, columns
/// otherwise.
pub struct GradientPass {
    rect: Rect,
    gradient: Gradient,
    opacity: f32,
}

impl GradientPass {
    pub fn new(rect: Rect, gradient: Gradient, opacity: f32) -> Self {
        Self {
            rect,
            gradient,
            opacity,
        }
    }

    pub fn gradient(&self) -> &Gradient {
        &self.gradient
    }
}

impl RenderPass for GradientPass {
    fn execute(&mut self, ctx: &mut PassContext<'_>) {
        if self.gradient.stops.len() < 2 || self.rect.is_empty() {
            return;
        }
        let Rect { x, y, w, h } = self.rect;
        if self.gradient.is_vertical() {
            for py in 0..h {
                let Some(color) = self.gradient.sample(py as f32 / h as f32) else {
                    return;
                };
                ctx.surface
                    .fill_rect(Rect::new(x, y + py, w, 1), color.fade(self.opacity));
            }
        } else {
            for px in 0..w {
                let Some(color) = self.gradient.sample(px as f32 / w as f32) else {
                    return;
                };
                ctx.surface
                    .fill_rect(Rect::new(x + px, y, 1, h), color.fade(self.opacity));
            }
        }
    }
}

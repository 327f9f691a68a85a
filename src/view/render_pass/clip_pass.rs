use crate::ui::Rect;
use crate::view::render_pass::{PassContext, RenderPass};

pub enum ClipPass {
    Push(Rect),
    Pop,
}

impl RenderPass for ClipPass {
    fn execute(&mut self, ctx: &mut PassContext<'_>) {
        match self {
            ClipPass::Push(rect) => ctx.surface.push_clip(*rect),
            ClipPass::Pop => ctx.surface.pop_clip(),
        }
    }
}

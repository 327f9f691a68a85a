use std::any::Any;

use crate::ui::{DrawSurface, TextService};

pub mod blit_pass;
pub mod clear_pass;
pub mod clip_pass;
pub mod draw_rect_pass;
pub mod gradient_pass;
pub mod outline_pass;
pub mod text_pass;
pub use blit_pass::BlitPass;
pub use clear_pass::ClearPass;
pub use clip_pass::ClipPass;
pub use draw_rect_pass::DrawRectPass;
pub use gradient_pass::GradientPass;
pub use outline_pass::OutlinePass;
pub use text_pass::{CosmicTextService, TextAnchor, TextPass};

pub struct PassContext<'a> {
    pub surface: &'a mut dyn DrawSurface,
    pub text: &'a mut dyn TextService,
}

pub trait RenderPass {
    fn execute(&mut self, ctx: &mut PassContext<'_>);
}

pub trait RenderPassDyn {
    fn execute(&mut self, ctx: &mut PassContext<'_>);
    fn name(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
}

pub struct PassWrapper<P: RenderPass> {
    pub pass: P,
}

impl<P: RenderPass + 'static> RenderPassDyn for PassWrapper<P> {
    fn execute(&mut self, ctx: &mut PassContext<'_>) {
        self.pass.execute(ctx);
    }

    fn name(&self) -> &'static str {
        std::any::type_name::<P>()
    }

    fn as_any(&self) -> &dyn Any {
        &self.pass
    }
}

/// Passes recorded for one frame, executed in recording order.
#[derive(Default)]
pub struct PassList {
    passes: Vec<Box<dyn RenderPassDyn>>,
}

impl PassList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<P: RenderPass + 'static>(&mut self, pass: P) {
        self.passes.push(Box::new(PassWrapper { pass }));
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn RenderPassDyn> {
        self.passes.iter().map(|pass| pass.as_ref())
    }

    /// Passes of type `P`, in order.
    pub fn of_type<P: RenderPass + 'static>(&self) -> impl Iterator<Item = &P> {
        self.passes
            .iter()
            .filter_map(|pass| pass.as_any().downcast_ref::<P>())
    }

    pub fn execute(&mut self, ctx: &mut PassContext<'_>) {
        for pass in &mut self.passes {
            pass.execute(ctx);
        }
    }
}

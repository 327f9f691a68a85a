use crate::view::render_pass::{TextAnchor, TextPass};
use crate::view::renderer::{PaintContext, PaintTarget};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelState {
    pub text: String,
}

impl LabelState {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }

    /// Labels have no background; the text is centered in the bounds.
    pub(crate) fn paint(&self, target: &PaintTarget, ctx: &mut PaintContext<'_>) {
        let bounds = target.bounds;
        ctx.passes.push(TextPass::new(
            self.text.as_str(),
            bounds.x + bounds.w / 2,
            bounds.y + bounds.h / 2,
            target.text_color,
            TextAnchor::Center,
        ));
    }
}

use crate::ui::{Rect, Signal};
use crate::view::render_pass::{TextAnchor, TextPass};
use crate::view::renderer::{PaintContext, PaintTarget};

use super::HOVER_SHIFT;

const CHECK_INSET: i32 = 4;
const LABEL_GAP: i32 = 10;

pub struct CheckboxState {
    pub label: String,
    pub checked: bool,
    pub on_value_changed: Signal<f32>,
}

impl CheckboxState {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            checked: false,
            on_value_changed: Signal::new(),
        }
    }

    /// Flips the value and returns the new one as `0.0` or `1.0`.
    pub fn toggle(&mut self) -> f32 {
        self.checked = !self.checked;
        f32::from(u8::from(self.checked))
    }

    pub fn duplicate(&self) -> Self {
        let mut copy = Self::new(&self.label);
        copy.checked = self.checked;
        copy
    }

    /// A square box as tall as the element, an inner mark when checked, and the label to the
    /// right. Effects are not applied to checkboxes.
    pub(crate) fn paint(&self, target: &PaintTarget, ctx: &mut PaintContext<'_>) {
        let bounds = target.bounds;
        let size = bounds.h;

        let mut box_color = target.custom_color.unwrap_or(ctx.theme.outline);
        if target.hovered {
            box_color = box_color.shift(HOVER_SHIFT);
        }
        ctx.fill(
            Rect::new(bounds.x, bounds.y, size, size),
            box_color.fade(target.transparency),
        );

        if self.checked {
            ctx.fill(
                Rect::new(
                    bounds.x + CHECK_INSET,
                    bounds.y + CHECK_INSET,
                    size - 2 * CHECK_INSET,
                    size - 2 * CHECK_INSET,
                ),
                ctx.theme.primary.fade(target.transparency),
            );
        }

        ctx.passes.push(TextPass::new(
            self.label.as_str(),
            bounds.x + size + LABEL_GAP,
            bounds.y + size / 2,
            target.text_color,
            TextAnchor::Start,
        ));
    }
}

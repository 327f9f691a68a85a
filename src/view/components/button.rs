use crate::ui::Signal;
use crate::view::base_component::ElementCore;
use crate::view::render_pass::{TextAnchor, TextPass};
use crate::view::renderer::{PaintContext, PaintTarget};

/// How long a clicked button stays darkened.
pub const PRESS_PULSE_MS: u64 = 100;
pub const HOVER_SHIFT: f32 = 1.2;
pub const PRESS_SHIFT: f32 = 0.8;

pub struct ButtonState {
    pub label: String,
    pressed: bool,
    last_click_ms: u64,
    pub on_click: Signal<()>,
}

impl ButtonState {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            pressed: false,
            last_click_ms: 0,
            on_click: Signal::new(),
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn press(&mut self, now_ms: u64) {
        self.pressed = true;
        self.last_click_ms = now_ms;
    }

    /// Whether the press pulse is still showing. An expired pulse clears the pressed flag.
    pub fn pulse_active(&mut self, now_ms: u64) -> bool {
        if self.pressed && now_ms.saturating_sub(self.last_click_ms) < PRESS_PULSE_MS {
            return true;
        }
        self.pressed = false;
        false
    }

    pub fn duplicate(&self) -> Self {
        Self::new(&self.label)
    }

    pub(crate) fn paint(
        &mut self,
        core: &ElementCore,
        target: &PaintTarget,
        ctx: &mut PaintContext<'_>,
    ) {
        let mut color = target.custom_color.unwrap_or(ctx.theme.primary);
        if target.hovered {
            color = color.shift(HOVER_SHIFT);
        }
        if self.pulse_active(ctx.now_ms) {
            color = color.shift(PRESS_SHIFT);
        }
        ctx.paint_base(core, target.bounds, color);

        let bounds = target.bounds;
        ctx.passes.push(TextPass::new(
            self.label.as_str(),
            bounds.x + bounds.w / 2,
            bounds.y + bounds.h / 2,
            target.text_color,
            TextAnchor::Center,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::{ButtonState, PRESS_PULSE_MS};

    #[test]
    fn press_pulse_expires_and_clears_the_flag() {
        let mut button = ButtonState::new("ok");
        button.press(1_000);
        assert!(button.pulse_active(1_000 + PRESS_PULSE_MS - 1));
        assert!(!button.pulse_active(1_000 + PRESS_PULSE_MS));
        assert!(!button.is_pressed());
    }
}

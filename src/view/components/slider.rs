use crate::ui::{Rect, Signal};
use crate::view::renderer::{PaintContext, PaintTarget};

use super::HOVER_SHIFT;

pub const SLIDER_HANDLE_WIDTH: i32 = 12;
pub const SLIDER_TRACK_HEIGHT: i32 = 4;
/// Changes at or below this are not reported.
pub const VALUE_EPSILON: f32 = 0.001;
const CUSTOM_TRACK_SHIFT: f32 = 0.7;

pub struct SliderState {
    pub value: f32,
    pub on_value_changed: Signal<f32>,
}

impl SliderState {
    pub fn new(initial: f32) -> Self {
        Self {
            value: initial.clamp(0.0, 1.0),
            on_value_changed: Signal::new(),
        }
    }

    /// Moves the value to the pointer. Returns the new value when it moved by more than
    /// [`VALUE_EPSILON`].
    pub fn drag_to(&mut self, pointer_x: i32, world_x: i32, width: i32) -> Option<f32> {
        let previous = self.value;
        self.value = normalize_ratio(pointer_x - world_x, width);
        ((self.value - previous).abs() > VALUE_EPSILON).then_some(self.value)
    }

    pub fn duplicate(&self) -> Self {
        Self::new(self.value)
    }

    /// Thin centered track and a full-height handle. Effects are not applied to sliders.
    pub(crate) fn paint(&self, target: &PaintTarget, ctx: &mut PaintContext<'_>) {
        let bounds = target.bounds;
        let track = match target.custom_color {
            Some(custom) => custom.shift(CUSTOM_TRACK_SHIFT),
            None => ctx.theme.background,
        };
        ctx.fill(
            Rect::new(
                bounds.x,
                bounds.y + bounds.h / 2 - SLIDER_TRACK_HEIGHT / 2,
                bounds.w,
                SLIDER_TRACK_HEIGHT,
            ),
            track.fade(target.transparency),
        );

        let handle_x = (self.value * (bounds.w - SLIDER_HANDLE_WIDTH) as f32) as i32;
        let mut handle = target.custom_color.unwrap_or(ctx.theme.primary);
        if target.hovered {
            handle = handle.shift(HOVER_SHIFT);
        }
        ctx.fill(
            Rect::new(bounds.x + handle_x, bounds.y, SLIDER_HANDLE_WIDTH, bounds.h),
            handle.fade(target.transparency),
        );
    }
}

fn normalize_ratio(offset: i32, width: i32) -> f32 {
    if width <= 0 {
        return 0.0;
    }
    (offset as f32 / width as f32).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::SliderState;

    #[test]
    fn drag_reports_only_meaningful_changes() {
        let mut slider = SliderState::new(0.5);
        assert_eq!(slider.drag_to(100, 0, 200), None);
        assert_eq!(slider.drag_to(0, 0, 200), Some(0.0));
        assert_eq!(slider.drag_to(-50, 0, 200), None);
        assert_eq!(slider.drag_to(400, 0, 200), Some(1.0));
    }

    #[test]
    fn zero_width_maps_to_zero() {
        let mut slider = SliderState::new(0.3);
        assert_eq!(slider.drag_to(10, 0, 0), Some(0.0));
    }

    #[test]
    fn initial_value_is_clamped() {
        assert_eq!(SliderState::new(1.7).value, 1.0);
    }
}

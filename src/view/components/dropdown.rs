use smol_str::SmolStr;

use crate::ui::{DropdownChange, Rect, Signal};
use crate::view::base_component::ElementCore;
use crate::view::render_pass::{OutlinePass, TextAnchor, TextPass};
use crate::view::renderer::{PaintContext, PaintTarget};

use super::HOVER_SHIFT;

/// Dropdowns sit above their siblings so the open list covers them.
pub const DROPDOWN_Z: i32 = 10_000;
/// Height of the header and of every option row.
pub const ROW_HEIGHT: i32 = 30;
const HEADER_HOVER_SHIFT: f32 = 1.1;
const TEXT_INSET: i32 = 10;
const ARROW_INSET: i32 = 15;

pub struct DropdownState {
    options: Vec<SmolStr>,
    selected: usize,
    open: bool,
    pub on_changed: Signal<DropdownChange>,
}

impl DropdownState {
    /// An out-of-range default selects the first option.
    pub fn new<S: AsRef<str>>(options: &[S], default_index: usize) -> Self {
        let options: Vec<SmolStr> = options.iter().map(|o| SmolStr::new(o.as_ref())).collect();
        let selected = if default_index < options.len() {
            default_index
        } else {
            0
        };
        Self {
            options,
            selected,
            open: false,
            on_changed: Signal::new(),
        }
    }

    pub fn options(&self) -> &[SmolStr] {
        &self.options
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_text(&self) -> Option<&str> {
        self.options.get(self.selected).map(SmolStr::as_str)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Height used for hit testing: the header plus the option list while open.
    pub fn hit_height(&self, element_h: i32) -> i32 {
        if self.open {
            ROW_HEIGHT + self.options.len() as i32 * ROW_HEIGHT
        } else {
            element_h
        }
    }

    /// Option under `local_y`, measured from the top of the header.
    pub fn option_at(&self, local_y: i32) -> Option<usize> {
        let below_header = local_y - ROW_HEIGHT;
        if !self.open || below_header < 0 {
            return None;
        }
        let index = (below_header / ROW_HEIGHT) as usize;
        (index < self.options.len()).then_some(index)
    }

    /// Selects `index` and closes the list.
    pub fn select(&mut self, index: usize) -> Option<DropdownChange> {
        let value = self.options.get(index)?.clone();
        self.selected = index;
        self.open = false;
        Some(DropdownChange { index, value })
    }

    pub fn duplicate(&self) -> Self {
        Self {
            options: self.options.clone(),
            selected: self.selected,
            open: false,
            on_changed: Signal::new(),
        }
    }

    pub(crate) fn paint(
        &self,
        core: &ElementCore,
        target: &PaintTarget,
        ctx: &mut PaintContext<'_>,
    ) {
        let bounds = target.bounds;
        let mut header = target.custom_color.unwrap_or(ctx.theme.surface);
        if target.hovered {
            header = header.shift(HEADER_HOVER_SHIFT);
        }
        ctx.paint_base(core, bounds, header);

        let text_y = bounds.y + ROW_HEIGHT / 2;
        if let Some(selected) = self.selected_text() {
            ctx.passes.push(TextPass::new(
                selected,
                bounds.x + TEXT_INSET,
                text_y,
                target.text_color,
                TextAnchor::Start,
            ));
        }
        let arrow = if self.open { "^" } else { "v" };
        ctx.passes.push(TextPass::new(
            arrow,
            bounds.x + bounds.w - ARROW_INSET,
            text_y,
            target.text_color,
            TextAnchor::Start,
        ));

        if !self.open {
            return;
        }
        let popup = ctx.theme.surface;
        let list = Rect::new(
            bounds.x,
            bounds.y + ROW_HEIGHT,
            bounds.w,
            self.options.len() as i32 * ROW_HEIGHT,
        );
        ctx.fill(list, popup.fade(target.transparency));
        ctx.passes.push(OutlinePass::new(list, 1, ctx.theme.outline));

        let (px, py) = ctx.pointer;
        for (i, option) in self.options.iter().enumerate() {
            let row = Rect::new(bounds.x, list.y + i as i32 * ROW_HEIGHT, bounds.w, ROW_HEIGHT);
            if px >= row.x && px < row.x + row.w && py >= row.y && py < row.y + row.h {
                ctx.fill(row, popup.shift(HOVER_SHIFT).fade(target.transparency));
            }
            ctx.passes.push(TextPass::new(
                option.as_str(),
                row.x + TEXT_INSET,
                row.y + ROW_HEIGHT / 2,
                target.text_color,
                TextAnchor::Start,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DropdownState, ROW_HEIGHT};

    fn fruits() -> DropdownState {
        DropdownState::new(&["apple", "pear", "plum"], 1)
    }

    #[test]
    fn invalid_default_selects_first_option() {
        let dropdown = DropdownState::new(&["a", "b"], 9);
        assert_eq!(dropdown.selected(), 0);
    }

    #[test]
    fn open_list_extends_hit_height_and_maps_rows() {
        let mut dropdown = fruits();
        assert_eq!(dropdown.hit_height(30), 30);
        assert_eq!(dropdown.option_at(45), None);

        dropdown.toggle();
        assert_eq!(dropdown.hit_height(30), ROW_HEIGHT * 4);
        assert_eq!(dropdown.option_at(10), None);
        assert_eq!(dropdown.option_at(ROW_HEIGHT), Some(0));
        assert_eq!(dropdown.option_at(ROW_HEIGHT * 3 + 29), Some(2));
        assert_eq!(dropdown.option_at(ROW_HEIGHT * 4), None);
    }

    #[test]
    fn select_closes_and_reports_value() {
        let mut dropdown = fruits();
        dropdown.toggle();
        let change = dropdown.select(2).map(|c| (c.index, c.value.to_string()));
        assert_eq!(change, Some((2, "plum".to_string())));
        assert!(!dropdown.is_open());
        assert!(dropdown.select(7).is_none());
        assert_eq!(dropdown.selected(), 2);
    }
}

use std::path::Path;

use crate::ui::{InputEvent, InputSource, Key, KeyModifiers, MouseButton, SignalKind};
use crate::view::base_component::{ElementFlags, ElementId, ElementKind, INPUT_INSET};
use crate::view::components::ROW_HEIGHT;
use crate::view::viewport::Viewport;

impl Viewport {
    /// Front-most visible element under `(x, y)`. Frames hand the point to their children
    /// first, offset by their scroll, and are hit themselves when no child matches.
    pub fn hit_test(&self, x: i32, y: i32) -> Option<ElementId> {
        self.hit_level(self.tree.roots(), x, y, (0, 0))
    }

    fn hit_level(
        &self,
        ids: &[ElementId],
        x: i32,
        y: i32,
        origin: (i32, i32),
    ) -> Option<ElementId> {
        for id in self.tree.hit_order(ids) {
            let Some(element) = self.tree.get(id) else {
                continue;
            };
            let (wx, wy) = (origin.0 + element.core.x, origin.1 + element.core.y);
            let hit_h = match &element.kind {
                ElementKind::Dropdown(dropdown) => dropdown.hit_height(element.core.h),
                _ => element.core.h,
            };
            let inside = x >= wx && x <= wx + element.core.w && y >= wy && y <= wy + hit_h;
            if !inside {
                continue;
            }
            let scroll = element.as_frame().map_or(0, |frame| frame.scroll_y);
            let child = self.hit_level(&element.core.children, x, y, (wx, wy - scroll));
            return Some(child.unwrap_or(id));
        }
        None
    }

    /// Drains `input`, then applies the drag and slider updates for the final pointer state.
    pub fn poll_events(&mut self, input: &mut dyn InputSource) {
        self.input.pointer = input.pointer_position();
        while let Some(event) = input.poll_event() {
            self.input.pointer = input.pointer_position();
            self.dispatch(event);
        }

        let (px, py) = self.input.pointer;
        if let Some(dragged) = self.input.dragging {
            let (ox, oy) = self.input.drag_offset;
            self.set_position(dragged, px - ox, py - oy);
        }
        if input.is_button_down(MouseButton::Left) {
            self.track_focused_slider(px);
        }
    }

    fn dispatch(&mut self, event: InputEvent) {
        match event {
            InputEvent::Quit => {
                log::info!("quit requested by host");
                self.running = false;
            }
            InputEvent::PointerMoved { x, y } => self.input.pointer = (x, y),
            InputEvent::PointerDown { .. } => self.pointer_down(),
            InputEvent::PointerUp { .. } => {
                self.input.dragging = None;
                if self.focused_kind_is(|kind| matches!(kind, ElementKind::Slider(_))) {
                    self.input.focused = None;
                }
            }
            InputEvent::Wheel { delta_y } => self.wheel(delta_y),
            InputEvent::KeyDown { key, modifiers } => self.key_down(key, modifiers),
            InputEvent::TextInput(text) => self.text_input(&text),
            InputEvent::FileDropped(path) => self.file_dropped(&path),
        }
    }

    fn focused_kind_is(&self, check: impl Fn(&ElementKind) -> bool) -> bool {
        self.input
            .focused
            .and_then(|id| self.tree.get(id))
            .is_some_and(|el| check(&el.kind))
    }

    fn pointer_down(&mut self) {
        let (px, py) = self.input.pointer;
        let hit = self.hit_test(px, py);
        if self.input.focused.is_some() && self.input.focused != hit {
            self.defocus();
        }
        let Some(hit) = hit else {
            return;
        };
        let now = self.clock.ticks_ms();

        let Some(element) = self.tree.get_mut(hit) else {
            return;
        };
        if element.core.flags.contains(ElementFlags::DRAGGABLE) {
            self.input.dragging = Some(hit);
            self.input.drag_offset = (px - element.core.x, py - element.core.y);
        }

        match &mut element.kind {
            ElementKind::Button(button) => {
                button.press(now);
                self.emit_unit(hit, SignalKind::Click);
            }
            ElementKind::Checkbox(checkbox) => {
                let value = checkbox.toggle();
                self.emit_value(hit, value);
            }
            ElementKind::Slider(_) => self.input.focused = Some(hit),
            ElementKind::Dropdown(_) => self.dropdown_pressed(hit, py),
            ElementKind::TextInput(_) => self.input_pressed(hit),
            ElementKind::Frame(_) | ElementKind::Label(_) | ElementKind::Canvas(_) => {}
        }
    }

    /// Drops focus. An input reports the loss; an open dropdown closes.
    fn defocus(&mut self) {
        let Some(focused) = self.input.focused.take() else {
            return;
        };
        let was_input = match self.tree.get_mut(focused).map(|el| &mut el.kind) {
            Some(ElementKind::TextInput(_)) => true,
            Some(ElementKind::Dropdown(dropdown)) => {
                dropdown.close();
                false
            }
            _ => false,
        };
        log::debug!("focus left {focused:?}");
        if was_input {
            self.emit_focus(focused, false);
        }
    }

    fn dropdown_pressed(&mut self, id: ElementId, py: i32) {
        let Some((_, wy)) = self.tree.world_origin(id) else {
            return;
        };
        let Some(ElementKind::Dropdown(dropdown)) = self.tree.get_mut(id).map(|el| &mut el.kind)
        else {
            return;
        };
        if py < wy + ROW_HEIGHT {
            dropdown.toggle();
            self.input.focused = Some(id);
            return;
        }
        let change = dropdown
            .option_at(py - wy)
            .and_then(|index| dropdown.select(index));
        if let Some(change) = change {
            self.emit_dropdown(id, &change);
        }
    }

    fn input_pressed(&mut self, id: ElementId) {
        if self.input.focused != Some(id) {
            // pointer_down already defocused anything else
            self.input.focused = Some(id);
            log::debug!("focus moved to {id:?}");
            self.emit_focus(id, true);
        }
        if let Some(ElementKind::TextInput(input)) = self.tree.get_mut(id).map(|el| &mut el.kind) {
            input.editor.move_to_end();
        }
    }

    fn wheel(&mut self, delta_y: f32) {
        let (px, py) = self.input.pointer;
        let Some(target) = self
            .hit_test(px, py)
            .and_then(|hit| self.tree.scrollable_ancestor(hit))
        else {
            return;
        };
        let now = self.clock.ticks_ms();
        if let Some(element) = self.tree.get_mut(target) {
            let frame_h = element.core.h;
            if let Some(frame) = element.as_frame_mut() {
                frame.scroll_by_wheel(delta_y, frame_h, now);
            }
        }
    }

    fn focused_input(&self) -> Option<ElementId> {
        self.input
            .focused
            .filter(|_| self.focused_kind_is(|kind| matches!(kind, ElementKind::TextInput(_))))
    }

    fn key_down(&mut self, key: Key, modifiers: KeyModifiers) {
        let Some(id) = self.focused_input() else {
            return;
        };
        let Some(element) = self.tree.get_mut(id) else {
            return;
        };
        let ElementKind::TextInput(input) = &mut element.kind else {
            return;
        };
        let outcome = input
            .editor
            .handle_key(key, modifiers, self.clipboard.as_mut());
        self.after_edit(id, outcome.changed, outcome.submitted);
    }

    fn text_input(&mut self, text: &str) {
        let Some(id) = self.focused_input() else {
            return;
        };
        let changed = match self.tree.get_mut(id).map(|el| &mut el.kind) {
            Some(ElementKind::TextInput(input)) => input.editor.insert(text),
            _ => return,
        };
        self.after_edit(id, changed, false);
    }

    /// Keeps the caret visible, then reports the change and any submit.
    fn after_edit(&mut self, id: ElementId, changed: bool, submitted: bool) {
        let Some(element) = self.tree.get_mut(id) else {
            return;
        };
        let visible_width = element.core.w - 2 * INPUT_INSET;
        let password = element.core.flags.contains(ElementFlags::PASSWORD);
        let ElementKind::TextInput(input) = &mut element.kind else {
            return;
        };
        input
            .editor
            .update_scroll(visible_width, password, self.text.as_mut());
        let content = input.editor.text().to_string();

        if changed {
            self.emit_text(id, SignalKind::TextChanged, &content);
        }
        if submitted {
            self.emit_text(id, SignalKind::Submit, &content);
            self.emit_focus(id, false);
            if self.input.focused == Some(id) {
                self.input.focused = None;
            }
        }
    }

    fn file_dropped(&mut self, path: &Path) {
        let (px, py) = self.input.pointer;
        let target = self.hit_test(px, py);
        let Some(mut callback) = self.file_drop.take() else {
            return;
        };
        callback(self, target, path);
        // the callback may have installed a replacement
        if self.file_drop.is_none() {
            self.file_drop = Some(callback);
        }
    }

    /// Slider capture: the focused slider follows the pointer's x while the button is held,
    /// wherever the pointer is.
    fn track_focused_slider(&mut self, px: i32) {
        let Some(id) = self.input.focused else {
            return;
        };
        let Some((wx, _)) = self.tree.world_origin(id) else {
            return;
        };
        let Some(element) = self.tree.get_mut(id) else {
            return;
        };
        let width = element.core.w;
        let ElementKind::Slider(slider) = &mut element.kind else {
            return;
        };
        if let Some(value) = slider.drag_to(px, wx, width) {
            self.emit_value(id, value);
        }
    }
}

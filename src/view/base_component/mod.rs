use crate::ui::{DropdownChange, Signal, SignalKind};
use crate::view::components::{ButtonState, CheckboxState, DropdownState, SliderState};

mod canvas;
mod core;
mod frame;
mod label;
mod text_input;

pub use canvas::*;
pub use self::core::*;
pub use frame::*;
pub use label::*;
pub use text_input::*;

slotmap::new_key_type! {
    /// Stable handle to an element. Handles of deleted elements stay invalid forever.
    pub struct ElementId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Frame,
    Button,
    Label,
    TextInput,
    Checkbox,
    Slider,
    Dropdown,
    Canvas,
}

pub enum ElementKind {
    Frame(FrameState),
    Button(ButtonState),
    Label(LabelState),
    TextInput(TextInputState),
    Checkbox(CheckboxState),
    Slider(SliderState),
    Dropdown(DropdownState),
    Canvas(CanvasState),
}

impl ElementKind {
    pub fn element_type(&self) -> ElementType {
        match self {
            ElementKind::Frame(_) => ElementType::Frame,
            ElementKind::Button(_) => ElementType::Button,
            ElementKind::Label(_) => ElementType::Label,
            ElementKind::TextInput(_) => ElementType::TextInput,
            ElementKind::Checkbox(_) => ElementType::Checkbox,
            ElementKind::Slider(_) => ElementType::Slider,
            ElementKind::Dropdown(_) => ElementType::Dropdown,
            ElementKind::Canvas(_) => ElementType::Canvas,
        }
    }
}

pub struct Element {
    pub core: ElementCore,
    pub kind: ElementKind,
}

impl Element {
    pub fn new(core: ElementCore, kind: ElementKind) -> Self {
        Self { core, kind }
    }

    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    pub fn as_frame(&self) -> Option<&FrameState> {
        match &self.kind {
            ElementKind::Frame(frame) => Some(frame),
            _ => None,
        }
    }

    pub fn as_frame_mut(&mut self) -> Option<&mut FrameState> {
        match &mut self.kind {
            ElementKind::Frame(frame) => Some(frame),
            _ => None,
        }
    }

    pub fn as_canvas_mut(&mut self) -> Option<&mut CanvasState> {
        match &mut self.kind {
            ElementKind::Canvas(canvas) => Some(canvas),
            _ => None,
        }
    }

    /// Label text for buttons, labels and checkboxes; content for text inputs.
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Button(button) => Some(&button.label),
            ElementKind::Label(label) => Some(&label.text),
            ElementKind::TextInput(input) => Some(input.editor.text()),
            ElementKind::Checkbox(checkbox) => Some(&checkbox.label),
            _ => None,
        }
    }

    pub fn set_text(&mut self, text: &str) -> bool {
        match &mut self.kind {
            ElementKind::Button(button) => button.label = text.to_string(),
            ElementKind::Label(label) => label.text = text.to_string(),
            ElementKind::TextInput(input) => input.editor.set_text(text),
            ElementKind::Checkbox(checkbox) => checkbox.label = text.to_string(),
            _ => return false,
        }
        true
    }

    pub fn value(&self) -> f32 {
        match &self.kind {
            ElementKind::Slider(slider) => slider.value,
            ElementKind::Checkbox(checkbox) => f32::from(u8::from(checkbox.checked)),
            _ => 0.0,
        }
    }

    pub fn set_value(&mut self, value: f32) {
        match &mut self.kind {
            ElementKind::Slider(slider) => slider.value = value.clamp(0.0, 1.0),
            ElementKind::Checkbox(checkbox) => checkbox.checked = value as i32 != 0,
            _ => {}
        }
    }

    /// Applies a new size. Canvases reallocate their pixel buffer.
    pub fn set_size(&mut self, w: i32, h: i32) {
        self.core.w = w;
        self.core.h = h;
        if let ElementKind::Canvas(canvas) = &mut self.kind {
            canvas.resize(w, h);
        }
    }

    /// Parentless copy of the element's own state. Children and subscriptions are not copied.
    pub fn duplicate(&self) -> Element {
        let kind = match &self.kind {
            ElementKind::Frame(frame) => ElementKind::Frame(frame.duplicate()),
            ElementKind::Button(button) => ElementKind::Button(button.duplicate()),
            ElementKind::Label(label) => ElementKind::Label(label.clone()),
            ElementKind::TextInput(input) => ElementKind::TextInput(input.duplicate()),
            ElementKind::Checkbox(checkbox) => ElementKind::Checkbox(checkbox.duplicate()),
            ElementKind::Slider(slider) => ElementKind::Slider(slider.duplicate()),
            ElementKind::Dropdown(dropdown) => ElementKind::Dropdown(dropdown.duplicate()),
            ElementKind::Canvas(canvas) => ElementKind::Canvas(canvas.clone()),
        };
        Element::new(self.core.duplicate(), kind)
    }

    pub(crate) fn unit_signal_mut(&mut self, kind: SignalKind) -> Option<&mut Signal<()>> {
        match (kind, &mut self.kind) {
            (SignalKind::HoverEnter, _) => Some(&mut self.core.on_hover_enter),
            (SignalKind::HoverLeave, _) => Some(&mut self.core.on_hover_leave),
            (SignalKind::Click, ElementKind::Button(button)) => Some(&mut button.on_click),
            _ => None,
        }
    }

    pub(crate) fn focus_signal_mut(&mut self, kind: SignalKind) -> Option<&mut Signal<bool>> {
        match (kind, &mut self.kind) {
            (SignalKind::FocusChanged, ElementKind::TextInput(input)) => {
                Some(&mut input.on_focus_changed)
            }
            _ => None,
        }
    }

    pub(crate) fn text_signal_mut(&mut self, kind: SignalKind) -> Option<&mut Signal<str>> {
        match (kind, &mut self.kind) {
            (SignalKind::TextChanged, ElementKind::TextInput(input)) => {
                Some(&mut input.on_text_changed)
            }
            (SignalKind::Submit, ElementKind::TextInput(input)) => Some(&mut input.on_submit),
            _ => None,
        }
    }

    pub(crate) fn value_signal_mut(&mut self, kind: SignalKind) -> Option<&mut Signal<f32>> {
        match (kind, &mut self.kind) {
            (SignalKind::ValueChanged, ElementKind::Slider(slider)) => {
                Some(&mut slider.on_value_changed)
            }
            (SignalKind::ValueChanged, ElementKind::Checkbox(checkbox)) => {
                Some(&mut checkbox.on_value_changed)
            }
            _ => None,
        }
    }

    pub(crate) fn dropdown_signal_mut(
        &mut self,
        kind: SignalKind,
    ) -> Option<&mut Signal<DropdownChange>> {
        match (kind, &mut self.kind) {
            (SignalKind::DropdownChanged, ElementKind::Dropdown(dropdown)) => {
                Some(&mut dropdown.on_changed)
            }
            _ => None,
        }
    }

    /// Removes one registration of the given kind. Returns whether it existed.
    pub(crate) fn disconnect(&mut self, kind: SignalKind, id: u64) -> bool {
        match kind {
            SignalKind::Click | SignalKind::HoverEnter | SignalKind::HoverLeave => self
                .unit_signal_mut(kind)
                .is_some_and(|signal| signal.disconnect(id)),
            SignalKind::FocusChanged => self
                .focus_signal_mut(kind)
                .is_some_and(|signal| signal.disconnect(id)),
            SignalKind::TextChanged | SignalKind::Submit => self
                .text_signal_mut(kind)
                .is_some_and(|signal| signal.disconnect(id)),
            SignalKind::ValueChanged => self
                .value_signal_mut(kind)
                .is_some_and(|signal| signal.disconnect(id)),
            SignalKind::DropdownChanged => self
                .dropdown_signal_mut(kind)
                .is_some_and(|signal| signal.disconnect(id)),
        }
    }
}

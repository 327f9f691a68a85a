//! Retained-mode widgets: a tree of frames and controls with flow layout, generated palettes,
//! typed event subscriptions and a pass-based renderer that draws through a host surface.

pub mod error;
pub mod style;
pub mod ui;
pub mod view;

pub use error::{Result, WidgetError};
pub use style::{Color, HexColor, Theme, ThemeMode};
pub use ui::{
    Clipboard, Clock, Connection, DrawSurface, DropdownChange, InputEvent, InputQueue,
    InputSource, Key, KeyModifiers, MouseButton, Rect, TextService,
};
pub use view::{
    ElementFlags, ElementId, ElementType, GradientStop, PixelSurface, Viewport, ViewportConfig,
};

pub mod base_component;
pub mod components;
pub mod config;
pub mod element_tree;
mod input_dispatch;
pub mod layout;
pub mod page_manager;
pub mod pixel_surface;
pub mod render_pass;
pub(crate) mod renderer;
pub mod viewport;

pub use base_component::{
    Element, ElementFlags, ElementId, ElementKind, ElementType, GradientStop, TextEditor,
};
pub use config::ViewportConfig;
pub use element_tree::ElementTree;
pub use layout::LayoutMode;
pub use page_manager::PageManager;
pub use pixel_surface::PixelSurface;
pub use renderer::FramePlan;
pub use viewport::*;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::style::Color;
    use crate::ui::{ManualClock, MemoryClipboard, MonospaceText};
    use crate::view::{Viewport, ViewportConfig};

    /// Headless viewport: 8px monospace glyphs, in-memory clipboard, clock frozen at 0.
    pub fn viewport() -> Viewport {
        viewport_with_clock(ManualClock::new(0))
    }

    pub fn viewport_with_clock(clock: ManualClock) -> Viewport {
        Viewport::with_services(
            ViewportConfig::new("test", 320, 240, Color::rgb(0, 120, 215)),
            Box::new(MonospaceText::new(8, 16)),
            Box::new(MemoryClipboard::default()),
            Box::new(clock),
        )
    }
}

//! Services the toolkit consumes from its host: a drawing surface, text measurement and
//! rasterization, the clipboard, a monotonic clock and an input event source.

use crate::error::{Result, WidgetError};
use crate::style::Color;
use crate::ui::{InputEvent, MouseButton};
use image::RgbaImage;
use rustc_hash::FxHashSet;
use std::cell::Cell;
use std::collections::VecDeque;
use std::path::Path;
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Edge-inclusive containment, matching how elements are hit-tested.
    pub fn contains_inclusive(&self, x: i32, y: i32) -> bool {
        x >= self.x && x <= self.x + self.w && y >= self.y && y <= self.y + self.h
    }

    pub fn intersect(&self, other: &Rect) -> Rect {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = (self.x + self.w).min(other.x + other.w);
        let y1 = (self.y + self.h).min(other.y + other.h);
        Rect::new(x0, y0, (x1 - x0).max(0), (y1 - y0).max(0))
    }

    pub fn inset(&self, amount: i32) -> Rect {
        Rect::new(
            self.x + amount,
            self.y + amount,
            self.w - 2 * amount,
            self.h - 2 * amount,
        )
    }
}

pub trait DrawSurface {
    fn size(&self) -> (u32, u32);
    fn clear(&mut self, color: Color);
    /// Alpha-blended solid fill, clipped to the active clip rect.
    fn fill_rect(&mut self, rect: Rect, color: Color);
    /// One pixel wide rectangle border.
    fn draw_rect_outline(&mut self, rect: Rect, color: Color);
    fn draw_point(&mut self, x: i32, y: i32, color: Color);
    /// Clips intersect with the enclosing clip until popped.
    fn push_clip(&mut self, rect: Rect);
    fn pop_clip(&mut self);
    /// Draws a raster unscaled with its top-left corner at `(x, y)`.
    fn draw_image(&mut self, x: i32, y: i32, image: &RgbaImage, alpha: u8);
    /// Draws a raster scaled to `dst`.
    fn blit_image(&mut self, image: &RgbaImage, dst: Rect, alpha: u8);
}

pub trait TextService {
    fn measure(&mut self, text: &str) -> i32;
    fn line_height(&self) -> i32;
    fn rasterize(&mut self, text: &str, color: Color) -> Option<RgbaImage>;
    fn load_font(&mut self, path: &Path, size: f32) -> Result<()>;
}

/// Fixed advance per character. Renders nothing; suited to headless hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonospaceText {
    advance: i32,
    line_height: i32,
}

impl MonospaceText {
    pub fn new(advance: i32, line_height: i32) -> Self {
        Self {
            advance,
            line_height,
        }
    }
}

impl TextService for MonospaceText {
    fn measure(&mut self, text: &str) -> i32 {
        text.chars().count() as i32 * self.advance
    }

    fn line_height(&self) -> i32 {
        self.line_height
    }

    fn rasterize(&mut self, _text: &str, _color: Color) -> Option<RgbaImage> {
        None
    }

    fn load_font(&mut self, path: &Path, _size: f32) -> Result<()> {
        std::fs::metadata(path).map_err(|source| WidgetError::FontLoad {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(())
    }
}

pub trait Clipboard {
    fn text(&mut self) -> Option<String>;
    fn set_text(&mut self, text: &str);
    fn has_text(&mut self) -> bool {
        self.text().is_some_and(|text| !text.is_empty())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    text: Option<String>,
}

impl Clipboard for MemoryClipboard {
    fn text(&mut self) -> Option<String> {
        self.text.clone()
    }

    fn set_text(&mut self, text: &str) {
        self.text = Some(text.to_string());
    }
}

/// The platform clipboard. Falls back to an in-process buffer when the platform
/// clipboard cannot be opened.
pub struct SystemClipboard {
    #[cfg(not(target_arch = "wasm32"))]
    inner: Option<arboard::Clipboard>,
    fallback: MemoryClipboard,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_arch = "wasm32"))]
            inner: match arboard::Clipboard::new() {
                Ok(clipboard) => Some(clipboard),
                Err(err) => {
                    log::warn!("{}", WidgetError::Clipboard(err.to_string()));
                    None
                }
            },
            fallback: MemoryClipboard::default(),
        }
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Clipboard for SystemClipboard {
    fn text(&mut self) -> Option<String> {
        #[cfg(not(target_arch = "wasm32"))]
        if let Some(clipboard) = self.inner.as_mut() {
            return match clipboard.get_text() {
                Ok(text) => Some(text),
                Err(arboard::Error::ContentNotAvailable) => None,
                Err(err) => {
                    log::warn!("{}", WidgetError::Clipboard(err.to_string()));
                    self.fallback.text()
                }
            };
        }
        self.fallback.text()
    }

    fn set_text(&mut self, text: &str) {
        #[cfg(not(target_arch = "wasm32"))]
        if let Some(clipboard) = self.inner.as_mut() {
            match clipboard.set_text(text.to_string()) {
                Ok(()) => return,
                Err(err) => log::warn!("{}", WidgetError::Clipboard(err.to_string())),
            }
        }
        self.fallback.set_text(text);
    }
}

pub trait Clock {
    fn ticks_ms(&self) -> u64;
}

pub struct SystemClock {
    started_at: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn ticks_ms(&self) -> u64 {
        self.started_at.elapsed().as_millis() as u64
    }
}

/// A clock driven by the host. Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now_ms: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn set(&self, ms: u64) {
        self.now_ms.set(ms);
    }

    pub fn advance(&self, ms: u64) {
        self.now_ms.set(self.now_ms.get() + ms);
    }
}

impl Clock for ManualClock {
    fn ticks_ms(&self) -> u64 {
        self.now_ms.get()
    }
}

pub trait InputSource {
    fn poll_event(&mut self) -> Option<InputEvent>;
    fn pointer_position(&self) -> (i32, i32);
    fn is_button_down(&self, button: MouseButton) -> bool;
}

/// Queue of translated window events. Pointer position and held buttons advance as
/// events are consumed, so they always describe the state after the last polled event.
#[derive(Debug, Default)]
pub struct InputQueue {
    events: VecDeque<InputEvent>,
    pointer: (i32, i32),
    held_buttons: FxHashSet<MouseButton>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    pub fn move_to(&mut self, x: i32, y: i32) {
        self.push(InputEvent::PointerMoved { x, y });
    }

    pub fn press(&mut self, button: MouseButton) {
        self.push(InputEvent::PointerDown { button });
    }

    pub fn release(&mut self, button: MouseButton) {
        self.push(InputEvent::PointerUp { button });
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl InputSource for InputQueue {
    fn poll_event(&mut self) -> Option<InputEvent> {
        let event = self.events.pop_front()?;
        match &event {
            InputEvent::PointerMoved { x, y } => self.pointer = (*x, *y),
            InputEvent::PointerDown { button } => {
                self.held_buttons.insert(*button);
            }
            InputEvent::PointerUp { button } => {
                self.held_buttons.remove(button);
            }
            _ => {}
        }
        Some(event)
    }

    fn pointer_position(&self) -> (i32, i32) {
        self.pointer
    }

    fn is_button_down(&self, button: MouseButton) -> bool {
        self.held_buttons.contains(&button)
    }
}

#[cfg(test)]
mod tests {
    use super::{Clipboard, InputQueue, InputSource, MemoryClipboard, MonospaceText, Rect, TextService};
    use crate::ui::{InputEvent, MouseButton};
    use std::path::Path;

    #[test]
    fn rect_intersection_clamps_to_empty() {
        let a = Rect::new(0, 0, 10, 10);
        assert_eq!(a.intersect(&Rect::new(5, 5, 10, 10)), Rect::new(5, 5, 5, 5));
        assert!(a.intersect(&Rect::new(20, 20, 5, 5)).is_empty());
    }

    #[test]
    fn containment_includes_far_edges() {
        let rect = Rect::new(10, 10, 20, 5);
        assert!(rect.contains_inclusive(30, 15));
        assert!(!rect.contains_inclusive(31, 15));
    }

    #[test]
    fn queue_tracks_pointer_and_buttons_as_events_drain() {
        let mut queue = InputQueue::new();
        queue.move_to(4, 9);
        queue.press(MouseButton::Left);
        assert_eq!(queue.pointer_position(), (0, 0));

        assert_eq!(queue.poll_event(), Some(InputEvent::PointerMoved { x: 4, y: 9 }));
        assert_eq!(queue.pointer_position(), (4, 9));
        assert!(!queue.is_button_down(MouseButton::Left));
        queue.poll_event();
        assert!(queue.is_button_down(MouseButton::Left));
        assert_eq!(queue.poll_event(), None);
    }

    #[test]
    fn monospace_measures_characters_not_bytes() {
        let mut text = MonospaceText::new(8, 16);
        assert_eq!(text.measure("héllo"), 40);
        assert!(text.load_font(Path::new("/definitely/missing.ttf"), 16.0).is_err());
    }

    #[test]
    fn memory_clipboard_reports_empty_until_set() {
        let mut clipboard = MemoryClipboard::default();
        assert!(!clipboard.has_text());
        clipboard.set_text("copied");
        assert_eq!(clipboard.text().as_deref(), Some("copied"));
    }
}

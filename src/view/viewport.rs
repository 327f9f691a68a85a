use std::path::Path;
use std::time::Duration;

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

use smol_str::SmolStr;

use crate::error::Result;
use crate::style::{Color, Theme, ThemeMode};
use crate::ui::{
    Clipboard, Clock, Connection, DrawSurface, DropdownChange, SignalKind, SystemClipboard,
    SystemClock, TextService,
};
use crate::view::base_component::{
    CanvasState, Element, ElementCore, ElementFlags, ElementId, ElementKind, ElementType,
    FrameState, Gradient, GradientStop, LabelState, Outline, TextEditor, TextInputState,
};
use crate::view::components::{ButtonState, CheckboxState, DROPDOWN_Z, DropdownState, SliderState};
use crate::view::config::ViewportConfig;
use crate::view::element_tree::ElementTree;
use crate::view::layout::update_layout;
use crate::view::page_manager::PageManager;
use crate::view::render_pass::{CosmicTextService, PassContext};
use crate::view::renderer::build_frame;

pub type FileDropCallback = Box<dyn FnMut(&mut Viewport, Option<ElementId>, &Path)>;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct InputState {
    pub focused: Option<ElementId>,
    pub dragging: Option<ElementId>,
    pub drag_offset: (i32, i32),
    pub pointer: (i32, i32),
}

/// The toolkit context: owns the element tree, the theme, interaction state and the host
/// services. Every operation goes through it.
pub struct Viewport {
    config: ViewportConfig,
    pub(crate) tree: ElementTree,
    theme: Theme,
    pub(crate) input: InputState,
    pages: PageManager,
    pub(crate) file_drop: Option<FileDropCallback>,
    pub(crate) text: Box<dyn TextService>,
    pub(crate) clipboard: Box<dyn Clipboard>,
    pub(crate) clock: Box<dyn Clock>,
    pub(crate) running: bool,
    frame_stats: FrameStats,
}

impl Viewport {
    /// Uses cosmic-text, the platform clipboard and the system clock.
    pub fn new(config: ViewportConfig) -> Self {
        let text = CosmicTextService::new(config.font_size);
        Self::with_services(
            config,
            Box::new(text),
            Box::new(SystemClipboard::new()),
            Box::new(SystemClock::new()),
        )
    }

    pub fn with_services(
        config: ViewportConfig,
        text: Box<dyn TextService>,
        clipboard: Box<dyn Clipboard>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let theme = Theme::generate(config.seed, config.theme_mode);
        let frame_stats = FrameStats::new(config.trace_frames);
        let mut viewport = Self {
            config,
            tree: ElementTree::new(),
            theme,
            input: InputState::default(),
            pages: PageManager::new(),
            file_drop: None,
            text,
            clipboard,
            clock,
            running: true,
            frame_stats,
        };

        if let Some(path) = viewport.config.font_path.clone() {
            let size = viewport.config.font_size;
            // failure is logged and the default face stays active
            viewport.load_font(&path, size).ok();
        }
        log::info!(
            "viewport {:?} ready at {}x{}",
            viewport.config.title,
            viewport.config.width,
            viewport.config.height
        );
        viewport
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn set_theme(&mut self, seed: Color, mode: ThemeMode) {
        self.theme = Theme::generate(seed, mode);
    }

    /// Switches the active face. On failure the previous face stays in use.
    pub fn load_font(&mut self, path: &Path, size: f32) -> Result<()> {
        if let Err(err) = self.text.load_font(path, size) {
            log::warn!("keeping the current font: {err}");
            return Err(err);
        }
        Ok(())
    }

    pub fn should_quit(&self) -> bool {
        !self.running
    }

    pub fn request_quit(&mut self) {
        self.running = false;
    }

    /// Releases every element, page and callback.
    pub fn cleanup(&mut self) {
        let released = self.tree.clear();
        self.pages.clear();
        self.input = InputState::default();
        self.file_drop = None;
        log::info!("viewport cleaned up, {released} elements released");
    }

    pub fn focused(&self) -> Option<ElementId> {
        self.input.focused
    }

    pub fn dragging(&self) -> Option<ElementId> {
        self.input.dragging
    }

    pub fn pointer(&self) -> (i32, i32) {
        self.input.pointer
    }

    pub fn render(&mut self, surface: &mut dyn DrawSurface) {
        let started = Instant::now();
        let now = self.clock.ticks_ms();
        let mut plan = build_frame(
            &mut self.tree,
            &self.theme,
            self.text.as_mut(),
            self.input.pointer,
            self.input.focused,
            now,
        );
        plan.passes.execute(&mut PassContext {
            surface,
            text: self.text.as_mut(),
        });

        for (id, entered) in plan.hover_changes {
            let kind = if entered {
                SignalKind::HoverEnter
            } else {
                SignalKind::HoverLeave
            };
            self.emit_unit(id, kind);
        }
        self.frame_stats.record_frame(started.elapsed());
    }

    // ---- creation ----

    fn create(&mut self, parent: Option<ElementId>, core: ElementCore, kind: ElementKind) -> ElementId {
        self.tree.insert(parent, Element::new(core, kind))
    }

    pub fn frame(
        &mut self,
        parent: Option<ElementId>,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        flags: ElementFlags,
    ) -> ElementId {
        let mut core = ElementCore::new(x, y, w, h);
        core.flags = flags;
        self.create(parent, core, ElementKind::Frame(FrameState::default()))
    }

    pub fn button(&mut self, parent: Option<ElementId>, label: &str) -> ElementId {
        self.create(
            parent,
            ElementCore::new(0, 0, 0, 0),
            ElementKind::Button(ButtonState::new(label)),
        )
    }

    pub fn label(&mut self, parent: Option<ElementId>, text: &str) -> ElementId {
        self.create(
            parent,
            ElementCore::new(0, 0, 0, 0),
            ElementKind::Label(LabelState::new(text)),
        )
    }

    pub fn input(&mut self, parent: Option<ElementId>, placeholder: &str, password: bool) -> ElementId {
        let mut core = ElementCore::new(0, 0, 0, 0);
        core.flags.set(ElementFlags::PASSWORD, password);
        self.create(
            parent,
            core,
            ElementKind::TextInput(TextInputState::new(placeholder)),
        )
    }

    pub fn checkbox(&mut self, parent: Option<ElementId>, label: &str) -> ElementId {
        self.create(
            parent,
            ElementCore::new(0, 0, 0, 0),
            ElementKind::Checkbox(CheckboxState::new(label)),
        )
    }

    pub fn slider(&mut self, parent: Option<ElementId>, initial: f32) -> ElementId {
        self.create(
            parent,
            ElementCore::new(0, 0, 0, 0),
            ElementKind::Slider(SliderState::new(initial)),
        )
    }

    pub fn dropdown<S: AsRef<str>>(
        &mut self,
        parent: Option<ElementId>,
        options: &[S],
        default_index: usize,
    ) -> ElementId {
        let mut core = ElementCore::new(0, 0, 0, 0);
        core.z_index = DROPDOWN_Z;
        self.create(
            parent,
            core,
            ElementKind::Dropdown(DropdownState::new(options, default_index)),
        )
    }

    pub fn canvas(&mut self, parent: Option<ElementId>, x: i32, y: i32, w: i32, h: i32) -> ElementId {
        self.create(
            parent,
            ElementCore::new(x, y, w, h),
            ElementKind::Canvas(CanvasState::new(w, h)),
        )
    }

    /// Deletes the element and its subtree. Focus, drag and page references into the subtree
    /// are dropped.
    pub fn delete(&mut self, id: ElementId) {
        let removed = self.tree.remove(id);
        if removed.is_empty() {
            return;
        }
        if self.input.focused.is_some_and(|f| removed.contains(&f)) {
            self.input.focused = None;
        }
        if self.input.dragging.is_some_and(|d| removed.contains(&d)) {
            self.input.dragging = None;
        }
        self.pages.forget(&mut self.tree, &removed);
        log::debug!("deleted {id:?} with {} descendants", removed.len() - 1);
    }

    /// Parentless copy with its own state but no children or subscriptions.
    pub fn clone_element(&mut self, id: ElementId) -> Option<ElementId> {
        let copy = self.tree.get(id)?.duplicate();
        Some(self.tree.insert(None, copy))
    }

    // ---- accessors ----

    pub fn exists(&self, id: ElementId) -> bool {
        self.tree.contains(id)
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.tree.get(id)
    }

    pub fn element_type(&self, id: ElementId) -> Option<ElementType> {
        self.tree.get(id).map(Element::element_type)
    }

    pub fn roots(&self) -> &[ElementId] {
        self.tree.roots()
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.tree.parent(id)
    }

    fn core_mut(&mut self, id: ElementId) -> Option<&mut ElementCore> {
        self.tree.get_mut(id).map(|el| &mut el.core)
    }

    pub fn set_position(&mut self, id: ElementId, x: i32, y: i32) {
        if let Some(core) = self.core_mut(id) {
            core.x = x;
            core.y = y;
        }
    }

    pub fn position(&self, id: ElementId) -> Option<(i32, i32)> {
        self.tree.get(id).map(|el| (el.core.x, el.core.y))
    }

    /// Canvases discard their pixels and reallocate at the new size.
    pub fn set_size(&mut self, id: ElementId, w: i32, h: i32) {
        if let Some(element) = self.tree.get_mut(id) {
            element.set_size(w, h);
        }
    }

    pub fn size(&self, id: ElementId) -> Option<(i32, i32)> {
        self.tree.get(id).map(|el| (el.core.w, el.core.h))
    }

    /// Applies to the whole subtree.
    pub fn set_visible(&mut self, id: ElementId, visible: bool) {
        self.tree.set_hidden_recursive(id, !visible);
    }

    pub fn is_visible(&self, id: ElementId) -> bool {
        self.tree.get(id).is_some_and(|el| !el.core.is_hidden())
    }

    pub fn set_draggable(&mut self, id: ElementId, draggable: bool) {
        if let Some(core) = self.core_mut(id) {
            core.flags.set(ElementFlags::DRAGGABLE, draggable);
        }
    }

    pub fn set_flags(&mut self, id: ElementId, flags: ElementFlags) {
        if let Some(core) = self.core_mut(id) {
            core.flags = flags;
        }
    }

    pub fn flags(&self, id: ElementId) -> ElementFlags {
        self.tree
            .get(id)
            .map_or(ElementFlags::empty(), |el| el.core.flags)
    }

    pub fn set_z_index(&mut self, id: ElementId, z: i32) {
        if let Some(core) = self.core_mut(id) {
            core.z_index = z;
        }
    }

    pub fn z_index(&self, id: ElementId) -> i32 {
        self.tree.get(id).map_or(0, |el| el.core.z_index)
    }

    pub fn set_transparency(&mut self, id: ElementId, alpha: f32) {
        if let Some(core) = self.core_mut(id) {
            core.set_transparency(alpha);
        }
    }

    pub fn transparency(&self, id: ElementId) -> f32 {
        self.tree.get(id).map_or(1.0, |el| el.core.transparency)
    }

    /// [`Color::NONE`] removes the override.
    pub fn set_custom_color(&mut self, id: ElementId, color: Color) {
        if let Some(core) = self.core_mut(id) {
            core.custom_color = (color != Color::NONE).then_some(color);
        }
    }

    pub fn custom_color(&self, id: ElementId) -> Option<Color> {
        self.tree.get(id)?.core.custom_color
    }

    pub fn text(&self, id: ElementId) -> Option<&str> {
        self.tree.get(id)?.text()
    }

    pub fn set_text(&mut self, id: ElementId, text: &str) {
        if let Some(element) = self.tree.get_mut(id) {
            element.set_text(text);
        }
    }

    pub fn value(&self, id: ElementId) -> f32 {
        self.tree.get(id).map_or(0.0, Element::value)
    }

    pub fn set_value(&mut self, id: ElementId, value: f32) {
        if let Some(element) = self.tree.get_mut(id) {
            element.set_value(value);
        }
    }

    pub fn dropdown_index(&self, id: ElementId) -> Option<usize> {
        match &self.tree.get(id)?.kind {
            ElementKind::Dropdown(dropdown) => Some(dropdown.selected()),
            _ => None,
        }
    }

    pub fn dropdown_options(&self, id: ElementId) -> Option<&[SmolStr]> {
        match &self.tree.get(id)?.kind {
            ElementKind::Dropdown(dropdown) => Some(dropdown.options()),
            _ => None,
        }
    }

    pub fn dropdown_is_open(&self, id: ElementId) -> bool {
        matches!(
            self.tree.get(id).map(|el| &el.kind),
            Some(ElementKind::Dropdown(dropdown)) if dropdown.is_open()
        )
    }

    pub fn text_editor(&self, id: ElementId) -> Option<&TextEditor> {
        match &self.tree.get(id)?.kind {
            ElementKind::TextInput(input) => Some(&input.editor),
            _ => None,
        }
    }

    // ---- effects ----

    /// Stops with non-finite positions are dropped and the rest sorted by position. Fewer
    /// than two remaining stops disables the gradient.
    pub fn set_gradient(&mut self, id: ElementId, stops: &[GradientStop], angle: f32) {
        let Some(core) = self.core_mut(id) else {
            return;
        };
        let mut valid: Vec<GradientStop> = stops
            .iter()
            .copied()
            .filter(|stop| stop.position.is_finite())
            .collect();
        if valid.len() < 2 {
            log::warn!(
                "gradient on {id:?} needs at least 2 valid stops, got {}; disabled",
                valid.len()
            );
            core.effects.gradient = None;
            return;
        }
        valid.sort_by(|a, b| a.position.total_cmp(&b.position));
        core.effects.gradient = Some(Gradient {
            stops: valid,
            angle,
        });
    }

    pub fn clear_gradient(&mut self, id: ElementId) {
        if let Some(core) = self.core_mut(id) {
            core.effects.gradient = None;
        }
    }

    pub fn set_outline(&mut self, id: ElementId, width: i32, color: Color, alpha: u8) {
        if let Some(core) = self.core_mut(id) {
            core.effects.outline = Some(Outline {
                width,
                color,
                alpha,
            });
        }
    }

    pub fn clear_outline(&mut self, id: ElementId) {
        if let Some(core) = self.core_mut(id) {
            core.effects.outline = None;
        }
    }

    pub fn set_rounded_corners(&mut self, id: ElementId, radius: i32) {
        if let Some(core) = self.core_mut(id) {
            core.effects.rounded = Some(radius);
        }
    }

    pub fn clear_rounded_corners(&mut self, id: ElementId) {
        if let Some(core) = self.core_mut(id) {
            core.effects.rounded = None;
        }
    }

    // ---- canvas ----

    fn canvas_mut(&mut self, id: ElementId) -> Option<&mut CanvasState> {
        self.tree.get_mut(id)?.as_canvas_mut()
    }

    pub fn canvas_clear(&mut self, id: ElementId, color: Color) {
        if let Some(canvas) = self.canvas_mut(id) {
            canvas.clear(color);
        }
    }

    pub fn canvas_draw_pixel(&mut self, id: ElementId, x: i32, y: i32, color: Color) {
        if let Some(canvas) = self.canvas_mut(id) {
            canvas.draw_pixel(x, y, color);
        }
    }

    pub fn canvas_draw_line(&mut self, id: ElementId, x1: i32, y1: i32, x2: i32, y2: i32, color: Color) {
        if let Some(canvas) = self.canvas_mut(id) {
            canvas.draw_line(x1, y1, x2, y2, color);
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn canvas_draw_rect(
        &mut self,
        id: ElementId,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        color: Color,
        filled: bool,
    ) {
        if let Some(canvas) = self.canvas_mut(id) {
            canvas.draw_rect(x, y, w, h, color, filled);
        }
    }

    pub fn canvas_draw_circle(
        &mut self,
        id: ElementId,
        cx: i32,
        cy: i32,
        radius: i32,
        color: Color,
        filled: bool,
    ) {
        if let Some(canvas) = self.canvas_mut(id) {
            canvas.draw_circle(cx, cy, radius, color, filled);
        }
    }

    pub fn canvas_pixel(&self, id: ElementId, x: i32, y: i32) -> Option<Color> {
        match &self.tree.get(id)?.kind {
            ElementKind::Canvas(canvas) => canvas.pixel(x, y),
            _ => None,
        }
    }

    // ---- frames ----

    fn configure_frame(&mut self, id: ElementId, relayout: bool, apply: impl FnOnce(&mut FrameState)) {
        let Some(frame) = self.tree.get_mut(id).and_then(Element::as_frame_mut) else {
            return;
        };
        apply(frame);
        if relayout {
            update_layout(&mut self.tree, id);
        }
    }

    pub fn frame_set_padding(&mut self, id: ElementId, padding: i32) {
        self.configure_frame(id, true, |frame| frame.padding = padding);
    }

    pub fn frame_set_spacing(&mut self, id: ElementId, spacing: i32) {
        self.configure_frame(id, true, |frame| frame.spacing = spacing);
    }

    pub fn frame_set_default_child_size(&mut self, id: ElementId, w: i32, h: i32) {
        self.configure_frame(id, true, |frame| {
            frame.default_child_w = w;
            frame.default_child_h = h;
        });
    }

    /// Zero removes the column cap.
    pub fn frame_set_grid_columns(&mut self, id: ElementId, columns: usize) {
        self.configure_frame(id, true, |frame| frame.max_grid_cols = columns);
    }

    pub fn frame_set_scrollbar_width(&mut self, id: ElementId, width: i32) {
        self.configure_frame(id, false, |frame| frame.scrollbar_width = width);
    }

    pub fn frame_update_layout(&mut self, id: ElementId) {
        update_layout(&mut self.tree, id);
    }

    pub fn frame_child_count(&self, id: ElementId) -> usize {
        match self.tree.get(id) {
            Some(element) if element.as_frame().is_some() => element.core.children.len(),
            _ => 0,
        }
    }

    pub fn frame_child(&self, id: ElementId, index: usize) -> Option<ElementId> {
        let element = self.tree.get(id)?;
        element.as_frame()?;
        element.core.children.get(index).copied()
    }

    /// Moves `child` under `parent`. Returns false for unknown ids or when `parent` lies
    /// inside `child`'s subtree.
    pub fn frame_add_child(&mut self, parent: ElementId, child: ElementId) -> bool {
        self.tree.reparent(child, parent)
    }

    pub fn frame_scroll(&self, id: ElementId) -> Option<i32> {
        self.tree.get(id)?.as_frame().map(|frame| frame.scroll_y)
    }

    pub fn frame_content_height(&self, id: ElementId) -> Option<i32> {
        self.tree.get(id)?.as_frame().map(|frame| frame.content_height)
    }

    // ---- pages ----

    pub fn add_page(&mut self, page: ElementId) {
        self.pages.add(&mut self.tree, page);
    }

    pub fn add_page_at(&mut self, page: ElementId, position: usize) {
        self.pages.insert_at(&mut self.tree, page, position);
    }

    pub fn next_page(&mut self) {
        self.pages.next(&mut self.tree);
    }

    pub fn previous_page(&mut self) {
        self.pages.previous(&mut self.tree);
    }

    pub fn switch_page(&mut self, index: usize) {
        self.pages.switch_to(&mut self.tree, index);
    }

    pub fn current_page(&self) -> Option<usize> {
        self.pages.current()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &PageManager {
        &self.pages
    }

    // ---- subscriptions ----

    pub fn on_click<F>(&mut self, id: ElementId, mut handler: F) -> Connection
    where
        F: FnMut(&mut Viewport, ElementId) + 'static,
    {
        self.connect_unit(id, SignalKind::Click, move |vp, el, _| handler(vp, el))
    }

    pub fn on_hover_enter<F>(&mut self, id: ElementId, mut handler: F) -> Connection
    where
        F: FnMut(&mut Viewport, ElementId) + 'static,
    {
        self.connect_unit(id, SignalKind::HoverEnter, move |vp, el, _| handler(vp, el))
    }

    pub fn on_hover_leave<F>(&mut self, id: ElementId, mut handler: F) -> Connection
    where
        F: FnMut(&mut Viewport, ElementId) + 'static,
    {
        self.connect_unit(id, SignalKind::HoverLeave, move |vp, el, _| handler(vp, el))
    }

    pub fn on_focus_changed<F>(&mut self, id: ElementId, mut handler: F) -> Connection
    where
        F: FnMut(&mut Viewport, ElementId, bool) + 'static,
    {
        let kind = SignalKind::FocusChanged;
        match self.tree.get_mut(id).and_then(|el| el.focus_signal_mut(kind)) {
            Some(signal) => {
                let handler_id = signal.connect(move |vp, el, focused| handler(vp, el, *focused));
                Connection::new(handler_id, id, kind)
            }
            None => Connection::empty(),
        }
    }

    pub fn on_text_changed<F>(&mut self, id: ElementId, handler: F) -> Connection
    where
        F: FnMut(&mut Viewport, ElementId, &str) + 'static,
    {
        self.connect_text(id, SignalKind::TextChanged, handler)
    }

    pub fn on_submit<F>(&mut self, id: ElementId, handler: F) -> Connection
    where
        F: FnMut(&mut Viewport, ElementId, &str) + 'static,
    {
        self.connect_text(id, SignalKind::Submit, handler)
    }

    /// Sliders report their new value; checkboxes report `0.0` or `1.0`.
    pub fn on_value_changed<F>(&mut self, id: ElementId, mut handler: F) -> Connection
    where
        F: FnMut(&mut Viewport, ElementId, f32) + 'static,
    {
        let kind = SignalKind::ValueChanged;
        match self.tree.get_mut(id).and_then(|el| el.value_signal_mut(kind)) {
            Some(signal) => {
                let handler_id = signal.connect(move |vp, el, value| handler(vp, el, *value));
                Connection::new(handler_id, id, kind)
            }
            None => Connection::empty(),
        }
    }

    pub fn on_dropdown_changed<F>(&mut self, id: ElementId, handler: F) -> Connection
    where
        F: FnMut(&mut Viewport, ElementId, &DropdownChange) + 'static,
    {
        let kind = SignalKind::DropdownChanged;
        match self.tree.get_mut(id).and_then(|el| el.dropdown_signal_mut(kind)) {
            Some(signal) => Connection::new(signal.connect(handler), id, kind),
            None => Connection::empty(),
        }
    }

    /// Returns whether a registration was removed.
    pub fn disconnect(&mut self, connection: Connection) -> bool {
        let (Some(id), Some(kind)) = (connection.element(), connection.kind()) else {
            return false;
        };
        self.tree
            .get_mut(id)
            .is_some_and(|el| el.disconnect(kind, connection.id()))
    }

    /// Called with the element under the pointer, if any, for every dropped file.
    pub fn set_file_drop_callback<F>(&mut self, callback: F)
    where
        F: FnMut(&mut Viewport, Option<ElementId>, &Path) + 'static,
    {
        self.file_drop = Some(Box::new(callback));
    }

    pub fn clear_file_drop_callback(&mut self) {
        self.file_drop = None;
    }

    fn connect_unit<F>(&mut self, id: ElementId, kind: SignalKind, handler: F) -> Connection
    where
        F: FnMut(&mut Viewport, ElementId, &()) + 'static,
    {
        match self.tree.get_mut(id).and_then(|el| el.unit_signal_mut(kind)) {
            Some(signal) => Connection::new(signal.connect(handler), id, kind),
            None => Connection::empty(),
        }
    }

    fn connect_text<F>(&mut self, id: ElementId, kind: SignalKind, handler: F) -> Connection
    where
        F: FnMut(&mut Viewport, ElementId, &str) + 'static,
    {
        match self.tree.get_mut(id).and_then(|el| el.text_signal_mut(kind)) {
            Some(signal) => Connection::new(signal.connect(handler), id, kind),
            None => Connection::empty(),
        }
    }

    // ---- emission ----

    pub(crate) fn emit_unit(&mut self, id: ElementId, kind: SignalKind) {
        let handlers = self
            .tree
            .get_mut(id)
            .and_then(|el| el.unit_signal_mut(kind))
            .map(|signal| signal.snapshot())
            .unwrap_or_default();
        for handler in handlers {
            handler.call(self, id, &());
        }
    }

    pub(crate) fn emit_focus(&mut self, id: ElementId, focused: bool) {
        let handlers = self
            .tree
            .get_mut(id)
            .and_then(|el| el.focus_signal_mut(SignalKind::FocusChanged))
            .map(|signal| signal.snapshot())
            .unwrap_or_default();
        for handler in handlers {
            handler.call(self, id, &focused);
        }
    }

    pub(crate) fn emit_text(&mut self, id: ElementId, kind: SignalKind, text: &str) {
        let handlers = self
            .tree
            .get_mut(id)
            .and_then(|el| el.text_signal_mut(kind))
            .map(|signal| signal.snapshot())
            .unwrap_or_default();
        for handler in handlers {
            handler.call(self, id, text);
        }
    }

    pub(crate) fn emit_value(&mut self, id: ElementId, value: f32) {
        let handlers = self
            .tree
            .get_mut(id)
            .and_then(|el| el.value_signal_mut(SignalKind::ValueChanged))
            .map(|signal| signal.snapshot())
            .unwrap_or_default();
        for handler in handlers {
            handler.call(self, id, &value);
        }
    }

    pub(crate) fn emit_dropdown(&mut self, id: ElementId, change: &DropdownChange) {
        let handlers = self
            .tree
            .get_mut(id)
            .and_then(|el| el.dropdown_signal_mut(SignalKind::DropdownChanged))
            .map(|signal| signal.snapshot())
            .unwrap_or_default();
        for handler in handlers {
            handler.call(self, id, change);
        }
    }
}

struct FrameStats {
    enabled: bool,
    last_report_at: Instant,
    frames: u32,
    total_frame_time: Duration,
}

impl FrameStats {
    fn new(enabled: bool) -> Self {
        Self {
            enabled,
            last_report_at: Instant::now(),
            frames: 0,
            total_frame_time: Duration::ZERO,
        }
    }

    fn record_frame(&mut self, frame_time: Duration) {
        if !self.enabled {
            return;
        }

        self.frames += 1;
        self.total_frame_time += frame_time;

        let elapsed = self.last_report_at.elapsed();
        if elapsed < Duration::from_secs(1) {
            return;
        }

        let secs = elapsed.as_secs_f64().max(f64::EPSILON);
        let fps = self.frames as f64 / secs;
        let avg_ms = (self.total_frame_time.as_secs_f64() * 1000.0) / self.frames as f64;
        log::debug!(
            target: "rfwidgets::perf",
            "fps={:.1} frame_avg={:.2}ms frames={}",
            fps,
            avg_ms,
            self.frames
        );

        self.last_report_at = Instant::now();
        self.frames = 0;
        self.total_frame_time = Duration::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::style::Color;
    use crate::ui::{InputQueue, ManualClock};
    use crate::view::base_component::{ElementFlags, ElementType, GradientStop};
    use crate::view::pixel_surface::PixelSurface;
    use crate::view::test_support::{viewport, viewport_with_clock};

    use super::{ElementKind, Viewport};

    #[test]
    fn vertical_gradient_midpoint_interpolates_channels() {
        let mut vp = viewport();
        let panel = vp.frame(None, 0, 0, 100, 100, ElementFlags::empty());
        vp.set_gradient(
            panel,
            &[
                GradientStop::new(1.0, Color::rgb(200, 100, 50)),
                GradientStop::new(0.0, Color::BLACK),
            ],
            90.0,
        );
        let mut surface = PixelSurface::new(100, 100);
        vp.render(&mut surface);
        assert_eq!(surface.pixel(50, 50), Some(Color::rgb(100, 50, 25)));
        assert_eq!(surface.pixel(50, 0), Some(Color::BLACK));
    }

    #[test]
    fn gradient_needs_two_finite_stops() {
        let mut vp = viewport();
        let panel = vp.frame(None, 0, 0, 10, 10, ElementFlags::empty());
        vp.set_gradient(
            panel,
            &[
                GradientStop::new(f32::NAN, Color::WHITE),
                GradientStop::new(0.0, Color::BLACK),
            ],
            0.0,
        );
        let gradient = vp.element(panel).and_then(|el| el.core.effects.gradient.clone());
        assert!(gradient.is_none());
    }

    #[test]
    fn delete_clears_focus_and_subtree() {
        let mut vp = viewport();
        let column = vp.frame(None, 0, 0, 200, 200, ElementFlags::empty());
        let input = vp.input(Some(column), "", false);
        let mut queue = InputQueue::new();
        queue.move_to(20, 20);
        queue.press(crate::ui::MouseButton::Left);
        vp.poll_events(&mut queue);
        assert_eq!(vp.focused(), Some(input));

        vp.delete(column);
        assert_eq!(vp.focused(), None);
        assert!(!vp.exists(input));
        assert!(vp.roots().is_empty());
        vp.set_text(input, "ignored");
        assert_eq!(vp.text(input), None);
    }

    #[test]
    fn text_round_trips_for_every_textual_kind() {
        let mut vp = viewport();
        let ids = [
            vp.button(None, "b"),
            vp.label(None, "l"),
            vp.checkbox(None, "c"),
            vp.input(None, "", false),
        ];
        for id in ids {
            vp.set_text(id, "round trip");
            assert_eq!(vp.text(id), Some("round trip"));
        }

        let long = "x".repeat(300);
        vp.set_text(ids[3], &long);
        assert_eq!(vp.text(ids[3]).map(str::len), Some(255));

        let slider = vp.slider(None, 0.5);
        assert_eq!(vp.text(slider), None);
    }

    #[test]
    fn clone_is_a_parentless_copy_without_subscriptions() {
        let mut vp = viewport();
        let column = vp.frame(None, 0, 0, 200, 200, ElementFlags::CLIP);
        let button = vp.button(Some(column), "save");
        vp.set_custom_color(button, Color::rgb(10, 20, 30));
        vp.set_rounded_corners(button, 4);
        let clicks = Rc::new(RefCell::new(0));
        let counter = clicks.clone();
        vp.on_click(button, move |_, _| *counter.borrow_mut() += 1);

        let copy = vp.clone_element(button);
        let copy = copy.unwrap_or(button);
        assert_ne!(copy, button);
        assert_eq!(vp.parent(copy), None);
        assert_eq!(vp.text(copy), Some("save"));
        assert_eq!(vp.custom_color(copy), Some(Color::rgb(10, 20, 30)));
        assert_eq!(vp.size(copy), vp.size(button));
        assert!(vp.roots().contains(&copy));

        let panel_copy = vp.clone_element(column).unwrap_or(column);
        assert_eq!(vp.frame_child_count(panel_copy), 0);
        assert_eq!(vp.flags(panel_copy), ElementFlags::CLIP);
    }

    #[test]
    fn none_sentinel_clears_custom_color() {
        let mut vp = viewport();
        let label = vp.label(None, "l");
        vp.set_custom_color(label, Color::WHITE);
        assert_eq!(vp.custom_color(label), Some(Color::WHITE));
        vp.set_custom_color(label, Color::NONE);
        assert_eq!(vp.custom_color(label), None);
    }

    #[test]
    fn visibility_and_transparency_are_normalized() {
        let mut vp = viewport();
        let column = vp.frame(None, 0, 0, 100, 100, ElementFlags::empty());
        let child = vp.label(Some(column), "x");
        vp.set_visible(column, false);
        assert!(!vp.is_visible(child));
        vp.set_visible(column, true);
        assert!(vp.is_visible(child));

        vp.set_transparency(child, -2.0);
        assert_eq!(vp.transparency(child), 0.0);
        vp.set_draggable(child, true);
        assert!(vp.flags(child).contains(ElementFlags::DRAGGABLE));
    }

    #[test]
    fn hover_callbacks_are_edge_triggered() {
        let mut vp = viewport();
        let label = vp.label(None, "hover");
        vp.set_position(label, 100, 100);
        vp.set_size(label, 50, 20);
        let log = Rc::new(RefCell::new(Vec::new()));
        let enter = log.clone();
        vp.on_hover_enter(label, move |_, _| enter.borrow_mut().push("enter"));
        let leave = log.clone();
        vp.on_hover_leave(label, move |_, _| leave.borrow_mut().push("leave"));

        let mut surface = PixelSurface::new(320, 240);
        let mut queue = InputQueue::new();
        vp.render(&mut surface);
        queue.move_to(110, 110);
        vp.poll_events(&mut queue);
        vp.render(&mut surface);
        vp.render(&mut surface);
        queue.move_to(10, 10);
        vp.poll_events(&mut queue);
        vp.render(&mut surface);

        assert_eq!(*log.borrow(), vec!["enter", "leave"]);
    }

    #[test]
    fn page_switch_shows_only_target() {
        let mut vp = viewport();
        let pages: Vec<_> = (0..3)
            .map(|_| vp.frame(None, 0, 0, 320, 240, ElementFlags::empty()))
            .collect();
        let nested = vp.label(Some(pages[2]), "inner");
        for page in &pages {
            vp.add_page(*page);
        }
        vp.switch_page(2);
        let visible: Vec<_> = pages.iter().map(|p| vp.is_visible(*p)).collect();
        assert_eq!(visible, vec![false, false, true]);
        assert!(vp.is_visible(nested));

        vp.next_page();
        assert_eq!(vp.current_page(), Some(0));
        assert!(!vp.is_visible(nested));

        vp.delete(pages[0]);
        assert_eq!(vp.page_count(), 2);
        assert_eq!(vp.current_page(), Some(0));
        assert!(vp.is_visible(pages[1]));
    }

    #[test]
    fn frame_children_and_reparenting() {
        let mut vp = viewport();
        let outer = vp.frame(None, 0, 0, 300, 300, ElementFlags::empty());
        let inner = vp.frame(Some(outer), 0, 0, 200, 100, ElementFlags::LAYOUT_HORIZONTAL);
        let loose = vp.button(None, "b");

        assert!(vp.frame_add_child(inner, loose));
        assert_eq!(vp.frame_child_count(inner), 1);
        assert_eq!(vp.frame_child(inner, 0), Some(loose));
        assert_eq!(vp.frame_child(inner, 1), None);
        assert_eq!(vp.position(loose), Some((10, 10)));
        assert!(!vp.frame_add_child(inner, outer));
        assert_eq!(vp.frame_child_count(loose), 0);

        vp.frame_set_padding(inner, 0);
        assert_eq!(vp.position(loose), Some((0, 0)));
        vp.set_size(loose, 0, 0);
        vp.frame_set_default_child_size(inner, 40, 20);
        assert_eq!(vp.size(loose), Some((40, 20)));
    }

    #[test]
    fn canvas_drawing_and_resize() {
        let mut vp = viewport();
        let canvas = vp.canvas(None, 10, 10, 20, 20);
        vp.canvas_clear(canvas, Color::WHITE);
        vp.canvas_draw_rect(canvas, 2, 2, 4, 4, Color::rgb(255, 0, 0), true);
        assert_eq!(vp.canvas_pixel(canvas, 3, 3), Some(Color::rgb(255, 0, 0)));

        let mut surface = PixelSurface::new(64, 64);
        vp.render(&mut surface);
        assert_eq!(surface.pixel(13, 13), Some(Color::rgb(255, 0, 0)));
        assert_eq!(surface.pixel(25, 25), Some(Color::WHITE));

        vp.set_size(canvas, 8, 8);
        assert_eq!(vp.canvas_pixel(canvas, 3, 3), Some(Color::from_u32(0)));
        assert_eq!(vp.canvas_pixel(canvas, 10, 10), None);
        assert_eq!(vp.element_type(canvas), Some(ElementType::Canvas));
    }

    #[test]
    fn disconnect_stops_delivery() {
        let mut vp = viewport();
        let button = vp.button(None, "b");
        vp.set_size(button, 100, 30);
        let clicks = Rc::new(RefCell::new(0));
        let counter = clicks.clone();
        let connection = vp.on_click(button, move |_, _| *counter.borrow_mut() += 1);
        assert!(connection.is_connected());

        let mut queue = InputQueue::new();
        queue.move_to(5, 5);
        queue.press(crate::ui::MouseButton::Left);
        vp.poll_events(&mut queue);
        assert!(vp.disconnect(connection));
        queue.press(crate::ui::MouseButton::Left);
        vp.poll_events(&mut queue);
        assert_eq!(*clicks.borrow(), 1);
        assert!(!vp.disconnect(connection));

        let label = vp.label(None, "l");
        assert!(!vp.on_click(label, |_, _| {}).is_connected());
    }

    #[test]
    fn handlers_may_mutate_the_viewport() {
        let mut vp = viewport();
        let button = vp.button(None, "close");
        vp.set_size(button, 100, 30);
        vp.on_click(button, |vp, id| vp.delete(id));
        let mut queue = InputQueue::new();
        queue.move_to(5, 5);
        queue.press(crate::ui::MouseButton::Left);
        vp.poll_events(&mut queue);
        assert!(!vp.exists(button));
    }

    #[test]
    fn button_pulse_expires_with_the_clock() {
        let clock = ManualClock::new(1_000);
        let mut vp = viewport_with_clock(clock.clone());
        let button = vp.button(None, "b");
        vp.set_size(button, 100, 30);
        let mut queue = InputQueue::new();
        queue.move_to(5, 5);
        queue.press(crate::ui::MouseButton::Left);
        vp.poll_events(&mut queue);

        let pressed = |vp: &Viewport| match vp.element(button).map(|el| &el.kind) {
            Some(ElementKind::Button(state)) => state.is_pressed(),
            _ => false,
        };
        let mut surface = PixelSurface::new(200, 100);
        clock.advance(50);
        vp.render(&mut surface);
        assert!(pressed(&vp));
        clock.advance(100);
        vp.render(&mut surface);
        assert!(!pressed(&vp));
    }

    #[test]
    fn cleanup_releases_everything() {
        let mut vp = viewport();
        let page = vp.frame(None, 0, 0, 10, 10, ElementFlags::empty());
        vp.label(Some(page), "x");
        vp.add_page(page);
        vp.cleanup();
        assert!(vp.roots().is_empty());
        assert_eq!(vp.page_count(), 0);
        assert!(!vp.exists(page));
        vp.request_quit();
        assert!(vp.should_quit());
    }

}

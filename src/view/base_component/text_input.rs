use crate::style::Color;
use crate::ui::{Clipboard, Key, KeyModifiers, Rect, Signal, TextService};
use crate::view::render_pass::{ClipPass, TextAnchor, TextPass};
use crate::view::renderer::{PaintContext, PaintTarget};

use super::{ElementCore, ElementFlags};

/// Buffer capacity including the terminator slot, so at most 255 characters.
pub const INPUT_CAPACITY: usize = 256;
pub const MAX_INPUT_CHARS: usize = INPUT_CAPACITY - 1;
/// Inner padding between the field border and its text.
pub const INPUT_INSET: i32 = 5;
pub const PASSWORD_GLYPH: char = '*';
pub const SELECTION_COLOR: Color = Color::from_u32(0x0078_D788);
pub const CARET_BLINK_PERIOD_MS: u64 = 1000;
pub const CARET_VISIBLE_MS: u64 = 500;
const CARET_WIDTH: i32 = 2;
/// Room kept free for the ellipsis when an unfocused field overflows.
const ELLIPSIS_RESERVE: i32 = 30;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditOutcome {
    pub changed: bool,
    pub submitted: bool,
}

impl EditOutcome {
    fn changed(changed: bool) -> Self {
        Self {
            changed,
            submitted: false,
        }
    }
}

/// Single-line editing state. Cursor and anchor are character indices into `text` and
/// always lie within `[0, len]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextEditor {
    text: String,
    cursor: usize,
    anchor: usize,
    scroll_offset: i32,
}

impl TextEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn anchor(&self) -> usize {
        self.anchor
    }

    pub fn scroll_offset(&self) -> i32 {
        self.scroll_offset
    }

    /// Replaces the content, truncated to capacity, and parks the cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        self.text = normalize_single_line(text)
            .chars()
            .take(MAX_INPUT_CHARS)
            .collect();
        self.move_to_end();
    }

    pub fn move_to_end(&mut self) {
        self.cursor = self.len();
        self.anchor = self.cursor;
    }

    pub fn selection(&self) -> Option<(usize, usize)> {
        (self.cursor != self.anchor).then(|| {
            (self.cursor.min(self.anchor), self.cursor.max(self.anchor))
        })
    }

    pub fn selected_text(&self) -> Option<String> {
        let (start, end) = self.selection()?;
        Some(self.text.chars().skip(start).take(end - start).collect())
    }

    pub fn delete_selection(&mut self) -> bool {
        let Some((start, end)) = self.selection() else {
            return false;
        };
        let start_byte = byte_index_at_char(&self.text, start);
        let end_byte = byte_index_at_char(&self.text, end);
        self.text.replace_range(start_byte..end_byte, "");
        self.cursor = start;
        self.anchor = start;
        true
    }

    /// Replaces the selection with `incoming`. The insertion is dropped whole when it would
    /// exceed capacity; the selection is still removed.
    pub fn insert(&mut self, incoming: &str) -> bool {
        let removed = self.delete_selection();
        let incoming = normalize_single_line(incoming);
        let add = incoming.chars().count();
        if add == 0 || self.len() + add > MAX_INPUT_CHARS {
            return removed;
        }
        let at = byte_index_at_char(&self.text, self.cursor);
        self.text.insert_str(at, &incoming);
        self.cursor += add;
        self.anchor = self.cursor;
        true
    }

    pub fn handle_key(
        &mut self,
        key: Key,
        modifiers: KeyModifiers,
        clipboard: &mut dyn Clipboard,
    ) -> EditOutcome {
        let word = modifiers.shortcut();
        match key {
            Key::Backspace => EditOutcome::changed(self.backspace(word)),
            Key::Delete => EditOutcome::changed(self.delete_forward(word)),
            Key::Left => {
                let target = if word {
                    prev_word_boundary(&self.chars(), self.cursor)
                } else {
                    self.cursor.saturating_sub(1)
                };
                self.move_cursor(target, modifiers.shift);
                EditOutcome::default()
            }
            Key::Right => {
                let target = if word {
                    next_word_boundary(&self.chars(), self.cursor)
                } else {
                    self.cursor + 1
                };
                self.move_cursor(target, modifiers.shift);
                EditOutcome::default()
            }
            Key::Home => {
                self.move_cursor(0, modifiers.shift);
                EditOutcome::default()
            }
            Key::End => {
                self.move_cursor(self.len(), modifiers.shift);
                EditOutcome::default()
            }
            Key::Enter => EditOutcome {
                changed: false,
                submitted: true,
            },
            Key::Character(c) if word => match c.to_ascii_lowercase() {
                'a' => {
                    self.anchor = 0;
                    self.cursor = self.len();
                    EditOutcome::default()
                }
                'c' => {
                    if let Some(selected) = self.selected_text() {
                        clipboard.set_text(&selected);
                    }
                    EditOutcome::default()
                }
                'x' => {
                    let Some(selected) = self.selected_text() else {
                        return EditOutcome::default();
                    };
                    clipboard.set_text(&selected);
                    EditOutcome::changed(self.delete_selection())
                }
                'v' => {
                    if !clipboard.has_text() {
                        return EditOutcome::default();
                    }
                    match clipboard.text() {
                        Some(pasted) => EditOutcome::changed(self.insert(&pasted)),
                        None => EditOutcome::default(),
                    }
                }
                _ => EditOutcome::default(),
            },
            Key::Character(_) | Key::Other => EditOutcome::default(),
        }
    }

    /// Keeps the caret inside a window `visible_width` pixels wide.
    pub fn update_scroll(&mut self, visible_width: i32, password: bool, text: &mut dyn TextService) {
        let caret_x = self.prefix_width(self.cursor, password, text);
        let relative = caret_x - self.scroll_offset;
        if relative < 0 {
            self.scroll_offset = caret_x;
        } else if relative > visible_width {
            self.scroll_offset = caret_x - visible_width;
        }

        let total = self.prefix_width(self.len(), password, text);
        if total < visible_width {
            self.scroll_offset = 0;
        } else if self.scroll_offset > total - visible_width {
            self.scroll_offset = total - visible_width;
        }
        self.scroll_offset = self.scroll_offset.max(0);
    }

    /// Pixel width of the first `chars` characters as they are displayed.
    pub fn prefix_width(&self, chars: usize, password: bool, text: &mut dyn TextService) -> i32 {
        if password {
            let glyph = text.measure(&PASSWORD_GLYPH.to_string());
            return chars as i32 * glyph;
        }
        let end = byte_index_at_char(&self.text, chars);
        text.measure(&self.text[..end])
    }

    /// What gets drawn: the content, or one mask glyph per character.
    pub fn display_text(&self, password: bool) -> String {
        if password {
            std::iter::repeat_n(PASSWORD_GLYPH, self.len()).collect()
        } else {
            self.text.clone()
        }
    }

    fn chars(&self) -> Vec<char> {
        self.text.chars().collect()
    }

    fn move_cursor(&mut self, target: usize, extend: bool) {
        self.cursor = target.min(self.len());
        if !extend {
            self.anchor = self.cursor;
        }
    }

    fn backspace(&mut self, word: bool) -> bool {
        if self.delete_selection() {
            return true;
        }
        if self.cursor == 0 {
            return false;
        }
        self.anchor = if word {
            prev_word_boundary(&self.chars(), self.cursor)
        } else {
            self.cursor - 1
        };
        self.delete_selection()
    }

    fn delete_forward(&mut self, word: bool) -> bool {
        if self.delete_selection() {
            return true;
        }
        let len = self.len();
        if self.cursor >= len {
            return false;
        }
        self.anchor = if word {
            next_word_boundary(&self.chars(), self.cursor)
        } else {
            self.cursor + 1
        };
        self.delete_selection()
    }
}

pub struct TextInputState {
    pub editor: TextEditor,
    pub placeholder: String,
    pub on_focus_changed: Signal<bool>,
    pub on_text_changed: Signal<str>,
    pub on_submit: Signal<str>,
}

impl TextInputState {
    pub fn new(placeholder: &str) -> Self {
        Self {
            editor: TextEditor::new(),
            placeholder: placeholder.chars().take(MAX_INPUT_CHARS).collect(),
            on_focus_changed: Signal::new(),
            on_text_changed: Signal::new(),
            on_submit: Signal::new(),
        }
    }

    pub fn duplicate(&self) -> Self {
        let mut copy = Self::new(&self.placeholder);
        copy.editor.set_text(self.editor.text());
        copy
    }

    pub(crate) fn paint(
        &self,
        core: &ElementCore,
        target: &PaintTarget,
        ctx: &mut PaintContext<'_>,
    ) {
        let bounds = target.bounds;
        let password = core.flags.contains(ElementFlags::PASSWORD);
        let background = target.custom_color.unwrap_or(ctx.theme.background);
        ctx.paint_base(core, bounds, background);

        let inner = bounds.inset(INPUT_INSET);
        let editor = &self.editor;
        let scroll = editor.scroll_offset();
        let text_y = bounds.y + bounds.h / 2;
        ctx.passes.push(ClipPass::Push(inner));

        if let Some((start, end)) = editor.selection() {
            let x1 = editor.prefix_width(start, password, ctx.text) - scroll;
            let x2 = editor.prefix_width(end, password, ctx.text) - scroll;
            ctx.fill(
                Rect::new(inner.x + x1, inner.y, x2 - x1, inner.h),
                SELECTION_COLOR,
            );
        }

        if editor.is_empty() && !target.focused {
            let color = ctx.theme.on_surface.fade(0.5 * target.transparency);
            ctx.passes.push(TextPass::new(
                self.placeholder.as_str(),
                bounds.x + bounds.w / 2,
                text_y,
                color,
                TextAnchor::Center,
            ));
        } else {
            let shown = editor.display_text(password);
            if !target.focused && ctx.text.measure(&shown) > inner.w {
                let budget = bounds.w - ELLIPSIS_RESERVE;
                let clipped = ellipsize(&shown, budget, ctx.text);
                ctx.passes.push(TextPass::new(
                    clipped,
                    inner.x,
                    text_y,
                    target.text_color,
                    TextAnchor::Start,
                ));
            } else {
                ctx.passes.push(TextPass::new(
                    shown,
                    inner.x - scroll,
                    text_y,
                    target.text_color,
                    TextAnchor::Start,
                ));
            }
        }

        if target.focused && ctx.now_ms % CARET_BLINK_PERIOD_MS < CARET_VISIBLE_MS {
            let caret_x = editor.prefix_width(editor.cursor(), password, ctx.text) - scroll;
            ctx.fill(
                Rect::new(inner.x + caret_x, inner.y, CARET_WIDTH, inner.h),
                target.text_color,
            );
        }
        ctx.passes.push(ClipPass::Pop);

        if target.focused {
            ctx.fill(
                Rect::new(bounds.x, bounds.y + bounds.h - 2, bounds.w, 2),
                ctx.theme.primary.fade(target.transparency),
            );
        }
    }
}

/// Drops trailing characters until the rest fits in `budget`, then appends "...".
fn ellipsize(shown: &str, budget: i32, text: &mut dyn TextService) -> String {
    let mut clipped: String = shown.to_string();
    while !clipped.is_empty() && text.measure(&clipped) > budget {
        clipped.pop();
    }
    clipped.push_str("...");
    clipped
}

fn is_delimiter(c: char) -> bool {
    !c.is_alphanumeric()
}

pub fn next_word_boundary(text: &[char], from: usize) -> usize {
    let len = text.len();
    let mut i = from;
    if i >= len {
        return len;
    }
    while i < len && is_delimiter(text[i]) {
        i += 1;
    }
    while i < len && !is_delimiter(text[i]) {
        i += 1;
    }
    i
}

pub fn prev_word_boundary(text: &[char], from: usize) -> usize {
    if from == 0 {
        return 0;
    }
    let mut i = from.min(text.len()) - 1;
    while i > 0 && is_delimiter(text[i]) {
        i -= 1;
    }
    while i > 0 && !is_delimiter(text[i - 1]) {
        i -= 1;
    }
    i
}

fn normalize_single_line(text: &str) -> String {
    text.chars()
        .filter(|c| *c != '\r')
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect()
}

fn byte_index_at_char(value: &str, char_index: usize) -> usize {
    value
        .char_indices()
        .nth(char_index)
        .map(|(idx, _)| idx)
        .unwrap_or(value.len())
}

#[cfg(test)]
mod tests {
    use super::{MAX_INPUT_CHARS, TextEditor, next_word_boundary, prev_word_boundary};
    use crate::ui::{Clipboard, Key, KeyModifiers, MemoryClipboard, MonospaceText};

    fn typed(text: &str) -> TextEditor {
        let mut editor = TextEditor::new();
        editor.insert(text);
        editor
    }

    fn press(editor: &mut TextEditor, key: Key, modifiers: KeyModifiers, clipboard: &mut MemoryClipboard) {
        editor.handle_key(key, modifiers, clipboard);
        assert!(editor.cursor() <= editor.len());
        assert!(editor.anchor() <= editor.len());
    }

    #[test]
    fn shift_end_selects_and_paste_over_selection_is_identity() {
        let mut clipboard = MemoryClipboard::default();
        let mut editor = typed("hello");
        press(&mut editor, Key::Home, KeyModifiers::NONE, &mut clipboard);
        press(&mut editor, Key::End, KeyModifiers::SHIFT, &mut clipboard);
        assert_eq!(editor.selection(), Some((0, 5)));

        press(&mut editor, Key::Character('c'), KeyModifiers::CTRL, &mut clipboard);
        assert_eq!(clipboard.text().as_deref(), Some("hello"));
        press(&mut editor, Key::Character('v'), KeyModifiers::CTRL, &mut clipboard);
        assert_eq!(editor.text(), "hello");
        assert_eq!(editor.cursor(), 5);
    }

    #[test]
    fn deleting_a_selection_collapses_to_its_start() {
        let mut clipboard = MemoryClipboard::default();
        let mut editor = typed("abcdefgh");
        editor.handle_key(Key::Left, KeyModifiers::NONE, &mut clipboard);
        editor.handle_key(Key::Left, KeyModifiers::SHIFT, &mut clipboard);
        editor.handle_key(Key::Left, KeyModifiers::SHIFT, &mut clipboard);
        editor.handle_key(Key::Left, KeyModifiers::SHIFT, &mut clipboard);
        assert_eq!(editor.selection(), Some((4, 7)));

        let outcome = editor.handle_key(Key::Backspace, KeyModifiers::NONE, &mut clipboard);
        assert!(outcome.changed);
        assert_eq!(editor.text(), "abcdh");
        assert_eq!((editor.cursor(), editor.anchor()), (4, 4));
    }

    #[test]
    fn ctrl_backspace_removes_the_previous_word() {
        let mut clipboard = MemoryClipboard::default();
        let mut editor = typed("hello big world");
        editor.handle_key(Key::Backspace, KeyModifiers::CTRL, &mut clipboard);
        assert_eq!(editor.text(), "hello big ");
        editor.handle_key(Key::Home, KeyModifiers::NONE, &mut clipboard);
        editor.handle_key(Key::Delete, KeyModifiers::CTRL, &mut clipboard);
        assert_eq!(editor.text(), " big ");
    }

    #[test]
    fn word_boundaries_skip_delimiters_first() {
        let text: Vec<char> = "foo, bar".chars().collect();
        assert_eq!(next_word_boundary(&text, 0), 3);
        assert_eq!(next_word_boundary(&text, 3), 8);
        assert_eq!(prev_word_boundary(&text, 8), 5);
        assert_eq!(prev_word_boundary(&text, 5), 0);
        assert_eq!(prev_word_boundary(&text, 0), 0);
    }

    #[test]
    fn insert_over_capacity_is_rejected_whole() {
        let mut editor = typed(&"x".repeat(MAX_INPUT_CHARS - 2));
        assert!(!editor.insert("abc"));
        assert_eq!(editor.len(), MAX_INPUT_CHARS - 2);
        assert!(editor.insert("ab"));
        assert_eq!(editor.len(), MAX_INPUT_CHARS);
        assert!(!editor.insert("z"));
    }

    #[test]
    fn set_text_truncates_and_parks_cursor() {
        let mut editor = TextEditor::new();
        editor.set_text(&"é".repeat(300));
        assert_eq!(editor.len(), MAX_INPUT_CHARS);
        assert_eq!(editor.cursor(), MAX_INPUT_CHARS);
        assert_eq!(editor.anchor(), MAX_INPUT_CHARS);
    }

    #[test]
    fn select_all_then_cut_empties_the_field() {
        let mut clipboard = MemoryClipboard::default();
        let mut editor = typed("cut me");
        editor.handle_key(Key::Character('a'), KeyModifiers::CTRL, &mut clipboard);
        let outcome = editor.handle_key(Key::Character('x'), KeyModifiers::CTRL, &mut clipboard);
        assert!(outcome.changed);
        assert!(editor.is_empty());
        assert_eq!(clipboard.text().as_deref(), Some("cut me"));
    }

    #[test]
    fn scroll_follows_the_caret_and_resets_for_short_text() {
        let mut measure = MonospaceText::new(8, 16);
        let mut clipboard = MemoryClipboard::default();
        let mut editor = typed(&"a".repeat(20));
        editor.update_scroll(90, false, &mut measure);
        assert_eq!(editor.scroll_offset(), 160 - 90);

        editor.handle_key(Key::Home, KeyModifiers::NONE, &mut clipboard);
        editor.update_scroll(90, false, &mut measure);
        assert_eq!(editor.scroll_offset(), 0);

        editor.set_text("abc");
        editor.update_scroll(90, true, &mut measure);
        assert_eq!(editor.scroll_offset(), 0);
    }

    #[test]
    fn password_display_masks_every_character() {
        let editor = typed("pässword");
        assert_eq!(editor.display_text(true), "********");
        assert_eq!(editor.display_text(false), "pässword");
    }
}

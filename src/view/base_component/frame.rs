pub const DEFAULT_PADDING: i32 = 10;
pub const DEFAULT_SPACING: i32 = 8;
pub const DEFAULT_SCROLLBAR_WIDTH: i32 = 6;
pub const FALLBACK_CHILD_WIDTH: i32 = 100;
pub const FALLBACK_CHILD_HEIGHT: i32 = 30;
pub const WHEEL_STEP: i32 = 40;
pub const SCROLLBAR_FADE_MS: u64 = 1500;

/// Container state for frames: flow parameters plus the vertical scroll model.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameState {
    pub padding: i32,
    pub spacing: i32,
    pub scroll_y: i32,
    /// Written by layout.
    pub content_height: i32,
    pub last_scroll_ms: Option<u64>,
    /// Zero means no column cap.
    pub max_grid_cols: usize,
    pub scrollbar_width: i32,
    /// Size given to children that arrive with a zero dimension. Zero falls back to 100×30.
    pub default_child_w: i32,
    pub default_child_h: i32,
}

impl Default for FrameState {
    fn default() -> Self {
        Self {
            padding: DEFAULT_PADDING,
            spacing: DEFAULT_SPACING,
            scroll_y: 0,
            content_height: 0,
            last_scroll_ms: None,
            max_grid_cols: 0,
            scrollbar_width: DEFAULT_SCROLLBAR_WIDTH,
            default_child_w: 0,
            default_child_h: 0,
        }
    }
}

impl FrameState {
    pub fn child_size_for(&self, w: i32, h: i32) -> (i32, i32) {
        let w = match w {
            0 if self.default_child_w > 0 => self.default_child_w,
            0 => FALLBACK_CHILD_WIDTH,
            w => w,
        };
        let h = match h {
            0 if self.default_child_h > 0 => self.default_child_h,
            0 => FALLBACK_CHILD_HEIGHT,
            h => h,
        };
        (w, h)
    }

    /// Applies one wheel notch batch. Returns the new offset.
    pub fn scroll_by_wheel(&mut self, delta_y: f32, frame_h: i32, now_ms: u64) -> i32 {
        let step = (delta_y * WHEEL_STEP as f32) as i32;
        let limit = (self.content_height - frame_h).max(0);
        self.scroll_y = (self.scroll_y - step).clamp(0, limit);
        self.last_scroll_ms = Some(now_ms);
        self.scroll_y
    }

    /// Scrollbar opacity in `[0, 1]`, or `None` once the fade has finished.
    pub fn scrollbar_fade(&self, now_ms: u64) -> Option<f32> {
        let elapsed = now_ms.saturating_sub(self.last_scroll_ms?);
        (elapsed < SCROLLBAR_FADE_MS).then(|| 1.0 - elapsed as f32 / SCROLLBAR_FADE_MS as f32)
    }

    /// Copies configuration, not scroll position.
    pub fn duplicate(&self) -> Self {
        Self {
            padding: self.padding,
            spacing: self.spacing,
            max_grid_cols: self.max_grid_cols,
            scrollbar_width: self.scrollbar_width,
            default_child_w: self.default_child_w,
            default_child_h: self.default_child_h,
            ..Self::default()
        }
    }
}

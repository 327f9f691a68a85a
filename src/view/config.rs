use std::path::PathBuf;

use crate::style::{Color, HexColor, ThemeMode};

pub const ENV_TRACE_FPS: &str = "RFWIDGETS_TRACE_FPS";
pub const ENV_SEED: &str = "RFWIDGETS_SEED";
pub const ENV_THEME: &str = "RFWIDGETS_THEME";

pub const DEFAULT_FONT_SIZE: f32 = 16.0;

/// Startup settings for a [`Viewport`](crate::view::Viewport).
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub seed: Color,
    pub theme_mode: ThemeMode,
    pub font_path: Option<PathBuf>,
    pub font_size: f32,
    /// Periodic fps reports under the `rfwidgets::perf` log target.
    pub trace_frames: bool,
}

impl ViewportConfig {
    pub fn new(title: impl Into<String>, width: u32, height: u32, seed: Color) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            seed,
            theme_mode: ThemeMode::Dark,
            font_path: None,
            font_size: DEFAULT_FONT_SIZE,
            trace_frames: false,
        }
    }

    pub fn with_font(mut self, path: impl Into<PathBuf>, size: f32) -> Self {
        self.font_path = Some(path.into());
        self.font_size = size;
        self
    }

    pub fn with_theme_mode(mut self, mode: ThemeMode) -> Self {
        self.theme_mode = mode;
        self
    }

    pub fn with_env_overrides(self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if lookup(ENV_TRACE_FPS).is_some() {
            self.trace_frames = true;
        }
        if let Some(raw) = lookup(ENV_SEED) {
            match HexColor::new(raw.as_str()).color() {
                Some(seed) => self.seed = seed,
                None => log::warn!("ignoring {ENV_SEED}={raw:?}: not a hex color"),
            }
        }
        if let Some(raw) = lookup(ENV_THEME) {
            match ThemeMode::parse(&raw) {
                Some(mode) => self.theme_mode = mode,
                None => log::warn!("ignoring {ENV_THEME}={raw:?}: expected light or dark"),
            }
        }
        self
    }
}

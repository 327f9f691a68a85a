use once_cell::sync::Lazy;

mod hex_color;

pub use hex_color::*;

/// An sRGB color with straight alpha, packed as `0xRRGGBBAA` at the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
    a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    /// Sentinel for "no custom color".
    pub const NONE: Color = Color::rgba(255, 255, 255, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn from_u32(packed: u32) -> Self {
        Self {
            r: (packed >> 24) as u8,
            g: (packed >> 16) as u8,
            b: (packed >> 8) as u8,
            a: packed as u8,
        }
    }

    pub const fn to_u32(self) -> u32 {
        ((self.r as u32) << 24) | ((self.g as u32) << 16) | ((self.b as u32) << 8) | self.a as u32
    }

    pub const fn to_rgba_u8(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub const fn r(self) -> u8 {
        self.r
    }

    pub const fn g(self) -> u8 {
        self.g
    }

    pub const fn b(self) -> u8 {
        self.b
    }

    pub const fn a(self) -> u8 {
        self.a
    }

    pub fn hex(raw: &str) -> HexColor<'_> {
        HexColor::new(raw)
    }

    pub fn transparent() -> Self {
        Self::rgba(0, 0, 0, 0)
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Scales the alpha channel by `factor` (clamped to `[0, 1]`), truncating.
    pub fn fade(self, factor: f32) -> Self {
        let a = self.a as f32 * factor.clamp(0.0, 1.0);
        self.with_alpha(a as u8)
    }

    /// Multiplies every color channel by `factor`, saturating at 255. Alpha is kept.
    pub fn shift(self, factor: f32) -> Self {
        let scale = |c: u8| (c as f32 * factor).clamp(0.0, 255.0) as u8;
        Self::rgba(scale(self.r), scale(self.g), scale(self.b), self.a)
    }

    /// Composites `overlay` over `self` at `overlay_alpha` times the overlay's own alpha.
    /// The result keeps the base alpha.
    pub fn blend(self, overlay: Color, overlay_alpha: f32) -> Self {
        let alpha = overlay_alpha * (overlay.a as f32 / 255.0);
        let mix = |base: u8, over: u8| (base as f32 * (1.0 - alpha) + over as f32 * alpha) as u8;
        Self::rgba(
            mix(self.r, overlay.r),
            mix(self.g, overlay.g),
            mix(self.b, overlay.b),
            self.a,
        )
    }

    /// Channel-wise linear interpolation, truncating toward zero.
    pub fn lerp(self, to: Color, t: f32) -> Self {
        let mix = |from: u8, to: u8| (from as f32 + (to as f32 - from as f32) * t) as u8;
        Self::rgba(
            mix(self.r, to.r),
            mix(self.g, to.g),
            mix(self.b, to.b),
            mix(self.a, to.a),
        )
    }

    /// Relative luminance of the color channels (alpha ignored).
    pub fn relative_luminance(self) -> f32 {
        0.2126 * srgb_to_linear(self.r)
            + 0.7152 * srgb_to_linear(self.g)
            + 0.0722 * srgb_to_linear(self.b)
    }

    /// Readable foreground for text drawn on `self`.
    pub fn on_color(self) -> Self {
        if self.relative_luminance() > 0.5 {
            Color::BLACK
        } else {
            Color::WHITE
        }
    }
}

impl From<u32> for Color {
    fn from(packed: u32) -> Self {
        Color::from_u32(packed)
    }
}

impl From<Color> for u32 {
    fn from(color: Color) -> Self {
        color.to_u32()
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

static SRGB8_TO_LINEAR: Lazy<[f32; 256]> = Lazy::new(|| {
    let mut t = [0.0f32; 256];
    for (i, slot) in t.iter_mut().enumerate() {
        *slot = srgb_to_linear_f32(i as f32 / 255.0);
    }
    t
});

pub fn srgb_to_linear(c: u8) -> f32 {
    SRGB8_TO_LINEAR[c as usize]
}

pub fn srgb_to_linear_f32(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

use crate::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            s if s.eq_ignore_ascii_case("dark") => Some(ThemeMode::Dark),
            s if s.eq_ignore_ascii_case("light") => Some(ThemeMode::Light),
            _ => None,
        }
    }
}

/// Role colors derived from a seed. Regenerated wholesale on every theme change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub seed: Color,
    pub mode: ThemeMode,
    pub primary: Color,
    pub on_primary: Color,
    pub secondary: Color,
    pub on_secondary: Color,
    pub tertiary: Color,
    pub on_tertiary: Color,
    pub background: Color,
    pub on_background: Color,
    pub surface: Color,
    pub on_surface: Color,
    pub primary_container: Color,
    pub on_primary_container: Color,
    pub outline: Color,
}

struct ModeConstants {
    background: Color,
    on_background: Color,
    surface: Color,
    on_surface: Color,
    container_mix: f32,
    outline: Color,
}

const DARK: ModeConstants = ModeConstants {
    background: Color::rgb(15, 15, 18),
    on_background: Color::rgb(230, 230, 235),
    surface: Color::rgb(30, 30, 35),
    on_surface: Color::rgb(230, 230, 235),
    container_mix: 0.3,
    outline: Color::rgb(70, 70, 75),
};

const LIGHT: ModeConstants = ModeConstants {
    background: Color::rgb(250, 250, 252),
    on_background: Color::rgb(26, 26, 30),
    surface: Color::rgb(255, 255, 255),
    on_surface: Color::rgb(26, 26, 30),
    container_mix: 0.15,
    outline: Color::rgb(120, 120, 125),
};

impl Theme {
    pub fn generate(seed: Color, mode: ThemeMode) -> Self {
        let [r, g, b, _] = seed.to_rgba_u8();
        let (r, g, b) = (r as f32, g as f32, b as f32);
        let channel = |v: f32| v.min(255.0) as u8;

        let secondary = Color::rgb(
            channel(r * 0.7 + 50.0),
            channel(g * 0.7 + 50.0),
            channel(b * 0.7 + 50.0),
        );
        let tertiary = Color::rgb(
            channel(r * 0.5 + b * 0.3),
            channel(g * 0.8),
            channel(b * 0.5 + r * 0.3),
        );

        let constants = match mode {
            ThemeMode::Dark => &DARK,
            ThemeMode::Light => &LIGHT,
        };
        let primary_container = constants.surface.blend(seed, constants.container_mix);

        Self {
            seed,
            mode,
            primary: seed,
            on_primary: seed.on_color(),
            secondary,
            on_secondary: secondary.on_color(),
            tertiary,
            on_tertiary: tertiary.on_color(),
            background: constants.background,
            on_background: constants.on_background,
            surface: constants.surface,
            on_surface: constants.on_surface,
            primary_container,
            on_primary_container: primary_container.on_color(),
            outline: constants.outline,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Theme, ThemeMode};
    use crate::style::Color;

    #[test]
    fn secondary_and_tertiary_follow_channel_blends() {
        let theme = Theme::generate(Color::from_u32(0xC8643200), ThemeMode::Dark);
        // r=200 g=100 b=50
        assert_eq!(theme.secondary.to_rgba_u8(), [190, 120, 85, 255]);
        assert_eq!(theme.tertiary.to_rgba_u8(), [115, 80, 85, 255]);
        assert_eq!(theme.primary, Color::from_u32(0xC8643200));
    }

    #[test]
    fn secondary_saturates_bright_seeds() {
        let theme = Theme::generate(Color::rgb(255, 255, 255), ThemeMode::Light);
        assert_eq!(theme.secondary.to_rgba_u8(), [228, 228, 228, 255]);
        assert_eq!(theme.tertiary.to_rgba_u8(), [204, 204, 204, 255]);
    }

    #[test]
    fn mode_picks_surface_constants() {
        let dark = Theme::generate(Color::rgb(0, 120, 215), ThemeMode::Dark);
        let light = Theme::generate(Color::rgb(0, 120, 215), ThemeMode::Light);
        assert_eq!(dark.surface, Color::rgb(30, 30, 35));
        assert_eq!(light.surface, Color::rgb(255, 255, 255));
        assert_eq!(dark.outline, Color::rgb(70, 70, 75));
        assert_eq!(light.on_surface, Color::rgb(26, 26, 30));
        assert_eq!(
            dark.primary_container,
            Color::rgb(30, 30, 35).blend(Color::rgb(0, 120, 215), 0.3)
        );
    }

    #[test]
    fn on_colors_track_luminance_for_sampled_seeds() {
        for packed in (0u32..=0xFFFF_FFFF).step_by(0x0101_0F13) {
            for mode in [ThemeMode::Dark, ThemeMode::Light] {
                let theme = Theme::generate(Color::from_u32(packed), mode);
                for (base, on) in [
                    (theme.primary, theme.on_primary),
                    (theme.secondary, theme.on_secondary),
                    (theme.tertiary, theme.on_tertiary),
                    (theme.primary_container, theme.on_primary_container),
                ] {
                    let expected = if base.relative_luminance() > 0.5 {
                        Color::BLACK
                    } else {
                        Color::WHITE
                    };
                    assert_eq!(on, expected);
                }
            }
        }
    }

    #[test]
    fn mode_parse_is_case_insensitive() {
        assert_eq!(ThemeMode::parse("Light"), Some(ThemeMode::Light));
        assert_eq!(ThemeMode::parse(" dark "), Some(ThemeMode::Dark));
        assert_eq!(ThemeMode::parse("sepia"), None);
    }
}

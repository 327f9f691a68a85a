use crate::error::WidgetError;
use crate::style::color::Color;
use std::borrow::Cow;

/// A `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa` literal. Invalid input resolves to `None`.
pub struct HexColor<'a> {
    raw: Cow<'a, str>,
    value: Option<Color>,
}

impl<'a> HexColor<'a> {
    pub fn new(hex: impl Into<Cow<'a, str>>) -> Self {
        let raw = hex.into();
        let value = parse(raw.trim().as_bytes());
        HexColor { raw, value }
    }

    pub fn get_raw(&self) -> &str {
        &self.raw
    }

    pub fn color(&self) -> Option<Color> {
        self.value
    }

    pub fn to_color(&self) -> Result<Color, WidgetError> {
        self.value
            .ok_or_else(|| WidgetError::InvalidColor(self.raw.to_string()))
    }
}

impl std::str::FromStr for Color {
    type Err = WidgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HexColor::new(s).to_color()
    }
}

fn parse(bytes: &[u8]) -> Option<Color> {
    if !validate(bytes) {
        return None;
    }
    let color = match bytes.len() {
        4 | 5 => {
            let r = hex_1_to_u8(bytes[1]) * 17;
            let g = hex_1_to_u8(bytes[2]) * 17;
            let b = hex_1_to_u8(bytes[3]) * 17;
            let a = bytes.get(4).map_or(255, |&c| hex_1_to_u8(c) * 17);
            Color::rgba(r, g, b, a)
        }
        _ => {
            let r = hex_2_to_u8(bytes[1], bytes[2]);
            let g = hex_2_to_u8(bytes[3], bytes[4]);
            let b = hex_2_to_u8(bytes[5], bytes[6]);
            let a = if bytes.len() == 9 {
                hex_2_to_u8(bytes[7], bytes[8])
            } else {
                255
            };
            Color::rgba(r, g, b, a)
        }
    };
    Some(color)
}

fn validate(bytes: &[u8]) -> bool {
    let length = bytes.len();

    if length == 0 || bytes[0] != b'#' {
        return false;
    }

    if length != 4 && length != 5 && length != 7 && length != 9 {
        return false;
    }

    bytes[1..].iter().all(u8::is_ascii_hexdigit)
}

fn hex_1_to_u8(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => 0,
    }
}

fn hex_2_to_u8(c1: u8, c2: u8) -> u8 {
    (hex_1_to_u8(c1) << 4) | hex_1_to_u8(c2)
}

#[cfg(test)]
mod tests {
    use super::HexColor;
    use crate::style::Color;

    #[test]
    fn parses_all_literal_lengths() {
        assert_eq!(HexColor::new("#f00").color(), Some(Color::rgb(255, 0, 0)));
        assert_eq!(
            HexColor::new("#f008").color(),
            Some(Color::rgba(255, 0, 0, 0x88))
        );
        assert_eq!(
            HexColor::new("#3366cc").color(),
            Some(Color::rgb(0x33, 0x66, 0xcc))
        );
        assert_eq!(
            HexColor::new("#3366cc80").color(),
            Some(Color::rgba(0x33, 0x66, 0xcc, 0x80))
        );
    }

    #[test]
    fn rejects_malformed_literals() {
        assert!(HexColor::new("3366cc").color().is_none());
        assert!(HexColor::new("#33g6cc").color().is_none());
        assert!("#12345".parse::<Color>().is_err());
    }
}

//! Hex color strings as stored on elements.

use peniko::Color;

/// Parse a CSS-style color (`#rgb`, `#rrggbb`, `#rrggbbaa`, or `transparent`).
pub fn parse_color(color: &str) -> Option<Color> {
    let color = color.trim();
    if color.eq_ignore_ascii_case("transparent") {
        return Some(Color::TRANSPARENT);
    }

    let hex = color.strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            // #rgb -> #rrggbb
            let r = channel(&hex[0..1])? * 17;
            let g = channel(&hex[1..2])? * 17;
            let b = channel(&hex[2..3])? * 17;
            Some(Color::from_rgba8(r, g, b, 255))
        }
        6 => Some(Color::from_rgba8(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            255,
        )),
        8 => Some(Color::from_rgba8(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            channel(&hex[6..8])?,
        )),
        _ => None,
    }
}

/// Parse a color, falling back to opaque black.
pub fn color_or_black(color: &str) -> Color {
    parse_color(color).unwrap_or(Color::from_rgba8(0, 0, 0, 255))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        let c = parse_color("#fef3c7").unwrap().to_rgba8();
        assert_eq!((c.r, c.g, c.b, c.a), (0xfe, 0xf3, 0xc7, 255));

        let c = parse_color("#fff").unwrap().to_rgba8();
        assert_eq!((c.r, c.g, c.b), (255, 255, 255));

        let c = parse_color("#00000080").unwrap().to_rgba8();
        assert_eq!(c.a, 0x80);
    }

    #[test]
    fn test_transparent_and_invalid() {
        assert_eq!(parse_color("transparent").unwrap().to_rgba8().a, 0);
        assert!(parse_color("red").is_none());
        assert!(parse_color("#12345").is_none());
        assert_eq!(color_or_black("nope").to_rgba8().r, 0);
    }
}

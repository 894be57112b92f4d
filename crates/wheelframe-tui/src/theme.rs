use ratatui::style::Color;

/// Runtime theme with configurable colors
#[derive(Debug, Clone)]
pub struct Theme {
    // Background colors
    pub bg0: Color,
    pub bg1: Color,
    pub bg2: Color,

    // Foreground colors
    pub fg0: Color,
    pub grey0: Color,
    pub grey2: Color,

    // Semantic colors
    pub captured: Color,
    pub released: Color,
    pub accent: Color,
}

impl Default for Theme {
    fn default() -> Self {
        // Default to Gruvbox Dark
        Self {
            bg0: Color::Rgb(0x28, 0x28, 0x28),
            bg1: Color::Rgb(0x32, 0x30, 0x2f),
            bg2: Color::Rgb(0x45, 0x40, 0x3d),
            fg0: Color::Rgb(0xd4, 0xbe, 0x98),
            grey0: Color::Rgb(0x7c, 0x6f, 0x64),
            grey2: Color::Rgb(0xa8, 0x99, 0x84),
            captured: Color::Rgb(0xa9, 0xb6, 0x65),
            released: Color::Rgb(0xe7, 0x8a, 0x4e),
            accent: Color::Rgb(0x89, 0xb4, 0x82),
        }
    }
}

impl Theme {
    /// Default theme with the accent replaced by `accent`, when it parses
    pub fn with_accent(accent: Option<&str>) -> Self {
        let mut theme = Self::default();
        if let Some(color) = accent.and_then(parse_hex_color) {
            theme.accent = color;
        }
        theme
    }
}

/// Parse a hex color string (e.g., "#d8a657" or "d8a657") to a ratatui Color
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#d8a657"), Some(Color::Rgb(0xd8, 0xa6, 0x57)));
        assert_eq!(parse_hex_color("FFFFFF"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#gg0000"), None);
    }

    #[test]
    fn test_with_accent() {
        let theme = Theme::with_accent(Some("#112233"));
        assert_eq!(theme.accent, Color::Rgb(0x11, 0x22, 0x33));

        let fallback = Theme::with_accent(Some("not a color"));
        assert_eq!(fallback.accent, Theme::default().accent);
    }
}

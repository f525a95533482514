// Terminal colors for the light and dark themes.
//
// Backgrounds and text come from the chart palette so the terminal and the
// serialized chart agree.

use ratatui::style::Color;

use skaterdash_core::chart::Theme;

/// Minty primary, used for highlights in both themes.
const ACCENT: Color = Color::Rgb(0x78, 0xC2, 0xAD);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Colors {
    pub background: Color,
    pub panel: Color,
    pub text: Color,
    pub grid: Color,
    pub accent: Color,
    pub muted: Color,
    pub error: Color,
}

pub fn colors(theme: Theme) -> Colors {
    let palette = theme.palette();
    let muted = match theme {
        Theme::Light => Color::Rgb(0x88, 0x88, 0x88),
        Theme::Dark => Color::Rgb(0xAD, 0xB5, 0xBD),
    };
    Colors {
        background: parse_hex(&palette.paper_background).unwrap_or(Color::Reset),
        panel: parse_hex(&palette.plot_background).unwrap_or(Color::Reset),
        text: parse_hex(&palette.font).unwrap_or(Color::Reset),
        grid: parse_hex(&palette.grid).unwrap_or(Color::DarkGray),
        accent: ACCENT,
        muted,
        error: Color::Rgb(0xF3, 0x96, 0x9A),
    }
}

/// Parse `#RRGGBB` or `#RGB`.
pub fn parse_hex(value: &str) -> Option<Color> {
    let hex = value.strip_prefix('#').filter(|h| h.is_ascii())?;
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some(Color::Rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        3 => {
            let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
            Some(Color::Rgb(expand(0)?, expand(1)?, expand(2)?))
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_six_digit_hex() {
        assert_eq!(parse_hex("#343A40"), Some(Color::Rgb(0x34, 0x3A, 0x40)));
        assert_eq!(parse_hex("#ff4c00"), Some(Color::Rgb(0xFF, 0x4C, 0x00)));
    }

    #[test]
    fn parse_three_digit_hex() {
        assert_eq!(parse_hex("#eee"), Some(Color::Rgb(0xEE, 0xEE, 0xEE)));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(parse_hex("343A40"), None);
        assert_eq!(parse_hex("#12345"), None);
        assert_eq!(parse_hex("#GGGGGG"), None);
    }

    #[test]
    fn dark_theme_uses_dark_backgrounds() {
        let c = colors(Theme::Dark);
        assert_eq!(c.background, Color::Rgb(0x2B, 0x30, 0x35));
        assert_eq!(c.panel, Color::Rgb(0x34, 0x3A, 0x40));
        assert_eq!(c.text, Color::Rgb(0xEE, 0xEE, 0xEE));
    }

    #[test]
    fn light_and_dark_differ() {
        assert_ne!(colors(Theme::Light).background, colors(Theme::Dark).background);
    }
}

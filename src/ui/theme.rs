use ratatui::style::Color;

use crate::session::Theme;

/// Colors a theme resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub accent: Color,
    pub secondary: Color,
    pub correct: Color,
    pub incorrect: Color,
    pub corrected: Color,
    pub pending: Color,
}

pub fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Neon => Palette {
            accent: Color::Cyan,
            secondary: Color::LightBlue,
            correct: Color::Green,
            incorrect: Color::Red,
            corrected: Color::Rgb(255, 165, 0),
            pending: Color::DarkGray,
        },
        Theme::Matrix => Palette {
            accent: Color::Green,
            secondary: Color::LightGreen,
            correct: Color::LightGreen,
            incorrect: Color::Red,
            corrected: Color::Yellow,
            pending: Color::Rgb(0, 95, 0),
        },
        Theme::Cyberpunk => Palette {
            accent: Color::Magenta,
            secondary: Color::LightMagenta,
            correct: Color::LightCyan,
            incorrect: Color::LightRed,
            corrected: Color::Yellow,
            pending: Color::Rgb(110, 70, 120),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn themes_have_distinct_accents() {
        let accents = [Theme::Neon, Theme::Matrix, Theme::Cyberpunk].map(|t| palette(t).accent);
        assert_ne!(accents[0], accents[1]);
        assert_ne!(accents[1], accents[2]);
        assert_ne!(accents[0], accents[2]);
    }

    #[test]
    fn error_colors_differ_from_correct() {
        for theme in [Theme::Neon, Theme::Matrix, Theme::Cyberpunk] {
            let p = palette(theme);
            assert_ne!(p.correct, p.incorrect);
            assert_ne!(p.correct, p.corrected);
        }
    }
}

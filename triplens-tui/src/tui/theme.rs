use ratatui::style::Color;
use std::str::FromStr;

pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub highlight: Color,
    pub axis: Color,
    pub points: Color,
    pub series: [Color; 4],
    pub shades: [Color; 5], // low to high density
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            bg: Color::Black,
            fg: Color::White,
            highlight: Color::Yellow,
            axis: Color::Gray,
            points: Color::Cyan,
            series: [Color::Cyan, Color::Yellow, Color::Magenta, Color::LightGreen],
            shades: [
                Color::Rgb(68, 1, 84),
                Color::Rgb(59, 82, 139),
                Color::Rgb(33, 145, 140),
                Color::Rgb(94, 201, 98),
                Color::Rgb(253, 231, 37),
            ],
        }
    }
    pub fn light() -> Self {
        Self {
            bg: Color::White,
            fg: Color::Black,
            highlight: Color::Blue,
            axis: Color::DarkGray,
            points: Color::Blue,
            series: [Color::Blue, Color::Red, Color::Magenta, Color::Green],
            ..Self::dark()
        }
    }
    pub fn nord() -> Self {
        Self {
            bg: Color::Rgb(46, 52, 64),
            fg: Color::Rgb(216, 222, 233),
            highlight: Color::Rgb(136, 192, 208),
            axis: Color::Rgb(76, 86, 106),
            points: Color::Rgb(129, 161, 193),
            series: [
                Color::Rgb(136, 192, 208),
                Color::Rgb(235, 203, 139),
                Color::Rgb(180, 142, 173),
                Color::Rgb(163, 190, 140),
            ],
            ..Self::dark()
        }
    }
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "nord" => Self::nord(),
            _ => Self::dark(),
        }
    }
    pub fn shade(&self, level: usize) -> Color {
        self.shades[level.min(self.shades.len() - 1)]
    }
}

/// Named colors used by plot styles, falling back to ratatui's own names and `#rrggbb`.
pub fn parse_color(name: &str, fallback: Color) -> Color {
    match name.to_ascii_lowercase().as_str() {
        "steelblue" => Color::Rgb(70, 130, 180),
        "tan" => Color::Rgb(210, 180, 140),
        "navy" => Color::Rgb(0, 0, 128),
        "orange" => Color::Rgb(255, 165, 0),
        other => Color::from_str(other).unwrap_or(fallback),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_colors() {
        assert_eq!(parse_color("SteelBlue", Color::Reset), Color::Rgb(70, 130, 180));
        assert_eq!(parse_color("Tan", Color::Reset), Color::Rgb(210, 180, 140));
        assert_eq!(parse_color("#ff0000", Color::Reset), Color::Rgb(255, 0, 0));
        assert_eq!(parse_color("not-a-colour", Color::Reset), Color::Reset);
    }

    #[test]
    fn unknown_theme_is_dark() {
        assert_eq!(Theme::from_name("???").bg, Color::Black);
        assert_eq!(Theme::nord().shade(99), Theme::dark().shades[4]);
    }
}

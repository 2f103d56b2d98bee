use plotters::style::RGBColor;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn background(&self) -> RGBColor {
        match self {
            Theme::Dark => RGBColor(0, 0, 0),
            Theme::Light => RGBColor(255, 255, 255),
        }
    }

    /// Text, axes, bar outlines and error bars.
    pub fn foreground(&self) -> RGBColor {
        match self {
            Theme::Dark => RGBColor(255, 255, 255),
            Theme::Light => RGBColor(0, 0, 0),
        }
    }

    pub fn grid_color(&self) -> RGBColor {
        match self {
            Theme::Dark => RGBColor(211, 211, 211),
            Theme::Light => RGBColor(176, 176, 176),
        }
    }

    pub fn minor_grid_color(&self) -> RGBColor {
        match self {
            Theme::Dark => RGBColor(96, 96, 96),
            Theme::Light => RGBColor(224, 224, 224),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Theme::Dark => "Dark",
            Theme::Light => "Light",
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Light
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_names_parse_from_json() {
        for theme in [Theme::Dark, Theme::Light] {
            let json = format!("\"{}\"", theme.label());
            assert_eq!(serde_json::from_str::<Theme>(&json).unwrap(), theme);
        }
    }

    #[test]
    fn foreground_contrasts_with_background() {
        for theme in [Theme::Dark, Theme::Light] {
            assert_ne!(theme.background(), theme.foreground(), "{}", theme.label());
        }
    }
}

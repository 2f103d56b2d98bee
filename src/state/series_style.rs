use plotters::style::RGBColor;
use serde::Deserialize;

/// Default per-series colors, cycled by column index.
pub const COLOR_PALETTE: [[u8; 3]; 12] = [
    [214, 39, 40],   // Red
    [44, 160, 44],   // Green
    [31, 119, 180],  // Blue
    [255, 127, 14],  // Orange
    [23, 190, 207],  // Cyan
    [140, 86, 75],   // Brown
    [148, 103, 189], // Purple
    [227, 119, 194], // Pink
    [127, 127, 127], // Gray
    [188, 189, 34],  // Olive
    [0, 0, 128],     // Navy
    [255, 215, 0],   // Gold
];

pub fn color_for_index(palette: &[[u8; 3]], index: usize) -> RGBColor {
    let [r, g, b] = if palette.is_empty() {
        COLOR_PALETTE[index % COLOR_PALETTE.len()]
    } else {
        palette[index % palette.len()]
    };
    RGBColor(r, g, b)
}

/// Point marker drawn on line charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Marker {
    Circle,
    Cross,
    Triangle,
    Square,
    None,
}

impl Marker {
    const CYCLE: [Marker; 4] = [Marker::Circle, Marker::Cross, Marker::Triangle, Marker::Square];

    pub fn for_index(index: usize) -> Self {
        Self::CYCLE[index % Self::CYCLE.len()]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Marker::Circle => "circle",
            Marker::Cross => "cross",
            Marker::Triangle => "triangle",
            Marker::Square => "square",
            Marker::None => "none",
        }
    }
}

/// Overrides for one series; unset fields fall back to the cycled defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SeriesStyle {
    pub color: Option<[u8; 3]>,
    pub marker: Option<Marker>,
    /// Line width in pixels.
    pub line_width: Option<u32>,
}

/// A series style with every field decided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedStyle {
    pub color: RGBColor,
    pub marker: Marker,
    pub line_width: u32,
}

impl SeriesStyle {
    pub fn resolve(&self, palette: &[[u8; 3]], index: usize, default_width: u32) -> ResolvedStyle {
        ResolvedStyle {
            color: self
                .color
                .map(|[r, g, b]| RGBColor(r, g, b))
                .unwrap_or_else(|| color_for_index(palette, index)),
            marker: self.marker.unwrap_or_else(|| Marker::for_index(index)),
            line_width: self.line_width.unwrap_or(default_width),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_cycles() {
        assert_eq!(color_for_index(&[], 0), color_for_index(&[], 12));
        assert_eq!(color_for_index(&[[1, 2, 3]], 5), RGBColor(1, 2, 3));
    }

    #[test]
    fn overrides_win_over_cycle() {
        let style = SeriesStyle {
            color: Some([9, 9, 9]),
            marker: Some(Marker::None),
            line_width: None,
        };
        let resolved = style.resolve(&[], 1, 2);
        assert_eq!(resolved.color, RGBColor(9, 9, 9));
        assert_eq!(resolved.marker, Marker::None);
        assert_eq!(resolved.line_width, 2);
    }

    #[test]
    fn defaults_follow_index() {
        let resolved = SeriesStyle::default().resolve(&[], 2, 1);
        assert_eq!(resolved.marker, Marker::Triangle);
        assert_eq!(resolved.color, RGBColor(31, 119, 180));
    }
}

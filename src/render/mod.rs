//! Chart rendering on top of [`plotters`].
//!
//! Charts draw onto any backend through [`Chart`]. [`save_chart`] picks the
//! backend from the output extension: `.svg` goes through the SVG backend,
//! everything else is rasterised into an RGB buffer and encoded with
//! [`image`], which chooses the format from the extension.

pub mod axis;
pub mod bar_chart;
pub mod legend;
pub mod line_chart;

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use thiserror::Error;

/// Errors that can occur during plot generation
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Failed to save plot to file: {0}")]
    ImageSave(#[from] image::ImageError),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = core::result::Result<T, PlotError>;

/// Something that can draw itself onto a plotters drawing area.
pub trait Chart {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()>;
}

fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"))
}

/// Render `chart` at `size` pixels and write it to `path`.
pub fn save_chart<C: Chart>(chart: &C, path: &Path, size: (u32, u32)) -> Result<()> {
    let (width, height) = size;
    if width == 0 || height == 0 {
        return Err(PlotError::InvalidData(format!(
            "image size {width}x{height} is empty"
        )));
    }

    if is_svg(path) {
        let root = SVGBackend::new(path, size).into_drawing_area();
        chart.draw(&root)?;
        root.present()
            .map_err(|e| PlotError::DrawingArea(e.to_string()))?;
    } else {
        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, size).into_drawing_area();
            chart.draw(&root)?;
            root.present()
                .map_err(|e| PlotError::DrawingArea(e.to_string()))?;
        }
        let img = image::RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
            PlotError::InvalidData(format!("pixel buffer does not match {width}x{height}"))
        })?;
        img.save(path)?;
    }

    tracing::info!("saving figure image {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn svg_is_detected_case_insensitively() {
        assert!(is_svg(Path::new("out/chart.SVG")));
        assert!(!is_svg(Path::new("chart.png")));
        assert!(!is_svg(Path::new("svg")));
    }
}

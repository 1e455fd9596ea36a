//! ECG waveform rendering
//!
//! Draws normalized samples as a PNG line plot (sample index vs amplitude)
//! for the report page and the PDF document.

use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use printpdf::image_crate::{DynamicImage, ImageFormat, RgbImage};
use serde_json::Value;
use thiserror::Error;

use crate::report::normalize_samples;

pub const PLOT_TITLE: &str = "ECG Waveform";

const GRID_COLOR: RGBColor = RGBColor(200, 200, 200);
const TRACE_COLOR: RGBColor = RGBColor(31, 119, 180);
const VERTICAL_GRID_LINES: usize = 10;
const HORIZONTAL_GRID_LINES: usize = 6;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("no samples to plot")]
    Empty,
    #[error("invalid plot size {0}x{1}")]
    InvalidSize(u32, u32),
    #[error("amplitude range {0}..{1} cannot be plotted")]
    Range(f64, f64),
    #[error("drawing failed: {0}")]
    Backend(String),
    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

/// Target raster size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotSize {
    pub width: u32,
    pub height: u32,
}

impl PlotSize {
    /// Wide and short, for embedding in the PDF (6 x 2.5 in at 200 dpi).
    pub const COMPACT: PlotSize = PlotSize { width: 1200, height: 500 };
    /// For the interactive report page.
    pub const DISPLAY: PlotSize = PlotSize { width: 640, height: 480 };

    fn scale(&self) -> f64 {
        (self.height as f64 / 480.0).max(0.5)
    }
}

impl Default for PlotSize {
    fn default() -> Self {
        PlotSize::DISPLAY
    }
}

/// Normalize raw samples and render them; `None` when there is nothing to
/// plot or drawing fails.
pub fn render_waveform(raw: Option<&Value>, size: PlotSize) -> Option<Vec<u8>> {
    let samples = normalize_samples(raw)?;
    match draw_waveform(&samples, size) {
        Ok(png) => Some(png),
        Err(err) => {
            tracing::warn!(error = %err, samples = samples.len(), "failed to render ECG waveform");
            None
        }
    }
}

/// Draw already-normalized samples to PNG bytes.
pub fn draw_waveform(samples: &[f64], size: PlotSize) -> Result<Vec<u8>, PlotError> {
    if samples.is_empty() {
        return Err(PlotError::Empty);
    }
    if size.width < 64 || size.height < 64 {
        return Err(PlotError::InvalidSize(size.width, size.height));
    }

    let (width, height) = (size.width, size.height);
    let scale = size.scale();
    let (y_min, y_max) = amplitude_range(samples)?;
    let x_max = (samples.len().max(2) - 1) as f64;

    let mut buffer = vec![0u8; buffer_len(size)?];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(backend)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(PLOT_TITLE, ("sans-serif", 22.0 * scale))
            .margin((12.0 * scale) as u32)
            .x_label_area_size((40.0 * scale) as u32)
            .y_label_area_size((56.0 * scale) as u32)
            .build_cartesian_2d(0f64..x_max, y_min..y_max)
            .map_err(backend)?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc("Sample Index")
            .y_desc("Amplitude")
            .label_style(("sans-serif", 13.0 * scale))
            .axis_desc_style(("sans-serif", 15.0 * scale))
            .draw()
            .map_err(backend)?;

        let grid_style = GRID_COLOR.stroke_width(1);
        for i in 1..VERTICAL_GRID_LINES {
            let x = x_max * i as f64 / VERTICAL_GRID_LINES as f64;
            chart
                .draw_series(DashedLineSeries::new(vec![(x, y_min), (x, y_max)], 6, 4, grid_style))
                .map_err(backend)?;
        }
        for i in 1..HORIZONTAL_GRID_LINES {
            let y = y_min + (y_max - y_min) * i as f64 / HORIZONTAL_GRID_LINES as f64;
            chart
                .draw_series(DashedLineSeries::new(vec![(0.0, y), (x_max, y)], 6, 4, grid_style))
                .map_err(backend)?;
        }

        chart
            .draw_series(LineSeries::new(
                samples.iter().enumerate().map(|(i, v)| (i as f64, *v)),
                TRACE_COLOR.stroke_width(((1.5 * scale).round() as u32).max(1)),
            ))
            .map_err(backend)?;

        root.present().map_err(backend)?;
    }

    let img = RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| PlotError::Encode("pixel buffer size mismatch".to_string()))?;

    let mut png_bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| PlotError::Encode(e.to_string()))?;

    Ok(png_bytes)
}

fn backend<E: std::fmt::Display>(err: E) -> PlotError {
    PlotError::Backend(err.to_string())
}

/// RGB byte count for `size`, rejecting sizes that do not fit in memory.
fn buffer_len(size: PlotSize) -> Result<usize, PlotError> {
    (size.width as usize)
        .checked_mul(size.height as usize)
        .and_then(|pixels| pixels.checked_mul(3))
        .ok_or(PlotError::InvalidSize(size.width, size.height))
}

/// Y range with a 5% margin; a flat trace gets a unit band around it.
/// Fails when the padded range is not finite, which plotters cannot draw.
fn amplitude_range(samples: &[f64]) -> Result<(f64, f64), PlotError> {
    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    let (low, high) = if span.abs() < f64::EPSILON {
        (min - 1.0, max + 1.0)
    } else {
        (min - span * 0.05, max + span * 0.05)
    };
    if !(low.is_finite() && high.is_finite() && low < high) {
        return Err(PlotError::Range(min, max));
    }
    Ok((low, high))
}

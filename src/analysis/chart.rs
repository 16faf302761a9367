// src/analysis/chart.rs

//! Score distribution histogram, rasterized to PNG with tiny-skia.

use std::path::Path;

use thiserror::Error;
use tiny_skia::{Color, Paint, PathBuilder, Pixmap, Rect, Stroke, StrokeDash, Transform};

pub const BINS: usize = 10;

const WIDTH: u32 = 1000;
const HEIGHT: u32 = 500;
const MARGIN: f32 = 60.0;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("no scores to plot")]
    NoData,

    #[error("score range {lo}..{hi} is too wide to bin")]
    Range { lo: f64, hi: f64 },

    #[error("failed to draw chart: {0}")]
    Draw(&'static str),

    #[error("failed to encode PNG: {0}")]
    Encode(String),

    #[error("failed to write chart to {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Fixed-width bins over `[min, max]`. The last bin is closed on the right.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn build(values: &[f64], bins: usize) -> Result<Self, ChartError> {
        if values.is_empty() || bins == 0 {
            return Err(ChartError::NoData);
        }

        let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
        let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        if !width.is_finite() || width <= 0.0 {
            return Err(ChartError::Range { lo, hi });
        }
        let edges = (0..=bins).map(|i| lo + width * i as f64).collect();

        let mut counts = vec![0; bins];
        for v in values {
            let idx = (((v - lo) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Ok(Self { edges, counts })
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Draws the bars plus a dashed vertical line at `reference` and returns PNG bytes.
pub fn render_histogram(histogram: &Histogram, reference: f64) -> Result<Vec<u8>, ChartError> {
    let mut pixmap = Pixmap::new(WIDTH, HEIGHT).ok_or(ChartError::Draw("pixmap"))?;
    pixmap.fill(Color::WHITE);

    let first = histogram.edges.first().copied().ok_or(ChartError::NoData)?;
    let last = histogram.edges.last().copied().ok_or(ChartError::NoData)?;
    // Widen the x range so the reference line is always on the canvas.
    let x_min = first.min(reference);
    let x_max = last.max(reference);
    let span = if x_max > x_min { x_max - x_min } else { 1.0 };

    let plot_w = WIDTH as f32 - 2.0 * MARGIN;
    let plot_h = HEIGHT as f32 - 2.0 * MARGIN;
    let baseline = HEIGHT as f32 - MARGIN;
    let to_x = |v: f64| MARGIN + ((v - x_min) / span) as f32 * plot_w;
    let max_count = histogram.max_count().max(1) as f32;

    let mut bar = Paint::default();
    bar.set_color_rgba8(31, 119, 180, 178);
    // Sub-pixel anti-aliased rects hit tiny-skia's hairline assertion.
    bar.anti_alias = false;

    for (i, &count) in histogram.counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        let left = to_x(histogram.edges[i]);
        let right = to_x(histogram.edges[i + 1]).max(left + 1.0);
        let top = baseline - count as f32 / max_count * plot_h;
        let rect = Rect::from_ltrb(left, top, right, baseline).ok_or(ChartError::Draw("bar"))?;
        pixmap.fill_rect(rect, &bar, Transform::identity(), None);
    }

    let mut axis = Paint::default();
    axis.set_color_rgba8(0, 0, 0, 255);
    let axes = {
        let mut pb = PathBuilder::new();
        pb.move_to(MARGIN, MARGIN);
        pb.line_to(MARGIN, baseline);
        pb.line_to(WIDTH as f32 - MARGIN, baseline);
        pb.finish().ok_or(ChartError::Draw("axes"))?
    };
    let axis_stroke = Stroke {
        width: 1.5,
        ..Stroke::default()
    };
    pixmap.stroke_path(&axes, &axis, &axis_stroke, Transform::identity(), None);

    let mut marker = Paint::default();
    marker.set_color_rgba8(214, 39, 40, 255);
    marker.anti_alias = true;
    let line = {
        let x = to_x(reference);
        let mut pb = PathBuilder::new();
        pb.move_to(x, MARGIN);
        pb.line_to(x, baseline);
        pb.finish().ok_or(ChartError::Draw("reference line"))?
    };
    let dashed = Stroke {
        width: 2.0,
        dash: StrokeDash::new(vec![8.0, 5.0], 0.0),
        ..Stroke::default()
    };
    pixmap.stroke_path(&line, &marker, &dashed, Transform::identity(), None);

    pixmap
        .encode_png()
        .map_err(|e| ChartError::Encode(e.to_string()))
}

/// Writes the PNG, creating parent directories as needed.
pub fn write_chart(path: &Path, png: &[u8]) -> Result<(), ChartError> {
    let io_err = |source: std::io::Error| ChartError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, png).map_err(io_err)?;

    tracing::info!(path = %path.display(), bytes = png.len(), "Score distribution chart written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_histogram_has_ten_equal_bins() {
        let values: Vec<f64> = (0..=100).map(f64::from).collect();

        let h = Histogram::build(&values, BINS).unwrap();

        assert_eq!(h.edges.len(), 11);
        assert_eq!(h.edges[0], 0.0);
        assert_eq!(h.edges[10], 100.0);
        assert_eq!(h.counts.iter().sum::<usize>(), 101);
        // max lands in the closed last bin
        assert_eq!(h.counts[9], 11);
        assert_eq!(h.counts[0], 10);
    }

    #[test]
    fn test_histogram_single_value_widens_range() {
        let h = Histogram::build(&[5.0, 5.0], BINS).unwrap();

        assert_eq!(h.edges[0], 4.5);
        assert_eq!(h.edges[10], 5.5);
        assert_eq!(h.counts.iter().sum::<usize>(), 2);
    }

    #[test]
    fn test_histogram_without_values_fails() {
        assert!(matches!(Histogram::build(&[], BINS), Err(ChartError::NoData)));
    }

    #[test]
    fn test_render_produces_png() {
        let h = Histogram::build(&[10.0, 20.0, 20.0, 35.0, 90.0], BINS).unwrap();

        let png = render_histogram(&h, 42.0).unwrap();

        assert_eq!(&png[..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_render_with_reference_outside_bins() {
        let h = Histogram::build(&[10.0, 12.0], BINS).unwrap();

        let png = render_histogram(&h, 200.0).unwrap();

        assert_eq!(&png[..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_render_clustered_scores_far_from_reference() {
        let h = Histogram::build(&[100.0, 101.0], BINS).unwrap();

        let png = render_histogram(&h, 10.0).unwrap();

        assert_eq!(&png[..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_histogram_rejects_overflowing_range() {
        let err = Histogram::build(&[-1e308, 1e308], BINS).unwrap_err();

        assert!(matches!(err, ChartError::Range { .. }));
    }

    #[test]
    fn test_write_chart_creates_parent_dirs() {
        let dir = env::temp_dir().join(format!("quiz_insights_chart_{}", std::process::id()));
        let path = dir.join("nested").join("score_distribution.png");
        let _ = std::fs::remove_dir_all(&dir);

        write_chart(&path, &PNG_SIGNATURE).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), PNG_SIGNATURE);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}

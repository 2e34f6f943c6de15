//! SVG rendering of training curves.

use std::fmt::Write;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::metrics::TrainingHistory;

/// Parameters for curve rendering.
///
/// The output stacks two panels: accuracy on top, loss below, each
/// with training and validation series.
#[derive(Debug, Clone)]
pub struct CurveParams {
    /// Width of the SVG in pixels.
    pub width: u32,
    /// Height of each panel in pixels.
    pub panel_height: u32,
    /// Padding around each panel in pixels.
    pub padding: u32,
    /// Epochs to drop from the start of every series.
    ///
    /// The first few hundred epochs dominate the value range and
    /// flatten the interesting tail, so they are skipped by default.
    /// Ignored when the run is too short to leave two points.
    pub skip_epochs: usize,
    /// Title for the accuracy panel.
    pub accuracy_title: String,
    /// Title for the loss panel.
    pub loss_title: String,
    /// Stroke color for training series.
    pub train_color: String,
    /// Stroke color for validation series.
    pub val_color: String,
    /// Background color.
    pub background_color: String,
}

impl Default for CurveParams {
    fn default() -> Self {
        Self {
            width: 900,
            panel_height: 360,
            padding: 50,
            skip_epochs: Self::DEFAULT_SKIP_EPOCHS,
            accuracy_title: "Accuracy over epochs".to_string(),
            loss_title: "Loss over epochs".to_string(),
            train_color: "#1f77b4".to_string(),
            val_color: "#ff7f0e".to_string(),
            background_color: "#ffffff".to_string(),
        }
    }
}

impl CurveParams {
    /// Default number of leading epochs to skip.
    pub const DEFAULT_SKIP_EPOCHS: usize = 500;

    /// Create params with custom size.
    #[must_use]
    pub const fn with_size(mut self, width: u32, panel_height: u32) -> Self {
        self.width = width;
        self.panel_height = panel_height;
        self
    }

    /// Create params with a custom number of skipped epochs.
    #[must_use]
    pub const fn with_skip_epochs(mut self, skip_epochs: usize) -> Self {
        self.skip_epochs = skip_epochs;
        self
    }

    /// Create params with custom panel titles.
    #[must_use]
    pub fn with_titles(mut self, accuracy: &str, loss: &str) -> Self {
        self.accuracy_title = accuracy.to_string();
        self.loss_title = loss.to_string();
        self
    }
}

/// A named series within a panel.
struct Series<'a> {
    label: &'a str,
    color: &'a str,
    values: Vec<f32>,
}

/// Render accuracy and loss curves as a stacked two-panel SVG.
///
/// # Example
///
/// ```
/// use voice_training::{CurveParams, EpochMetrics, TrainingHistory, render_curves_svg};
///
/// let mut history = TrainingHistory::default();
/// for epoch in 1..=10 {
///     let loss = 1.0 / epoch as f32;
///     history.record(EpochMetrics::new(epoch, loss, 1.0 - loss).with_validation(loss, 1.0 - loss));
/// }
/// let svg = render_curves_svg(&history, &CurveParams::default().with_skip_epochs(0));
/// assert!(svg.contains("<svg"));
/// ```
#[must_use]
pub fn render_curves_svg(history: &TrainingHistory, params: &CurveParams) -> String {
    let total_height = params.panel_height * 2;
    if history.len() < 2 {
        return format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\">\n\
  <rect width=\"100%\" height=\"100%\" fill=\"{}\"/>\n\
  <text x=\"50%\" y=\"50%\" text-anchor=\"middle\" fill=\"#999\">No training history</text>\n\
</svg>",
            params.width, total_height, params.width, total_height, params.background_color
        );
    }

    // Skip the leading epochs unless that would leave fewer than two points.
    let skip = if history.len() > params.skip_epochs + 1 {
        params.skip_epochs
    } else {
        0
    };
    let epochs: Vec<usize> = history.epochs.iter().skip(skip).map(|m| m.epoch).collect();

    let accuracy_series = [
        Series {
            label: "Accuracy",
            color: &params.train_color,
            values: history.train_accuracy().split_off(skip),
        },
        Series {
            label: "Validate accuracy",
            color: &params.val_color,
            values: history.val_accuracy().split_off(skip),
        },
    ];
    let loss_series = [
        Series {
            label: "Loss",
            color: &params.train_color,
            values: history.train_loss().split_off(skip),
        },
        Series {
            label: "Validate loss",
            color: &params.val_color,
            values: history.val_loss().split_off(skip),
        },
    ];

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">
  <rect width="100%" height="100%" fill="{}"/>
"#,
        params.width, total_height, params.width, total_height, params.background_color
    );

    render_panel(
        &mut svg,
        0.0,
        &epochs,
        &accuracy_series,
        &params.accuracy_title,
        params,
    );
    render_panel(
        &mut svg,
        f64::from(params.panel_height),
        &epochs,
        &loss_series,
        &params.loss_title,
        params,
    );

    svg.push_str("</svg>");
    svg
}

/// Write the rendered curves to `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_curves_svg(history: &TrainingHistory, path: &Path, params: &CurveParams) -> Result<()> {
    let svg = render_curves_svg(history, params);
    fs::write(path, svg)?;
    info!(path = %path.display(), epochs = history.len(), "Wrote training curves");
    Ok(())
}

/// Render one panel (axes, grid, series, legend) into `svg`.
#[allow(clippy::cast_precision_loss)]
fn render_panel(
    svg: &mut String,
    origin_y: f64,
    epochs: &[usize],
    series: &[Series<'_>],
    title: &str,
    params: &CurveParams,
) {
    let padding = f64::from(params.padding);
    let plot_w = 2.0f64.mul_add(-padding, f64::from(params.width));
    let plot_h = 2.0f64.mul_add(-padding, f64::from(params.panel_height));
    let left = padding;
    let top = origin_y + padding;

    let first_epoch = epochs.first().copied().unwrap_or(0) as f64;
    let last_epoch = epochs.last().copied().unwrap_or(1) as f64;
    let epoch_span = (last_epoch - first_epoch).max(1.0);

    let mut min_value = f64::INFINITY;
    let mut max_value = f64::NEG_INFINITY;
    for s in series {
        for &v in &s.values {
            min_value = min_value.min(f64::from(v));
            max_value = max_value.max(f64::from(v));
        }
    }
    let span = max_value - min_value;
    let (min_value, max_value) = if span > 0.0 {
        (
            span.mul_add(-0.05, min_value),
            span.mul_add(0.05, max_value),
        )
    } else {
        (min_value - 0.5, max_value + 0.5)
    };
    let value_span = max_value - min_value;

    let x_of = |epoch: f64| left + (epoch - first_epoch) / epoch_span * plot_w;
    let y_of = |value: f64| top + plot_h - (value - min_value) / value_span * plot_h;

    // Title
    let _ = writeln!(
        svg,
        r##"  <text x="{:.1}" y="{:.1}" text-anchor="middle" font-family="sans-serif" font-size="15" fill="#333">{title}</text>"##,
        left + plot_w / 2.0,
        origin_y + padding / 2.0 + 4.0
    );

    // Horizontal grid lines and value labels
    for i in 0..=4 {
        let value = (value_span / 4.0).mul_add(f64::from(i), min_value);
        let y = y_of(value);
        let _ = writeln!(
            svg,
            r##"  <line x1="{left:.1}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="#dddddd" stroke-width="1"/>"##,
            left + plot_w
        );
        let _ = writeln!(
            svg,
            r##"  <text x="{:.1}" y="{:.1}" text-anchor="end" font-family="sans-serif" font-size="11" fill="#666">{value:.3}</text>"##,
            left - 6.0,
            y + 4.0
        );
    }

    // Epoch ticks
    for i in 0..=4 {
        let epoch = (epoch_span / 4.0).mul_add(f64::from(i), first_epoch);
        let x = x_of(epoch);
        let _ = writeln!(
            svg,
            r##"  <line x1="{x:.1}" y1="{:.1}" x2="{x:.1}" y2="{:.1}" stroke="#dddddd" stroke-width="1"/>"##,
            top,
            top + plot_h
        );
        let _ = writeln!(
            svg,
            r##"  <text x="{x:.1}" y="{:.1}" text-anchor="middle" font-family="sans-serif" font-size="11" fill="#666">{epoch:.0}</text>"##,
            top + plot_h + 16.0
        );
    }

    // Axis label
    let _ = writeln!(
        svg,
        r##"  <text x="{:.1}" y="{:.1}" text-anchor="middle" font-family="sans-serif" font-size="12" fill="#333">Epoch</text>"##,
        left + plot_w / 2.0,
        origin_y + f64::from(params.panel_height) - 8.0
    );

    // Series polylines
    for s in series {
        let mut points = String::new();
        for (&epoch, &value) in epochs.iter().zip(&s.values) {
            let _ = write!(points, "{:.2},{:.2} ", x_of(epoch as f64), y_of(f64::from(value)));
        }
        let _ = writeln!(
            svg,
            r#"  <polyline points="{}" fill="none" stroke="{}" stroke-width="1.5"/>"#,
            points.trim_end(),
            s.color
        );
    }

    // Legend, top-right inside the plot
    for (i, s) in series.iter().enumerate() {
        let y = top + 8.0 + 16.0 * i as f64;
        let x = left + plot_w - 150.0;
        let _ = writeln!(
            svg,
            r#"  <line x1="{x:.1}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="{}" stroke-width="2"/>"#,
            x + 18.0,
            s.color
        );
        let _ = writeln!(
            svg,
            r##"  <text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="11" fill="#333">{}</text>"##,
            x + 24.0,
            y + 4.0,
            s.label
        );
    }
}

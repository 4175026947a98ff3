//! SVG chart rendering.
//!
//! Charts are assembled as SVG strings and written straight to disk: line
//! charts over a shared date axis with legend and axis ticks, and pie
//! charts with percentage labels.

use chrono::NaiveDate;
use std::fs;
use std::path::Path;
use thiserror::Error;

const WIDTH: i32 = 900;
const HEIGHT: i32 = 540;
const PADDING: f64 = 52.0;

/// Series color palette, assigned in order.
const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Errors that can occur while rendering or saving charts.
#[derive(Debug, Error)]
pub enum ChartError {
    /// The chart holds no drawable data.
    #[error("nothing to draw: {reason}")]
    Empty {
        /// Why rendering was refused.
        reason: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One named line on a shared date axis.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    /// Legend label.
    pub label: String,

    /// Values aligned to the chart's date axis; non-finite points break the
    /// line.
    pub values: Vec<f64>,
}

/// A line chart of one or more series over a shared date axis.
#[derive(Debug, Clone)]
pub struct LineChart {
    title: String,
    y_label: String,
    dates: Vec<NaiveDate>,
    series: Vec<ChartSeries>,
    percent_axis: bool,
}

impl LineChart {
    /// Create an empty chart over `dates`.
    pub fn new(title: impl Into<String>, y_label: impl Into<String>, dates: Vec<NaiveDate>) -> Self {
        Self {
            title: title.into(),
            y_label: y_label.into(),
            dates,
            series: Vec::new(),
            percent_axis: false,
        }
    }

    /// Format y-axis tick labels as percentages.
    pub fn with_percent_axis(mut self) -> Self {
        self.percent_axis = true;
        self
    }

    /// Add a series aligned to the chart's date axis.
    pub fn push_series(&mut self, label: impl Into<String>, values: Vec<f64>) {
        self.series.push(ChartSeries {
            label: label.into(),
            values,
        });
    }

    /// Render the chart to an SVG string.
    pub fn render(&self) -> Result<String, ChartError> {
        if self.dates.is_empty() || self.series.is_empty() {
            return Err(ChartError::Empty {
                reason: format!("line chart '{}' has no dates or series", self.title),
            });
        }
        let (min_v, max_v) = self.extent().ok_or_else(|| ChartError::Empty {
            reason: format!("line chart '{}' has no finite values", self.title),
        })?;

        let width = f64::from(WIDTH);
        let height = f64::from(HEIGHT);
        let xs = x_positions(self.dates.len(), width);

        let mut svg = svg_header(WIDTH, HEIGHT);
        svg.push_str(&format!(
            r##"<text x="{x:.1}" y="24" text-anchor="middle" font-size="16" fill="#222">{title}</text>"##,
            x = width / 2.0,
            title = escape(&self.title),
        ));
        svg.push_str(&format!(
            r##"<text x="16" y="{y:.1}" text-anchor="middle" font-size="11" fill="#444" transform="rotate(-90 16 {y:.1})">{label}</text>"##,
            y = height / 2.0,
            label = escape(&self.y_label),
        ));

        self.draw_y_axis(&mut svg, min_v, max_v, width, height);
        self.draw_x_axis(&mut svg, &xs, height);

        for (index, series) in self.series.iter().enumerate() {
            let color = PALETTE[index % PALETTE.len()];
            let mut points: Vec<String> = Vec::new();
            for (x, value) in xs.iter().zip(&series.values) {
                if value.is_finite() {
                    let y = scale_value(*value, min_v, max_v, height);
                    points.push(format!("{:.2},{:.2}", x, y));
                }
            }
            if points.is_empty() {
                continue;
            }
            svg.push_str(&format!(
                r##"<polyline fill="none" stroke="{color}" stroke-width="1.6" points="{points}" />"##,
                color = color,
                points = points.join(" "),
            ));
        }

        self.draw_legend(&mut svg);
        svg.push_str("</svg>");
        Ok(svg)
    }

    /// Render and write the chart to `path`.
    pub fn save(&self, path: &Path) -> Result<(), ChartError> {
        let svg = self.render()?;
        fs::write(path, svg)?;
        Ok(())
    }

    fn extent(&self) -> Option<(f64, f64)> {
        let mut min_v = f64::INFINITY;
        let mut max_v = f64::NEG_INFINITY;
        for series in &self.series {
            for value in &series.values {
                if value.is_finite() {
                    min_v = min_v.min(*value);
                    max_v = max_v.max(*value);
                }
            }
        }
        if !min_v.is_finite() || !max_v.is_finite() {
            return None;
        }
        if min_v == max_v {
            let adjust = if min_v == 0.0 { 1.0 } else { min_v.abs() * 0.1 };
            min_v -= adjust;
            max_v += adjust;
        }
        Some((min_v, max_v))
    }

    fn draw_y_axis(&self, svg: &mut String, min_v: f64, max_v: f64, width: f64, height: f64) {
        const TICKS: usize = 5;
        for tick in 0..=TICKS {
            let value = min_v + (max_v - min_v) * (tick as f64) / (TICKS as f64);
            let y = scale_value(value, min_v, max_v, height);
            svg.push_str(&format!(
                r##"<line x1="{x1:.1}" y1="{y:.2}" x2="{x2:.1}" y2="{y:.2}" stroke="#ddd" stroke-width="0.8" />"##,
                x1 = PADDING,
                x2 = width - PADDING,
                y = y,
            ));
            let label = if self.percent_axis {
                format!("{:.1}%", value * 100.0)
            } else {
                format!("{:.2}", value)
            };
            svg.push_str(&format!(
                r##"<text x="{x:.1}" y="{y:.2}" text-anchor="end" font-size="10" fill="#444">{label}</text>"##,
                x = PADDING - 6.0,
                y = y + 3.0,
                label = label,
            ));
        }
    }

    fn draw_x_axis(&self, svg: &mut String, xs: &[f64], height: f64) {
        const MAX_LABELS: usize = 6;
        let step = (self.dates.len() / MAX_LABELS).max(1);
        for (index, (date, x)) in self.dates.iter().zip(xs).enumerate() {
            if index % step != 0 && index != self.dates.len() - 1 {
                continue;
            }
            svg.push_str(&format!(
                r##"<text x="{x:.2}" y="{y:.1}" text-anchor="middle" font-size="10" fill="#444">{date}</text>"##,
                x = x,
                y = height - PADDING + 18.0,
                date = date,
            ));
        }
        svg.push_str(&format!(
            r##"<line x1="{x1:.1}" y1="{y:.1}" x2="{x2:.1}" y2="{y:.1}" stroke="#888" stroke-width="1" />"##,
            x1 = PADDING,
            x2 = f64::from(WIDTH) - PADDING,
            y = height - PADDING,
        ));
    }

    fn draw_legend(&self, svg: &mut String) {
        let x = PADDING + 12.0;
        let mut y = PADDING + 6.0;
        for (index, series) in self.series.iter().enumerate() {
            let color = PALETTE[index % PALETTE.len()];
            svg.push_str(&format!(
                r##"<line x1="{x1:.1}" y1="{y1:.1}" x2="{x2:.1}" y2="{y1:.1}" stroke="{color}" stroke-width="2" />"##,
                x1 = x,
                x2 = x + 20.0,
                y1 = y - 4.0,
                color = color,
            ));
            svg.push_str(&format!(
                r##"<text x="{x:.1}" y="{y:.1}" text-anchor="start" font-size="11" fill="#333">{label}</text>"##,
                x = x + 26.0,
                y = y,
                label = escape(&series.label),
            ));
            y += 16.0;
        }
    }
}

/// One pie slice.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    /// Slice label.
    pub label: String,

    /// Slice value; only positive finite values are drawable.
    pub value: f64,
}

/// A pie chart of labelled shares.
#[derive(Debug, Clone)]
pub struct PieChart {
    title: String,
    slices: Vec<PieSlice>,
}

impl PieChart {
    /// Starting angle in degrees, counter-clockwise from the positive x axis.
    const START_ANGLE_DEG: f64 = 140.0;

    /// Create an empty pie chart.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slices: Vec::new(),
        }
    }

    /// Add a slice.
    pub fn push_slice(&mut self, label: impl Into<String>, value: f64) {
        self.slices.push(PieSlice {
            label: label.into(),
            value,
        });
    }

    /// Render the chart to an SVG string.
    ///
    /// Non-positive and non-finite slices cannot be drawn as wedges and are
    /// skipped.
    pub fn render(&self) -> Result<String, ChartError> {
        let drawable: Vec<&PieSlice> = self
            .slices
            .iter()
            .filter(|slice| slice.value.is_finite() && slice.value > 0.0)
            .collect();
        let total: f64 = drawable.iter().map(|slice| slice.value).sum();
        if drawable.is_empty() || total <= 0.0 {
            return Err(ChartError::Empty {
                reason: format!("pie chart '{}' has no positive slices", self.title),
            });
        }

        let size = f64::from(HEIGHT);
        let cx = f64::from(WIDTH) / 2.0;
        let cy = size / 2.0 + 10.0;
        let radius = size / 2.0 - PADDING - 10.0;

        let mut svg = svg_header(WIDTH, HEIGHT);
        svg.push_str(&format!(
            r##"<text x="{x:.1}" y="24" text-anchor="middle" font-size="16" fill="#222">{title}</text>"##,
            x = f64::from(WIDTH) / 2.0,
            title = escape(&self.title),
        ));

        let mut angle = Self::START_ANGLE_DEG.to_radians();
        for (index, slice) in drawable.iter().enumerate() {
            let fraction = slice.value / total;
            let sweep = fraction * std::f64::consts::TAU;
            let end = angle + sweep;
            let color = PALETTE[index % PALETTE.len()];

            let (x1, y1) = (cx + radius * angle.cos(), cy - radius * angle.sin());
            let (x2, y2) = (cx + radius * end.cos(), cy - radius * end.sin());
            let large_arc = i32::from(fraction > 0.5);
            svg.push_str(&format!(
                r##"<path d="M {cx:.2} {cy:.2} L {x1:.2} {y1:.2} A {r:.2} {r:.2} 0 {large} 0 {x2:.2} {y2:.2} Z" fill="{color}" stroke="#fff" stroke-width="1" />"##,
                cx = cx,
                cy = cy,
                x1 = x1,
                y1 = y1,
                r = radius,
                large = large_arc,
                x2 = x2,
                y2 = y2,
                color = color,
            ));

            let mid = angle + sweep / 2.0;
            let (px, py) = (cx + radius * 0.62 * mid.cos(), cy - radius * 0.62 * mid.sin());
            svg.push_str(&format!(
                r##"<text x="{x:.2}" y="{y:.2}" text-anchor="middle" font-size="11" fill="#fff">{pct:.1}%</text>"##,
                x = px,
                y = py,
                pct = fraction * 100.0,
            ));

            let (lx, ly) = (cx + radius * 1.12 * mid.cos(), cy - radius * 1.12 * mid.sin());
            let anchor = if mid.cos() >= 0.0 { "start" } else { "end" };
            svg.push_str(&format!(
                r##"<text x="{x:.2}" y="{y:.2}" text-anchor="{anchor}" font-size="11" fill="#333">{label}</text>"##,
                x = lx,
                y = ly,
                anchor = anchor,
                label = escape(&slice.label),
            ));

            angle = end;
        }

        svg.push_str("</svg>");
        Ok(svg)
    }

    /// Render and write the chart to `path`.
    pub fn save(&self, path: &Path) -> Result<(), ChartError> {
        let svg = self.render()?;
        fs::write(path, svg)?;
        Ok(())
    }
}

fn svg_header(width: i32, height: i32) -> String {
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif"><rect width="{w}" height="{h}" fill="#fff" />"##,
        w = width,
        h = height,
    )
}

fn x_positions(count: usize, width: f64) -> Vec<f64> {
    if count <= 1 {
        return vec![width / 2.0];
    }
    let inner = width - 2.0 * PADDING;
    (0..count)
        .map(|index| PADDING + inner * (index as f64) / ((count - 1) as f64))
        .collect()
}

fn scale_value(value: f64, min_v: f64, max_v: f64, height: f64) -> f64 {
    let inner = height - 2.0 * PADDING;
    let norm = (value - min_v) / (max_v - min_v);
    PADDING + (1.0 - norm) * inner
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

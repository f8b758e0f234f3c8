use crate::series::{CumulativeSeries, Midpoint};
use serde::{Deserialize, Serialize};

pub const MIDPOINT_COLOR: u32 = 0xD62728;
pub const CURVE_COLOR: u32 = 0x1F77B4;

const MAX_DASHES: f64 = 10_000.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Axis {
    pub label: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Style {
    pub width: f32,
    /// `[on, off]` lengths in pixels; honoured for vertical markers.
    pub dash: Option<[f32; 2]>,
    pub color: Color,
}

#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    pub fn rgb(&self) -> (u8, u8, u8) {
        (
            ((self.0 >> 16) & 0xFF) as u8,
            ((self.0 >> 8) & 0xFF) as u8,
            (self.0 & 0xFF) as u8,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineSeries {
    pub name: String,
    pub points: Vec<[f64; 2]>,
    pub style: Style,
}

/// Vertical marker spanning the whole y range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VLine {
    pub name: String,
    pub x: f64,
    pub style: Style,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Series {
    Line(LineSeries),
    VLine(VLine),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Figure {
    pub title: Option<String>,
    pub x: Axis,
    pub y: Axis,
    pub series: Vec<Series>,
}

impl Figure {
    pub fn new(title: impl Into<Option<String>>) -> Self {
        Self {
            title: title.into(),
            x: Axis { label: None },
            y: Axis { label: None },
            series: Vec::new(),
        }
    }

    pub fn with_labels(mut self, x: &str, y: &str) -> Self {
        self.x.label = Some(x.into());
        self.y.label = Some(y.into());
        self
    }

    pub fn add_series(&mut self, series: Series) {
        self.series.push(series);
    }

    /// `(x_min, x_max, y_min, y_max)` over line points and markers, if any.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let mut xs = Vec::new();
        let mut ys = Vec::new();
        for series in &self.series {
            match series {
                Series::Line(line) => {
                    xs.extend(line.points.iter().map(|p| p[0]));
                    ys.extend(line.points.iter().map(|p| p[1]));
                }
                Series::VLine(marker) => xs.push(marker.x),
            }
        }
        let fold = |values: &[f64]| {
            values
                .iter()
                .copied()
                .filter(|v| v.is_finite())
                .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                    None => Some((v, v)),
                    Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
                })
        };
        let (x_min, x_max) = fold(xs.as_slice())?;
        let (y_min, y_max) = fold(ys.as_slice())?;
        Some((x_min, x_max, y_min, y_max))
    }
}

pub trait PlotBackend {
    fn draw(&mut self, fig: &Figure) -> anyhow::Result<()>;
}

pub fn decimate_points(points: &[[f64; 2]], max_points: usize) -> Vec<[f64; 2]> {
    if points.len() <= max_points {
        return points.to_vec();
    }
    let bucket_size = points.len() as f64 / max_points as f64;
    let mut result = Vec::with_capacity(max_points);
    for i in 0..max_points {
        let start = (i as f64 * bucket_size).floor() as usize;
        if start >= points.len() {
            break;
        }
        result.push(points[start]);
    }
    result
}

/// Split `[start, end]` into `(from, to)` runs of length `on` separated by `off` gaps.
/// Falls back to one solid run when the pattern is unusable.
pub fn dash_segments(start: f64, end: f64, on: f64, off: f64) -> Vec<(f64, f64)> {
    let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
    let period = on + off;
    if !(on > 0.0 && off >= 0.0 && lo.is_finite() && hi.is_finite())
        || (hi - lo) / period > MAX_DASHES
    {
        return vec![(lo, hi)];
    }
    let mut segments = Vec::new();
    let mut pos = lo;
    while pos < hi {
        segments.push((pos, (pos + on).min(hi)));
        pos += period;
    }
    segments
}

fn midpoint_marker(midpoint: &Midpoint) -> Series {
    Series::VLine(VLine {
        name: format!("Perceptual midpoint: age {:.1}", midpoint.age),
        x: midpoint.age,
        style: Style {
            width: 2.0,
            dash: Some([6.0, 4.0]),
            color: Color(MIDPOINT_COLOR),
        },
    })
}

/// Perceived value of a whole year (`1 / age`) at integer ages, with the midpoint marked.
pub fn figure_from_midpoint(max_age: u32, midpoint: &Midpoint) -> Figure {
    let points = (1..=max_age.max(1))
        .map(|age| [age as f64, 1.0 / age as f64])
        .collect();
    let mut fig = Figure::new(Some("Perceived value of a year vs. age".into()))
        .with_labels("Age (years)", "Perceived value of a single year");
    fig.add_series(Series::Line(LineSeries {
        name: "Perceived value of a year (1/age)".into(),
        points,
        style: Style {
            width: 2.0,
            dash: None,
            color: Color(CURVE_COLOR),
        },
    }));
    fig.add_series(midpoint_marker(midpoint));
    fig
}

/// Running total of perceived value against age, decimated to `max_points`.
pub fn figure_from_cumulative(
    cumulative: &CumulativeSeries,
    midpoint: &Midpoint,
    max_points: usize,
) -> Figure {
    let points: Vec<[f64; 2]> = cumulative
        .ages
        .iter()
        .zip(&cumulative.values)
        .map(|(&age, &value)| [age + cumulative.step, value])
        .collect();
    let mut fig = Figure::new(Some("Cumulative perceived time".into()))
        .with_labels("Age (years)", "Cumulative perceived value");
    fig.add_series(Series::Line(LineSeries {
        name: "Cumulative perceived value".into(),
        points: decimate_points(&points, max_points),
        style: Style {
            width: 1.4,
            dash: None,
            color: Color(CURVE_COLOR),
        },
    }));
    fig.add_series(midpoint_marker(midpoint));
    fig
}

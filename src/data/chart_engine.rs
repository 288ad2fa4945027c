//! Chart data projection
//!
//! Reshapes two columns of a [`Table`] into the series a renderer needs for
//! one [`ChartKind`]. Projection is pure: no aggregation, filtering or
//! sorting, and a missing column yields an empty series instead of an error.

use crate::data::axis::AxisSelection;
use crate::types::{CellValue, ChartKind, Table};
use serde::Serialize;
use std::fmt;

/// An RGBA color as consumed by chart renderers
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Pie slice palette, assigned by `row_index % PIE_PALETTE.len()`
pub const PIE_PALETTE: [Rgba; 6] = [
    Rgba::new(59, 130, 246, 0.8),  // Blue
    Rgba::new(139, 92, 246, 0.8),  // Violet
    Rgba::new(16, 185, 129, 0.8),  // Emerald
    Rgba::new(245, 158, 11, 0.8),  // Amber
    Rgba::new(239, 68, 68, 0.8),   // Red
    Rgba::new(236, 72, 153, 0.8),  // Pink
];

/// Series color for bar, line and scatter charts
pub const SERIES_COLOR: Rgba = Rgba::new(59, 130, 246, 1.0);

/// Border drawn around pie slices
pub const PIE_BORDER: Rgba = Rgba::new(0, 0, 0, 0.2);

const BORDER_WIDTH: f32 = 2.0;

/// Curve tension for line charts
const LINE_TENSION: f32 = 0.4;

/// How a category or scatter series is drawn
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SeriesStyle {
    pub fill: Rgba,
    pub border: Rgba,
    pub border_width: f32,
    /// Fill the area beneath a continuous curve
    pub area_fill: bool,
    /// Bezier tension, 0 for straight segments
    pub tension: f32,
}

impl SeriesStyle {
    /// Discrete columns
    pub fn bar() -> Self {
        Self {
            fill: SERIES_COLOR.with_alpha(0.8),
            border: SERIES_COLOR,
            border_width: BORDER_WIDTH,
            area_fill: false,
            tension: 0.0,
        }
    }

    /// Continuous curve with area fill
    pub fn line() -> Self {
        Self {
            fill: SERIES_COLOR.with_alpha(0.1),
            border: SERIES_COLOR,
            border_width: BORDER_WIDTH,
            area_fill: true,
            tension: LINE_TENSION,
        }
    }

    pub fn scatter() -> Self {
        Self {
            fill: SERIES_COLOR.with_alpha(0.8),
            border: SERIES_COLOR,
            border_width: BORDER_WIDTH,
            area_fill: false,
            tension: 0.0,
        }
    }
}

/// A labelled value on a bar or line chart
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategoryPoint {
    pub label: CellValue,
    pub value: CellValue,
}

/// Bar or line series, in row order
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategorySeries {
    /// Dataset label (the Y column name)
    pub label: String,
    pub points: Vec<CategoryPoint>,
    pub style: SeriesStyle,
}

/// One pie slice
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: CellValue,
    pub value: CellValue,
    pub palette_index: usize,
    pub color: Rgba,
}

/// Pie series, in row order
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PieSeries {
    pub slices: Vec<PieSlice>,
    pub border: Rgba,
    pub border_width: f32,
}

/// One scatter point; cells are passed through uncoerced
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: CellValue,
    pub y: CellValue,
}

impl ScatterPoint {
    /// Both coordinates, when both cells are numbers
    pub fn as_f64_pair(&self) -> Option<(f64, f64)> {
        Some((self.x.as_f64()?, self.y.as_f64()?))
    }
}

/// Scatter series; point order carries no meaning
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScatterSeries {
    /// Dataset label, "<y> vs <x>"
    pub label: String,
    pub points: Vec<ScatterPoint>,
    pub style: SeriesStyle,
}

/// Chart-ready data for one chart kind
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SeriesData {
    Bar(CategorySeries),
    Line(CategorySeries),
    Pie(PieSeries),
    Scatter(ScatterSeries),
}

impl SeriesData {
    /// A series with no points, used when an axis cannot be resolved
    pub fn empty(kind: ChartKind) -> Self {
        match kind {
            ChartKind::Bar => SeriesData::Bar(CategorySeries {
                label: String::new(),
                points: Vec::new(),
                style: SeriesStyle::bar(),
            }),
            ChartKind::Line => SeriesData::Line(CategorySeries {
                label: String::new(),
                points: Vec::new(),
                style: SeriesStyle::line(),
            }),
            ChartKind::Pie => SeriesData::Pie(PieSeries {
                slices: Vec::new(),
                border: PIE_BORDER,
                border_width: BORDER_WIDTH,
            }),
            ChartKind::Scatter => SeriesData::Scatter(ScatterSeries {
                label: String::new(),
                points: Vec::new(),
                style: SeriesStyle::scatter(),
            }),
        }
    }

    pub fn kind(&self) -> ChartKind {
        match self {
            SeriesData::Bar(_) => ChartKind::Bar,
            SeriesData::Line(_) => ChartKind::Line,
            SeriesData::Pie(_) => ChartKind::Pie,
            SeriesData::Scatter(_) => ChartKind::Scatter,
        }
    }

    /// Number of points or slices
    pub fn len(&self) -> usize {
        match self {
            SeriesData::Bar(s) | SeriesData::Line(s) => s.points.len(),
            SeriesData::Pie(s) => s.slices.len(),
            SeriesData::Scatter(s) => s.points.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Project two columns of `table` into series data for `kind`.
///
/// Columns are resolved by header name (first match). If either name is
/// missing the result is an empty series. `x_column == y_column` is not
/// rejected and produces a self-paired series.
pub fn project(table: &Table, x_column: &str, y_column: &str, kind: ChartKind) -> SeriesData {
    let (Some(x_idx), Some(y_idx)) = (table.column_index(x_column), table.column_index(y_column))
    else {
        return SeriesData::empty(kind);
    };

    let pairs = (0..table.row_count()).map(|row| {
        (
            table.cell(row, x_idx).clone(),
            table.cell(row, y_idx).clone(),
        )
    });

    match kind {
        ChartKind::Bar => SeriesData::Bar(CategorySeries {
            label: y_column.to_string(),
            points: category_points(pairs),
            style: SeriesStyle::bar(),
        }),
        ChartKind::Line => SeriesData::Line(CategorySeries {
            label: y_column.to_string(),
            points: category_points(pairs),
            style: SeriesStyle::line(),
        }),
        ChartKind::Pie => SeriesData::Pie(PieSeries {
            slices: pairs
                .enumerate()
                .map(|(i, (label, value))| {
                    let palette_index = i % PIE_PALETTE.len();
                    PieSlice {
                        label,
                        value,
                        palette_index,
                        color: PIE_PALETTE[palette_index],
                    }
                })
                .collect(),
            border: PIE_BORDER,
            border_width: BORDER_WIDTH,
        }),
        ChartKind::Scatter => SeriesData::Scatter(ScatterSeries {
            label: format!("{} vs {}", y_column, x_column),
            points: pairs.map(|(x, y)| ScatterPoint { x, y }).collect(),
            style: SeriesStyle::scatter(),
        }),
    }
}

/// Project using an axis selection
pub fn project_selection(table: &Table, selection: &AxisSelection, kind: ChartKind) -> SeriesData {
    project(table, &selection.x, &selection.y, kind)
}

fn category_points(pairs: impl Iterator<Item = (CellValue, CellValue)>) -> Vec<CategoryPoint> {
    pairs
        .map(|(label, value)| CategoryPoint { label, value })
        .collect()
}

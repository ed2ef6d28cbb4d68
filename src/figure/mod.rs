//! Figure descriptions and their resolution against a loaded table.
//!
//! A [`FigureSpec`] names columns; [`resolve`] turns it into a [`Figure`]
//! holding concrete points, ready for [`crate::render`] or [`crate::app`].

pub mod presets;
pub mod spec;

use std::ops::Range;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::color::{generate_palette, parse_hex, Rgb};
use crate::data::group::{group_rows, matching_rows, select};
use crate::data::model::{Table, Value};

pub use spec::{load_figure_spec, FigureSpec, LineStyle, RowFilter, SeriesSpec, SpecError, XSource};

/// One drawable line.
///
/// A row with a missing coordinate breaks the line, so the points are kept
/// as `runs` of consecutive rows. Each run is drawn as its own segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub runs: Vec<Vec<(f64, f64)>>,
    pub style: LineStyle,
    pub color: Rgb,
}

impl Series {
    /// Every point of every run, in row order.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.runs.iter().flatten().copied()
    }

    pub fn point_count(&self) -> usize {
        self.runs.iter().map(Vec::len).sum()
    }
}

/// A fully resolved figure.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: Option<String>,
    pub x_label: String,
    pub y_label: String,
    pub size_inches: [f64; 2],
    pub dpi: u32,
    pub legend: bool,
    pub grid: bool,
    pub x_range: Option<[f64; 2]>,
    pub y_range: Option<[f64; 2]>,
    pub output: PathBuf,
    pub series: Vec<Series>,
}

/// Fraction of the data span added on each side of an axis.
const AXIS_MARGIN: f64 = 0.05;

impl Figure {
    /// Axis ranges covering every point, padded by 5 % on each side.
    /// Explicit ranges from the spec take precedence.
    pub fn bounds(&self) -> (Range<f64>, Range<f64>) {
        let xs = self.series.iter().flat_map(|s| s.points().map(|p| p.0));
        let ys = self.series.iter().flat_map(|s| s.points().map(|p| p.1));
        let x = match self.x_range {
            Some([min, max]) => min..max,
            None => padded_range(xs),
        };
        let y = match self.y_range {
            Some([min, max]) => min..max,
            None => padded_range(ys),
        };
        (x, y)
    }

    pub fn point_count(&self) -> usize {
        self.series.iter().map(Series::point_count).sum()
    }
}

fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    if max - min <= f64::EPSILON * max.abs().max(1.0) {
        return (min - 0.5)..(max + 0.5);
    }
    let pad = (max - min) * AXIS_MARGIN;
    (min - pad)..(max + pad)
}

/// Materialize every series of `spec` from `table`.
pub fn resolve(spec: &FigureSpec, table: &Table) -> Result<Figure> {
    spec.validate()?;

    // Expand group_by series first so colours are spread over final series.
    let mut pending: Vec<(String, Vec<Vec<(f64, f64)>>, &SeriesSpec)> = Vec::new();
    for s in &spec.series {
        let x = match &s.x {
            XSource::Index => table.index(),
            XSource::Column(name) => table.numeric(name)?,
        };
        let y = table.numeric(&s.y)?;

        if let Some(key_column) = &s.group_by {
            let groups = group_rows(table, key_column)?;
            if groups.is_empty() {
                bail!("series '{}': no rows to group by '{key_column}'", s.label);
            }
            for (key, rows) in groups {
                if key == Value::Null {
                    log::warn!(
                        "series '{}': skipped {} rows with no '{key_column}'",
                        s.label,
                        rows.len()
                    );
                    continue;
                }
                let label = s.label.replace("{key}", &key.to_string());
                let runs = split_runs(&select(&x, &rows), &select(&y, &rows), &label);
                pending.push((label, runs, s));
            }
        } else if let Some(filter) = &s.filter {
            let expected = json_to_value(&filter.equals);
            let rows = matching_rows(table, &filter.column, &expected)?;
            if rows.is_empty() {
                bail!(
                    "series '{}': no rows where {} == {}",
                    s.label,
                    filter.column,
                    expected
                );
            }
            let runs = split_runs(&select(&x, &rows), &select(&y, &rows), &s.label);
            pending.push((s.label.clone(), runs, s));
        } else {
            let runs = split_runs(&x, &y, &s.label);
            pending.push((s.label.clone(), runs, s));
        }
    }

    let palette = generate_palette(pending.len());
    let series = pending
        .into_iter()
        .zip(palette)
        .map(|((label, runs, s), auto)| -> Result<Series> {
            let color = match &s.color {
                Some(c) => parse_hex(c).with_context(|| format!("series '{label}': colour '{c}'"))?,
                None => auto,
            };
            log::debug!(
                "series '{label}': {} points in {} runs",
                runs.iter().map(Vec::len).sum::<usize>(),
                runs.len()
            );
            Ok(Series {
                label,
                runs,
                style: s.style,
                color,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Figure {
        title: spec.title.clone(),
        x_label: spec.x_label.clone(),
        y_label: spec.y_label.clone(),
        size_inches: spec.size_inches,
        dpi: spec.dpi,
        legend: spec.legend,
        grid: spec.grid,
        x_range: spec.x_range,
        y_range: spec.y_range,
        output: spec.output.clone(),
        series,
    })
}

/// Pair coordinates into runs of consecutive rows. A row where either side
/// is `NaN` ends the current run.
fn split_runs(x: &[f64], y: &[f64], label: &str) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    let mut missing = 0;
    for (&a, &b) in x.iter().zip(y) {
        if a.is_nan() || b.is_nan() {
            missing += 1;
            if !current.is_empty() {
                runs.push(std::mem::take(&mut current));
            }
        } else {
            current.push((a, b));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    if missing > 0 {
        log::warn!("series '{label}': {missing} rows with missing values leave gaps");
    }
    runs
}

fn json_to_value(v: &serde_json::Value) -> Value {
    match v {
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => n.as_f64().map_or(Value::Null, Value::Float),
        },
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Null => Value::Null,
        other => Value::String(other.to_string()),
    }
}

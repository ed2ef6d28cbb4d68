use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::parse_hex;

/// Problems with a figure description, caught before any data is read.
#[derive(Debug, Error, PartialEq)]
pub enum SpecError {
    #[error("figure has no series")]
    NoSeries,
    #[error("figure size must be positive, got {0} x {1} inches")]
    BadSize(f64, f64),
    #[error("dpi must be positive")]
    BadDpi,
    #[error("{axis} range must satisfy min < max, got [{min}, {max}]")]
    BadRange { axis: &'static str, min: f64, max: f64 },
    #[error("series '{label}': cannot parse colour '{color}'")]
    BadColor { label: String, color: String },
    #[error("series '{label}': group_by and where cannot be combined")]
    GroupAndFilter { label: String },
}

/// Where a series takes its x coordinates from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum XSource {
    /// The implicit row index.
    #[default]
    Index,
    Column(String),
}

impl From<String> for XSource {
    fn from(s: String) -> Self {
        if s == "index" {
            XSource::Index
        } else {
            XSource::Column(s)
        }
    }
}

impl From<XSource> for String {
    fn from(x: XSource) -> Self {
        match x {
            XSource::Index => "index".to_string(),
            XSource::Column(c) => c,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Dashed,
    Solid,
}

/// Keep only rows whose `column` equals `equals`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowFilter {
    pub column: String,
    pub equals: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSpec {
    pub y: String,
    #[serde(default)]
    pub x: XSource,
    /// Legend label. With `group_by`, `{key}` is replaced by the group key.
    pub label: String,
    #[serde(default)]
    pub style: LineStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, rename = "where", skip_serializing_if = "Option::is_none")]
    pub filter: Option<RowFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by: Option<String>,
}

impl SeriesSpec {
    pub fn new(x: XSource, y: impl Into<String>, label: impl Into<String>) -> Self {
        SeriesSpec {
            y: y.into(),
            x,
            label: label.into(),
            style: LineStyle::Dashed,
            color: None,
            filter: None,
            group_by: None,
        }
    }
}

fn default_size() -> [f64; 2] {
    [11.0, 8.5]
}

fn default_dpi() -> u32 {
    1200
}

fn default_true() -> bool {
    true
}

/// Everything needed to turn a table into a saved figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureSpec {
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub x_label: String,
    #[serde(default)]
    pub y_label: String,
    #[serde(default = "default_size")]
    pub size_inches: [f64; 2],
    #[serde(default = "default_dpi")]
    pub dpi: u32,
    #[serde(default = "default_true")]
    pub legend: bool,
    #[serde(default = "default_true")]
    pub grid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_range: Option<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_range: Option<[f64; 2]>,
    pub series: Vec<SeriesSpec>,
}

impl FigureSpec {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        FigureSpec {
            input: input.into(),
            output: output.into(),
            title: None,
            x_label: String::new(),
            y_label: String::new(),
            size_inches: default_size(),
            dpi: default_dpi(),
            legend: true,
            grid: true,
            x_range: None,
            y_range: None,
            series: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), SpecError> {
        if self.series.is_empty() {
            return Err(SpecError::NoSeries);
        }
        let [w, h] = self.size_inches;
        if !(w > 0.0 && h > 0.0) {
            return Err(SpecError::BadSize(w, h));
        }
        if self.dpi == 0 {
            return Err(SpecError::BadDpi);
        }
        for (axis, range) in [("x", self.x_range), ("y", self.y_range)] {
            if let Some([min, max]) = range {
                if !(min < max) {
                    return Err(SpecError::BadRange { axis, min, max });
                }
            }
        }
        for s in &self.series {
            if let Some(c) = &s.color {
                if parse_hex(c).is_none() {
                    return Err(SpecError::BadColor {
                        label: s.label.clone(),
                        color: c.clone(),
                    });
                }
            }
            if s.filter.is_some() && s.group_by.is_some() {
                return Err(SpecError::GroupAndFilter {
                    label: s.label.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Read a figure description from `.toml` or `.json`.
pub fn load_figure_spec(path: &Path) -> Result<FigureSpec> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading figure spec {}", path.display()))?;

    let spec: FigureSpec = match ext.as_str() {
        "toml" => toml::from_str(&text).context("parsing TOML figure spec")?,
        "json" => serde_json::from_str(&text).context("parsing JSON figure spec")?,
        other => bail!("Unsupported figure spec extension: .{other}"),
    };
    spec.validate()?;
    Ok(spec)
}

//! Line-chart figures for I/O scheduler measurements.
//!
//! Tables of bandwidth proportions per set, or of per-request start and
//! elapsed times, are loaded by [`data::loader`], described by a
//! [`figure::FigureSpec`] (stock ones live in [`figure::presets`]), saved
//! with [`render`] and optionally shown in a window by [`app::show`].

pub mod app;
pub mod color;
pub mod data;
pub mod figure;
pub mod render;
pub mod state;
pub mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result};

use figure::{Figure, FigureSpec};

/// Load the spec's input table, resolve the figure and save it.
///
/// Returns the resolved figure and the path it was written to.
pub fn build_figure(spec: &FigureSpec) -> Result<(Figure, PathBuf)> {
    let table = data::loader::load_table(&spec.input)?;
    let figure = figure::resolve(spec, &table)
        .with_context(|| format!("resolving figure from {}", spec.input.display()))?;
    render::render_figure(&figure, &spec.output)
        .with_context(|| format!("saving {}", spec.output.display()))?;
    Ok((figure, spec.output.clone()))
}

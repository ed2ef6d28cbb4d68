use std::fmt::Display;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use svg2pdf::usvg;
use thiserror::Error;

use crate::figure::{Figure, LineStyle};

/// SVG user units per inch; with the PDF page at 72 DPI one unit is one point.
const UNITS_PER_INCH: f64 = 72.0;

const AXIS_DESC_SIZE: f64 = 14.0;
const TICK_LABEL_SIZE: f64 = 11.0;
const LEGEND_SIZE: f64 = 12.0;
const CAPTION_SIZE: f64 = 16.0;
const LINE_WIDTH: u32 = 2;
const DASH: i32 = 8;
const DASH_GAP: i32 = 4;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unsupported output extension: .{0} (expected .pdf or .svg)")]
    UnsupportedFormat(String),
    #[error("drawing figure: {0}")]
    Draw(String),
    #[error("parsing generated SVG: {0}")]
    Svg(#[from] usvg::Error),
    #[error("converting SVG to PDF: {0}")]
    Pdf(String),
    #[error("writing {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

fn draw_err(e: impl Display) -> RenderError {
    RenderError::Draw(e.to_string())
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Save `figure` at `path`, choosing the format from the extension.
pub fn render_figure(figure: &Figure, path: &Path) -> Result<(), RenderError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let bytes = match ext.as_str() {
        "svg" => render_svg(figure)?.into_bytes(),
        "pdf" => render_pdf(figure)?,
        other => return Err(RenderError::UnsupportedFormat(other.to_string())),
    };

    let io_err = |source| RenderError::Io {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, &bytes).map_err(io_err)?;

    log::info!(
        "Saved {} ({} series, {} points, {} bytes)",
        path.display(),
        figure.series.len(),
        figure.point_count(),
        bytes.len()
    );
    Ok(())
}

/// Draw the figure into an SVG document.
pub fn render_svg(figure: &Figure) -> Result<String, RenderError> {
    let [w, h] = figure.size_inches;
    let size = (
        (w * UNITS_PER_INCH).round() as u32,
        (h * UNITS_PER_INCH).round() as u32,
    );
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        draw_chart(root, figure)?;
    }
    Ok(svg)
}

/// Draw the figure as SVG and convert it to a single-page PDF.
pub fn render_pdf(figure: &Figure) -> Result<Vec<u8>, RenderError> {
    let svg = render_svg(figure)?;

    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();
    let tree = usvg::Tree::from_str(&svg, &options)?;

    let conversion = svg2pdf::ConversionOptions {
        raster_scale: figure.dpi as f32 / UNITS_PER_INCH as f32,
        ..Default::default()
    };
    svg2pdf::to_pdf(&tree, conversion, svg2pdf::PageOptions::default())
        .map_err(|e| RenderError::Pdf(format!("{e:?}")))
}

// ---------------------------------------------------------------------------
// Chart drawing
// ---------------------------------------------------------------------------

fn draw_chart<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    figure: &Figure,
) -> Result<(), RenderError> {
    root.fill(&WHITE).map_err(draw_err)?;

    let (x_range, y_range) = figure.bounds();

    let mut builder = ChartBuilder::on(&root);
    builder
        .margin(18)
        .x_label_area_size(50)
        .y_label_area_size(80);
    if let Some(title) = &figure.title {
        builder.caption(title, ("sans-serif", CAPTION_SIZE).into_font());
    }
    let mut chart = builder
        .build_cartesian_2d(x_range, y_range)
        .map_err(draw_err)?;

    let mut mesh = chart.configure_mesh();
    mesh.x_desc(figure.x_label.clone())
        .y_desc(figure.y_label.clone())
        .axis_desc_style(
            ("sans-serif", AXIS_DESC_SIZE)
                .into_font()
                .style(FontStyle::Bold),
        )
        .label_style(("sans-serif", TICK_LABEL_SIZE))
        .light_line_style(WHITE);
    if !figure.grid {
        mesh.disable_mesh();
    }
    mesh.draw().map_err(draw_err)?;

    for series in &figure.series {
        let rgb = series.color;
        let style = RGBColor(rgb.red, rgb.green, rgb.blue).stroke_width(LINE_WIDTH);
        // An empty series still gets its legend entry.
        let empty: [Vec<(f64, f64)>; 1] = [Vec::new()];
        let runs = if series.runs.is_empty() {
            &empty[..]
        } else {
            &series.runs[..]
        };

        for (i, run) in runs.iter().enumerate() {
            let points = run.iter().copied();
            let anno = match series.style {
                LineStyle::Solid => chart.draw_series(LineSeries::new(points, style)),
                LineStyle::Dashed => {
                    chart.draw_series(DashedLineSeries::new(points, DASH, DASH_GAP, style))
                }
            }
            .map_err(draw_err)?;
            if i == 0 {
                anno.label(series.label.clone())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 24, y)], style));
            }
        }
    }

    if figure.legend && !figure.series.is_empty() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font(("sans-serif", LEGEND_SIZE))
            .draw()
            .map_err(draw_err)?;
    }

    root.present().map_err(draw_err)?;
    Ok(())
}

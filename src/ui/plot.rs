use eframe::egui::{Color32, Ui};
use egui_plot::{Legend, Line, LineStyle as PlotLineStyle, Plot, PlotPoints};

use crate::figure::LineStyle;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Figure plot (central panel)
// ---------------------------------------------------------------------------

/// Render the figure's visible series in the central panel.
pub fn figure_plot(ui: &mut Ui, state: &AppState) {
    let figure = &state.figure;

    if figure.series.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Nothing to plot");
        });
        return;
    }

    let (x_range, y_range) = figure.bounds();

    let mut plot = Plot::new("figure_plot")
        .x_axis_label(figure.x_label.clone())
        .y_axis_label(figure.y_label.clone())
        .show_grid(figure.grid)
        .include_x(x_range.start)
        .include_x(x_range.end)
        .include_y(y_range.start)
        .include_y(y_range.end)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);
    if figure.legend {
        plot = plot.legend(Legend::default());
    }

    plot.show(ui, |plot_ui| {
        for (_, series) in state.visible_series() {
            let c = series.color;
            let style = match series.style {
                LineStyle::Dashed => PlotLineStyle::dashed_loose(),
                LineStyle::Solid => PlotLineStyle::Solid,
            };

            // Runs share a name, so the legend shows one entry per series.
            for run in &series.runs {
                let points: PlotPoints = run.iter().map(|&(x, y)| [x, y]).collect();
                let line = Line::new(points)
                    .name(&series.label)
                    .color(Color32::from_rgb(c.red, c.green, c.blue))
                    .style(style)
                    .width(1.5);

                plot_ui.line(line);
            }
        }
    });
}

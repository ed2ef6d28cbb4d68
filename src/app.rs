use std::path::PathBuf;

use anyhow::{anyhow, Result};
use eframe::egui;

use crate::figure::Figure;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct FigureApp {
    pub state: AppState,
}

impl FigureApp {
    pub fn new(figure: Figure, saved_to: Option<PathBuf>) -> Self {
        Self {
            state: AppState::new(figure, saved_to),
        }
    }
}

impl eframe::App for FigureApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: status bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: series toggles ----
        egui::SidePanel::left("series_panel")
            .default_width(200.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::figure_plot(ui, &self.state);
        });
    }
}

/// Open an interactive window on `figure` and block until it is closed.
pub fn show(figure: Figure, saved_to: Option<PathBuf>) -> Result<()> {
    let app = FigureApp::new(figure, saved_to);
    let title = app.state.window_title();

    // Keep the on-screen aspect ratio of the saved figure.
    let [w, h] = app.state.figure.size_inches;
    let width = 1100.0_f32;
    let height = (width as f64 * h / w) as f32;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width, height])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    log::debug!("opening viewer window '{title}'");
    eframe::run_native(&title, options, Box::new(|_cc| Ok(Box::new(app))))
        .map_err(|e| anyhow!("viewer window failed: {e}"))
}

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – series toggles
// ---------------------------------------------------------------------------

/// Render the left panel listing every series with a visibility checkbox.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Series");
    ui.separator();

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.select_all();
        }
        if ui.small_button("None").clicked() {
            state.select_none();
        }
    });

    let mut toggled = None;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (i, series) in state.figure.series.iter().enumerate() {
                let c = series.color;
                let text = RichText::new(format!("{}  ({} pts)", series.label, series.point_count()))
                    .color(Color32::from_rgb(c.red, c.green, c.blue));

                let mut checked = state.visible.get(i).copied().unwrap_or(false);
                if ui.checkbox(&mut checked, text).changed() {
                    toggled = Some(i);
                }
            }
        });

    if let Some(i) = toggled {
        state.toggle(i);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top status bar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.strong(state.window_title());

        ui.separator();

        ui.label(format!(
            "{} series, {} points visible",
            state.figure.series.len(),
            state.visible_points()
        ));

        ui.separator();

        match &state.saved_to {
            Some(path) => ui.label(format!("saved to {}", path.display())),
            None => ui.label("not saved"),
        };

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

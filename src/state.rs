use std::path::PathBuf;

use crate::figure::{Figure, Series};

// ---------------------------------------------------------------------------
// Viewer state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// The figure on display.
    pub figure: Figure,

    /// Per-series visibility, parallel to `figure.series`.
    pub visible: Vec<bool>,

    /// Where the static copy of the figure was written, if it was.
    pub saved_to: Option<PathBuf>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(figure: Figure, saved_to: Option<PathBuf>) -> Self {
        let visible = vec![true; figure.series.len()];
        let status_message = (figure.point_count() == 0).then(|| "no points to plot".to_string());
        Self {
            figure,
            visible,
            saved_to,
            status_message,
        }
    }

    /// Series currently switched on, with their index.
    pub fn visible_series(&self) -> impl Iterator<Item = (usize, &Series)> {
        self.figure
            .series
            .iter()
            .enumerate()
            .filter(|(i, _)| self.visible.get(*i).copied().unwrap_or(false))
    }

    pub fn visible_points(&self) -> usize {
        self.visible_series().map(|(_, s)| s.point_count()).sum()
    }

    /// Toggle a single series.
    pub fn toggle(&mut self, index: usize) {
        if let Some(v) = self.visible.get_mut(index) {
            *v = !*v;
        }
    }

    /// Show every series.
    pub fn select_all(&mut self) {
        self.visible.iter_mut().for_each(|v| *v = true);
    }

    /// Hide every series.
    pub fn select_none(&mut self) {
        self.visible.iter_mut().for_each(|v| *v = false);
    }

    /// Window title: the figure title, else the output file name.
    pub fn window_title(&self) -> String {
        if let Some(title) = &self.figure.title {
            return title.clone();
        }
        self.figure
            .output
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "wfq-plot".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::figure::LineStyle;

    fn state() -> AppState {
        let series = |label: &str, n: usize| Series {
            label: label.into(),
            runs: vec![(0..n).map(|i| (i as f64, 1.0)).collect()],
            style: LineStyle::Dashed,
            color: Rgb::new(0, 0, 0),
        };
        let figure = Figure {
            title: None,
            x_label: "Timestamp".into(),
            y_label: "Bandwidth Proportion".into(),
            size_inches: [11.0, 8.5],
            dpi: 1200,
            legend: true,
            grid: true,
            x_range: None,
            y_range: None,
            output: "plots/wfq_graph03.pdf".into(),
            series: vec![series("Set 02", 3), series("Set 01", 5)],
        };
        AppState::new(figure, None)
    }

    #[test]
    fn toggling_hides_points() {
        let mut s = state();
        assert_eq!(s.visible_points(), 8);
        s.toggle(0);
        assert_eq!(s.visible_points(), 5);
        let labels: Vec<_> = s.visible_series().map(|(_, x)| x.label.as_str()).collect();
        assert_eq!(labels, vec!["Set 01"]);
        s.toggle(7);
        assert_eq!(s.visible.len(), 2);
    }

    #[test]
    fn select_none_then_all() {
        let mut s = state();
        s.select_none();
        assert_eq!(s.visible_series().count(), 0);
        s.select_all();
        assert_eq!(s.visible_series().count(), 2);
    }

    #[test]
    fn empty_figure_sets_status() {
        let mut s = state();
        assert!(s.status_message.is_none());
        s.figure.series.iter_mut().for_each(|x| x.runs.clear());
        let s = AppState::new(s.figure, None);
        assert_eq!(s.status_message.as_deref(), Some("no points to plot"));
    }

    #[test]
    fn title_falls_back_to_file_name() {
        let mut s = state();
        assert_eq!(s.window_title(), "wfq_graph03.pdf");
        s.figure.title = Some("WFQ".into());
        assert_eq!(s.window_title(), "WFQ");
    }
}

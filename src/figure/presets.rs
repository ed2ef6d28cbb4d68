//! The two stock figures of the scheduler experiments.

use super::spec::{FigureSpec, RowFilter, SeriesSpec, XSource};

pub const BANDWIDTH_INPUT: &str = "wfq/output.csv";
pub const BANDWIDTH_OUTPUT: &str = "wfq_graph03.pdf";
pub const REQUEST_TIME_INPUT: &str = "../build/timestamp_output.csv";
pub const REQUEST_TIME_OUTPUT: &str = "graph_request_time.pdf";

/// Sets drawn when none are requested, in drawing order.
pub const DEFAULT_SETS: [u32; 2] = [2, 1];

/// Bandwidth proportion of each set against the row index.
pub fn bandwidth(sets: &[u32]) -> FigureSpec {
    let mut spec = FigureSpec::new(BANDWIDTH_INPUT, BANDWIDTH_OUTPUT);
    spec.x_label = "Timestamp".into();
    spec.y_label = "Bandwidth Proportion".into();
    let sets = if sets.is_empty() { &DEFAULT_SETS[..] } else { sets };
    spec.series = sets
        .iter()
        .map(|n| SeriesSpec::new(XSource::Index, format!("set_{n}"), format!("Set {n:02}")))
        .collect();
    spec
}

/// Elapsed time of every request against its start time, as one line.
pub fn request_time(label: &str) -> FigureSpec {
    let mut spec = request_time_base();
    spec.series = vec![SeriesSpec::new(
        XSource::Column("start_time".into()),
        "elapsed",
        label,
    )];
    spec
}

/// One line per `queue_id`.
///
/// With weights, queue `i` is drawn explicitly as `Queue i (w_i)`; without,
/// every queue present in the data gets a `Queue {key}` line.
pub fn request_time_by_queue(weights: &[u64]) -> FigureSpec {
    let mut spec = request_time_base();
    let x = XSource::Column("start_time".into());
    spec.series = if weights.is_empty() {
        let mut s = SeriesSpec::new(x, "elapsed", "Queue {key}");
        s.group_by = Some("queue_id".into());
        vec![s]
    } else {
        weights
            .iter()
            .enumerate()
            .map(|(queue, weight)| {
                let mut s = SeriesSpec::new(x.clone(), "elapsed", format!("Queue {queue} ({weight})"));
                s.filter = Some(RowFilter {
                    column: "queue_id".into(),
                    equals: serde_json::Value::from(queue as u64),
                });
                s
            })
            .collect()
    };
    spec
}

fn request_time_base() -> FigureSpec {
    let mut spec = FigureSpec::new(REQUEST_TIME_INPUT, REQUEST_TIME_OUTPUT);
    spec.x_label = "Start Time (ns)".into();
    spec.y_label = "Elapsed Time (ns)".into();
    spec
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bandwidth_defaults_match_the_wfq_figure() {
        let spec = bandwidth(&[]);
        assert_eq!(spec.input.to_str(), Some("wfq/output.csv"));
        assert_eq!(spec.output.to_str(), Some("wfq_graph03.pdf"));
        assert_eq!(spec.dpi, 1200);
        assert_eq!(spec.size_inches, [11.0, 8.5]);
        let cols: Vec<_> = spec.series.iter().map(|s| (s.y.as_str(), s.label.as_str())).collect();
        assert_eq!(cols, vec![("set_2", "Set 02"), ("set_1", "Set 01")]);
        spec.validate().unwrap();
    }

    #[test]
    fn request_time_uses_single_line() {
        let spec = request_time("TO");
        assert_eq!(spec.series.len(), 1);
        assert_eq!(spec.series[0].x, XSource::Column("start_time".into()));
        assert_eq!(spec.series[0].label, "TO");
        assert_eq!(spec.x_label, "Start Time (ns)");
    }

    #[test]
    fn weighted_queues_get_explicit_labels() {
        let spec = request_time_by_queue(&[500, 1000, 1500, 2000]);
        let labels: Vec<_> = spec.series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Queue 0 (500)", "Queue 1 (1000)", "Queue 2 (1500)", "Queue 3 (2000)"]
        );
        assert_eq!(spec.series[3].filter.as_ref().unwrap().equals, serde_json::json!(3));
    }

    #[test]
    fn unweighted_queues_group_dynamically() {
        let spec = request_time_by_queue(&[]);
        assert_eq!(spec.series[0].group_by.as_deref(), Some("queue_id"));
    }
}

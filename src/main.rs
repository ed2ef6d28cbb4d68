use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use wfq_plot::figure::{load_figure_spec, presets, FigureSpec};
use wfq_plot::{app, build_figure};

/// Plot scheduler measurement tables as line charts.
#[derive(Debug, Parser)]
#[command(name = "wfq-plot", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Bandwidth proportion of each set over time.
    Bandwidth {
        #[arg(long, default_value = presets::BANDWIDTH_INPUT)]
        input: PathBuf,
        #[arg(long, default_value = presets::BANDWIDTH_OUTPUT)]
        output: PathBuf,
        /// Set numbers to draw, in drawing order.
        #[arg(long, value_delimiter = ',', default_value = "2,1")]
        sets: Vec<u32>,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Elapsed time of each request against its start time.
    RequestTime {
        #[arg(long, default_value = presets::REQUEST_TIME_INPUT)]
        input: PathBuf,
        #[arg(long, default_value = presets::REQUEST_TIME_OUTPUT)]
        output: PathBuf,
        /// Legend label, usually the scheduler name.
        #[arg(long, default_value = "TO", conflicts_with_all = ["by_queue", "queue_weights"])]
        label: String,
        /// Draw one line per queue_id.
        #[arg(long)]
        by_queue: bool,
        /// Queue weights shown in the legend; implies --by-queue.
        #[arg(long, value_delimiter = ',')]
        queue_weights: Vec<u64>,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Any figure described by a TOML or JSON file.
    Render {
        #[arg(long)]
        figure: PathBuf,
        /// Override the input table named in the figure file.
        #[arg(long)]
        input: Option<PathBuf>,
        /// Override the output path named in the figure file.
        #[arg(long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Debug, Args)]
struct CommonArgs {
    /// Resolution recorded for rasterized content.
    #[arg(long)]
    dpi: Option<u32>,
    /// Figure caption.
    #[arg(long)]
    title: Option<String>,
    /// Save the figure without opening a window.
    #[arg(long)]
    no_show: bool,
}

impl CommonArgs {
    fn apply(&self, spec: &mut FigureSpec) {
        if let Some(dpi) = self.dpi {
            spec.dpi = dpi;
        }
        if let Some(title) = &self.title {
            spec.title = Some(title.clone());
        }
    }
}

impl Command {
    /// The figure to draw, with CLI overrides applied.
    fn into_spec(self) -> Result<(FigureSpec, CommonArgs)> {
        let (mut spec, common) = match self {
            Command::Bandwidth {
                input,
                output,
                sets,
                common,
            } => {
                let mut spec = presets::bandwidth(&sets);
                spec.input = input;
                spec.output = output;
                (spec, common)
            }
            Command::RequestTime {
                input,
                output,
                label,
                by_queue,
                queue_weights,
                common,
            } => {
                let mut spec = if by_queue || !queue_weights.is_empty() {
                    presets::request_time_by_queue(&queue_weights)
                } else {
                    presets::request_time(&label)
                };
                spec.input = input;
                spec.output = output;
                (spec, common)
            }
            Command::Render {
                figure,
                input,
                output,
                common,
            } => {
                let mut spec = load_figure_spec(&figure)?;
                if let Some(input) = input {
                    spec.input = input;
                }
                if let Some(output) = output {
                    spec.output = output;
                }
                (spec, common)
            }
        };
        common.apply(&mut spec);
        spec.validate()?;
        Ok((spec, common))
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let (spec, common) = cli.command.into_spec()?;
    let (figure, saved_to) = build_figure(&spec)?;

    if !common.no_show {
        app::show(figure, Some(saved_to))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bandwidth_defaults() {
        let cli = Cli::parse_from(["wfq-plot", "bandwidth"]);
        match cli.command {
            Command::Bandwidth { input, sets, common, .. } => {
                assert_eq!(input, PathBuf::from("wfq/output.csv"));
                assert_eq!(sets, vec![2, 1]);
                assert!(!common.no_show);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn queue_weights_split_on_commas() {
        let cli = Cli::parse_from([
            "wfq-plot",
            "request-time",
            "--queue-weights",
            "500,1000,1500,2000",
            "--no-show",
            "--dpi",
            "300",
        ]);
        match cli.command {
            Command::RequestTime { queue_weights, common, .. } => {
                assert_eq!(queue_weights, vec![500, 1000, 1500, 2000]);
                assert!(common.no_show);
                assert_eq!(common.dpi, Some(300));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn label_conflicts_with_queue_split() {
        let by_queue = Cli::try_parse_from(["wfq-plot", "request-time", "--label", "SJF", "--by-queue"]);
        assert!(by_queue.is_err());
        let weighted = Cli::try_parse_from([
            "wfq-plot",
            "request-time",
            "--label",
            "SJF",
            "--queue-weights",
            "1,2",
        ]);
        assert!(weighted.is_err());
        assert!(Cli::try_parse_from(["wfq-plot", "request-time", "--by-queue"]).is_ok());
    }

    #[test]
    fn common_args_override_preset() {
        let cli = Cli::parse_from([
            "wfq-plot",
            "bandwidth",
            "--sets",
            "3",
            "--title",
            "WFQ bandwidth",
            "--dpi",
            "300",
        ]);
        let (spec, common) = cli.command.into_spec().unwrap();
        assert_eq!(spec.title.as_deref(), Some("WFQ bandwidth"));
        assert_eq!(spec.dpi, 300);
        assert_eq!(spec.series[0].label, "Set 03");
        assert!(!common.no_show);
    }

    #[test]
    fn render_overrides_figure_file_paths() {
        let dir = tempfile::tempdir().unwrap();
        let figure = dir.path().join("figure.json");
        std::fs::write(
            &figure,
            r#"{
                "input": "../build/timestamp_output.csv",
                "output": "graph_request_time.pdf",
                "title": "From file",
                "series": [{"x": "start_time", "y": "elapsed", "label": "TO"}]
            }"#,
        )
        .unwrap();

        let cli = Cli::parse_from([
            "wfq-plot",
            "render",
            "--figure",
            figure.to_str().unwrap(),
            "--input",
            "runs/timestamp_output.parquet",
            "--output",
            "figs/latency.svg",
            "--no-show",
        ]);
        let (spec, common) = cli.command.into_spec().unwrap();
        assert_eq!(spec.input, PathBuf::from("runs/timestamp_output.parquet"));
        assert_eq!(spec.output, PathBuf::from("figs/latency.svg"));
        assert_eq!(spec.title.as_deref(), Some("From file"));
        assert_eq!(spec.dpi, 1200);
        assert!(common.no_show);
    }

    #[test]
    fn render_rejects_invalid_override() {
        let dir = tempfile::tempdir().unwrap();
        let figure = dir.path().join("figure.json");
        std::fs::write(
            &figure,
            r#"{"input": "a.csv", "output": "a.pdf", "series": [{"y": "set_1", "label": "Set 01"}]}"#,
        )
        .unwrap();
        let cli = Cli::parse_from([
            "wfq-plot",
            "render",
            "--figure",
            figure.to_str().unwrap(),
            "--dpi",
            "0",
        ]);
        assert!(cli.command.into_spec().is_err());
    }
}

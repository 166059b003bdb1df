use crate::output::{render_outcome, OutputFormat};
use allocation_ranker::config::AppConfig;
use allocation_ranker::dataset::{CsvDatasetLoader, DatasetLoader, SampleDatasetLoader};
use allocation_ranker::error::AppError;
use allocation_ranker::ranking::{AllocationPipeline, DatasetSchema, WeightConfig};
use allocation_ranker::telemetry;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "allocation-ranker",
    about = "Rank candidates for a scarce resource and explain every score",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank the built-in simulated patient dataset (default command)
    Demo(DemoArgs),
    /// Rank patients loaded from a CSV file
    Rank(RankArgs),
}

#[derive(Args, Debug, Default)]
struct DemoArgs {
    /// Weights as name=weight pairs, e.g. urgency=0.5,survival=0.3,age=0.2
    #[arg(long, value_parser = parse_weights)]
    weights: Option<WeightConfig>,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Args, Debug)]
struct RankArgs {
    /// CSV file to rank (falls back to RANKER_DATASET)
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Weights as name=weight pairs (falls back to RANKER_WEIGHTS, then the defaults)
    #[arg(long, value_parser = parse_weights)]
    weights: Option<WeightConfig>,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

fn parse_weights(raw: &str) -> Result<WeightConfig, String> {
    WeightConfig::parse(raw).map_err(|err| err.to_string())
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let command = cli
        .command
        .unwrap_or_else(|| Command::Demo(DemoArgs::default()));

    let rendered = match command {
        Command::Demo(args) => {
            let weights = config.ranking.resolve_weights(args.weights)?;
            rank_table(&SampleDatasetLoader, weights, args.format)?
        }
        Command::Rank(args) => {
            let path = args
                .csv
                .or_else(|| config.ranking.dataset_path.clone())
                .ok_or(AppError::MissingDataset)?;
            let weights = config.ranking.resolve_weights(args.weights)?;
            let loader = CsvDatasetLoader::from_path(path);
            info!(
                environment = ?config.environment,
                path = %loader.path().display(),
                "ranking dataset"
            );
            rank_table(&loader, weights, args.format)?
        }
    };

    print!("{rendered}");
    Ok(())
}

fn rank_table(
    loader: &dyn DatasetLoader,
    weights: WeightConfig,
    format: OutputFormat,
) -> Result<String, AppError> {
    let pipeline = AllocationPipeline::new(DatasetSchema::patient_triage(), weights)?;
    let table = loader.load()?;
    let outcome = pipeline.run(&table)?;
    render_outcome(&outcome, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_rank_arguments() {
        let cli = Cli::try_parse_from([
            "allocation-ranker",
            "rank",
            "--csv",
            "patients.csv",
            "--weights",
            "urgency=0.6,survival=0.4",
            "--format",
            "json",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Rank(args)) => {
                assert_eq!(args.csv, Some(PathBuf::from("patients.csv")));
                assert_eq!(args.format, OutputFormat::Json);
                let weights = args.weights.expect("weights parsed");
                assert_eq!(weights.weight_for("survival"), Some(0.4));
            }
            other => panic!("expected rank command, got {other:?}"),
        }
    }

    #[test]
    fn cli_rejects_invalid_weights() {
        let error = Cli::try_parse_from([
            "allocation-ranker",
            "demo",
            "--weights",
            "urgency=0.5,survival=0.4",
        ])
        .expect_err("weights sum to 0.9");
        assert!(error.to_string().contains("weights sum to"));
    }

    #[test]
    fn demo_renders_sample_ranking() {
        let rendered = rank_table(
            &SampleDatasetLoader,
            WeightConfig::patient_triage(),
            OutputFormat::Text,
        )
        .expect("demo renders");

        assert!(rendered.starts_with("Ranking by allocation score\n   1. P010  1.00\n"));
    }

    #[test]
    fn unknown_factor_surfaces_as_ranking_error() {
        let weights = WeightConfig::parse("urgency=0.5,frailty=0.5").expect("weights parse");
        let error = rank_table(&SampleDatasetLoader, weights, OutputFormat::Text)
            .expect_err("frailty unknown");
        assert!(matches!(error, AppError::Ranking(_)));
    }
}

use allocation_ranker::error::AppError;
use allocation_ranker::ranking::PipelineOutcome;
use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub(crate) fn render_outcome(
    outcome: &PipelineOutcome,
    format: OutputFormat,
) -> Result<String, AppError> {
    match format {
        OutputFormat::Text => Ok(outcome.report.render()),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&outcome.report.summary())?;
            json.push('\n');
            Ok(json)
        }
    }
}

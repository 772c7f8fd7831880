//! File rewrite mode: one input file in, one output file out.

use std::io::{self, Write};

use product_rewriter::table::{ProgressObserver, StderrProgress};
use product_rewriter::telemetry::{
    NoopTelemetrySink, StderrJsonlTelemetrySink, TelemetryEvent, TelemetrySink,
};
use product_rewriter::{
    BatchReport, FileJob, OpenAiTextRewriteService, RewriterConfig, TextRewriteService,
    TextRewriter, rewrite_file,
};

use super::output::write_summary;
use super::{AppError, Cli};

const PROGRESS_LABEL: &str = "Opdaterer produkttekster";

/// Runs the rewriter over the files named on the command line.
///
/// # Errors
///
/// Returns [`AppError::Rewrite`] when configuration is invalid or no API key
/// is available, and [`AppError::Batch`] when the file run aborts.
pub fn run(cli: &Cli) -> Result<BatchReport, AppError> {
    let config = RewriterConfig::load_with_cli(cli.config_layer())?;
    config.validate()?;
    let api_key = config.resolve_ai_api_key()?;
    let service = OpenAiTextRewriteService::new(config.openai_config(api_key))?;

    let job = FileJob::from_paths(&cli.input_file, &cli.output_file);
    let telemetry = telemetry_sink(config.telemetry);
    let mut progress = StderrProgress::stderr(PROGRESS_LABEL);
    let stdout = io::stdout();
    let mut writer = stdout.lock();

    run_with_service(
        &mut writer,
        &config,
        &job,
        &service,
        &mut progress,
        telemetry.as_ref(),
    )
}

fn telemetry_sink(enabled: bool) -> Box<dyn TelemetrySink> {
    if enabled {
        Box::new(StderrJsonlTelemetrySink)
    } else {
        Box::new(NoopTelemetrySink)
    }
}

/// Runs a file job against an explicit service, writing the summary to
/// `writer`.
///
/// # Errors
///
/// Returns [`AppError::Batch`] when the run aborts and [`AppError::Io`] when
/// the summary cannot be written.
pub fn run_with_service<W: Write>(
    writer: &mut W,
    config: &RewriterConfig,
    job: &FileJob,
    service: &dyn TextRewriteService,
    progress: &mut dyn ProgressObserver,
    telemetry: &dyn TelemetrySink,
) -> Result<BatchReport, AppError> {
    let mut rewriter = TextRewriter::new(service, config.resolve_instructions());

    match rewrite_file(job, &mut rewriter, &config.columns(), progress) {
        Ok(report) => {
            telemetry.record(TelemetryEvent::from(&report));
            write_summary(writer, &job.output_path, &config.input_column, &report)?;
            Ok(report)
        }
        Err(error) => {
            telemetry.record(TelemetryEvent::from(&error));
            Err(error.into())
        }
    }
}

//! Command implementations for neurodxctl.
//!
//! Everything runs locally against the shared library. Commands return the
//! text to print so they can be exercised without a terminal.

use crate::output;
use anyhow::{Context, Result};
use neurodx_common::{
    Config, DiagnosisContext, DiagnosisReport, ExplanationService, MockPredictionProvider,
    PredictionProvider, ScanInput,
};
use std::path::Path;
use tracing::info;

/// Answer a question about a known diagnosis
pub fn ask(
    config: &Config,
    question: &str,
    diagnosis: &str,
    confidence: f64,
    color: bool,
) -> Result<String> {
    let service = ExplanationService::from_config(config)?;
    let context = DiagnosisContext::parse(diagnosis, confidence)?;
    let answer = service.explain(question, &context)?;
    Ok(output::format_answer(&answer, color))
}

pub struct AnalyzeOptions<'a> {
    pub question: Option<&'a str>,
    pub seed: Option<u64>,
    /// Write a report to the configured path (or this override)
    pub report: bool,
    pub report_path: Option<&'a Path>,
}

/// Run the prediction provider on a scan file, then optionally answer a
/// question against the fresh diagnosis and write a report
pub fn analyze(
    config: &Config,
    scan_path: &Path,
    opts: &AnalyzeOptions<'_>,
    color: bool,
) -> Result<String> {
    let bytes = std::fs::read(scan_path)
        .with_context(|| format!("Failed to read scan {}", scan_path.display()))?;
    let file_name = scan_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let scan = ScanInput::new(file_name, bytes)?;

    let mut prediction_config = config.prediction.clone();
    if opts.seed.is_some() {
        prediction_config.seed = opts.seed;
    }
    let provider = MockPredictionProvider::new(&prediction_config)?;
    let prediction = provider.predict(&scan)?;
    info!("Analyzed {}", scan.file_name);

    let mut out = output::format_prediction(&prediction, color);

    if let Some(question) = opts.question {
        let service = ExplanationService::from_config(config)?;
        let answer = service.explain(question, &prediction.context)?;
        out.push_str("\n\n");
        out.push_str(&output::format_answer(&answer, color));
    }

    if opts.report {
        let path = opts.report_path.unwrap_or(config.report.output_path.as_path());
        DiagnosisReport::new(prediction.context).write_to(path)?;
        out.push_str(&format!("\n\nReport written to {}", path.display()));
    }

    Ok(out)
}

/// Write a report for a diagnosis supplied on the command line
pub fn report(
    config: &Config,
    diagnosis: &str,
    confidence: f64,
    output_path: Option<&Path>,
) -> Result<String> {
    let context = DiagnosisContext::parse(diagnosis, confidence)?;
    let path = output_path.unwrap_or(config.report.output_path.as_path());
    DiagnosisReport::new(context).write_to(path)?;
    Ok(format!("Report written to {}", path.display()))
}

/// List the active knowledge base
pub fn knowledge(config: &Config, color: bool) -> Result<String> {
    let kb = config.knowledge_base()?;
    Ok(output::format_knowledge(kb.entries(), color))
}

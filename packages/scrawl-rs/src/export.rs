//! Writes analysis artifacts for downstream consumers.
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::normalizer::AnalysisResult;

pub const CLEANED_TEXT_FILE: &str = "cleaned_text.txt";
pub const CONFIDENCE_FILE: &str = "confidence_score.txt";
pub const REPORT_FILE: &str = "analysis.json";

/// JSON report written next to the plain-text exports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
  pub version: String,
  pub generated_at: String,
  pub source: Option<String>,
  pub annotated_image: Option<String>,
  #[serde(flatten)]
  pub result: AnalysisResult,
}

impl AnalysisReport {
  pub fn new(result: &AnalysisResult, source: Option<&Path>, annotated_image: Option<&Path>) -> Self {
    Self {
      version: env!("CARGO_PKG_VERSION").to_string(),
      generated_at: chrono::Utc::now().to_rfc3339(),
      source: source.map(|p| p.display().to_string()),
      annotated_image: annotated_image.map(|p| p.display().to_string()),
      result: result.clone(),
    }
  }
}

/// Paths of the files written by [`export_result`].
#[derive(Debug, Clone)]
pub struct ExportedFiles {
  pub cleaned_text: PathBuf,
  pub confidence: PathBuf,
  pub report: PathBuf,
}

/// Writes `cleaned_text.txt`, `confidence_score.txt` and `analysis.json` into `output_dir`.
pub async fn export_result(
  result: &AnalysisResult,
  output_dir: &Path,
  source: Option<&Path>,
  annotated_image: Option<&Path>,
) -> Result<ExportedFiles> {
  fs::create_dir_all(output_dir)
    .await
    .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

  let files = ExportedFiles {
    cleaned_text: output_dir.join(CLEANED_TEXT_FILE),
    confidence: output_dir.join(CONFIDENCE_FILE),
    report: output_dir.join(REPORT_FILE),
  };

  fs::write(&files.cleaned_text, &result.cleaned_text)
    .await
    .context("Failed to write cleaned text")?;
  fs::write(&files.confidence, result.confidence_report())
    .await
    .context("Failed to write confidence score")?;

  let report = AnalysisReport::new(result, source, annotated_image);
  let json = serde_json::to_string_pretty(&report).context("Failed to serialize analysis report")?;
  fs::write(&files.report, json)
    .await
    .context("Failed to write analysis report")?;

  Ok(files)
}

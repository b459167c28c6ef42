//! Drives analysis runs: OCR response in, exported artifacts out.
use anyhow::{anyhow, Context, Result};
use scrawl_ocr::{OcrEngine, OcrInput};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::annotator::Annotator;
use crate::export::{export_result, ExportedFiles, REPORT_FILE};
use crate::normalizer::{AnalysisResult, TextNormalizer};

/// Image extensions tried next to a response file when no image is given.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// One response file to analyze.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisJob {
  pub response: PathBuf,
  pub image: Option<PathBuf>,
  pub output_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct JobReport {
  pub job: AnalysisJob,
  pub result: AnalysisResult,
  /// `None` when nothing was detected.
  pub exported: Option<ExportedFiles>,
  pub annotated_image: Option<PathBuf>,
}

/// Finds an image sharing the response file's stem, e.g. `page.png` for `page.json`.
pub fn sibling_image(response: &Path) -> Option<PathBuf> {
  IMAGE_EXTENSIONS
    .iter()
    .map(|ext| response.with_extension(ext))
    .find(|candidate| candidate.is_file())
}

/// Expands `input` into jobs.
///
/// A directory is searched recursively for `*.json` responses. Each one is exported into
/// the subdirectory of `output_dir` that mirrors its path under `input`, minus the
/// extension, so `a/page.json` and `b/page.json` land in `out/a/page` and `out/b/page`.
/// Earlier `analysis.json` reports and anything already under `output_dir` are skipped.
/// An explicit `image` only makes sense for a single response file.
pub fn collect_jobs(input: &Path, image: Option<&Path>, output_dir: &Path) -> Result<Vec<AnalysisJob>> {
  if input.is_file() {
    return Ok(vec![AnalysisJob {
      response: input.to_path_buf(),
      image: image.map(Path::to_path_buf).or_else(|| sibling_image(input)),
      output_dir: output_dir.to_path_buf(),
    }]);
  }

  if !input.is_dir() {
    return Err(anyhow!("Input not found: {}", input.display()));
  }

  if let Some(image) = image {
    return Err(anyhow!(
      "--image {} needs a single response file, but {} is a directory",
      image.display(),
      input.display()
    ));
  }

  let skipped_dir = output_dir.canonicalize().ok();
  let mut responses: Vec<PathBuf> = WalkDir::new(input)
    .into_iter()
    .filter_entry(|e| {
      !(e.file_type().is_dir() && skipped_dir.is_some() && e.path().canonicalize().ok() == skipped_dir)
    })
    .filter_map(|e| e.ok())
    .filter(|e| e.file_type().is_file() && e.file_name() != REPORT_FILE)
    .map(|e| e.into_path())
    .filter(|p| {
      p.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
    })
    .collect();
  responses.sort();

  Ok(
    responses
      .into_iter()
      .map(|response| {
        let relative = response.strip_prefix(input).unwrap_or(&response).with_extension("");
        AnalysisJob {
          image: sibling_image(&response),
          output_dir: output_dir.join(relative),
          response,
        }
      })
      .collect(),
  )
}

/// Recognizes, analyzes, annotates and exports a single job.
///
/// Annotation problems are logged and do not fail the job; OCR and export errors do.
pub async fn run_job(
  engine: &dyn OcrEngine,
  normalizer: &TextNormalizer,
  annotator: Option<Arc<Annotator>>,
  job: &AnalysisJob,
) -> Result<JobReport> {
  info!(response = %job.response.display(), "processing OCR response");

  let output = engine
    .recognize(&OcrInput::FilePath(job.response.clone()))
    .await
    .with_context(|| format!("OCR failed for {}", job.response.display()))?;

  let result = normalizer.analyze_output(&output);
  if result.is_empty() {
    warn!(response = %job.response.display(), "no text detected");
    return Ok(JobReport {
      job: job.clone(),
      result,
      exported: None,
      annotated_image: None,
    });
  }

  let annotated_image = match (annotator, &job.image) {
    (Some(annotator), Some(image)) => {
      let image = image.clone();
      let output_dir = job.output_dir.clone();
      let fragments = output.fragments.clone();
      let outcome = tokio::task::spawn_blocking(move || annotator.annotate(&image, &fragments, &output_dir))
        .await
        .context("Annotation task panicked")?;
      match outcome {
        Ok(outcome) => Some(outcome.path),
        Err(e) => {
          warn!(error = %e, "skipping bounding-box annotation");
          None
        }
      }
    }
    _ => None,
  };

  let exported = export_result(
    &result,
    &job.output_dir,
    Some(&job.response),
    annotated_image.as_deref(),
  )
  .await?;

  Ok(JobReport {
    job: job.clone(),
    result,
    exported: Some(exported),
    annotated_image,
  })
}

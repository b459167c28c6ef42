mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Args, Commands};
use scrawl_ocr::VisionResponseEngine;
use scrawl_rs::config::{resolve_config, ScrawlConfig};
use scrawl_rs::pipeline::{collect_jobs, run_job};
use scrawl_rs::text_cleaner::LineBreakMode;
use scrawl_rs::TextNormalizer;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn init_tracing(quiet: bool) {
  let default_level = if quiet { "warn" } else { "info" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .init();
}

/// Applies command line overrides on top of the loaded configuration.
fn load_settings(
  config: Option<&Path>,
  dictionary: Option<PathBuf>,
  flatten: bool,
) -> Result<ScrawlConfig> {
  let mut settings = resolve_config(config)?;
  if dictionary.is_some() {
    settings.dictionary.path = dictionary;
  }
  if flatten {
    settings.cleaner.line_breaks = LineBreakMode::Flatten;
  }
  Ok(settings)
}

fn build_normalizer(settings: &ScrawlConfig) -> Result<TextNormalizer> {
  let dictionary = settings.build_dictionary()?;
  Ok(TextNormalizer::new(Arc::new(dictionary)).with_options(settings.cleaner_options()))
}

#[allow(clippy::too_many_arguments)]
async fn analyze(
  input: PathBuf,
  image: Option<PathBuf>,
  output_dir: Option<PathBuf>,
  config: Option<PathBuf>,
  dictionary: Option<PathBuf>,
  flatten: bool,
  no_annotate: bool,
) -> Result<bool> {
  let settings = load_settings(config.as_deref(), dictionary, flatten)?;
  let normalizer = build_normalizer(&settings)?;
  let annotator = if settings.annotation.enabled && !no_annotate {
    Some(Arc::new(settings.build_annotator(normalizer.dictionary())?))
  } else {
    None
  };

  let output_dir = output_dir.unwrap_or_else(|| settings.output_dir.clone());
  let jobs = collect_jobs(&input, image.as_deref(), &output_dir)?;
  if jobs.is_empty() {
    println!("No OCR responses found in {}", input.display());
    return Ok(true);
  }

  let engine = VisionResponseEngine::new();
  let mut all_ok = true;

  for job in &jobs {
    match run_job(&engine, &normalizer, annotator.clone(), job).await {
      Ok(report) => {
        println!("## {}", job.response.display());
        if report.result.is_empty() {
          println!("No text detected. Try a clearer image.");
          continue;
        }
        println!("{}", report.result.cleaned_text);
        println!();
        println!("{}", report.result.confidence_report());
        if let Some(exported) = &report.exported {
          println!("Exported to {}", job.output_dir.display());
          println!("  {}", exported.cleaned_text.display());
          println!("  {}", exported.confidence.display());
          println!("  {}", exported.report.display());
        }
        if let Some(path) = &report.annotated_image {
          println!("  {}", path.display());
        }
      }
      Err(e) => {
        eprintln!("Error: {:#}", e);
        all_ok = false;
      }
    }
  }

  Ok(all_ok)
}

fn clean(
  text: Option<String>,
  file: Option<PathBuf>,
  config: Option<PathBuf>,
  dictionary: Option<PathBuf>,
  flatten: bool,
) -> Result<bool> {
  let settings = load_settings(config.as_deref(), dictionary, flatten)?;
  let normalizer = build_normalizer(&settings)?;

  let raw = match (text, file) {
    (Some(text), _) => text,
    (None, Some(path)) => {
      std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?
    }
    (None, None) => {
      let mut buffer = String::new();
      std::io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read stdin")?;
      buffer
    }
  };

  println!("{}", normalizer.clean(&raw));
  Ok(true)
}

#[tokio::main]
async fn main() {
  let args = Args::parse();
  init_tracing(args.quiet());

  let outcome = match args.command {
    Commands::Version => {
      println!("scrawl {}", env!("CARGO_PKG_VERSION"));
      Ok(true)
    }
    Commands::Analyze {
      input,
      image,
      output_dir,
      config,
      dictionary,
      flatten,
      no_annotate,
      quiet: _,
    } => analyze(input, image, output_dir, config, dictionary, flatten, no_annotate).await,
    Commands::Clean {
      text,
      file,
      config,
      dictionary,
      flatten,
    } => clean(text, file, config, dictionary, flatten),
  };

  match outcome {
    Ok(true) => {}
    Ok(false) => std::process::exit(1),
    Err(e) => {
      eprintln!("Error: {:#}", e);
      std::process::exit(1);
    }
  }
}

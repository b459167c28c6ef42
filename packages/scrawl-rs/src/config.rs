//! Application configuration, stored as TOML.
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::annotator::{Annotator, DEFAULT_GOOD_THRESHOLD, DEFAULT_LINE_THICKNESS};
use crate::dictionary::{Dictionary, WordListDictionary};
use crate::text_cleaner::{CleanerOptions, LineBreakMode};

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "scrawl.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrawlConfig {
  /// Directory receiving exported text, reports and annotated images
  pub output_dir: PathBuf,
  pub dictionary: DictionaryConfig,
  pub cleaner: CleanerConfig,
  pub annotation: AnnotationConfig,
}

impl Default for ScrawlConfig {
  fn default() -> Self {
    Self {
      output_dir: PathBuf::from("assets/outputs"),
      dictionary: DictionaryConfig::default(),
      cleaner: CleanerConfig::default(),
      annotation: AnnotationConfig::default(),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionaryConfig {
  /// Custom word list; the bundled English list is used when unset
  pub path: Option<PathBuf>,
  pub max_edit_distance: usize,
}

impl Default for DictionaryConfig {
  fn default() -> Self {
    Self {
      path: None,
      max_edit_distance: WordListDictionary::DEFAULT_MAX_EDIT_DISTANCE,
    }
  }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
  pub line_breaks: LineBreakMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
  pub enabled: bool,
  /// Boxes at or above this proxy confidence are drawn as "good"
  pub good_threshold: f64,
  pub line_thickness: u32,
  /// Font for percentage labels; labels are not drawn without one
  pub font_path: Option<PathBuf>,
}

impl Default for AnnotationConfig {
  fn default() -> Self {
    Self {
      enabled: true,
      good_threshold: DEFAULT_GOOD_THRESHOLD,
      line_thickness: DEFAULT_LINE_THICKNESS,
      font_path: None,
    }
  }
}

impl ScrawlConfig {
  pub fn build_dictionary(&self) -> Result<WordListDictionary> {
    let dictionary = match &self.dictionary.path {
      Some(path) => WordListDictionary::load(path)
        .with_context(|| format!("Failed to load dictionary {}", path.display()))?,
      None => WordListDictionary::english(),
    };
    Ok(dictionary.with_max_edit_distance(self.dictionary.max_edit_distance))
  }

  pub fn cleaner_options(&self) -> CleanerOptions {
    CleanerOptions {
      line_breaks: self.cleaner.line_breaks,
    }
  }

  pub fn build_annotator(&self, dictionary: Arc<dyn Dictionary>) -> Result<Annotator> {
    let annotator = Annotator::new(dictionary)
      .with_threshold(self.annotation.good_threshold)
      .with_line_thickness(self.annotation.line_thickness);

    match &self.annotation.font_path {
      Some(path) => annotator
        .with_font_file(path)
        .with_context(|| format!("Failed to load label font {}", path.display())),
      None => Ok(annotator),
    }
  }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<ScrawlConfig> {
  let content = std::fs::read_to_string(path)?;
  let config: ScrawlConfig = toml::from_str(&content)?;
  Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &ScrawlConfig, path: &Path) -> Result<()> {
  let content = toml::to_string_pretty(config)?;
  std::fs::write(path, content)?;
  Ok(())
}

/// Loads `explicit` if given, else `scrawl.toml` from the working directory if present,
/// else the defaults.
pub fn resolve_config(explicit: Option<&Path>) -> Result<ScrawlConfig> {
  if let Some(path) = explicit {
    return load_config(path).with_context(|| format!("Failed to load config {}", path.display()));
  }

  let fallback = Path::new(DEFAULT_CONFIG_FILE);
  if fallback.exists() {
    return load_config(fallback).context("Failed to load scrawl.toml");
  }

  Ok(ScrawlConfig::default())
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;
  use tempfile::NamedTempFile;

  #[test]
  fn test_default_config() {
    let config = ScrawlConfig::default();

    assert_eq!(config.output_dir, PathBuf::from("assets/outputs"));
    assert!(config.dictionary.path.is_none());
    assert_eq!(config.dictionary.max_edit_distance, 2);
    assert_eq!(config.cleaner.line_breaks, LineBreakMode::Preserve);
    assert!(config.annotation.enabled);
    assert!((config.annotation.good_threshold - 80.0).abs() < f64::EPSILON);
    assert_eq!(config.annotation.line_thickness, 2);
    assert!(config.annotation.font_path.is_none());
  }

  #[test]
  fn test_partial_file_keeps_defaults() {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file, "output_dir = \"out\"\n\n[cleaner]\nline_breaks = \"flatten\"").unwrap();

    let config = load_config(temp_file.path()).unwrap();
    assert_eq!(config.output_dir, PathBuf::from("out"));
    assert_eq!(config.cleaner.line_breaks, LineBreakMode::Flatten);
    assert_eq!(config.dictionary.max_edit_distance, 2);
    assert!(config.annotation.enabled);
  }

  #[test]
  fn test_save_and_load_config() {
    let mut config = ScrawlConfig::default();
    config.annotation.good_threshold = 65.0;
    config.dictionary.path = Some(PathBuf::from("words.txt"));

    let temp_file = NamedTempFile::new().unwrap();
    save_config(&config, temp_file.path()).unwrap();
    let loaded = load_config(temp_file.path()).unwrap();

    assert!((loaded.annotation.good_threshold - 65.0).abs() < f64::EPSILON);
    assert_eq!(loaded.dictionary.path, Some(PathBuf::from("words.txt")));
  }

  #[test]
  fn test_load_config_errors() {
    assert!(load_config(Path::new("/nonexistent/path/scrawl.toml")).is_err());

    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file, "this is not valid toml {{{{").unwrap();
    assert!(load_config(temp_file.path()).is_err());
  }

  #[test]
  fn test_resolve_explicit_missing_file_fails() {
    assert!(resolve_config(Some(Path::new("/nonexistent/scrawl.toml"))).is_err());
  }

  #[test]
  fn test_build_dictionary_from_custom_list() {
    let mut words = NamedTempFile::new().unwrap();
    writeln!(words, "alpha\nbravo").unwrap();

    let mut config = ScrawlConfig::default();
    config.dictionary.path = Some(words.path().to_path_buf());
    let dictionary = config.build_dictionary().unwrap();
    assert_eq!(dictionary.len(), 2);
    assert!(dictionary.contains("Bravo"));

    config.dictionary.path = Some(PathBuf::from("/nonexistent/words.txt"));
    assert!(config.build_dictionary().is_err());
  }
}

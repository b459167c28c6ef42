//! Turns raw OCR fragments into a cleaned text block and a confidence percentage.
use std::sync::Arc;

use scrawl_ocr::{join_fragment_text, OcrOutput, TextFragment};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::confidence::{self, format_confidence, ScoringMode};
use crate::dictionary::{Dictionary, WordListDictionary};
use crate::text_cleaner::{clean_with, CleanerOptions};

/// Outcome of one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
  pub raw_text: String,
  pub cleaned_text: String,
  /// Percentage in `[0, 100]`.
  pub confidence_score: f64,
  pub mode: ScoringMode,
  pub fragment_count: usize,
}

impl AnalysisResult {
  /// True when nothing was recognized.
  pub fn is_empty(&self) -> bool {
    self.cleaned_text.is_empty()
  }

  /// The exported one-line report, e.g. `Confidence Score: 80.00%`.
  pub fn confidence_report(&self) -> String {
    format_confidence(self.confidence_score)
  }
}

/// Cleaner and scorer sharing one explicitly constructed dictionary.
#[derive(Clone)]
pub struct TextNormalizer {
  dictionary: Arc<dyn Dictionary>,
  options: CleanerOptions,
}

impl TextNormalizer {
  pub fn new(dictionary: Arc<dyn Dictionary>) -> Self {
    Self {
      dictionary,
      options: CleanerOptions::default(),
    }
  }

  /// Normalizer backed by the bundled English word list.
  pub fn english() -> Self {
    Self::new(Arc::new(WordListDictionary::english()))
  }

  pub fn with_options(mut self, options: CleanerOptions) -> Self {
    self.options = options;
    self
  }

  pub fn dictionary(&self) -> Arc<dyn Dictionary> {
    Arc::clone(&self.dictionary)
  }

  pub fn options(&self) -> &CleanerOptions {
    &self.options
  }

  pub fn clean(&self, raw_text: &str) -> String {
    clean_with(raw_text, self.dictionary.as_ref(), &self.options)
  }

  pub fn score(&self, fragments: &[TextFragment]) -> f64 {
    confidence::score(fragments, self.dictionary.as_ref())
  }

  /// Runs the full pipeline over fragments in provider order.
  pub fn analyze(&self, fragments: &[TextFragment]) -> AnalysisResult {
    let raw_text = join_fragment_text(fragments);
    if raw_text.trim().is_empty() {
      debug!(fragments = fragments.len(), "no text to analyze");
      return AnalysisResult {
        fragment_count: fragments.len(),
        ..AnalysisResult::default()
      };
    }

    let cleaned_text = self.clean(&raw_text);
    let mode = ScoringMode::select(fragments);
    let confidence_score = self.score(fragments);

    info!(
      fragments = fragments.len(),
      raw_chars = raw_text.chars().count(),
      cleaned_chars = cleaned_text.chars().count(),
      ?mode,
      confidence = confidence_score,
      "analysis complete"
    );

    AnalysisResult {
      raw_text,
      cleaned_text,
      confidence_score,
      mode,
      fragment_count: fragments.len(),
    }
  }

  pub fn analyze_output(&self, output: &OcrOutput) -> AnalysisResult {
    self.analyze(&output.fragments)
  }
}

impl Default for TextNormalizer {
  fn default() -> Self {
    Self::english()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::text_cleaner::LineBreakMode;

  #[test]
  fn test_no_fragments_gives_empty_result() {
    let result = TextNormalizer::english().analyze(&[]);
    assert!(result.is_empty());
    assert_eq!(result.confidence_score, 0.0);
    assert_eq!(result.fragment_count, 0);
  }

  #[test]
  fn test_blank_fragments_give_empty_result() {
    let fragments = vec![TextFragment::new("  "), TextFragment::new("")];
    let result = TextNormalizer::english().analyze(&fragments);
    assert!(result.is_empty());
    assert_eq!(result.confidence_score, 0.0);
    assert_eq!(result.fragment_count, 2);
  }

  #[test]
  fn test_analyze_joins_in_provider_order() {
    let fragments = vec![
      TextFragment::new("the").with_confidence(0.9),
      TextFragment::new("the").with_confidence(0.7),
      TextFragment::new("cat"),
    ];
    let result = TextNormalizer::english().analyze(&fragments);
    assert_eq!(result.raw_text, "the the cat");
    assert_eq!(result.cleaned_text, "the cat");
    assert_eq!(result.mode, ScoringMode::Provider);
    assert!((result.confidence_score - 80.0).abs() < 1e-9);
    assert_eq!(result.confidence_report(), "Confidence Score: 80.00%");
  }

  #[test]
  fn test_proxy_fallback_without_provider_confidence() {
    let fragments = vec![TextFragment::new("hello"), TextFragment::new("world")];
    let result = TextNormalizer::english().analyze(&fragments);
    assert_eq!(result.mode, ScoringMode::Proxy);
    assert!(result.confidence_score > 0.0 && result.confidence_score <= 100.0);
  }

  #[test]
  fn test_options_are_applied() {
    let normalizer = TextNormalizer::english().with_options(CleanerOptions {
      line_breaks: LineBreakMode::Flatten,
    });
    assert_eq!(normalizer.clean("End. Next"), "End. Next");
    assert_eq!(TextNormalizer::english().clean("End. Next"), "End.\nNext");
  }
}

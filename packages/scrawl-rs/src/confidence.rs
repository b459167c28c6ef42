//! Confidence estimation for a batch of OCR fragments.
//!
//! Providers often omit per-fragment confidence, so the scorer falls back to a proxy built
//! from dictionary hits and alphanumeric character coverage. The mode is chosen from the
//! first fragment alone and applies to the whole batch.
use scrawl_ocr::{join_fragment_text, TextFragment};
use serde::{Deserialize, Serialize};

use crate::dictionary::Dictionary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMode {
  /// Average of provider-supplied confidences.
  Provider,
  /// Dictionary-match and character-coverage heuristic over the joined text.
  #[default]
  Proxy,
}

impl ScoringMode {
  /// Provider mode when the first fragment has a confidence above zero, proxy otherwise.
  pub fn select(fragments: &[TextFragment]) -> Self {
    match fragments.first().and_then(TextFragment::usable_confidence) {
      Some(_) => ScoringMode::Provider,
      None => ScoringMode::Proxy,
    }
  }
}

/// Scores a batch of fragments on a 0–100 scale.
pub fn score(fragments: &[TextFragment], dictionary: &dyn Dictionary) -> f64 {
  let value = match ScoringMode::select(fragments) {
    ScoringMode::Provider => average_confidence(fragments),
    ScoringMode::Proxy => proxy_confidence(&join_fragment_text(fragments), dictionary),
  };
  value.clamp(0.0, 100.0)
}

/// Mean of the defined provider confidences, as a percentage. Fragments without a value
/// are left out entirely; zero when none has one.
pub fn average_confidence(fragments: &[TextFragment]) -> f64 {
  let (total, count) = fragments
    .iter()
    .filter_map(|f| f.confidence)
    .fold((0.0, 0usize), |(total, count), c| (total + c, count + 1));

  if count == 0 {
    return 0.0;
  }
  total / count as f64 * 100.0
}

/// Share of whitespace-separated tokens whose lowercase form is a dictionary word.
pub fn dictionary_match_rate(text: &str, dictionary: &dyn Dictionary) -> f64 {
  let mut total = 0usize;
  let mut matched = 0usize;
  for token in text.split_whitespace() {
    total += 1;
    if dictionary.contains(&token.to_lowercase()) {
      matched += 1;
    }
  }

  if total == 0 {
    return 0.0;
  }
  matched as f64 / total as f64
}

/// Share of characters (whitespace and punctuation included) that are alphanumeric.
pub fn char_coverage(text: &str) -> f64 {
  let mut total = 0usize;
  let mut alphanumeric = 0usize;
  for c in text.chars() {
    total += 1;
    if c.is_alphanumeric() {
      alphanumeric += 1;
    }
  }

  if total == 0 {
    return 0.0;
  }
  alphanumeric as f64 / total as f64
}

/// Proxy confidence: the mean of dictionary match rate and character coverage, times 100.
pub fn proxy_confidence(text: &str, dictionary: &dyn Dictionary) -> f64 {
  if text.is_empty() {
    return 0.0;
  }
  (dictionary_match_rate(text, dictionary) + char_coverage(text)) / 2.0 * 100.0
}

/// One-line confidence report, e.g. `Confidence Score: 80.00%`.
pub fn format_confidence(score: f64) -> String {
  format!("Confidence Score: {score:.2}%")
}

//! Word lists used for spelling correction and dictionary-match scoring.
use std::collections::HashMap;
use std::path::Path;

use strsim::damerau_levenshtein;
use thiserror::Error;

/// Embedded English list, most frequent words first.
const ENGLISH_WORDS: &str = include_str!("../data/en_words.txt");

/// Longest token the corrector will attempt; longer input is almost always OCR noise.
const MAX_CORRECTABLE_LEN: usize = 32;

#[derive(Debug, Error)]
pub enum DictionaryError {
  #[error("failed to read word list: {0}")]
  Io(#[from] std::io::Error),
  #[error("invalid count on line {line}: {value}")]
  InvalidCount { line: usize, value: String },
  #[error("word list is empty")]
  Empty,
  #[error("cannot correct {0:?}: token is not a plain word")]
  NotAWord(String),
  #[error("cannot correct token of {0} characters")]
  TooLong(usize),
}

/// Reference word list supporting membership checks and spelling correction.
pub trait Dictionary: Send + Sync {
  /// Case-insensitive membership test.
  fn contains(&self, word: &str) -> bool;

  /// Best replacement for a misspelled alphabetic word.
  ///
  /// `Ok(None)` means no candidate is close enough. An `Err` means the lookup itself
  /// could not be performed for this token.
  fn correction(&self, word: &str) -> Result<Option<String>, DictionaryError>;
}

/// In-memory dictionary keyed by lowercase word, with a frequency used to rank candidates.
#[derive(Debug, Clone)]
pub struct WordListDictionary {
  words: HashMap<String, u64>,
  max_edit_distance: usize,
}

impl WordListDictionary {
  pub const DEFAULT_MAX_EDIT_DISTANCE: usize = 2;

  /// The bundled English word list.
  pub fn english() -> Self {
    // The embedded list is covered by tests; a broken edit degrades to an empty dictionary.
    Self::parse(ENGLISH_WORDS).unwrap_or_else(|_| Self::from_words(std::iter::empty::<&str>()))
  }

  /// Builds a dictionary from words ordered most-frequent first.
  pub fn from_words<I, S>(words: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let ordered: Vec<String> = words
      .into_iter()
      .map(|w| w.as_ref().trim().to_lowercase())
      .filter(|w| !w.is_empty())
      .collect();
    let total = ordered.len() as u64;

    let mut map = HashMap::with_capacity(ordered.len());
    for (rank, word) in ordered.into_iter().enumerate() {
      map.entry(word).or_insert(total - rank as u64);
    }

    Self {
      words: map,
      max_edit_distance: Self::DEFAULT_MAX_EDIT_DISTANCE,
    }
  }

  /// Parses a word list: one word per line, most frequent first, with an optional
  /// whitespace-separated count overriding the rank. Blank lines and `#` comments are skipped.
  pub fn parse(content: &str) -> Result<Self, DictionaryError> {
    let entries: Vec<(usize, &str)> = content
      .lines()
      .enumerate()
      .map(|(idx, line)| (idx + 1, line.trim()))
      .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
      .collect();

    if entries.is_empty() {
      return Err(DictionaryError::Empty);
    }

    let total = entries.len() as u64;
    let mut words = HashMap::with_capacity(entries.len());

    for (rank, (line_no, line)) in entries.into_iter().enumerate() {
      let mut columns = line.split_whitespace();
      let Some(word) = columns.next() else { continue };
      let count = match columns.next() {
        Some(value) => value.parse::<u64>().map_err(|_| DictionaryError::InvalidCount {
          line: line_no,
          value: value.to_string(),
        })?,
        None => total - rank as u64,
      };
      words.entry(word.to_lowercase()).or_insert(count);
    }

    Ok(Self {
      words,
      max_edit_distance: Self::DEFAULT_MAX_EDIT_DISTANCE,
    })
  }

  /// Loads a word list file in the format accepted by [`WordListDictionary::parse`].
  pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DictionaryError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    Self::parse(&content)
  }

  pub fn with_max_edit_distance(mut self, distance: usize) -> Self {
    self.max_edit_distance = distance;
    self
  }

  pub fn len(&self) -> usize {
    self.words.len()
  }

  pub fn is_empty(&self) -> bool {
    self.words.is_empty()
  }

  fn frequency(&self, word: &str) -> u64 {
    self.words.get(word).copied().unwrap_or(0)
  }

  /// Closest known word: smallest edit distance, then highest frequency, then alphabetical.
  fn best_candidate(&self, lower: &str) -> Option<&str> {
    let len = lower.chars().count();
    self
      .words
      .keys()
      .filter(|candidate| candidate.chars().count().abs_diff(len) <= self.max_edit_distance)
      .map(|candidate| (damerau_levenshtein(lower, candidate), candidate))
      .filter(|(distance, _)| *distance <= self.max_edit_distance)
      .min_by(|(da, a), (db, b)| {
        da.cmp(db)
          .then_with(|| self.frequency(b).cmp(&self.frequency(a)))
          .then_with(|| a.cmp(b))
      })
      .map(|(_, candidate)| candidate.as_str())
  }
}

impl Default for WordListDictionary {
  fn default() -> Self {
    Self::english()
  }
}

impl Dictionary for WordListDictionary {
  fn contains(&self, word: &str) -> bool {
    self.words.contains_key(&word.to_lowercase())
  }

  fn correction(&self, word: &str) -> Result<Option<String>, DictionaryError> {
    if word.is_empty() || !word.chars().all(char::is_alphabetic) {
      return Err(DictionaryError::NotAWord(word.to_string()));
    }
    let len = word.chars().count();
    if len > MAX_CORRECTABLE_LEN {
      return Err(DictionaryError::TooLong(len));
    }

    let lower = word.to_lowercase();
    if self.words.contains_key(&lower) {
      return Ok(Some(match_case(word, &lower)));
    }

    Ok(self.best_candidate(&lower).map(|candidate| match_case(word, candidate)))
  }
}

/// Carries the capitalization pattern of `original` over to `replacement`.
fn match_case(original: &str, replacement: &str) -> String {
  let mut chars = original.chars();
  let first_upper = chars.next().is_some_and(char::is_uppercase);
  let rest: Vec<char> = chars.collect();

  if first_upper && !rest.is_empty() && rest.iter().all(|c| c.is_uppercase()) {
    return replacement.to_uppercase();
  }
  if first_upper {
    let mut out = replacement.chars();
    return match out.next() {
      Some(head) => head.to_uppercase().chain(out).collect(),
      None => String::new(),
    };
  }
  replacement.to_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn small() -> WordListDictionary {
    WordListDictionary::from_words(["the", "cat", "hello", "help", "world", "sat"])
  }

  #[test]
  fn test_english_list_loads() {
    let dict = WordListDictionary::english();
    assert!(dict.len() > 15000);
    assert!(dict.contains("the"));
    for word in ["grandmother", "baked", "cookies", "requires", "jumps", "lazy", "met", "sunlight"] {
      assert!(dict.contains(word), "missing {word}");
    }
    assert!(dict.contains("Meters"));
    assert!(!dict.contains("xqzv"));
  }

  #[test]
  fn test_contains_is_case_insensitive() {
    let dict = small();
    assert!(dict.contains("HELLO"));
    assert!(dict.contains("Cat"));
    assert!(!dict.contains("dog"));
  }

  #[test]
  fn test_correction_prefers_smaller_distance() {
    let dict = small();
    assert_eq!(dict.correction("helo").unwrap(), Some("hello".to_string()));
    assert_eq!(dict.correction("wrold").unwrap(), Some("world".to_string()));
  }

  #[test]
  fn test_correction_ties_broken_by_frequency() {
    // "cat" and "sat" are both one edit from "bat"; "cat" ranks higher.
    let dict = small();
    assert_eq!(dict.correction("bat").unwrap(), Some("cat".to_string()));
  }

  #[test]
  fn test_correction_keeps_case_pattern() {
    let dict = small();
    assert_eq!(dict.correction("Helo").unwrap(), Some("Hello".to_string()));
    assert_eq!(dict.correction("HELO").unwrap(), Some("HELLO".to_string()));
  }

  #[test]
  fn test_correction_without_candidate() {
    let dict = small();
    assert_eq!(dict.correction("zzzzzzzz").unwrap(), None);
  }

  #[test]
  fn test_correction_rejects_non_words() {
    let dict = small();
    assert!(matches!(dict.correction("abc1"), Err(DictionaryError::NotAWord(_))));
    assert!(matches!(dict.correction(""), Err(DictionaryError::NotAWord(_))));
    let long = "a".repeat(MAX_CORRECTABLE_LEN + 1);
    assert!(matches!(dict.correction(&long), Err(DictionaryError::TooLong(_))));
  }

  #[test]
  fn test_parse_with_counts_and_comments() {
    let dict = WordListDictionary::parse("# header\nrare 1\n\ncommon 500\n").unwrap();
    assert_eq!(dict.len(), 2);
    assert_eq!(dict.frequency("common"), 500);
    assert_eq!(dict.frequency("rare"), 1);
  }

  #[test]
  fn test_parse_rejects_bad_counts_and_empty_lists() {
    assert!(matches!(
      WordListDictionary::parse("word many"),
      Err(DictionaryError::InvalidCount { line: 1, .. })
    ));
    assert!(matches!(WordListDictionary::parse("# nothing\n"), Err(DictionaryError::Empty)));
  }

  #[test]
  fn test_load_missing_file() {
    assert!(matches!(
      WordListDictionary::load("/nonexistent/words.txt"),
      Err(DictionaryError::Io(_))
    ));
  }

  #[test]
  fn test_edit_distance_limit() {
    let dict = small().with_max_edit_distance(1);
    assert_eq!(dict.correction("wrld").unwrap(), Some("world".to_string()));
    assert_eq!(dict.correction("wld").unwrap(), None);
  }
}

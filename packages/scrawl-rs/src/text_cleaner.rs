//! Post-processing of raw OCR text into readable output.
//!
//! [`clean`] runs a fixed pipeline of pure string stages. The order is load-bearing:
//! each stage expects the shape produced by the one before it.
//!
//! 1. spelling correction of alphabetic tokens ([`correct_spelling`])
//! 2. collapse of immediately repeated words ([`collapse_repeated_words`])
//! 3. line break before bullets ([`break_before_bullets`])
//! 4. line break after sentence periods that are not decimals ([`break_after_sentences`])
//! 5. Title-Case runs on their own lines ([`isolate_title_case`])
//! 6. whitespace collapse and trim ([`collapse_whitespace`])
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::debug;

use crate::dictionary::Dictionary;

const BULLET: char = '•';

static TITLE_CASE_RUN: OnceLock<Option<Regex>> = OnceLock::new();
static WHITESPACE_RUN: OnceLock<Option<Regex>> = OnceLock::new();

fn title_case_run() -> Option<&'static Regex> {
  // `\b` before an uppercase letter only holds when no word character precedes it.
  TITLE_CASE_RUN
    .get_or_init(|| Regex::new(r"\b([A-Z][a-z]+(?: [A-Z][a-z]+)*)([^\s\w]*)").ok())
    .as_ref()
}

fn whitespace_run() -> Option<&'static Regex> {
  WHITESPACE_RUN.get_or_init(|| Regex::new(r"\s+").ok()).as_ref()
}

/// What the final whitespace collapse does with the line breaks inserted by earlier stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineBreakMode {
  /// Whitespace runs containing a newline become a single `\n`; other runs a single space.
  #[default]
  Preserve,
  /// Every whitespace run becomes a single space.
  Flatten,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanerOptions {
  pub line_breaks: LineBreakMode,
}

/// Cleans raw OCR text with default options.
pub fn clean(raw_text: &str, dictionary: &dyn Dictionary) -> String {
  clean_with(raw_text, dictionary, &CleanerOptions::default())
}

/// Cleans raw OCR text. Never fails: odd input degrades to best-effort output.
pub fn clean_with(raw_text: &str, dictionary: &dyn Dictionary, options: &CleanerOptions) -> String {
  if raw_text.trim().is_empty() {
    return String::new();
  }

  let tokens: Vec<&str> = raw_text.split_whitespace().collect();
  let corrected = correct_spelling(&tokens, dictionary);
  let text = corrected.join(" ");

  let text = collapse_repeated_words(&text);
  let text = break_before_bullets(&text);
  let text = break_after_sentences(&text);
  let text = isolate_title_case(&text);
  collapse_whitespace(&text, options.line_breaks)
}

fn is_word_char(c: char) -> bool {
  c.is_alphanumeric() || c == '_'
}

fn is_plain_word(token: &str) -> bool {
  !token.is_empty() && token.chars().all(char::is_alphabetic)
}

/// Replaces misspelled alphabetic tokens with their best dictionary correction.
///
/// Tokens with digits or punctuation and known words pass through. A token without any
/// correction candidate is dropped; a token whose lookup fails is kept as-is.
pub fn correct_spelling(tokens: &[&str], dictionary: &dyn Dictionary) -> Vec<String> {
  let mut corrected = Vec::with_capacity(tokens.len());

  for token in tokens {
    if !is_plain_word(token) || dictionary.contains(token) {
      corrected.push(token.to_string());
      continue;
    }

    match dictionary.correction(token) {
      Ok(Some(replacement)) if !replacement.is_empty() => corrected.push(replacement),
      Ok(_) => debug!(token = %token, "dropping token without correction"),
      Err(e) => {
        debug!(token = %token, error = %e, "spelling lookup failed, keeping token");
        corrected.push(token.to_string());
      }
    }
  }

  corrected
}

/// Collapses a word followed by one or more single-space repetitions of itself.
///
/// `"the the the cat"` becomes `"the cat"`. Words are maximal runs of alphanumeric
/// characters or `_`, so `"cat cat."` becomes `"cat."` while `"cat catalog"` is untouched.
pub fn collapse_repeated_words(text: &str) -> String {
  let chars: Vec<char> = text.chars().collect();
  let mut out = String::with_capacity(text.len());
  let mut i = 0;

  while i < chars.len() {
    let starts_word = is_word_char(chars[i]) && (i == 0 || !is_word_char(chars[i - 1]));
    if !starts_word {
      out.push(chars[i]);
      i += 1;
      continue;
    }

    let mut end = i;
    while end < chars.len() && is_word_char(chars[end]) {
      end += 1;
    }
    let word = &chars[i..end];
    out.extend(word);

    while let Some(next) = repetition_end(&chars, end, word) {
      end = next;
    }
    i = end;
  }

  out
}

/// End index of `" " + word` at `pos` when it ends on a word boundary.
fn repetition_end(chars: &[char], pos: usize, word: &[char]) -> Option<usize> {
  if chars.get(pos) != Some(&' ') {
    return None;
  }
  let start = pos + 1;
  let end = start + word.len();
  if end > chars.len() || &chars[start..end] != word {
    return None;
  }
  if chars.get(end).is_some_and(|c| is_word_char(*c)) {
    return None;
  }
  Some(end)
}

/// Starts every bullet glyph on a new line.
pub fn break_before_bullets(text: &str) -> String {
  text.replace(BULLET, &format!("\n{BULLET}"))
}

/// Turns `". "` into `".\n"` unless the period follows a digit, so `"9.8 m. Next"`
/// keeps the decimal and breaks only after `"m."`.
pub fn break_after_sentences(text: &str) -> String {
  let chars: Vec<char> = text.chars().collect();
  let mut out = String::with_capacity(text.len());
  let mut i = 0;

  while i < chars.len() {
    let c = chars[i];
    let after_digit = i > 0 && chars[i - 1].is_ascii_digit();
    if c == '.' && chars.get(i + 1) == Some(&' ') && !after_digit {
      out.push_str(".\n");
      i += 2;
      continue;
    }
    out.push(c);
    i += 1;
  }

  out
}

/// Surrounds runs of capitalized words (`"John Smith"`, `"New York"`) with line breaks
/// so probable names and headings stand on their own lines.
///
/// Punctuation closing the run (`"New York."`) stays on the run's line when it ends the
/// token; otherwise the break goes right after the last word, as in `"John\n's"`.
pub fn isolate_title_case(text: &str) -> String {
  let Some(re) = title_case_run() else {
    return text.to_string();
  };

  re.replace_all(text, |caps: &Captures| {
    let run = &caps[1];
    let trailing = &caps[2];
    let end = caps.get(0).map_or(text.len(), |m| m.end());
    let closes_token = text[end..].chars().next().map_or(true, char::is_whitespace);
    if closes_token {
      format!("\n{run}{trailing}\n")
    } else {
      format!("\n{run}\n{trailing}")
    }
  })
  .into_owned()
}

/// Collapses whitespace runs and trims the result.
pub fn collapse_whitespace(text: &str, mode: LineBreakMode) -> String {
  let Some(re) = whitespace_run() else {
    return text.trim().to_string();
  };

  let collapsed = match mode {
    LineBreakMode::Flatten => re.replace_all(text, " ").into_owned(),
    LineBreakMode::Preserve => re
      .replace_all(text, |caps: &Captures| if caps[0].contains('\n') { "\n" } else { " " })
      .into_owned(),
  };
  collapsed.trim().to_string()
}

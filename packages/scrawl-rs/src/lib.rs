//! # scrawl-rs
//!
//! Post-processing for handwriting OCR: turns the fragments returned by an OCR provider
//! into readable text and a confidence percentage.
//!
//! ## Features
//!
//! - **Text cleaning**: spelling correction, repeated-word collapse, bullet/sentence/heading
//!   line breaks and whitespace normalization, as an ordered pipeline of pure stages
//! - **Confidence scoring**: provider confidence when available, otherwise a proxy built
//!   from dictionary hits and alphanumeric coverage
//! - **Annotation**: bounding boxes colored by per-fragment confidence
//! - **Export**: cleaned text, one-line confidence report and a JSON analysis report
//!
//! ## Quick Start
//!
//! ```ignore
//! use scrawl_rs::prelude::*;
//!
//! let normalizer = TextNormalizer::english();
//! let fragments = vec![
//!   TextFragment::new("the").with_confidence(0.9),
//!   TextFragment::new("the").with_confidence(0.7),
//!   TextFragment::new("cat"),
//! ];
//! let result = normalizer.analyze(&fragments);
//! assert_eq!(result.cleaned_text, "the cat");
//! assert_eq!(result.confidence_report(), "Confidence Score: 80.00%");
//! ```

pub mod annotator;
pub mod confidence;
pub mod config;
pub mod dictionary;
pub mod export;
pub mod normalizer;
pub mod pipeline;
pub mod text_cleaner;

// Re-export commonly used types at the root level
pub use annotator::{AnnotateError, Annotation, AnnotationOutcome, Annotator, Tone};
pub use confidence::{average_confidence, format_confidence, proxy_confidence, score, ScoringMode};
pub use config::{load_config, save_config, ScrawlConfig};
pub use dictionary::{Dictionary, DictionaryError, WordListDictionary};
pub use export::{export_result, AnalysisReport, ExportedFiles};
pub use normalizer::{AnalysisResult, TextNormalizer};
pub use text_cleaner::{clean, clean_with, CleanerOptions, LineBreakMode};

pub use scrawl_ocr::{BoundingPoly, TextFragment, Vertex};

/// Prelude module for convenient imports
///
/// Import everything you need with:
/// ```ignore
/// use scrawl_rs::prelude::*;
/// ```
pub mod prelude {
  pub use crate::{
    average_confidence, clean, clean_with, format_confidence, proxy_confidence, score, AnalysisResult,
    Annotator, BoundingPoly, CleanerOptions, Dictionary, LineBreakMode, ScoringMode, TextFragment,
    TextNormalizer, Vertex, WordListDictionary,
  };
}

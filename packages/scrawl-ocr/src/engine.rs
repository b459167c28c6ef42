use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::region::TextFragment;

#[derive(Debug, Clone)]
pub enum OcrInput {
    FilePath(PathBuf),
    Bytes(Vec<u8>),
}

#[derive(Debug, Clone, Default)]
pub struct OcrOutput {
    /// Fragment texts joined with single spaces, in provider order.
    pub text: String,
    pub fragments: Vec<TextFragment>,
}

impl OcrOutput {
    pub fn from_fragments(fragments: Vec<TextFragment>) -> Self {
        let text = join_fragment_text(&fragments);
        Self { text, fragments }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Joins fragment texts with single spaces, skipping empty descriptions.
pub fn join_fragment_text(fragments: &[TextFragment]) -> String {
    fragments
        .iter()
        .map(|f| f.text.as_str())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("provider error: {0}")]
    Provider(String),
}

#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn recognize(&self, input: &OcrInput) -> Result<OcrOutput, OcrError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_skips_empty_descriptions() {
        let fragments = vec![
            TextFragment::new("Dear"),
            TextFragment::new(""),
            TextFragment::new("diary"),
        ];
        assert_eq!(join_fragment_text(&fragments), "Dear diary");
    }

    #[test]
    fn whitespace_only_output_is_blank() {
        let output = OcrOutput::from_fragments(vec![TextFragment::new("  ")]);
        assert!(output.is_blank());
        assert!(OcrOutput::default().is_blank());
    }

    #[test]
    fn errors_name_their_source() {
        let invalid = OcrError::InvalidInput("not a JSON document".to_string());
        assert_eq!(invalid.to_string(), "invalid input: not a JSON document");
        let provider = OcrError::Provider("Bad image data.".to_string());
        assert_eq!(provider.to_string(), "provider error: Bad image data.");
    }
}

//! Decoding of saved Google Cloud Vision `text_detection` responses.
//!
//! The engine never talks to the network: it reads a response body that was fetched
//! elsewhere (for example with `gcloud ml vision detect-text`) and turns its
//! `textAnnotations` into [`TextFragment`]s.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::engine::{OcrEngine, OcrError, OcrInput, OcrOutput};
use crate::region::{BoundingPoly, TextFragment, Vertex};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    #[serde(default)]
    text_annotations: Vec<EntityAnnotation>,
    error: Option<Status>,
}

#[derive(Debug, Deserialize)]
struct Status {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntityAnnotation {
    #[serde(default)]
    description: Option<String>,
    confidence: Option<f64>,
    bounding_poly: Option<RawPoly>,
}

#[derive(Debug, Deserialize)]
struct RawPoly {
    #[serde(default)]
    vertices: Vec<RawVertex>,
}

// Vision omits zero-valued coordinates.
#[derive(Debug, Deserialize)]
struct RawVertex {
    #[serde(default)]
    x: i32,
    #[serde(default)]
    y: i32,
}

impl EntityAnnotation {
    fn into_fragment(self) -> Option<TextFragment> {
        let text = self.description.filter(|d| !d.is_empty())?;
        Some(TextFragment {
            text,
            confidence: self.confidence,
            bounding_poly: self.bounding_poly.map(|poly| {
                BoundingPoly::new(
                    poly.vertices
                        .into_iter()
                        .map(|v| Vertex::new(v.x, v.y))
                        .collect(),
                )
            }),
        })
    }
}

/// Parses a Vision response body into fragments, in provider order.
///
/// Accepts either the batch envelope (`{"responses": [...]}`) or a single
/// `AnnotateImageResponse` object. Annotations without a description are dropped.
pub fn parse_vision_response(body: &[u8]) -> Result<Vec<TextFragment>, OcrError> {
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| OcrError::InvalidInput(format!("not a JSON document: {e}")))?;

    let responses = if value.get("responses").is_some() {
        serde_json::from_value::<BatchResponse>(value)
            .map_err(|e| OcrError::InvalidInput(e.to_string()))?
            .responses
    } else {
        vec![serde_json::from_value::<AnnotateImageResponse>(value)
            .map_err(|e| OcrError::InvalidInput(e.to_string()))?]
    };

    let Some(response) = responses.into_iter().next() else {
        return Ok(Vec::new());
    };

    if let Some(status) = response.error {
        if !status.message.is_empty() {
            return Err(OcrError::Provider(status.message));
        }
    }

    let total = response.text_annotations.len();
    let fragments: Vec<TextFragment> = response
        .text_annotations
        .into_iter()
        .filter_map(EntityAnnotation::into_fragment)
        .collect();

    debug!(total, valid = fragments.len(), "decoded vision annotations");
    Ok(fragments)
}

/// [`OcrEngine`] backed by a stored Vision API response.
pub struct VisionResponseEngine;

impl VisionResponseEngine {
    pub fn new() -> Self {
        Self
    }
}

impl Default for VisionResponseEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OcrEngine for VisionResponseEngine {
    async fn recognize(&self, input: &OcrInput) -> Result<OcrOutput, OcrError> {
        let fragments = match input {
            OcrInput::FilePath(path) => {
                let body = tokio::fs::read(path).await.map_err(|e| {
                    OcrError::InvalidInput(format!("{}: {e}", path.display()))
                })?;
                parse_vision_response(&body)?
            }
            OcrInput::Bytes(data) => parse_vision_response(data)?,
        };
        Ok(OcrOutput::from_fragments(fragments))
    }
}

//! Visual QA output: draws each fragment's bounding box colored by its proxy confidence.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use scrawl_ocr::TextFragment;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::confidence::proxy_confidence;
use crate::dictionary::Dictionary;

pub const ANNOTATED_IMAGE_FILE: &str = "annotated_image.png";
pub const DEFAULT_GOOD_THRESHOLD: f64 = 80.0;
pub const DEFAULT_LINE_THICKNESS: u32 = 2;

const GOOD_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const ATTENTION_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const LABEL_SCALE: f32 = 14.0;
const LABEL_GAP: i32 = 10;

#[derive(Debug, Error)]
pub enum AnnotateError {
  #[error("image not found at path: {0}")]
  NotFound(PathBuf),
  #[error("image error: {0}")]
  Image(#[from] image::ImageError),
  #[error("invalid font {path}: {reason}")]
  Font { path: PathBuf, reason: String },
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
  Good,
  Attention,
}

impl Tone {
  fn color(self) -> Rgb<u8> {
    match self {
      Tone::Good => GOOD_COLOR,
      Tone::Attention => ATTENTION_COLOR,
    }
  }
}

/// A box scheduled for drawing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
  pub text: String,
  pub confidence: f64,
  /// Percentage with one decimal, e.g. `85.3%`.
  pub label: String,
  pub tone: Tone,
  pub left: i32,
  pub top: i32,
  pub width: u32,
  pub height: u32,
}

impl Annotation {
  fn rect(&self) -> Rect {
    Rect::at(self.left, self.top).of_size(self.width, self.height)
  }
}

#[derive(Debug, Clone)]
pub struct AnnotationOutcome {
  pub path: PathBuf,
  pub annotations: Vec<Annotation>,
  /// Fragments without a four-vertex bounding polygon.
  pub skipped: usize,
}

pub struct Annotator {
  dictionary: Arc<dyn Dictionary>,
  good_threshold: f64,
  line_thickness: u32,
  font: Option<FontVec>,
}

impl Annotator {
  pub fn new(dictionary: Arc<dyn Dictionary>) -> Self {
    Self {
      dictionary,
      good_threshold: DEFAULT_GOOD_THRESHOLD,
      line_thickness: DEFAULT_LINE_THICKNESS,
      font: None,
    }
  }

  pub fn with_threshold(mut self, threshold: f64) -> Self {
    self.good_threshold = threshold;
    self
  }

  pub fn with_line_thickness(mut self, thickness: u32) -> Self {
    self.line_thickness = thickness.max(1);
    self
  }

  /// Loads a TrueType/OpenType font used to render labels. Without one, labels are only
  /// reported in [`AnnotationOutcome::annotations`].
  pub fn with_font_file(mut self, path: &Path) -> Result<Self, AnnotateError> {
    let bytes = std::fs::read(path)?;
    let font = FontVec::try_from_vec(bytes).map_err(|e| AnnotateError::Font {
      path: path.to_path_buf(),
      reason: e.to_string(),
    })?;
    self.font = Some(font);
    Ok(self)
  }

  /// Computes the boxes to draw. Returns them with the number of skipped fragments.
  pub fn plan(&self, fragments: &[TextFragment]) -> (Vec<Annotation>, usize) {
    let mut annotations = Vec::new();
    let mut skipped = 0;

    for fragment in fragments {
      let Some([start, _, end, _]) = fragment.bounding_poly.as_ref().and_then(|p| p.quad()) else {
        debug!(text = %fragment.text, "skipping fragment without a 4-vertex polygon");
        skipped += 1;
        continue;
      };

      let confidence = proxy_confidence(&fragment.text, self.dictionary.as_ref());
      let tone = if confidence >= self.good_threshold {
        Tone::Good
      } else {
        Tone::Attention
      };

      annotations.push(Annotation {
        text: fragment.text.clone(),
        confidence,
        label: format!("{confidence:.1}%"),
        tone,
        left: start.x.min(end.x),
        top: start.y.min(end.y),
        width: start.x.abs_diff(end.x).max(1),
        height: start.y.abs_diff(end.y).max(1),
      });
    }

    (annotations, skipped)
  }

  /// Draws planned annotations onto an image in place.
  pub fn draw(&self, image: &mut RgbImage, annotations: &[Annotation]) {
    for annotation in annotations {
      let color = annotation.tone.color();
      let rect = annotation.rect();

      for step in 0..self.line_thickness {
        let grow = step as i32;
        let outline = Rect::at(rect.left() - grow, rect.top() - grow)
          .of_size(rect.width() + 2 * step, rect.height() + 2 * step);
        draw_hollow_rect_mut(image, outline, color);
      }

      if let Some(font) = &self.font {
        let y = rect.top() - LABEL_GAP - LABEL_SCALE as i32;
        draw_text_mut(image, color, rect.left(), y, PxScale::from(LABEL_SCALE), font, &annotation.label);
      }
    }
  }

  /// Draws boxes for `fragments` over the image at `image_path` and writes
  /// `annotated_image.png` into `output_dir`.
  pub fn annotate(
    &self,
    image_path: &Path,
    fragments: &[TextFragment],
    output_dir: &Path,
  ) -> Result<AnnotationOutcome, AnnotateError> {
    if !image_path.exists() {
      return Err(AnnotateError::NotFound(image_path.to_path_buf()));
    }

    let mut image = image::open(image_path)?.to_rgb8();
    let (annotations, skipped) = self.plan(fragments);
    self.draw(&mut image, &annotations);

    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(ANNOTATED_IMAGE_FILE);
    image.save(&path)?;

    info!(
      path = %path.display(),
      boxes = annotations.len(),
      skipped,
      "annotated image saved"
    );

    Ok(AnnotationOutcome {
      path,
      annotations,
      skipped,
    })
  }
}

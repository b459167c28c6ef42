use serde::{Deserialize, Serialize};

/// A polygon corner in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Vertex {
    pub x: i32,
    pub y: i32,
}

impl Vertex {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingPoly {
    pub vertices: Vec<Vertex>,
}

impl BoundingPoly {
    pub fn new(vertices: Vec<Vertex>) -> Self {
        Self { vertices }
    }

    /// Returns the four corners when the polygon is a quadrilateral.
    pub fn quad(&self) -> Option<[Vertex; 4]> {
        match self.vertices.as_slice() {
            [a, b, c, d] => Some([*a, *b, *c, *d]),
            _ => None,
        }
    }
}

/// One unit of recognized text as returned by an OCR provider.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextFragment {
    pub text: String,
    /// Provider confidence in `[0, 1]`. Many providers leave this unset or zero.
    pub confidence: Option<f64>,
    pub bounding_poly: Option<BoundingPoly>,
}

impl TextFragment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            confidence: None,
            bounding_poly: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn with_vertices(mut self, vertices: Vec<Vertex>) -> Self {
        self.bounding_poly = Some(BoundingPoly::new(vertices));
        self
    }

    /// Confidence value if the provider supplied a positive one.
    pub fn usable_confidence(&self) -> Option<f64> {
        self.confidence.filter(|c| *c > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_requires_exactly_four_vertices() {
        let tri = BoundingPoly::new(vec![Vertex::new(0, 0), Vertex::new(5, 0), Vertex::new(5, 5)]);
        assert!(tri.quad().is_none());

        let rect = BoundingPoly::new(vec![
            Vertex::new(0, 0),
            Vertex::new(10, 0),
            Vertex::new(10, 4),
            Vertex::new(0, 4),
        ]);
        assert_eq!(rect.quad().map(|q| q[2]), Some(Vertex::new(10, 4)));
    }

    #[test]
    fn zero_confidence_is_not_usable() {
        assert_eq!(TextFragment::new("a").with_confidence(0.0).usable_confidence(), None);
        assert_eq!(TextFragment::new("a").usable_confidence(), None);
        assert_eq!(TextFragment::new("a").with_confidence(0.4).usable_confidence(), Some(0.4));
    }
}

pub mod engine;
pub mod region;
pub mod vision;

pub use engine::{join_fragment_text, OcrEngine, OcrError, OcrInput, OcrOutput};
pub use region::{BoundingPoly, TextFragment, Vertex};
pub use vision::{parse_vision_response, VisionResponseEngine};

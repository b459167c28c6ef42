use anyhow::Result;
use scrawl_ocr::{OcrEngine, OcrInput, VisionResponseEngine};
use scrawl_rs::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "response.json".to_string());

    let engine = VisionResponseEngine::new();
    let output = engine.recognize(&OcrInput::FilePath(path.clone().into())).await?;

    let normalizer = TextNormalizer::english();
    let result = normalizer.analyze(&output.fragments);

    println!("Response: {}", path);
    println!("  Fragments: {}", result.fragment_count);
    println!("  Scoring mode: {:?}", result.mode);
    println!("{}", "=".repeat(60));

    if result.is_empty() {
        println!("No text detected.");
        return Ok(());
    }

    println!("{}", result.cleaned_text);
    println!("{}", "=".repeat(60));
    println!("{}", result.confidence_report());

    Ok(())
}

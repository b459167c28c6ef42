//! Command line arguments backing the `scrawl` binary.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
  name = "scrawl",
  about = "Cleans handwriting OCR output and estimates how much of it was read correctly",
  version
)]
pub struct Args {
  #[command(subcommand)]
  pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Print version information
  Version,
  /// Analyze a saved OCR response (or a directory of them) and export the results
  Analyze {
    /// Vision API response JSON, or a directory searched recursively for *.json
    input: PathBuf,

    /// Source image to annotate; defaults to an image next to the response (single file only)
    #[arg(long, short = 'i')]
    image: Option<PathBuf>,

    /// Directory receiving the exported files
    #[arg(long, short = 'o')]
    output_dir: Option<PathBuf>,

    /// Configuration file (defaults to ./scrawl.toml when present)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Custom word list used for spelling correction and scoring
    #[arg(long, short = 'd')]
    dictionary: Option<PathBuf>,

    /// Join all output onto one line instead of keeping inserted line breaks
    #[arg(long)]
    flatten: bool,

    /// Skip the annotated image
    #[arg(long)]
    no_annotate: bool,

    /// Only log warnings and errors
    #[arg(long, short = 'q')]
    quiet: bool,
  },
  /// Clean a piece of text and print the result
  Clean {
    /// Text to clean; read from --file or stdin when omitted
    text: Option<String>,

    /// Read the text from a file
    #[arg(long, short = 'f', conflicts_with = "text")]
    file: Option<PathBuf>,

    /// Configuration file (defaults to ./scrawl.toml when present)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Custom word list used for spelling correction
    #[arg(long, short = 'd')]
    dictionary: Option<PathBuf>,

    /// Join all output onto one line instead of keeping inserted line breaks
    #[arg(long)]
    flatten: bool,
  },
}

impl Args {
  pub fn quiet(&self) -> bool {
    match &self.command {
      Commands::Analyze { quiet, .. } => *quiet,
      Commands::Clean { .. } => true,
      Commands::Version => true,
    }
  }
}

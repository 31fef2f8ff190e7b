pub mod types;
pub mod ocr;
pub mod line_parser;
pub mod normalize;
pub mod classify;
pub mod assembler;
pub mod orchestrator;

pub use types::*;
pub use ocr::*;
pub use line_parser::*;
pub use normalize::*;
pub use classify::*;
pub use assembler::*;
pub use orchestrator::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Image is empty or unreadable")]
    UnreadableImage,

    #[error("OCR processing failed: {0}")]
    OcrProcessing(String),

    #[error("OCR did not finish within {0}s")]
    OcrTimeout(u64),
}

use serde::{Deserialize, Serialize};

use super::ExtractionError;
use crate::models::BloodTestItem;

/// Raw OCR result from the engine
#[derive(Debug, Clone, PartialEq)]
pub struct OcrPageResult {
    pub text: String,
    /// Engine-reported mean confidence, 0.0-1.0.
    pub confidence: f32,
}

/// OCR engine abstraction (allows mocking for tests).
///
/// Implementations may block; callers on an async runtime should run
/// them on a blocking thread.
pub trait OcrEngine: Send + Sync {
    fn ocr_image(&self, image_bytes: &[u8]) -> Result<OcrPageResult, ExtractionError>;
}

/// One line of recognized text split into its parts.
#[derive(Debug, Clone, PartialEq)]
pub struct RawLine {
    pub name: String,
    pub value: f64,
    pub unit: Option<String>,
    pub range: Option<String>,
}

/// Items recognized from one image, with the OCR text they came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionOutcome {
    pub text: String,
    /// Share of a typical ten-indicator panel that was recognized, 0.0-1.0.
    pub confidence: f32,
    pub items: Vec<BloodTestItem>,
}

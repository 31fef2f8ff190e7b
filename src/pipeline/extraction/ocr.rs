use std::time::Duration;

use super::types::{OcrEngine, OcrPageResult};
use super::ExtractionError;

/// Mock OCR engine for unit testing without a recognition backend.
pub struct MockOcrEngine {
    pub text: String,
    pub confidence: f32,
    /// When set, every call fails with this message.
    pub failure: Option<String>,
    /// Simulated recognition latency.
    pub delay: Option<Duration>,
}

impl MockOcrEngine {
    pub fn new(text: &str, confidence: f32) -> Self {
        Self {
            text: text.to_string(),
            confidence,
            failure: None,
            delay: None,
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            text: String::new(),
            confidence: 0.0,
            failure: Some(reason.to_string()),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl OcrEngine for MockOcrEngine {
    fn ocr_image(&self, image_bytes: &[u8]) -> Result<OcrPageResult, ExtractionError> {
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        if image_bytes.is_empty() {
            return Err(ExtractionError::UnreadableImage);
        }

        if let Some(ref reason) = self.failure {
            return Err(ExtractionError::OcrProcessing(reason.clone()));
        }

        Ok(OcrPageResult {
            text: self.text.clone(),
            confidence: self.confidence,
        })
    }
}

use super::assembler::{assemble_report, parse_blood_test_items};
use super::types::{ExtractionOutcome, OcrEngine};
use super::ExtractionError;
use crate::intelligence::reference::IndicatorCatalog;
use crate::models::{Report, ReportMetadata};

/// Item count of a typical blood-count panel; a full panel scores 1.0.
const EXPECTED_PANEL_ITEMS: f32 = 10.0;

/// Run OCR on one image and extract its items.
pub fn extract_from_image(
    engine: &dyn OcrEngine,
    catalog: &IndicatorCatalog,
    image_bytes: &[u8],
) -> Result<ExtractionOutcome, ExtractionError> {
    if image_bytes.is_empty() {
        return Err(ExtractionError::UnreadableImage);
    }

    let page = engine.ocr_image(image_bytes)?;
    let items = parse_blood_test_items(catalog, &page.text);
    let confidence = extraction_confidence(items.len());

    tracing::debug!(
        ocr_confidence = page.confidence,
        items = items.len(),
        confidence,
        "Image extraction complete"
    );

    Ok(ExtractionOutcome {
        text: page.text,
        confidence,
        items,
    })
}

/// OCR an image and assemble the report it describes.
pub fn analyze_report_image(
    engine: &dyn OcrEngine,
    catalog: &IndicatorCatalog,
    image_bytes: &[u8],
    metadata: ReportMetadata,
) -> Result<Report, ExtractionError> {
    if image_bytes.is_empty() {
        return Err(ExtractionError::UnreadableImage);
    }

    let page = engine.ocr_image(image_bytes)?;
    Ok(assemble_report(catalog, &page.text, metadata))
}

/// Share of an expected panel that was recognized, capped at 1.0.
pub fn extraction_confidence(item_count: usize) -> f32 {
    if item_count == 0 {
        return 0.0;
    }
    (item_count as f32 / EXPECTED_PANEL_ITEMS).min(1.0)
}

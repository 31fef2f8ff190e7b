//! Async facade over the OCR and storage collaborators.
//!
//! The extraction and analysis core is synchronous. OCR and SQLite calls
//! run on tokio's blocking pool; OCR is bounded by the configured timeout.
//! The connection is shared behind a `std::sync::Mutex` and only locked
//! inside blocking tasks. Uploaded images are kept under the images
//! directory when one is configured.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::NaiveDateTime;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::dates::{parse_iso_datetime, DateParseError};
use crate::db::{
    export_reports_json, open_database, DatabaseError, ReportRepository, ReportStatistics,
    SqliteReportRepository,
};
use crate::intelligence::{
    analyze_blood_test_data, compare_with_history, select_history, BloodTestAnalysis,
    HistoryComparison, IndicatorCatalog, PanelInput,
};
use crate::models::{Report, ReportMetadata};
use crate::pipeline::extraction::{
    analyze_report_image, extract_from_image, ExtractionError, ExtractionOutcome, OcrEngine,
};
use crate::pipeline::staging::{delete_image, images_dir, save_image, StagingError};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),
    #[error("Invalid date: {0}")]
    Date(#[from] DateParseError),
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("Image storage error: {0}")]
    Staging(#[from] StagingError),
    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("Internal lock error")]
    LockPoisoned,
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Database(DatabaseError::NotFound { .. }))
    }
}

/// Caller-supplied fields of an upload. `test_date` is an ISO-8601 string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadRequest {
    pub patient_name: String,
    pub hospital: String,
    pub test_date: String,
    #[serde(default)]
    pub notes: Option<String>,
    /// Original file name of the upload; only its stem and extension are kept.
    #[serde(default)]
    pub filename: Option<String>,
}

pub struct ReportService {
    ocr: Arc<dyn OcrEngine>,
    conn: Arc<Mutex<Connection>>,
    catalog: &'static IndicatorCatalog,
    ocr_timeout: Duration,
    images_dir: Option<PathBuf>,
}

impl ReportService {
    /// A service that does not keep uploaded images.
    pub fn new(ocr: Arc<dyn OcrEngine>, conn: Connection, ocr_timeout: Duration) -> Self {
        Self {
            ocr,
            conn: Arc::new(Mutex::new(conn)),
            catalog: IndicatorCatalog::standard(),
            ocr_timeout,
            images_dir: None,
        }
    }

    /// Open (and migrate) the database at `config.database_path`. Uploaded
    /// images go to `images/` under `config.data_dir`.
    pub fn open(ocr: Arc<dyn OcrEngine>, config: &AppConfig) -> Result<Self, ServiceError> {
        let conn = open_database(&config.database_path)?;
        Ok(Self::new(ocr, conn, config.ocr_timeout).with_images_dir(images_dir(&config.data_dir)))
    }

    pub fn with_images_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.images_dir = Some(dir.into());
        self
    }

    pub fn with_catalog(mut self, catalog: &'static IndicatorCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn reference_catalog(&self) -> &'static IndicatorCatalog {
        self.catalog
    }

    /// OCR an image without storing anything.
    pub async fn extract(&self, image: Vec<u8>) -> Result<ExtractionOutcome, ServiceError> {
        let ocr = Arc::clone(&self.ocr);
        let catalog = self.catalog;
        self.with_ocr_timeout(move || extract_from_image(ocr.as_ref(), catalog, &image))
            .await
    }

    /// OCR an uploaded image, assemble its report and store it.
    ///
    /// The date is validated before any OCR work is started. With an images
    /// directory configured the image is written there first and the report
    /// points at it; the file is removed again if the upload fails.
    pub async fn upload_report(
        &self,
        mut image: Vec<u8>,
        request: UploadRequest,
    ) -> Result<Report, ServiceError> {
        let test_date = parse_iso_datetime(&request.test_date)?;
        if image.is_empty() {
            return Err(ExtractionError::UnreadableImage.into());
        }

        let stored_image = match self.images_dir.clone() {
            Some(dir) => {
                let filename = request.filename.unwrap_or_default();
                let (path, bytes) = tokio::task::spawn_blocking(move || {
                    save_image(&dir, &image, &filename).map(|path| (path, image))
                })
                .await??;
                image = bytes;
                Some(path)
            }
            None => None,
        };

        let metadata = ReportMetadata {
            patient_name: request.patient_name,
            hospital: request.hospital,
            test_date,
            notes: request.notes,
            image_path: stored_image
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
        };

        let outcome = self.analyze_and_save(image, metadata).await;
        if let (Err(e), Some(path)) = (&outcome, &stored_image) {
            tracing::warn!(error = %e, "Upload failed, discarding stored image");
            self.discard_image(path);
        }
        outcome
    }

    async fn analyze_and_save(
        &self,
        image: Vec<u8>,
        metadata: ReportMetadata,
    ) -> Result<Report, ServiceError> {
        let ocr = Arc::clone(&self.ocr);
        let catalog = self.catalog;
        let mut report = self
            .with_ocr_timeout(move || analyze_report_image(ocr.as_ref(), catalog, &image, metadata))
            .await?;

        self.with_repository(move |repo| {
            repo.save(&mut report)?;
            Ok(report)
        })
        .await
    }

    pub async fn get_report(&self, id: Uuid) -> Result<Report, ServiceError> {
        self.with_repository(move |repo| repo.get(&id)).await
    }

    pub async fn list_reports(&self) -> Result<Vec<Report>, ServiceError> {
        self.with_repository(|repo| repo.list()).await
    }

    pub async fn reports_by_patient(&self, patient_name: &str) -> Result<Vec<Report>, ServiceError> {
        let patient_name = patient_name.to_string();
        self.with_repository(move |repo| repo.by_patient(&patient_name))
            .await
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Report>, ServiceError> {
        let query = query.to_string();
        self.with_repository(move |repo| repo.search(&query)).await
    }

    /// Reports tested between two ISO-8601 dates, both inclusive.
    pub async fn reports_by_date_range(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Vec<Report>, ServiceError> {
        let start: NaiveDateTime = parse_iso_datetime(start)?;
        let end: NaiveDateTime = parse_iso_datetime(end)?;
        self.with_repository(move |repo| repo.by_date_range(&start, &end))
            .await
    }

    /// Replace a report's notes.
    pub async fn update_notes(
        &self,
        id: Uuid,
        notes: Option<String>,
    ) -> Result<Report, ServiceError> {
        self.with_repository(move |repo| {
            let mut report = repo.get(&id)?;
            report.set_notes(notes);
            repo.save(&mut report)?;
            Ok(report)
        })
        .await
    }

    /// Delete a report, and its image when it lives in the images directory.
    pub async fn delete_report(&self, id: Uuid) -> Result<(), ServiceError> {
        let image = self
            .with_repository(move |repo| {
                let report = repo.get(&id)?;
                repo.delete(&id)?;
                Ok(report.image_path().map(PathBuf::from))
            })
            .await?;

        if let (Some(path), Some(dir)) = (image, &self.images_dir) {
            if path.starts_with(dir) {
                self.discard_image(&path);
            }
        }
        Ok(())
    }

    pub async fn statistics(&self) -> Result<ReportStatistics, ServiceError> {
        self.with_repository(|repo| repo.statistics()).await
    }

    pub async fn export_json(&self) -> Result<String, ServiceError> {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || -> Result<String, ServiceError> {
            let conn = conn.lock().map_err(|_| ServiceError::LockPoisoned)?;
            Ok(export_reports_json(&conn)?)
        })
        .await?
    }

    /// Compare a stored report with the same patient's other reports.
    pub async fn compare_report(&self, id: Uuid) -> Result<HistoryComparison, ServiceError> {
        let (current, all) = self
            .with_repository(move |repo| Ok((repo.get(&id)?, repo.list()?)))
            .await?;

        let history = select_history(&current, &all);
        tracing::debug!(
            report_id = %id,
            candidates = all.len(),
            selected = history.len(),
            "History selected for comparison"
        );

        Ok(compare_with_history(&current, &history))
    }

    /// Panel analysis of caller-supplied values.
    pub fn analyze(&self, input: &PanelInput) -> BloodTestAnalysis {
        analyze_blood_test_data(input)
    }

    fn discard_image(&self, path: &Path) {
        if let Err(e) = delete_image(path) {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove report image");
        }
    }

    async fn with_repository<T, F>(&self, op: F) -> Result<T, ServiceError>
    where
        T: Send + 'static,
        F: FnOnce(&SqliteReportRepository<'_>) -> Result<T, DatabaseError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || -> Result<T, ServiceError> {
            let conn = conn.lock().map_err(|_| ServiceError::LockPoisoned)?;
            let repo = SqliteReportRepository::new(&conn);
            op(&repo).map_err(ServiceError::from)
        })
        .await?
    }

    async fn with_ocr_timeout<T, F>(&self, op: F) -> Result<T, ServiceError>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T, ExtractionError> + Send + 'static,
    {
        let task = tokio::task::spawn_blocking(op);
        match tokio::time::timeout(self.ocr_timeout, task).await {
            Ok(joined) => Ok(joined??),
            Err(_) => {
                let secs = self.ocr_timeout.as_secs();
                tracing::warn!(timeout_secs = secs, "OCR timed out");
                Err(ExtractionError::OcrTimeout(secs).into())
            }
        }
    }
}

//! Repository layer: report-scoped database operations.

mod report;

use chrono::NaiveDateTime;
use rusqlite::Connection;
use uuid::Uuid;

use super::DatabaseError;
use crate::models::Report;

pub use report::*;

/// Storage operations for blood-count reports.
pub trait ReportRepository {
    /// Insert, or replace a report with the same id.
    fn save(&self, report: &mut Report) -> Result<(), DatabaseError>;
    fn get(&self, id: &Uuid) -> Result<Report, DatabaseError>;
    fn list(&self) -> Result<Vec<Report>, DatabaseError>;
    fn by_patient(&self, patient_name: &str) -> Result<Vec<Report>, DatabaseError>;
    fn search(&self, query: &str) -> Result<Vec<Report>, DatabaseError>;
    fn by_date_range(
        &self,
        start: &NaiveDateTime,
        end: &NaiveDateTime,
    ) -> Result<Vec<Report>, DatabaseError>;
    fn delete(&self, id: &Uuid) -> Result<(), DatabaseError>;
    fn statistics(&self) -> Result<ReportStatistics, DatabaseError>;
}

/// [`ReportRepository`] over a borrowed SQLite connection.
pub struct SqliteReportRepository<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteReportRepository<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl ReportRepository for SqliteReportRepository<'_> {
    fn save(&self, report: &mut Report) -> Result<(), DatabaseError> {
        save_report(self.conn, report)
    }

    fn get(&self, id: &Uuid) -> Result<Report, DatabaseError> {
        get_report(self.conn, id)
    }

    fn list(&self) -> Result<Vec<Report>, DatabaseError> {
        list_reports(self.conn)
    }

    fn by_patient(&self, patient_name: &str) -> Result<Vec<Report>, DatabaseError> {
        get_reports_by_patient(self.conn, patient_name)
    }

    fn search(&self, query: &str) -> Result<Vec<Report>, DatabaseError> {
        search_reports(self.conn, query)
    }

    fn by_date_range(
        &self,
        start: &NaiveDateTime,
        end: &NaiveDateTime,
    ) -> Result<Vec<Report>, DatabaseError> {
        get_reports_by_date_range(self.conn, start, end)
    }

    fn delete(&self, id: &Uuid) -> Result<(), DatabaseError> {
        delete_report(self.conn, id)
    }

    fn statistics(&self) -> Result<ReportStatistics, DatabaseError> {
        get_statistics(self.conn)
    }
}

use std::str::FromStr;

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dates::{format_iso_datetime, parse_iso_datetime};
use crate::db::DatabaseError;
use crate::models::enums::ItemStatus;
use crate::models::{BloodTestItem, Report};

const REPORT_COLUMNS: &str =
    "id, patient_name, hospital, test_date, notes, image_path, created_at, updated_at";

/// Aggregate counts over every stored report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportStatistics {
    pub total_reports: usize,
    pub total_patients: usize,
    pub earliest_test_date: Option<NaiveDateTime>,
    pub latest_test_date: Option<NaiveDateTime>,
    pub abnormal_count: usize,
}

/// Insert `report`, or replace the stored report with the same id.
///
/// Replacing refreshes `updated_at` (on `report` too) and rewrites the
/// item rows; `created_at` keeps its stored value.
pub fn save_report(conn: &Connection, report: &mut Report) -> Result<(), DatabaseError> {
    let tx = conn.unchecked_transaction()?;
    let id = report.id().to_string();

    let exists = tx
        .query_row("SELECT 1 FROM reports WHERE id = ?1", params![id], |_| Ok(()))
        .optional()?
        .is_some();

    if exists {
        report.touch();
        tx.execute(
            "UPDATE reports SET patient_name = ?2, hospital = ?3, test_date = ?4,
             notes = ?5, image_path = ?6, updated_at = ?7
             WHERE id = ?1",
            params![
                id,
                report.patient_name(),
                report.hospital(),
                format_iso_datetime(&report.test_date()),
                report.notes(),
                report.image_path(),
                format_iso_datetime(&report.updated_at()),
            ],
        )?;
        tx.execute("DELETE FROM report_items WHERE report_id = ?1", params![id])?;
    } else {
        tx.execute(
            "INSERT INTO reports (id, patient_name, hospital, test_date, notes, image_path,
             created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                id,
                report.patient_name(),
                report.hospital(),
                format_iso_datetime(&report.test_date()),
                report.notes(),
                report.image_path(),
                format_iso_datetime(&report.created_at()),
                format_iso_datetime(&report.updated_at()),
            ],
        )?;
    }

    for (position, item) in report.items().iter().enumerate() {
        tx.execute(
            "INSERT INTO report_items (report_id, position, name, value, unit, reference_range, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                id,
                position as i64,
                item.name(),
                item.value(),
                item.unit(),
                item.reference_range(),
                item.status().as_str(),
            ],
        )?;
    }

    tx.commit()?;

    tracing::info!(
        report_id = %id,
        items = report.items().len(),
        replaced = exists,
        "Report stored"
    );
    Ok(())
}

pub fn get_report(conn: &Connection, id: &Uuid) -> Result<Report, DatabaseError> {
    let row = conn
        .query_row(
            &format!("SELECT {REPORT_COLUMNS} FROM reports WHERE id = ?1"),
            params![id.to_string()],
            report_row_from_rusqlite,
        )
        .optional()?;

    match row {
        Some(row) => report_from_row(conn, row),
        None => Err(DatabaseError::NotFound {
            entity_type: "Report".into(),
            id: id.to_string(),
        }),
    }
}

/// All reports in insertion order.
pub fn list_reports(conn: &Connection) -> Result<Vec<Report>, DatabaseError> {
    query_reports(
        conn,
        &format!("SELECT {REPORT_COLUMNS} FROM reports ORDER BY rowid"),
        [],
    )
}

/// Reports whose patient name equals `patient_name` exactly.
pub fn get_reports_by_patient(
    conn: &Connection,
    patient_name: &str,
) -> Result<Vec<Report>, DatabaseError> {
    query_reports(
        conn,
        &format!("SELECT {REPORT_COLUMNS} FROM reports WHERE patient_name = ?1 ORDER BY rowid"),
        params![patient_name],
    )
}

/// Case-insensitive substring search over patient name, hospital and notes.
pub fn search_reports(conn: &Connection, query: &str) -> Result<Vec<Report>, DatabaseError> {
    let needle = query.to_lowercase();
    let mut matches = Vec::new();
    for report in list_reports(conn)? {
        let hit = report.patient_name().to_lowercase().contains(&needle)
            || report.hospital().to_lowercase().contains(&needle)
            || report
                .notes()
                .is_some_and(|n| n.to_lowercase().contains(&needle));
        if hit {
            matches.push(report);
        }
    }
    Ok(matches)
}

/// Reports with `start <= test_date <= end`.
pub fn get_reports_by_date_range(
    conn: &Connection,
    start: &NaiveDateTime,
    end: &NaiveDateTime,
) -> Result<Vec<Report>, DatabaseError> {
    let reports = list_reports(conn)?;
    Ok(reports
        .into_iter()
        .filter(|r| (*start..=*end).contains(&r.test_date()))
        .collect())
}

pub fn delete_report(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let rows = conn.execute(
        "DELETE FROM reports WHERE id = ?1",
        params![id.to_string()],
    )?;
    if rows == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Report".into(),
            id: id.to_string(),
        });
    }
    tracing::info!(report_id = %id, "Report deleted");
    Ok(())
}

pub fn get_statistics(conn: &Connection) -> Result<ReportStatistics, DatabaseError> {
    let reports = list_reports(conn)?;

    let mut patients: Vec<&str> = reports.iter().map(|r| r.patient_name()).collect();
    patients.sort_unstable();
    patients.dedup();

    Ok(ReportStatistics {
        total_reports: reports.len(),
        total_patients: patients.len(),
        earliest_test_date: reports.iter().map(|r| r.test_date()).min(),
        latest_test_date: reports.iter().map(|r| r.test_date()).max(),
        abnormal_count: reports.iter().map(|r| r.abnormal_count()).sum(),
    })
}

/// Every stored report as a pretty-printed JSON array.
pub fn export_reports_json(conn: &Connection) -> Result<String, DatabaseError> {
    let reports = list_reports(conn)?;
    Ok(serde_json::to_string_pretty(&reports)?)
}

// Internal row type for Report mapping
struct ReportRow {
    id: String,
    patient_name: String,
    hospital: String,
    test_date: String,
    notes: Option<String>,
    image_path: Option<String>,
    created_at: String,
    updated_at: String,
}

fn report_row_from_rusqlite(row: &rusqlite::Row<'_>) -> Result<ReportRow, rusqlite::Error> {
    Ok(ReportRow {
        id: row.get(0)?,
        patient_name: row.get(1)?,
        hospital: row.get(2)?,
        test_date: row.get(3)?,
        notes: row.get(4)?,
        image_path: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

fn query_reports<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<Report>, DatabaseError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, report_row_from_rusqlite)?;

    let mut reports = Vec::new();
    for row in rows {
        reports.push(report_from_row(conn, row?)?);
    }
    Ok(reports)
}

fn report_from_row(conn: &Connection, row: ReportRow) -> Result<Report, DatabaseError> {
    let id = Uuid::parse_str(&row.id)
        .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?;
    let items = load_items(conn, &row.id)?;

    Ok(Report::restore(
        id,
        row.patient_name,
        row.hospital,
        stored_datetime(&row.test_date)?,
        items,
        row.notes,
        row.image_path,
        stored_datetime(&row.created_at)?,
        stored_datetime(&row.updated_at)?,
    ))
}

fn load_items(conn: &Connection, report_id: &str) -> Result<Vec<BloodTestItem>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT name, value, unit, reference_range, status
         FROM report_items WHERE report_id = ?1 ORDER BY position",
    )?;

    let rows = stmt.query_map(params![report_id], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, f64>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
        ))
    })?;

    let mut items = Vec::new();
    for row in rows {
        let (name, value, unit, reference_range, status) = row?;
        items.push(BloodTestItem::new(
            name,
            value,
            unit,
            reference_range,
            ItemStatus::from_str(&status)?,
        ));
    }
    Ok(items)
}

fn stored_datetime(value: &str) -> Result<NaiveDateTime, DatabaseError> {
    parse_iso_datetime(value).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))
}

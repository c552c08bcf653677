use async_graphql::SimpleObject;
use serde::Serialize;

use crate::models::domain::Question;

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct QuestionPage {
    pub items: Vec<Question>,
    pub total_count: u64,
    pub offset: u64,
    pub limit: u64,
    pub page: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl QuestionPage {
    pub fn new(items: Vec<Question>, total_count: u64, offset: u64, limit: u64) -> Self {
        let limit = limit.max(1);
        let total_pages = total_count.div_ceil(limit);

        Self {
            has_next: offset + (items.len() as u64) < total_count,
            has_previous: offset > 0,
            page: offset / limit + 1,
            total_pages,
            items,
            total_count,
            offset,
            limit,
        }
    }
}

#[derive(Debug, Clone, Serialize, SimpleObject)]
pub struct FilterOptions {
    pub topics: Vec<String>,
    pub difficulties: Vec<String>,
    pub sources: Vec<String>,
}

#[derive(Debug, Serialize, SimpleObject)]
pub struct DeleteQuestionResponse {
    pub ques_number: i64,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStatus {
    Success,
    PartialSuccess,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    Inserted,
    Updated,
    Superseded,
    Rejected,
    PersistenceFailed,
}

/// What happened to one spreadsheet row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowReport {
    pub row_number: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ques_number: Option<i64>,
    pub status: RowStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Result of a bulk import. `rows` lists every input row in file order; the
/// other lists are views over it grouped by status.
#[derive(Debug, Clone, Serialize)]
pub struct BulkImportReport {
    pub status: ImportStatus,
    pub total_rows: usize,
    pub inserted: usize,
    pub updated: usize,
    pub accepted: Vec<RowReport>,
    pub rejected: Vec<RowReport>,
    pub superseded: Vec<RowReport>,
    pub persistence_failures: Vec<RowReport>,
    pub rows: Vec<RowReport>,
}

impl BulkImportReport {
    pub fn from_rows(rows: Vec<RowReport>) -> Self {
        let by_status = |wanted: &[RowStatus]| -> Vec<RowReport> {
            rows.iter()
                .filter(|r| wanted.contains(&r.status))
                .cloned()
                .collect()
        };

        let accepted = by_status(&[RowStatus::Inserted, RowStatus::Updated]);
        let rejected = by_status(&[RowStatus::Rejected]);
        let superseded = by_status(&[RowStatus::Superseded]);
        let persistence_failures = by_status(&[RowStatus::PersistenceFailed]);

        let inserted = accepted
            .iter()
            .filter(|r| r.status == RowStatus::Inserted)
            .count();

        let status = if rejected.is_empty() && persistence_failures.is_empty() {
            ImportStatus::Success
        } else if accepted.is_empty() {
            ImportStatus::Failed
        } else {
            ImportStatus::PartialSuccess
        };

        Self {
            status,
            total_rows: rows.len(),
            inserted,
            updated: accepted.len() - inserted,
            accepted,
            rejected,
            superseded,
            persistence_failures,
            rows,
        }
    }
}

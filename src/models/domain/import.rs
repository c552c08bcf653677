use std::collections::BTreeMap;

use serde::Serialize;

use crate::{errors::ImportRowError, models::domain::QuestionDraft};

/// One spreadsheet row before validation. Cells are keyed by the raw header
/// text exactly as it appeared in the sheet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportRow {
    pub row_number: usize, // sheet row, header row is 1
    pub cells: BTreeMap<String, String>,
}

impl ImportRow {
    pub fn new(row_number: usize, cells: BTreeMap<String, String>) -> Self {
        Self { row_number, cells }
    }

    pub fn cell(&self, header: &str) -> Option<&str> {
        self.cells.get(header).map(String::as_str)
    }
}

/// The parsed content of an uploaded file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedSheet {
    pub headers: Vec<String>,
    pub rows: Vec<ImportRow>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportAction {
    Insert,
    Update,
}

/// Reconciliation verdict for a single row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImportOutcome {
    Accepted {
        row_number: usize,
        action: ImportAction,
        question: QuestionDraft,
    },
    /// Valid, but a later row in the same file carries the same `ques_number`.
    Superseded {
        row_number: usize,
        ques_number: i64,
        superseded_by: usize,
    },
    Rejected {
        row_number: usize,
        ques_number: Option<i64>,
        error: ImportRowError,
    },
}

impl ImportOutcome {
    pub fn row_number(&self) -> usize {
        match self {
            ImportOutcome::Accepted { row_number, .. }
            | ImportOutcome::Superseded { row_number, .. }
            | ImportOutcome::Rejected { row_number, .. } => *row_number,
        }
    }

    pub fn ques_number(&self) -> Option<i64> {
        match self {
            ImportOutcome::Accepted { question, .. } => Some(question.ques_number),
            ImportOutcome::Superseded { ques_number, .. } => Some(*ques_number),
            ImportOutcome::Rejected { ques_number, .. } => *ques_number,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, ImportOutcome::Accepted { .. })
    }
}

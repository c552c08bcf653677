use std::collections::HashMap;

use crate::{
    errors::{AppError, AppResult, ImportRowError},
    models::domain::{ImportAction, ImportOutcome, ImportRow, Question, QuestionDraft},
};

/// A column the importer understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ImportField {
    QuesNumber,
    Question,
    Options,
    Solution,
    CorrectAnswer,
    Topic,
    Difficulty,
    Source,
    QType,
    Image,
    SolutionImage,
}

impl ImportField {
    pub fn name(self) -> &'static str {
        match self {
            ImportField::QuesNumber => "ques_number",
            ImportField::Question => "question",
            ImportField::Options => "options",
            ImportField::Solution => "solution",
            ImportField::CorrectAnswer => "correct_answer",
            ImportField::Topic => "topic",
            ImportField::Difficulty => "difficulty",
            ImportField::Source => "source",
            ImportField::QType => "q_type",
            ImportField::Image => "image",
            ImportField::SolutionImage => "solution_image",
        }
    }

    /// Accepts the canonical field names plus the headers of the legacy
    /// question bank sheet. Case and surrounding/inner whitespace are ignored.
    pub fn from_header(header: &str) -> Option<Self> {
        let normalized = header
            .trim()
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_");

        let field = match normalized.as_str() {
            "ques_number" | "serial_no" | "serial_number" => ImportField::QuesNumber,
            "question" => ImportField::Question,
            "options" => ImportField::Options,
            "solution" => ImportField::Solution,
            "correct_answer" | "correct_option" => ImportField::CorrectAnswer,
            "topic" | "tag" => ImportField::Topic,
            "difficulty" | "difficulty_tag" | "difiiculty_tag" => ImportField::Difficulty,
            "source" => ImportField::Source,
            "q_type" => ImportField::QType,
            "image" => ImportField::Image,
            "solution_image" => ImportField::SolutionImage,
            _ => return None,
        };
        Some(field)
    }
}

const REQUIRED_COLUMNS: [ImportField; 7] = [
    ImportField::QuesNumber,
    ImportField::Question,
    ImportField::Options,
    ImportField::CorrectAnswer,
    ImportField::Topic,
    ImportField::Difficulty,
    ImportField::Source,
];

/// Which raw header carries each field. Resolved once per file so that every
/// row is read through the same fixed schema.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnMap {
    columns: HashMap<ImportField, String>,
}

impl ColumnMap {
    /// Rejects the whole file when a header is unknown, two headers map to the
    /// same field, or a required column is absent. `solution` may be omitted
    /// when `correct_answer` is present; `q_type` may be omitted entirely.
    pub fn resolve(headers: &[String]) -> AppResult<Self> {
        let mut columns = HashMap::new();
        let mut unknown = Vec::new();

        for header in headers.iter().filter(|h| !h.trim().is_empty()) {
            match ImportField::from_header(header) {
                Some(field) => {
                    if let Some(previous) = columns.insert(field, header.clone()) {
                        return Err(AppError::ValidationError(format!(
                            "columns '{}' and '{}' both map to '{}'",
                            previous,
                            header,
                            field.name()
                        )));
                    }
                }
                None => unknown.push(header.clone()),
            }
        }

        if !unknown.is_empty() {
            return Err(AppError::ValidationError(format!(
                "unknown columns: {}",
                unknown.join(", ")
            )));
        }

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .filter(|field| !columns.contains_key(field))
            .map(|field| field.name())
            .collect();

        if !missing.is_empty() {
            return Err(AppError::ValidationError(format!(
                "missing required columns: {}",
                missing.join(", ")
            )));
        }

        Ok(Self { columns })
    }

    pub fn header_for(&self, field: ImportField) -> Option<&str> {
        self.columns.get(&field).map(String::as_str)
    }

    fn value<'r>(&self, row: &'r ImportRow, field: ImportField) -> Option<&'r str> {
        self.header_for(field)
            .and_then(|header| row.cell(header))
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }
}

/// Pure mapping from raw rows to accept/reject/insert/update decisions.
pub struct ImportReconciler {
    columns: ColumnMap,
}

impl ImportReconciler {
    pub fn new(columns: ColumnMap) -> Self {
        Self { columns }
    }

    /// Parses and validates one row. Checks run in a fixed order so the
    /// reported reason is stable: identity, question text, remaining text
    /// fields, then `q_type`.
    pub fn parse_row(&self, row: &ImportRow) -> Result<QuestionDraft, ImportRowError> {
        let ques_number = self.parse_ques_number(row)?;

        let required = |field: ImportField| {
            self.columns
                .value(row, field)
                .map(str::to_string)
                .ok_or(ImportRowError::MissingField(field.name()))
        };

        let question = required(ImportField::Question)?;
        let options = required(ImportField::Options)?;
        let correct_answer = required(ImportField::CorrectAnswer)?;
        let solution = match self.columns.header_for(ImportField::Solution) {
            Some(_) => required(ImportField::Solution)?,
            None => correct_answer.clone(),
        };
        let topic = required(ImportField::Topic)?;
        let difficulty = required(ImportField::Difficulty)?;
        let source = required(ImportField::Source)?;

        let q_type = match self.columns.header_for(ImportField::QType) {
            Some(_) => {
                let raw = self
                    .columns
                    .value(row, ImportField::QType)
                    .ok_or(ImportRowError::MissingField(ImportField::QType.name()))?;
                let value = parse_integer(ImportField::QType, raw)?;
                i16::try_from(value).map_err(|_| ImportRowError::OutOfRange {
                    field: ImportField::QType.name(),
                    value: raw.to_string(),
                })?
            }
            None => 0,
        };

        let optional = |field: ImportField| self.columns.value(row, field).map(str::to_string);

        Ok(QuestionDraft {
            ques_number,
            question,
            options,
            solution,
            correct_answer,
            topic,
            difficulty,
            source,
            q_type,
            image: optional(ImportField::Image),
            solution_image: optional(ImportField::SolutionImage),
        })
    }

    fn parse_ques_number(&self, row: &ImportRow) -> Result<i64, ImportRowError> {
        let raw = self
            .columns
            .value(row, ImportField::QuesNumber)
            .ok_or(ImportRowError::MissingField(ImportField::QuesNumber.name()))?;
        parse_integer(ImportField::QuesNumber, raw)
    }

    /// Every `ques_number` that parses, in row order, for the existing-record
    /// lookup that precedes [`ImportReconciler::reconcile`].
    pub fn candidate_numbers(&self, rows: &[ImportRow]) -> Vec<i64> {
        let mut numbers: Vec<i64> = rows
            .iter()
            .filter_map(|row| self.parse_ques_number(row).ok())
            .collect();
        numbers.sort_unstable();
        numbers.dedup();
        numbers
    }

    /// Returns exactly one outcome per input row, in input order. Rows are
    /// validated independently; among valid rows sharing a `ques_number` the
    /// last one wins and earlier ones are reported as superseded.
    pub fn reconcile(
        &self,
        rows: &[ImportRow],
        existing: &HashMap<i64, Question>,
    ) -> Vec<ImportOutcome> {
        let parsed: Vec<Result<QuestionDraft, ImportRowError>> =
            rows.iter().map(|row| self.parse_row(row)).collect();

        let mut winners: HashMap<i64, usize> = HashMap::new();
        for (index, draft) in parsed.iter().enumerate() {
            if let Ok(draft) = draft {
                winners.insert(draft.ques_number, index);
            }
        }

        rows.iter()
            .zip(parsed)
            .enumerate()
            .map(|(index, (row, result))| match result {
                Err(error) => ImportOutcome::Rejected {
                    row_number: row.row_number,
                    ques_number: self.parse_ques_number(row).ok(),
                    error,
                },
                Ok(draft) => {
                    let winner = winners[&draft.ques_number];
                    if winner != index {
                        ImportOutcome::Superseded {
                            row_number: row.row_number,
                            ques_number: draft.ques_number,
                            superseded_by: rows[winner].row_number,
                        }
                    } else {
                        let action = if existing.contains_key(&draft.ques_number) {
                            ImportAction::Update
                        } else {
                            ImportAction::Insert
                        };
                        ImportOutcome::Accepted {
                            row_number: row.row_number,
                            action,
                            question: draft,
                        }
                    }
                }
            })
            .collect()
    }
}

// Spreadsheet tools often render whole numbers as "12.0".
fn parse_integer(field: ImportField, raw: &str) -> Result<i64, ImportRowError> {
    if let Ok(value) = raw.parse::<i64>() {
        return Ok(value);
    }

    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 => {
            if value.abs() < i64::MAX as f64 {
                Ok(value as i64)
            } else {
                Err(ImportRowError::OutOfRange {
                    field: field.name(),
                    value: raw.to_string(),
                })
            }
        }
        _ => Err(ImportRowError::InvalidInteger {
            field: field.name(),
            value: raw.to_string(),
        }),
    }
}

use std::{collections::BTreeMap, io::Cursor, path::Path};

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};

use crate::{
    errors::{AppError, AppResult},
    models::domain::{ImportRow, ParsedSheet},
};

const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// An uploaded file, fully buffered.
#[derive(Clone, Debug)]
pub struct SpreadsheetUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl SpreadsheetUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
    }
}

/// Turns the first sheet of a workbook (or a CSV file) into header-keyed
/// rows. CPU bound; callers on the async runtime should run it on the
/// blocking pool.
pub fn parse_spreadsheet(upload: &SpreadsheetUpload) -> AppResult<ParsedSheet> {
    if upload.bytes.is_empty() {
        return Err(AppError::ValidationError("Uploaded file is empty".to_string()));
    }

    match upload.extension().as_deref() {
        Some("csv") => parse_csv(&upload.bytes),
        Some(ext) if WORKBOOK_EXTENSIONS.contains(&ext) => parse_workbook(&upload.bytes),
        _ => Err(AppError::ValidationError(format!(
            "Unsupported file type '{}'; expected .csv, .xlsx, .xls or .ods",
            upload.file_name
        ))),
    }
}

fn parse_workbook(bytes: &[u8]) -> AppResult<ParsedSheet> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| AppError::ValidationError(format!("Could not read workbook: {}", e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::ValidationError("Workbook contains no sheets".to_string()))?
        .map_err(|e| AppError::ValidationError(format!("Could not read first sheet: {}", e)))?;

    Ok(sheet_from_range(&range))
}

fn sheet_from_range(range: &Range<Data>) -> ParsedSheet {
    // calamine ranges start at the first used cell, not necessarily A1
    let first_row = range.start().map(|(row, _)| row as usize + 1).unwrap_or(1);

    let mut rows = range.rows().enumerate().map(|(index, cells)| {
        let values: Vec<String> = cells.iter().map(data_to_string).collect();
        (first_row + index, values)
    });

    let headers = loop {
        match rows.next() {
            Some((_, values)) if is_blank(&values) => continue,
            Some((_, values)) => break values,
            None => return ParsedSheet::default(),
        }
    };

    let rows = rows
        .filter(|(_, values)| !is_blank(values))
        .map(|(row_number, values)| to_import_row(&headers, row_number, values))
        .collect();

    ParsedSheet {
        headers: trim_all(headers),
        rows,
    }
}

fn parse_csv(bytes: &[u8]) -> AppResult<ParsedSheet> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    // Byte records so that one badly encoded cell stays a row-level problem.
    let headers: Vec<String> = reader
        .byte_headers()
        .map_err(|e| AppError::ValidationError(format!("Could not read CSV header: {}", e)))?
        .iter()
        .map(decode_field)
        .collect();

    let mut rows = Vec::new();
    for (index, record) in reader.byte_records().enumerate() {
        let record = record
            .map_err(|e| AppError::ValidationError(format!("Malformed CSV: {}", e)))?;
        let values: Vec<String> = record.iter().map(decode_field).collect();
        if is_blank(&values) {
            continue;
        }
        // header is row 1
        let row_number = record
            .position()
            .map(|pos| pos.line() as usize)
            .unwrap_or(index + 2);
        rows.push(to_import_row(&headers, row_number, values));
    }

    Ok(ParsedSheet {
        headers: trim_all(headers),
        rows,
    })
}

// Excel on Windows saves CSV as Windows-1252 unless told otherwise.
fn decode_field(raw: &[u8]) -> String {
    match std::str::from_utf8(raw) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (decoded, _) = encoding_rs::WINDOWS_1252.decode_without_bom_handling(raw);
            decoded.into_owned()
        }
    }
}

fn to_import_row(headers: &[String], row_number: usize, values: Vec<String>) -> ImportRow {
    let cells: BTreeMap<String, String> = headers
        .iter()
        .map(|h| h.trim().to_string())
        .zip(values.into_iter().chain(std::iter::repeat(String::new())))
        .filter(|(header, _)| !header.is_empty())
        .collect();
    ImportRow::new(row_number, cells)
}

fn trim_all(values: Vec<String>) -> Vec<String> {
    values.into_iter().map(|v| v.trim().to_string()).collect()
}

fn is_blank(values: &[String]) -> bool {
    values.iter().all(|v| v.trim().is_empty())
}

fn data_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                format!("{:.0}", f)
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#ERR:{:?}", e),
    }
}

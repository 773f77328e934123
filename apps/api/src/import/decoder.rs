//! Line-oriented CSV tokenizer for spreadsheet exports.
//!
//! Lines are split first, then each line is scanned for quote-aware commas.
//! Quoted fields therefore cannot span lines.

use thiserror::Error;

/// One decoded CSV line.
pub type RawRow = Vec<String>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("The CSV file is empty")]
    EmptyFile,

    #[error("The CSV file has a header row but no data rows")]
    NoDataRows,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedCsv {
    pub header: RawRow,
    pub rows: Vec<RawRow>,
}

/// Decodes raw CSV text into a header row and data rows. Blank lines are dropped.
pub fn decode(text: &str) -> Result<DecodedCsv, DecodeError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut lines = text
        .split(|c: char| c == '\n' || c == '\r')
        .filter(|line| !line.trim().is_empty());

    let header = lines.next().map(parse_line).ok_or(DecodeError::EmptyFile)?;
    let rows: Vec<RawRow> = lines.map(parse_line).collect();
    if rows.is_empty() {
        return Err(DecodeError::NoDataRows);
    }

    Ok(DecodedCsv { header, rows })
}

/// Splits one line on commas that are not inside double quotes.
pub fn parse_line(line: &str) -> RawRow {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                // "" inside quotes is a literal quote
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(clean_field(&current));
                current.clear();
            }
            _ => current.push(c),
        }
    }

    fields.push(clean_field(&current));
    fields
}

fn clean_field(raw: &str) -> String {
    raw.trim().trim_matches('"').trim().to_string()
}

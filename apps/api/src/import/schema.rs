use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// One positional column of the import contract.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    /// 1-indexed.
    pub position: usize,
    pub canonical_name: &'static str,
    /// Lowercase header texts accepted for this column.
    pub aliases: &'static [&'static str],
}

pub const IMPORT_COLUMNS: [ColumnSpec; 8] = [
    ColumnSpec {
        position: 1,
        canonical_name: "Company Name",
        aliases: &["company name", "company", "company_name", "employer", "organization"],
    },
    ColumnSpec {
        position: 2,
        canonical_name: "Position",
        aliases: &["position", "role", "job title", "title", "position name", "job_title"],
    },
    ColumnSpec {
        position: 3,
        canonical_name: "Position Type",
        aliases: &[
            "position type",
            "job type",
            "type",
            "employment type",
            "position_type",
            "job_type",
        ],
    },
    ColumnSpec {
        position: 4,
        canonical_name: "State",
        aliases: &["state", "province", "region", "state/province"],
    },
    ColumnSpec {
        position: 5,
        canonical_name: "City",
        aliases: &["city", "town"],
    },
    ColumnSpec {
        position: 6,
        canonical_name: "Date Applied",
        aliases: &[
            "date applied",
            "applied date",
            "application date",
            "date",
            "applied on",
            "date_applied",
        ],
    },
    ColumnSpec {
        position: 7,
        canonical_name: "Work Mode",
        aliases: &[
            "work mode",
            "work_mode",
            "mode",
            "work type",
            "workplace type",
            "remote/onsite",
        ],
    },
    ColumnSpec {
        position: 8,
        canonical_name: "Application Status",
        aliases: &[
            "application status",
            "status",
            "stage",
            "current status",
            "application_status",
        ],
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMismatch {
    pub position: usize,
    pub expected: String,
    pub found: String,
}

impl fmt::Display for ColumnMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Column {}: expected \"{}\", found \"{}\"",
            self.position, self.expected, self.found
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("The CSV header has {found} columns; at least {required} are required")]
    TooFewColumns { found: usize, required: usize },

    #[error("The CSV header does not match the expected format ({} column(s) wrong)", .0.len())]
    Mismatch(Vec<ColumnMismatch>),
}

impl SchemaError {
    /// Human-readable lines, one per problem.
    pub fn details(&self) -> Vec<String> {
        match self {
            SchemaError::TooFewColumns { .. } => {
                let expected: Vec<_> = IMPORT_COLUMNS.iter().map(|c| c.canonical_name).collect();
                vec![format!("Expected columns: {}", expected.join(", "))]
            }
            SchemaError::Mismatch(mismatches) => {
                mismatches.iter().map(ToString::to_string).collect()
            }
        }
    }
}

/// Checks the header against every column spec and reports all mismatches at once.
pub fn validate_header(header: &[String], specs: &[ColumnSpec]) -> Result<(), SchemaError> {
    if header.len() < specs.len() {
        return Err(SchemaError::TooFewColumns {
            found: header.len(),
            required: specs.len(),
        });
    }

    let mismatches: Vec<ColumnMismatch> = specs
        .iter()
        .filter_map(|spec| {
            // position is 1-indexed, so 0 wraps and reads as missing
            let actual = header
                .get(spec.position.wrapping_sub(1))
                .map_or("", |cell| cell.trim());
            let key = actual.to_lowercase();
            if spec.aliases.contains(&key.as_str()) {
                return None;
            }
            Some(ColumnMismatch {
                position: spec.position,
                expected: spec.canonical_name.to_string(),
                found: if actual.is_empty() {
                    "(empty)".to_string()
                } else {
                    actual.to_string()
                },
            })
        })
        .collect();

    if mismatches.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::Mismatch(mismatches))
    }
}

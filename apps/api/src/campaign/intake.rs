use serde::Deserialize;

use crate::errors::AppError;

/// Fewer fields than this and the record cannot name a country.
pub const MIN_FIELDS: usize = 6;
pub const MAX_FIELDS: usize = 12;

/// Body of `POST /process`: the intake form row, positionally ordered.
#[derive(Debug, Deserialize)]
pub struct ProcessRequest {
    #[serde(default)]
    pub row: Vec<String>,
}

/// Campaign intake form row mapped to named fields.
///
/// Positions 6..=10 are reserved and carried opaquely; nothing reads them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntakeRecord {
    pub timestamp: String,
    pub business: String,
    pub industry: String,
    pub goal: String,
    pub kol_type: String,
    pub country: String,
    pub reserved: Vec<String>,
    pub email: Option<String>,
}

impl IntakeRecord {
    /// Maps a raw form row onto named fields.
    ///
    /// Rejects rows with fewer than `MIN_FIELDS` values. Trailing fields may be
    /// absent; values past `MAX_FIELDS` are ignored.
    pub fn from_row(row: &[String]) -> Result<Self, AppError> {
        if row.len() < MIN_FIELDS {
            return Err(AppError::Validation(format!(
                "row must have at least {MIN_FIELDS} fields, got {}",
                row.len()
            )));
        }

        let field = |i: usize| row.get(i).cloned().unwrap_or_default();
        let row = &row[..row.len().min(MAX_FIELDS)];

        Ok(Self {
            timestamp: field(0),
            business: field(1),
            industry: field(2),
            goal: field(3),
            kol_type: field(4),
            country: field(5),
            reserved: row.iter().skip(MIN_FIELDS).take(5).cloned().collect(),
            email: row.get(MAX_FIELDS - 1).cloned().filter(|e| !e.trim().is_empty()),
        })
    }

    /// Labelled fields shown in the report, in display order.
    pub fn summary_fields(&self) -> [(&'static str, &str); 5] {
        [
            ("Business", self.business.as_str()),
            ("Industry", self.industry.as_str()),
            ("Goal", self.goal.as_str()),
            ("KOL Type", self.kol_type.as_str()),
            ("Country", self.country.as_str()),
        ]
    }
}

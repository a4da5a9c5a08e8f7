//! Dataset normalization: raw spreadsheet rows to typed `InfluencerRow`s.
//!
//! Every cell arrives as a string. Numeric columns go through the named
//! conversion functions below, which never fail: malformed input becomes 0.
//! That is a data-cleaning policy for a hand-maintained sheet, not error
//! handling, so it stays here and out of the request path.

use crate::errors::AppError;
use crate::influencers::models::{InfluencerRow, Tier};

pub const COL_USERNAME: &str = "username";
pub const COL_FOLLOWERS: &str = "raw_followers";
pub const COL_LIKES: &str = "avgLikes";
pub const COL_COMMENTS: &str = "avgComments";
pub const COL_ENGAGEMENT: &str = "engagement";
pub const COL_LOCATION: &str = "location";

/// Characters stripped from location cells, which are often stored as `["Vietnam"]`.
const LOCATION_NOISE: &[char] = &['[', ']', '"', '\''];

/// Parses a count column. Non-numeric, empty or negative input → 0.
pub fn parse_count(raw: &str) -> u64 {
    let trimmed = raw.trim();
    if let Ok(n) = trimmed.parse::<u64>() {
        return n;
    }
    // Sheets export whole numbers as "1200.0" when the column is formatted as decimal.
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() && f > 0.0 => f.trunc() as u64,
        _ => 0,
    }
}

/// Parses an engagement percentage. The first comma is treated as a decimal
/// separator ("3,5" → 3.5). Anything unparseable or non-finite → 0.0.
pub fn parse_engagement(raw: &str) -> f64 {
    let candidate = raw.trim().replacen(',', ".", 1);
    match candidate.parse::<f64>() {
        Ok(f) if f.is_finite() => f,
        _ => 0.0,
    }
}

/// Lowercases, trims and strips bracket/quote characters.
/// Applied to both sheet locations and the requested country.
pub fn normalize_location(raw: &str) -> String {
    raw.chars()
        .filter(|c| !LOCATION_NOISE.contains(c))
        .collect::<String>()
        .trim()
        .to_lowercase()
}

/// Resolved positions of the columns the pipeline reads.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    username: usize,
    followers: usize,
    likes: usize,
    comments: usize,
    engagement: usize,
    location: usize,
}

impl ColumnIndex {
    fn from_header(header: &[String]) -> Result<Self, AppError> {
        let find = |name: &str| {
            header
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| AppError::Schema(name.to_string()))
        };

        Ok(Self {
            username: find(COL_USERNAME)?,
            followers: find(COL_FOLLOWERS)?,
            likes: find(COL_LIKES)?,
            comments: find(COL_COMMENTS)?,
            engagement: find(COL_ENGAGEMENT)?,
            location: find(COL_LOCATION)?,
        })
    }
}

/// Converts header + data rows into the typed dataset.
///
/// Fails with `EmptyDataset` when there is no data row and with `Schema` when
/// a referenced column is missing from the header. Data rows shorter than the
/// header read their missing cells as empty strings.
pub fn normalize_rows(rows: &[Vec<String>]) -> Result<Vec<InfluencerRow>, AppError> {
    if rows.len() < 2 {
        return Err(AppError::EmptyDataset);
    }

    let columns = ColumnIndex::from_header(&rows[0])?;

    let dataset = rows[1..]
        .iter()
        .map(|row| {
            let cell = |idx: usize| row.get(idx).map(String::as_str).unwrap_or("");
            let raw_followers = parse_count(cell(columns.followers));
            InfluencerRow {
                username: cell(columns.username).trim().to_string(),
                raw_followers,
                avg_likes: parse_count(cell(columns.likes)),
                avg_comments: parse_count(cell(columns.comments)),
                engagement: parse_engagement(cell(columns.engagement)),
                location: normalize_location(cell(columns.location)),
                tier: Tier::from_followers(raw_followers),
            }
        })
        .collect();

    Ok(dataset)
}

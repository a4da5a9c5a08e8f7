//! Candidate selection: country/tier filters with a fallback to the most
//! followed profiles when nothing matches.

use crate::influencers::models::InfluencerRow;
use crate::influencers::normalize::normalize_location;

/// Tier token meaning "no preference".
pub const TIER_ANY: &str = "n/a";

/// Per-request filter built from the intake record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateFilter {
    /// Normalized country; empty means no country filter.
    pub country: String,
    /// Lowercased first word of the requested KOL type; empty or `n/a` means no tier filter.
    pub tier: String,
}

impl CandidateFilter {
    pub fn new(country: &str, kol_type: &str) -> Self {
        Self {
            country: normalize_location(country),
            tier: tier_token(kol_type),
        }
    }

    fn wants_country(&self) -> bool {
        !self.country.is_empty()
    }

    fn wants_tier(&self) -> bool {
        !self.tier.is_empty() && self.tier != TIER_ANY
    }

    pub fn matches(&self, row: &InfluencerRow) -> bool {
        (!self.wants_country() || row.location == self.country)
            && (!self.wants_tier() || row.tier.as_str() == self.tier)
    }

    /// Returns the rows passing both filters, in original order.
    pub fn apply(&self, rows: &[InfluencerRow]) -> Vec<InfluencerRow> {
        rows.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}

/// "Micro influencer" → "micro".
pub fn tier_token(kol_type: &str) -> String {
    kol_type
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_lowercase()
}

/// Result of candidate selection. Both variants own a copy of the rows; the
/// base dataset is never mutated.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// Non-empty working set that passed the filters.
    Filtered(Vec<InfluencerRow>),
    /// Filters matched nothing; the whole dataset, to be ranked by followers.
    Fallback(Vec<InfluencerRow>),
}

/// Applies the filter; an empty intersection falls back to the full dataset.
pub fn select_candidates(dataset: &[InfluencerRow], filter: &CandidateFilter) -> Selection {
    let working = filter.apply(dataset);
    if working.is_empty() {
        tracing::info!(
            country = %filter.country,
            tier = %filter.tier,
            "No influencer matched filters, falling back to most followed"
        );
        Selection::Fallback(dataset.to_vec())
    } else {
        Selection::Filtered(working)
    }
}

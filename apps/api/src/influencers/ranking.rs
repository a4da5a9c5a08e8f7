use crate::influencers::models::{InfluencerRow, RankedInfluencer, RankedResult, SelectionPath};
use crate::influencers::selector::Selection;

/// Number of influencers a report recommends.
pub const TOP_N: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub followers: f64,
    pub engagement: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            followers: 0.6,
            engagement: 0.4,
        }
    }
}

/// Composite score: followers*0.6 + engagement*0.4 with default weights.
pub fn compute_score(row: &InfluencerRow, weights: &ScoringWeights) -> f64 {
    row.raw_followers as f64 * weights.followers + row.engagement * weights.engagement
}

/// Ranks a selection and keeps the top `TOP_N`.
///
/// Filtered rows are ordered by composite score, fallback rows by raw
/// follower count with no score attached. Both sorts are stable, so ties keep
/// sheet order.
pub fn rank(selection: Selection, weights: &ScoringWeights) -> RankedResult {
    match selection {
        Selection::Filtered(rows) => {
            let mut scored: Vec<RankedInfluencer> = rows
                .into_iter()
                .map(|influencer| {
                    let score = compute_score(&influencer, weights);
                    RankedInfluencer {
                        influencer,
                        score: Some(score),
                    }
                })
                .collect();
            scored.sort_by(|a, b| {
                let (a, b) = (a.score.unwrap_or(0.0), b.score.unwrap_or(0.0));
                b.total_cmp(&a)
            });
            scored.truncate(TOP_N);
            RankedResult {
                path: SelectionPath::Filtered,
                entries: scored,
            }
        }
        Selection::Fallback(mut rows) => {
            rows.sort_by(|a, b| b.raw_followers.cmp(&a.raw_followers));
            rows.truncate(TOP_N);
            RankedResult {
                path: SelectionPath::Fallback,
                entries: rows
                    .into_iter()
                    .map(|influencer| RankedInfluencer {
                        influencer,
                        score: None,
                    })
                    .collect(),
            }
        }
    }
}

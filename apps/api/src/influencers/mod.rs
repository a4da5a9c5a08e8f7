// Influencer selection core: normalize sheet rows, filter, rank.
// Pure functions only; all I/O lives in campaign::pipeline.

pub mod models;
pub mod normalize;
pub mod ranking;
pub mod selector;

pub use models::RankedResult;
pub use normalize::normalize_rows;
pub use ranking::{rank, ScoringWeights};
pub use selector::{select_candidates, CandidateFilter};

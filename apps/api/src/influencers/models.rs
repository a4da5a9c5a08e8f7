use serde::Serialize;

/// Audience-size bucket derived from follower count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Nano,
    Micro,
    Macro,
    Mega,
}

impl Tier {
    /// Buckets a follower count: <10k Nano, <100k Micro, <500k Macro, else Mega.
    pub fn from_followers(followers: u64) -> Self {
        match followers {
            0..=9_999 => Tier::Nano,
            10_000..=99_999 => Tier::Micro,
            100_000..=499_999 => Tier::Macro,
            _ => Tier::Mega,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Nano => "nano",
            Tier::Micro => "micro",
            Tier::Macro => "macro",
            Tier::Mega => "mega",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Nano => "Nano",
            Tier::Micro => "Micro",
            Tier::Macro => "Macro",
            Tier::Mega => "Mega",
        }
    }
}

/// One normalized influencer profile from the source spreadsheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfluencerRow {
    pub username: String,
    pub raw_followers: u64,
    pub avg_likes: u64,
    pub avg_comments: u64,
    /// Engagement rate in percent.
    pub engagement: f64,
    /// Lowercased, trimmed, bracket/quote stripped.
    pub location: String,
    pub tier: Tier,
}

/// A ranked influencer. `score` is only set on the filtered path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedInfluencer {
    #[serde(flatten)]
    pub influencer: InfluencerRow,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPath {
    /// Country/tier filters matched at least one row.
    Filtered,
    /// Filters matched nothing; most-followed rows of the whole dataset.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    pub path: SelectionPath,
    pub entries: Vec<RankedInfluencer>,
}

impl RankedResult {
    pub fn usernames(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|e| e.influencer.username.as_str())
            .collect()
    }
}

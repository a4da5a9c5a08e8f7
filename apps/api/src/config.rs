use anyhow::{Context, Result};

use crate::sheets_client::DEFAULT_API_BASE;

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub spreadsheet_id: String,
    pub sheet_range: String,
    pub sheets_api_base: String,
    pub google_access_token: String,
    /// Destination folder (key prefix) for published reports.
    pub report_folder: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub s3_region: String,
    pub public_base_url: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub http_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| {
            lookup(key)
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let s3_endpoint = require("S3_ENDPOINT")?;

        Ok(Config {
            spreadsheet_id: require("SPREADSHEET_ID")?,
            sheet_range: or_default("SHEET_RANGE", "Sheet1!A:Z"),
            sheets_api_base: or_default("SHEETS_API_BASE", DEFAULT_API_BASE),
            google_access_token: require("GOOGLE_ACCESS_TOKEN")?,
            report_folder: or_default("REPORT_FOLDER", "kol-reports"),
            s3_bucket: require("S3_BUCKET")?,
            public_base_url: or_default("PUBLIC_BASE_URL", &s3_endpoint),
            s3_endpoint,
            s3_region: or_default("S3_REGION", "us-east-1"),
            aws_access_key_id: require("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require("AWS_SECRET_ACCESS_KEY")?,
            http_timeout_secs: or_default("HTTP_TIMEOUT_SECS", "30")
                .parse::<u64>()
                .context("HTTP_TIMEOUT_SECS must be a whole number of seconds")?,
            port: or_default("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: or_default("RUST_LOG", "info"),
        })
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        spreadsheet_id: "sheet-123".to_string(),
        sheet_range: "Sheet1!A:Z".to_string(),
        sheets_api_base: DEFAULT_API_BASE.to_string(),
        google_access_token: "token".to_string(),
        report_folder: "kol-reports".to_string(),
        s3_bucket: "reports".to_string(),
        s3_endpoint: "http://localhost:9000".to_string(),
        s3_region: "us-east-1".to_string(),
        public_base_url: "http://localhost:9000".to_string(),
        aws_access_key_id: "minio".to_string(),
        aws_secret_access_key: "minio123".to_string(),
        http_timeout_secs: 30,
        port: 8080,
        rust_log: "info".to_string(),
    }
}

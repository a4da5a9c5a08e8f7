// Report rendering: grouped bar chart (plotters) embedded in a one-page PDF (printpdf).
// Both are CPU-bound; callers run them inside tokio::task::spawn_blocking.

pub mod chart;
pub mod composer;

use thiserror::Error;

pub use chart::{chart_groups, render_bar_chart};
pub use composer::{compose_report, ReportText};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("chart rendering failed: {0}")]
    Chart(String),

    #[error("PDF rendering failed: {0}")]
    Pdf(String),

    #[error("could not write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("render task aborted: {0}")]
    Task(String),
}

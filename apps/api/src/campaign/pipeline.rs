//! Report pipeline: sheet → normalize → select → rank → render → publish.
//!
//! Every run works in its own temporary directory, removed when the run ends,
//! so concurrent requests never write to the same path.

use chrono::Utc;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::campaign::intake::IntakeRecord;
use crate::errors::AppError;
use crate::influencers::{
    normalize_rows, rank, select_candidates, CandidateFilter, RankedResult, ScoringWeights,
};
use crate::report::chart::{CHART_HEIGHT_PX, CHART_WIDTH_PX};
use crate::report::{chart_groups, compose_report, render_bar_chart, ReportError, ReportText};
use crate::state::AppState;
use crate::storage::publish_report;

/// Normalizes the raw sheet and picks the top influencers for the intake record.
pub fn select_top_influencers(
    rows: &[Vec<String>],
    intake: &IntakeRecord,
) -> Result<RankedResult, AppError> {
    let dataset = normalize_rows(rows)?;
    let filter = CandidateFilter::new(&intake.country, &intake.kol_type);
    let selection = select_candidates(&dataset, &filter);
    Ok(rank(selection, &ScoringWeights::default()))
}

/// Runs the whole pipeline for one intake record and returns the public report link.
pub async fn run_report_pipeline(state: &AppState, intake: IntakeRecord) -> Result<String, AppError> {
    let request_id = Uuid::new_v4();
    let span = info_span!("report", %request_id);

    async move {
        let config = &state.config;

        let rows = state
            .sheets
            .read_rows(&config.spreadsheet_id, &config.sheet_range)
            .await?;
        info!("Fetched {} sheet rows", rows.len());

        let ranked = select_top_influencers(&rows, &intake)?;
        info!(
            path = ?ranked.path,
            selected = ?ranked.usernames(),
            "Ranked influencers"
        );

        let workdir = tempfile::Builder::new()
            .prefix("kol-report-")
            .tempdir()
            .map_err(ReportError::Io)?;
        let report_path = workdir.path().join(format!("kol-report-{request_id}.pdf"));

        let render_path = report_path.clone();
        tokio::task::spawn_blocking(move || -> Result<(), ReportError> {
            let text = ReportText::build(&intake, &ranked, Utc::now().date_naive());
            let chart = render_bar_chart(&chart_groups(&ranked), CHART_WIDTH_PX, CHART_HEIGHT_PX)?;
            compose_report(&text, chart, &render_path)
        })
        .await
        .map_err(|e| ReportError::Task(e.to_string()))??;

        let link = publish_report(state.store.as_ref(), &report_path, &config.report_folder).await?;
        Ok::<_, AppError>(link)
    }
    .instrument(span)
    .await
}

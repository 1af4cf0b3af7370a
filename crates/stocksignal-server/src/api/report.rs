use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stocksignal_core::{Recommendation, ReportFilter, ReportRow};

use crate::middleware::RequestId;
use crate::state::AppState;

use super::{ApiError, ApiResponse};

#[derive(Debug, Serialize)]
pub(super) struct ReportView {
    /// `false` until a report has been produced or loaded.
    pub available: bool,
    pub last_update: Option<DateTime<Utc>>,
    pub total_rows: usize,
    pub rows: Vec<ReportRow>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct ReportQuery {
    pub recommendation: Option<String>,
    pub ticker: Option<String>,
    pub priced: Option<bool>,
}

impl ReportQuery {
    fn into_filter(self) -> Result<ReportFilter, String> {
        let recommendation = self
            .recommendation
            .filter(|r| !r.trim().is_empty())
            .map(|r| r.parse::<Recommendation>().map_err(|e| e.to_string()))
            .transpose()?;
        Ok(ReportFilter {
            recommendation,
            ticker_prefix: self.ticker.filter(|t| !t.trim().is_empty()),
            priced_only: self.priced.unwrap_or(false),
        })
    }
}

/// Current snapshot, narrowed by the query filters. Never triggers a run.
pub(super) async fn get_report(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ApiResponse<ReportView>>, ApiError> {
    let filter = query
        .into_filter()
        .map_err(|message| ApiError::new(req_id.0.clone(), "validation_error", message))?;

    let dashboard = state.dashboard.read().await;
    let view = match &dashboard.report {
        Some(report) => ReportView {
            available: true,
            last_update: dashboard.last_update,
            total_rows: report.len(),
            rows: report.filtered(&filter),
        },
        None => ReportView {
            available: false,
            last_update: None,
            total_rows: 0,
            rows: Vec::new(),
        },
    };

    Ok(ApiResponse::new(view, req_id.0))
}

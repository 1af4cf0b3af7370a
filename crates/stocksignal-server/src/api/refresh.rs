use axum::{body::Bytes, extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stocksignal_core::ReportRow;
use stocksignal_mailer::{send_report, DeliveryOutcome};
use stocksignal_sentiment::PipelineSummary;

use crate::middleware::RequestId;
use crate::state::{AppState, RefreshError};

use super::{email::mail_disabled_outcome, ApiError, ApiResponse};

#[derive(Debug, Default, Deserialize)]
pub(super) struct RefreshRequest {
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct RefreshData {
    pub last_update: DateTime<Utc>,
    pub summary: PipelineSummary,
    pub rows: Vec<ReportRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<DeliveryOutcome>,
}

fn map_refresh_error(request_id: String, error: &RefreshError) -> ApiError {
    tracing::error!(error = %error, "report refresh failed");
    let code = match error {
        RefreshError::Timeout(_) => "timeout",
        RefreshError::Pipeline(_) => "upstream_error",
        RefreshError::Store(_) => "internal_error",
    };
    ApiError::new(request_id, code, error.to_string())
}

/// Run the pipeline now. An optional JSON body `{ "email": "…" }` also
/// sends the fresh report to that address.
pub(super) async fn refresh_report(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Bytes,
) -> Result<Json<ApiResponse<RefreshData>>, ApiError> {
    let request: RefreshRequest = if body.iter().all(u8::is_ascii_whitespace) {
        RefreshRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            ApiError::new(req_id.0.clone(), "bad_request", format!("invalid JSON body: {e}"))
        })?
    };

    let outcome = state
        .refresh()
        .await
        .map_err(|e| map_refresh_error(req_id.0.clone(), &e))?;

    let email = match request.email.filter(|e| !e.trim().is_empty()) {
        Some(recipient) => Some(match &state.mailer {
            Some(mailer) => send_report(mailer.as_ref(), &outcome.report, &recipient).await,
            None => mail_disabled_outcome(),
        }),
        None => None,
    };

    Ok(ApiResponse::new(
        RefreshData {
            last_update: outcome.last_update,
            summary: outcome.summary,
            rows: outcome.report.into_rows(),
            email,
        },
        req_id.0,
    ))
}

use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use stocksignal_mailer::{send_report, validate_recipient, DeliveryOutcome};

use crate::middleware::RequestId;
use crate::state::AppState;

use super::{ApiError, ApiResponse};

const MAIL_DISABLED: &str = "email delivery is not configured";

#[derive(Debug, Deserialize)]
pub(super) struct EmailRequest {
    pub recipient: String,
}

pub(super) fn mail_disabled_outcome() -> DeliveryOutcome {
    DeliveryOutcome {
        delivered: false,
        message: MAIL_DISABLED.to_string(),
    }
}

/// Email the current snapshot to `recipient`.
pub(super) async fn email_report(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(request): Json<EmailRequest>,
) -> Result<Json<ApiResponse<DeliveryOutcome>>, ApiError> {
    validate_recipient(&request.recipient)
        .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.to_string()))?;

    let Some(mailer) = state.mailer.clone() else {
        return Err(ApiError::new(req_id.0, "service_unavailable", MAIL_DISABLED));
    };

    let Some(report) = state.dashboard.read().await.report.clone() else {
        return Err(ApiError::new(req_id.0, "not_found", "no report available yet"));
    };

    let outcome = send_report(mailer.as_ref(), &report, &request.recipient).await;
    if !outcome.delivered {
        return Err(ApiError::new(req_id.0, "upstream_error", outcome.message));
    }
    Ok(ApiResponse::new(outcome, req_id.0))
}

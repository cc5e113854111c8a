//! Axum route handler for the Resume API.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::provider::ResumeOutcome;
use crate::state::AppState;

/// GET /api/resume
///
/// Always 200 with one resume: generated when possible, otherwise drawn from
/// the fallback pool. Failures are visible only in logs and `/health` stats.
pub async fn handle_get_resume(State(state): State<AppState>) -> Response {
    let request_id = Uuid::new_v4();

    async move {
        info!("Request received for resume");

        let outcome = state.provider.provide().await;
        state.stats.record(&outcome);

        match outcome {
            ResumeOutcome::Generated(generated) => {
                info!(
                    source = "generated",
                    name = %generated.resume().name,
                    "Serving generated resume"
                );
                Json(generated).into_response()
            }
            ResumeOutcome::Fallback { resume, reason } => {
                info!(
                    source = "fallback",
                    reason = reason.label(),
                    name = %resume.name,
                    "Serving cached resume"
                );
                Json(resume).into_response()
            }
        }
    }
    .instrument(info_span!("resume_request", %request_id))
    .await
}

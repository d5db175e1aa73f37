use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::{CreditPullPipeline, PipelineError};
use crate::models::{CreditPullRequest, CreditPullResponse, ErrorResponse, HealthResponse};
use crate::services::SalesforceError;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<CreditPullPipeline>,
}

/// Configure all credit-pull routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/credit/pull", web::post().to(pull_credit));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Credit pull endpoint
///
/// POST /api/v1/credit/pull
///
/// Request body:
/// ```json
/// {
///   "recordId": "string"
/// }
/// ```
///
/// Runs the full pull pipeline for one record and returns the classified
/// outcome. Bureau-side errors, no-hits and declines are 200 responses
/// with a diagnostic message; only stage failures map to error statuses.
async fn pull_credit(
    state: web::Data<AppState>,
    req: web::Json<CreditPullRequest>,
) -> impl Responder {
    // Validate request
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for credit pull request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let record_id = &req.record_id;

    tracing::info!("Credit pull requested for record {}", record_id);

    match state.pipeline.run(record_id).await {
        Ok(outcome) => HttpResponse::Ok().json(CreditPullResponse::from(outcome)),
        Err(e) => {
            tracing::error!("Credit pull failed for record {}: {}", record_id, e);
            let status_code = error_status(&e);
            let body = ErrorResponse {
                error: error_label(&e).to_string(),
                message: e.to_string(),
                status_code,
            };
            HttpResponse::build(
                actix_web::http::StatusCode::from_u16(status_code)
                    .unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR),
            )
            .json(body)
        }
    }
}

/// HTTP status for a stage failure.
fn error_status(e: &PipelineError) -> u16 {
    match e {
        PipelineError::Salesforce(SalesforceError::Auth { .. }) => 401,
        PipelineError::Salesforce(SalesforceError::Fetch { .. }) => 502,
        PipelineError::Salesforce(_) => 500,
        PipelineError::Bureau(_) => 502,
        PipelineError::Classify(_) => 502,
        PipelineError::Render(_) => 500,
    }
}

fn error_label(e: &PipelineError) -> &'static str {
    match e {
        PipelineError::Salesforce(SalesforceError::Auth { .. }) => "auth_failed",
        PipelineError::Salesforce(_) => "crm_error",
        PipelineError::Bureau(_) => "bureau_unreachable",
        PipelineError::Classify(_) => "bureau_response_unreadable",
        PipelineError::Render(_) => "report_render_failed",
    }
}

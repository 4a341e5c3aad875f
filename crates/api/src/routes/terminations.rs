//! Contract termination routes.
//!
//! Each write answers with the full request detail and, once the change has
//! committed, queues an SMS notice to the tenant.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::extract::{JsonBody, Path, Query};
use crate::{AppState, error::ApiError, middleware::Caller, sms};
use estatedesk_core::termination::{BankDetails, TerminationInput, TerminationStatus};
use estatedesk_db::TerminationRepository;
use estatedesk_db::repositories::{TerminationDetail, TerminationFilter};
use estatedesk_shared::AppError;
use estatedesk_shared::types::pagination::{PageRequest, PageResponse};

/// Creates the termination router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/terminations", get(list_terminations).post(create_termination))
        .route("/terminations/{id}", get(get_termination))
        .route(
            "/terminations/{id}/accountant-approve",
            post(accountant_approve),
        )
        .route("/terminations/{id}/owner-approve", post(owner_approve))
        .route("/terminations/{id}/complete", post(complete))
        .route("/terminations/{id}/reject", post(reject))
}

/// Query parameters for listing requests.
#[derive(Debug, Deserialize)]
pub struct ListTerminationsQuery {
    /// Status filter, e.g. `pending`.
    pub status: Option<String>,
    /// Contract filter.
    pub contract_id: Option<Uuid>,
    /// 1-based page number.
    pub page: Option<u64>,
    /// Items per page.
    pub per_page: Option<u64>,
}

/// Body for opening a request.
#[derive(Debug, Deserialize)]
pub struct CreateTerminationRequest {
    /// Contract to terminate.
    pub contract_id: Uuid,
    /// Why termination is requested.
    #[serde(default)]
    pub reason: String,
    /// Refund destination.
    pub bank_details: Option<BankDetails>,
}

/// Body for completing a request.
#[derive(Debug, Deserialize)]
pub struct CompleteTerminationRequest {
    /// Receipt of the refund payment.
    #[serde(default)]
    pub receipt_reference: String,
}

/// Body for rejecting a request.
#[derive(Debug, Deserialize)]
pub struct RejectTerminationRequest {
    /// Why the request is rejected.
    #[serde(default)]
    pub reason: String,
}

fn repository(state: &AppState) -> TerminationRepository {
    TerminationRepository::new((*state.db).clone())
}

/// Queues the tenant notice and wraps the detail for the response.
fn notify(state: &AppState, detail: TerminationDetail) -> Json<TerminationDetail> {
    sms::dispatch(state.notifier.clone(), &detail);
    Json(detail)
}

/// GET /terminations - Requests visible to the caller.
async fn list_terminations(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<ListTerminationsQuery>,
) -> Result<Json<PageResponse<TerminationDetail>>, ApiError> {
    let status = query
        .status
        .as_deref()
        .map(|s| {
            TerminationStatus::parse(s)
                .ok_or_else(|| AppError::Validation(format!("Unknown status: {s}")))
        })
        .transpose()?;

    let defaults = PageRequest::default();
    let page = PageRequest {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    };
    let filter = TerminationFilter {
        status,
        contract_id: query.contract_id,
    };

    let result = repository(&state)
        .list(&caller.context, filter, page)
        .await?;
    Ok(Json(result))
}

/// POST /terminations - Open a termination request.
async fn create_termination(
    State(state): State<AppState>,
    caller: Caller,
    JsonBody(payload): JsonBody<CreateTerminationRequest>,
) -> Result<(StatusCode, Json<TerminationDetail>), ApiError> {
    let input = TerminationInput {
        reason: payload.reason,
        bank_details: payload.bank_details,
    };

    let detail = repository(&state)
        .create_request(&caller.context, payload.contract_id, &input)
        .await?;
    Ok((StatusCode::CREATED, notify(&state, detail)))
}

/// GET /terminations/{id} - One request.
async fn get_termination(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<Json<TerminationDetail>, ApiError> {
    let detail = repository(&state).get(&caller.context, id).await?;
    Ok(Json(detail))
}

/// POST /terminations/{id}/accountant-approve
async fn accountant_approve(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<Json<TerminationDetail>, ApiError> {
    let detail = repository(&state)
        .accountant_approve(&caller.context, id)
        .await?;
    Ok(notify(&state, detail))
}

/// POST /terminations/{id}/owner-approve
async fn owner_approve(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> Result<Json<TerminationDetail>, ApiError> {
    let detail = repository(&state).owner_approve(&caller.context, id).await?;
    Ok(notify(&state, detail))
}

/// POST /terminations/{id}/complete
async fn complete(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
    JsonBody(payload): JsonBody<CompleteTerminationRequest>,
) -> Result<Json<TerminationDetail>, ApiError> {
    let detail = repository(&state)
        .complete(&caller.context, id, &payload.receipt_reference)
        .await?;
    Ok(notify(&state, detail))
}

/// POST /terminations/{id}/reject
async fn reject(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
    JsonBody(payload): JsonBody<RejectTerminationRequest>,
) -> Result<Json<TerminationDetail>, ApiError> {
    let detail = repository(&state)
        .reject(&caller.context, id, &payload.reason)
        .await?;
    Ok(notify(&state, detail))
}

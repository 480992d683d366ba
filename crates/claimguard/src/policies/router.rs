use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::repository::{PolicyRepository, RepositoryError};
use super::service::{PolicyService, PolicyServiceError};
use super::{OwnerId, PolicyId};
use crate::analysis::{AnalysisError, PolicyDocument, PolicyTypeClassifier, UserProfile};
use crate::claims::ClaimSimulationError;

const DEFAULT_FILENAME: &str = "document.txt";

/// Router builder exposing the policy analysis endpoints.
pub fn policy_router<R>(service: Arc<PolicyService<R>>) -> Router
where
    R: PolicyRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/policies",
            post(analyze_handler::<R>).get(recent_handler::<R>),
        )
        .route("/api/v1/policies/:policy_id", get(policy_handler::<R>))
        .route("/api/v1/claims/simulate", post(simulate_handler::<R>))
        .route("/api/v1/comparisons", post(compare_handler::<R>))
        .route("/api/v1/stats", get(stats_handler::<R>))
        .route("/api/v1/policy-types", get(policy_types_handler::<R>))
        .route("/api/v1/classify", post(classify_handler))
        .with_state(service)
}

/// Age as submitted by a form: a number or free text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AgeInput {
    Years(i64),
    Text(String),
}

impl AgeInput {
    fn resolve(self) -> Result<u32, AnalysisError> {
        match self {
            AgeInput::Years(years) => u32::try_from(years)
                .map_err(|_| AnalysisError::InvalidInput(format!("age {years} is negative"))),
            AgeInput::Text(raw) => UserProfile::parse_age(&raw),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub owner: OwnerId,
    pub text: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub age: Option<AgeInput>,
    #[serde(default)]
    pub pre_existing_condition: Option<String>,
    #[serde(default)]
    pub policy_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SimulateRequest {
    pub owner: OwnerId,
    pub policy_id: PolicyId,
    #[serde(default)]
    pub claim_amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub owner: OwnerId,
    pub policy_ids: Vec<PolicyId>,
}

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub owner: OwnerId,
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub owner: OwnerId,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Status code for a service failure.
pub fn status_code(error: &PolicyServiceError) -> StatusCode {
    match error {
        PolicyServiceError::Analysis(AnalysisError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
        PolicyServiceError::Analysis(AnalysisError::UnusableDocument) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        PolicyServiceError::Simulation(ClaimSimulationError::InvalidInput(_)) => {
            StatusCode::BAD_REQUEST
        }
        PolicyServiceError::InsufficientPolicies { .. } => StatusCode::BAD_REQUEST,
        PolicyServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        PolicyServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        PolicyServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub(crate) fn error_response(error: &PolicyServiceError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (status_code(error), Json(payload)).into_response()
}

pub(crate) async fn analyze_handler<R>(
    State(service): State<Arc<PolicyService<R>>>,
    Json(request): Json<AnalyzeRequest>,
) -> Response
where
    R: PolicyRepository + 'static,
{
    let AnalyzeRequest {
        owner,
        text,
        filename,
        page_count,
        age,
        pre_existing_condition,
        policy_type,
    } = request;

    let profile = age
        .map(AgeInput::resolve)
        .transpose()
        .and_then(|age| service.profile(age, pre_existing_condition, policy_type));
    let profile = match profile {
        Ok(profile) => profile,
        Err(error) => return error_response(&error.into()),
    };

    let document = PolicyDocument::new(
        text,
        page_count.unwrap_or(1),
        filename.unwrap_or_else(|| DEFAULT_FILENAME.to_string()),
    );

    match service.analyze(&owner, &document, &profile) {
        Ok(policy) => (StatusCode::CREATED, Json(policy)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn recent_handler<R>(
    State(service): State<Arc<PolicyService<R>>>,
    Query(query): Query<RecentQuery>,
) -> Response
where
    R: PolicyRepository + 'static,
{
    match service.recent(&query.owner, query.limit) {
        Ok(summaries) => (StatusCode::OK, Json(summaries)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn policy_handler<R>(
    State(service): State<Arc<PolicyService<R>>>,
    Path(policy_id): Path<String>,
    Query(query): Query<OwnerQuery>,
) -> Response
where
    R: PolicyRepository + 'static,
{
    let id = PolicyId::new(policy_id);
    match service.get(&query.owner, &id) {
        Ok(policy) => (StatusCode::OK, Json(policy)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn simulate_handler<R>(
    State(service): State<Arc<PolicyService<R>>>,
    Json(request): Json<SimulateRequest>,
) -> Response
where
    R: PolicyRepository + 'static,
{
    match service.simulate_claim(&request.owner, &request.policy_id, request.claim_amount) {
        Ok(simulation) => {
            let payload = json!({
                "policy_id": request.policy_id,
                "simulation": simulation,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn compare_handler<R>(
    State(service): State<Arc<PolicyService<R>>>,
    Json(request): Json<CompareRequest>,
) -> Response
where
    R: PolicyRepository + 'static,
{
    match service.compare(&request.owner, &request.policy_ids) {
        Ok(comparison) => (StatusCode::OK, Json(comparison)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn stats_handler<R>(
    State(service): State<Arc<PolicyService<R>>>,
    Query(query): Query<OwnerQuery>,
) -> Response
where
    R: PolicyRepository + 'static,
{
    match service.stats(&query.owner) {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn policy_types_handler<R>(State(service): State<Arc<PolicyService<R>>>) -> Response
where
    R: PolicyRepository + 'static,
{
    let payload = json!({
        "policy_types": service.policy_types(),
    });
    (StatusCode::OK, Json(payload)).into_response()
}

pub(crate) async fn classify_handler(Json(request): Json<ClassifyRequest>) -> Response {
    let candidates = PolicyTypeClassifier::classify(&request.text);
    let payload = json!({
        "detected_type": PolicyTypeClassifier::detected_type(&candidates),
        "candidates": candidates,
    });
    (StatusCode::OK, Json(payload)).into_response()
}

//! Intake HTTP server.
//!
//! Public front door for lead-capture form submissions, plus the lead, activity and
//! conversion endpoints used by the professional's dashboard.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderName, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::adapters::wiring::Services;
use crate::domain::errors::DomainError;
use crate::domain::models::{
    ActivityType, ClientProfile, DispatchError, FollowUpTask, Lead, LeadActivity, LeadData,
    ServerConfig,
};
use crate::services::{IntakeError, LeadSubmission};

/// Request body for a form submission.
///
/// Ids arrive from embedded third-party forms and are parsed after deserialization, so a
/// malformed id does not fail the whole body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequest {
    #[serde(default)]
    pub form_id: Value,
    #[serde(default)]
    pub professional_id: Value,
    #[serde(default)]
    pub data: LeadData,
}

impl SubmissionRequest {
    /// Target form, or `None` when the id is missing or not a UUID.
    pub fn form_uuid(&self) -> Option<Uuid> {
        uuid_from_json(&self.form_id)
    }

    /// Claimed professional. A value that is present but unparseable is dropped with a warning.
    pub fn professional_uuid(&self) -> Option<Uuid> {
        let parsed = uuid_from_json(&self.professional_id);
        if parsed.is_none() && !self.professional_id.is_null() {
            warn!(professional_id = %self.professional_id, "Ignoring malformed professional id");
        }
        parsed
    }
}

fn uuid_from_json(value: &Value) -> Option<Uuid> {
    value.as_str().and_then(|s| Uuid::parse_str(s.trim()).ok())
}

/// Response to an accepted submission.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub success: bool,
    pub lead_id: Uuid,
}

/// Request to record an activity against a lead.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordActivityRequest {
    pub activity_type: String,
    #[serde(default)]
    pub activity_data: Option<Value>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Request to invite a lead. Stored contact data is used when `leadData` is omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationBody {
    #[serde(default)]
    pub lead_data: Option<LeadData>,
    #[serde(default)]
    pub custom_message: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationResponse {
    pub invitation_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResponse {
    pub success: bool,
    pub client_profile_id: Uuid,
}

/// Lead with its follow-up tasks and, once converted, its client profile.
#[derive(Debug, Serialize)]
pub struct LeadDetailResponse {
    pub lead: Lead,
    pub follow_ups: Vec<FollowUpTask>,
    pub client: Option<ClientProfile>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}

/// Failure returned by a handler, rendered as `{ error, code? }`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorResponse,
}

impl ApiError {
    fn new(status: StatusCode, error: impl Into<String>, code: Option<&'static str>) -> Self {
        Self {
            status,
            body: ErrorResponse {
                error: error.into(),
                code,
            },
        }
    }

    fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", None)
    }

    fn form_not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Form not found or inactive", None)
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, Some("BAD_REQUEST"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<IntakeError> for ApiError {
    fn from(err: IntakeError) -> Self {
        match err {
            IntakeError::FormNotFound(_) => Self::form_not_found(),
            IntakeError::Persistence(_) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to save submission",
                None,
            ),
            IntakeError::Internal(_) => Self::internal(),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match &err {
            DomainError::FormNotFound(_) | DomainError::LeadNotFound(_) => {
                Self::new(StatusCode::NOT_FOUND, err.to_string(), Some("NOT_FOUND"))
            }
            DomainError::LeadAlreadyConverted(_) => {
                Self::new(StatusCode::CONFLICT, err.to_string(), Some("ALREADY_CONVERTED"))
            }
            DomainError::InvalidStateTransition { .. } => {
                Self::new(StatusCode::CONFLICT, err.to_string(), Some("INVALID_TRANSITION"))
            }
            DomainError::ValidationFailed(_) => {
                Self::new(StatusCode::BAD_REQUEST, err.to_string(), Some("VALIDATION_FAILED"))
            }
            DomainError::Dispatch(dispatch) => {
                let (status, code) = match dispatch {
                    DispatchError::NotifierUnconfigured => {
                        (StatusCode::SERVICE_UNAVAILABLE, "NOTIFIER_UNCONFIGURED")
                    }
                    DispatchError::MissingRecipient => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "MISSING_RECIPIENT")
                    }
                    DispatchError::Unauthorized => (StatusCode::FORBIDDEN, "UNAUTHORIZED"),
                    DispatchError::Failed(_) => (StatusCode::BAD_GATEWAY, "DISPATCH_FAILED"),
                };
                Self::new(status, dispatch.user_message(), Some(code))
            }
            DomainError::DatabaseError(_) | DomainError::SerializationError(_) => {
                error!(error = %err, "Request failed");
                Self::internal()
            }
        }
    }
}

/// Intake HTTP Server.
pub struct IntakeHttpServer {
    config: ServerConfig,
    services: Arc<Services>,
}

impl IntakeHttpServer {
    pub fn new(services: Arc<Services>, config: ServerConfig) -> Self {
        Self { config, services }
    }

    /// Build the router.
    pub fn router(&self) -> Router {
        build_router(self.services.clone(), self.config.enable_cors)
    }

    /// Start the server with a shutdown signal.
    pub async fn serve_with_shutdown<F>(
        self,
        shutdown: F,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port).parse()?;
        let router = self.router();

        let listener = TcpListener::bind(addr).await?;
        tracing::info!(%addr, "Intake HTTP server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}

/// Build the router over a set of services.
pub fn build_router(services: Arc<Services>, enable_cors: bool) -> Router {
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/submissions", post(submit_form))
        .route("/api/v1/leads/{id}", get(get_lead))
        .route("/api/v1/leads/{id}/contacted", post(mark_contacted))
        .route(
            "/api/v1/leads/{id}/activities",
            get(list_activities).post(record_activity),
        )
        .route("/api/v1/leads/{id}/invitation", post(send_invitation))
        .route("/api/v1/leads/{id}/conversion", post(convert_lead))
        .with_state(services);

    if enable_cors {
        app.layer(cors_layer()).layer(TraceLayer::new_for_http())
    } else {
        app.layer(TraceLayer::new_for_http())
    }
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::GET, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            header::CONTENT_TYPE,
        ])
}

/// Parse a JSON body, treating an empty body as the default value.
fn parse_optional_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| ApiError::bad_request(format!("Invalid request body: {e}")))
}

fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::bad_request(format!("Invalid request body: {e}")))
}

// Handler functions

async fn health_check() -> &'static str {
    "OK"
}

async fn submit_form(
    State(services): State<Arc<Services>>,
    body: Bytes,
) -> Result<Json<SubmissionResponse>, ApiError> {
    // A malformed submission is reported like any other unexpected failure
    let request: SubmissionRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "Rejected unparseable submission");
        ApiError::internal()
    })?;

    let Some(form_id) = request.form_uuid() else {
        info!(form_id = %request.form_id, "Submission names no valid form");
        return Err(ApiError::form_not_found());
    };
    let professional_id = request.professional_uuid();

    let receipt = services
        .intake
        .submit(LeadSubmission {
            form_id,
            professional_id,
            data: request.data,
        })
        .await?;

    Ok(Json(SubmissionResponse {
        success: true,
        lead_id: receipt.lead_id,
    }))
}

async fn get_lead(
    State(services): State<Arc<Services>>,
    Path(id): Path<Uuid>,
) -> Result<Json<LeadDetailResponse>, ApiError> {
    let lead = services.leads.require_lead(id).await?;
    let follow_ups = services.leads.follow_ups(id).await?;
    let client = services.leads.client_for_lead(id).await?;

    Ok(Json(LeadDetailResponse {
        lead,
        follow_ups,
        client,
    }))
}

async fn mark_contacted(
    State(services): State<Arc<Services>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Lead>, ApiError> {
    Ok(Json(services.leads.mark_contacted(id).await?))
}

async fn list_activities(
    State(services): State<Arc<Services>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<LeadActivity>>, ApiError> {
    services.leads.require_lead(id).await?;
    Ok(Json(services.activity.list_for_lead(id).await?))
}

async fn record_activity(
    State(services): State<Arc<Services>>,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> Result<(StatusCode, Json<LeadActivity>), ApiError> {
    let request: RecordActivityRequest = parse_body(&body)?;
    let activity_type = ActivityType::from_str(&request.activity_type).ok_or_else(|| {
        ApiError::bad_request(format!("Unknown activity type: {}", request.activity_type))
    })?;

    let lead = services.leads.require_lead(id).await?;
    let activity = services
        .activity
        .record(
            lead.id,
            lead.professional_id,
            activity_type,
            request
                .activity_data
                .unwrap_or_else(|| Value::Object(serde_json::Map::new())),
            request.notes,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(activity)))
}

async fn send_invitation(
    State(services): State<Arc<Services>>,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<InvitationResponse>, ApiError> {
    let request: InvitationBody = parse_optional_body(&body)?;

    let token = match request.lead_data {
        Some(lead_data) => {
            services
                .conversion
                .send_invitation(id, &lead_data, request.custom_message)
                .await?
        }
        None => {
            services
                .conversion
                .invite_lead(id, request.custom_message)
                .await?
        }
    };

    Ok(Json(InvitationResponse {
        invitation_token: token.as_str().to_string(),
    }))
}

async fn convert_lead(
    State(services): State<Arc<Services>>,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<ConversionResponse>, ApiError> {
    let request: ConversionRequest = parse_body(&body)?;
    let profile = services
        .conversion
        .convert_lead_to_client(id, request.user_id)
        .await?;

    Ok(Json(ConversionResponse {
        success: true,
        client_profile_id: profile.id,
    }))
}

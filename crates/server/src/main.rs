// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use sdms_api::{
    ApiError, ApprovalOutcome, ApproveMatchRequest, AuditEventResponse, AuthenticatedActor,
    AutoMatchReport, AutoMatchRequest, CreateDonationRequest, CreateDonationResponse,
    CreateRequestRequest, CreateRequestResponse, DonationTransitionResponse,
    LogisticsTransitionResponse, MarkAllReadResponse, NotificationListResponse,
    ParticipantResponse, PersistedSideEffects, RegisterParticipantRequest,
    RejectDonationRequest, RequestTransitionResponse, UnreadCountResponse,
    UpdateDonationStatusRequest, UpdateLogisticsStatusRequest, approve_donation, approve_match,
    authenticate_stub, auto_match_donations, cancel_request, create_donation, create_request,
    find_matches_for_donation, find_matches_for_request, get_audit_event, get_donation,
    get_logistics_for_donation, get_participant, get_request, list_available_requests,
    list_notifications, list_pending_donations, mark_all_notifications_read,
    mark_notification_read, register_participant, reject_donation, track_donation, unread_count,
    update_donation_status, update_logistics_status,
};
use sdms_audit::Cause;
use sdms_domain::{
    DEFAULT_AUTO_MATCH_THRESHOLD, Donation, Logistics, Notification, Request, ScoredDonation,
    ScoredRequest,
};
use sdms_persistence::SqlitePersistence;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{error, info, warn};

/// SDMS Server - HTTP server for the SDMS donation matching engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "SDMS_DATABASE")]
    database: Option<String>,

    /// Host or address to bind the server to
    #[arg(long, env = "SDMS_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to bind the server to
    #[arg(short, long, env = "SDMS_PORT", default_value_t = 3000)]
    port: u16,

    /// Auto-match threshold used when a request does not supply one
    #[arg(long, env = "SDMS_AUTO_MATCH_THRESHOLD", default_value_t = DEFAULT_AUTO_MATCH_THRESHOLD)]
    auto_match_threshold: i64,

    /// How long a request waits for the database handle, in milliseconds
    #[arg(long, env = "SDMS_LOCK_TIMEOUT_MS", default_value_t = 5000)]
    lock_timeout_ms: u64,

    /// `SQLite` busy timeout, in milliseconds
    #[arg(long, env = "SDMS_BUSY_TIMEOUT_MS", default_value_t = 5000)]
    busy_timeout_ms: u64,
}

/// Application state shared across handlers.
///
/// The single storage connection sits behind a Mutex. Handlers acquire it
/// through [`lock_persistence`], which gives up after `lock_timeout`.
#[derive(Clone)]
struct AppState {
    /// The persistence layer.
    persistence: Arc<Mutex<SqlitePersistence>>,
    /// Default threshold for `/matching/auto-match`.
    auto_match_threshold: i64,
    /// Upper bound on waiting for the persistence lock.
    lock_timeout: Duration,
}

/// Envelope for state-changing requests.
///
/// The actor and cause travel alongside the operation's own fields.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CommandRequest<T> {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// The cause ID for this action.
    cause_id: String,
    /// The cause description.
    cause_description: String,
    /// The operation payload.
    #[serde(flatten)]
    body: T,
}

/// Payload for actions that carry nothing beyond the envelope.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
struct NoBody {}

/// Body for notification writes, which are not audited.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ActorRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
}

/// Body for POST `/notifications/read-all`.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct MarkAllReadApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// Whose notifications to mark.
    participant_id: i64,
}

/// Query string identifying the caller of a read.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ActorQuery {
    actor_id: String,
    actor_role: String,
}

/// Query string for the notification reads.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct NotificationQuery {
    actor_id: String,
    actor_role: String,
    participant_id: i64,
    #[serde(default)]
    unread_only: bool,
}

/// API error response.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ErrorResponse {
    /// Whether this is an error.
    error: bool,
    /// The error message.
    message: String,
}

/// HTTP error wrapper.
#[derive(Debug)]
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::DependencyFailure { .. } | ApiError::Internal { .. } => {
                error!(error = %err, "Request failed on the server side");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Acquires the persistence handle, failing with 503 once `lock_timeout`
/// has passed.
async fn lock_persistence(
    app_state: &AppState,
) -> Result<MutexGuard<'_, SqlitePersistence>, HttpError> {
    tokio::time::timeout(app_state.lock_timeout, app_state.persistence.lock())
        .await
        .map_err(|_| {
            warn!(
                timeout = ?app_state.lock_timeout,
                "Timed out waiting for the persistence lock"
            );
            HttpError {
                status: StatusCode::SERVICE_UNAVAILABLE,
                message: String::from("Storage is busy, try again later"),
            }
        })
}

fn authenticate(actor_id: &str, actor_role: &str) -> Result<AuthenticatedActor, HttpError> {
    authenticate_stub(actor_id, actor_role).map_err(|e| HttpError::from(ApiError::from(e)))
}

// ============================================================================
// Participants
// ============================================================================

/// Handler for POST `/participants` endpoint.
async fn handle_register_participant(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CommandRequest<RegisterParticipantRequest>>,
) -> Result<Json<ParticipantResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        role = %req.actor_role,
        participant_role = %req.body.role,
        "Handling register_participant request"
    );

    let actor: AuthenticatedActor = authenticate(&req.actor_id, &req.actor_role)?;
    let cause: Cause = Cause::new(req.cause_id, req.cause_description);

    let mut persistence = lock_persistence(&app_state).await?;
    let response: ParticipantResponse =
        register_participant(&mut persistence, req.body, &actor, cause)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/participants/{participant_id}` endpoint.
async fn handle_get_participant(
    AxumState(app_state): AxumState<AppState>,
    Path(participant_id): Path<i64>,
) -> Result<Json<ParticipantResponse>, HttpError> {
    info!(participant_id, "Handling get_participant request");

    let mut persistence = lock_persistence(&app_state).await?;
    let response: ParticipantResponse = get_participant(&mut persistence, participant_id)?;
    drop(persistence);

    Ok(Json(response))
}

// ============================================================================
// Donations
// ============================================================================

/// Handler for POST `/donations` endpoint.
///
/// Stores the donation and returns a ranked preview of requests it could serve.
async fn handle_create_donation(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CommandRequest<CreateDonationRequest>>,
) -> Result<Json<CreateDonationResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        role = %req.actor_role,
        donor_id = req.body.donor_id,
        items = req.body.items.len(),
        "Handling create_donation request"
    );

    let actor: AuthenticatedActor = authenticate(&req.actor_id, &req.actor_role)?;
    let cause: Cause = Cause::new(req.cause_id, req.cause_description);

    let mut persistence = lock_persistence(&app_state).await?;
    let response: CreateDonationResponse = create_donation(
        &mut persistence,
        &mut PersistedSideEffects,
        req.body,
        &actor,
        cause,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    info!(
        donation_id = response.donation.donation_id,
        tracking_id = %response.donation.tracking_id,
        "Successfully created donation"
    );

    Ok(Json(response))
}

/// Handler for GET `/donations/pending` endpoint.
async fn handle_list_pending_donations(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<Vec<Donation>>, HttpError> {
    info!(actor_id = %query.actor_id, "Handling list_pending_donations request");

    let actor: AuthenticatedActor = authenticate(&query.actor_id, &query.actor_role)?;

    let mut persistence = lock_persistence(&app_state).await?;
    let donations: Vec<Donation> = list_pending_donations(&mut persistence, &actor)?;
    drop(persistence);

    Ok(Json(donations))
}

/// Handler for GET `/donations/{donation_id}` endpoint.
async fn handle_get_donation(
    AxumState(app_state): AxumState<AppState>,
    Path(donation_id): Path<i64>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<Donation>, HttpError> {
    info!(actor_id = %query.actor_id, donation_id, "Handling get_donation request");

    let actor: AuthenticatedActor = authenticate(&query.actor_id, &query.actor_role)?;

    let mut persistence = lock_persistence(&app_state).await?;
    let donation: Donation = get_donation(&mut persistence, donation_id, &actor)?;
    drop(persistence);

    Ok(Json(donation))
}

/// Handler for POST `/donations/{donation_id}/approve` endpoint.
async fn handle_approve_donation(
    AxumState(app_state): AxumState<AppState>,
    Path(donation_id): Path<i64>,
    Json(req): Json<CommandRequest<NoBody>>,
) -> Result<Json<DonationTransitionResponse>, HttpError> {
    info!(actor_id = %req.actor_id, donation_id, "Handling approve_donation request");

    let actor: AuthenticatedActor = authenticate(&req.actor_id, &req.actor_role)?;
    let cause: Cause = Cause::new(req.cause_id, req.cause_description);

    let mut persistence = lock_persistence(&app_state).await?;
    let response: DonationTransitionResponse = approve_donation(
        &mut persistence,
        &mut PersistedSideEffects,
        donation_id,
        &actor,
        cause,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/donations/{donation_id}/reject` endpoint.
async fn handle_reject_donation(
    AxumState(app_state): AxumState<AppState>,
    Path(donation_id): Path<i64>,
    Json(req): Json<CommandRequest<RejectDonationRequest>>,
) -> Result<Json<DonationTransitionResponse>, HttpError> {
    info!(actor_id = %req.actor_id, donation_id, "Handling reject_donation request");

    let actor: AuthenticatedActor = authenticate(&req.actor_id, &req.actor_role)?;
    let cause: Cause = Cause::new(req.cause_id, req.cause_description);

    let mut persistence = lock_persistence(&app_state).await?;
    let response: DonationTransitionResponse = reject_donation(
        &mut persistence,
        &mut PersistedSideEffects,
        donation_id,
        req.body,
        &actor,
        cause,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/donations/{donation_id}/status` endpoint.
async fn handle_update_donation_status(
    AxumState(app_state): AxumState<AppState>,
    Path(donation_id): Path<i64>,
    Json(req): Json<CommandRequest<UpdateDonationStatusRequest>>,
) -> Result<Json<DonationTransitionResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        donation_id,
        status = %req.body.status,
        "Handling update_donation_status request"
    );

    let actor: AuthenticatedActor = authenticate(&req.actor_id, &req.actor_role)?;
    let cause: Cause = Cause::new(req.cause_id, req.cause_description);

    let mut persistence = lock_persistence(&app_state).await?;
    let response: DonationTransitionResponse = update_donation_status(
        &mut persistence,
        &mut PersistedSideEffects,
        donation_id,
        req.body,
        &actor,
        cause,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/tracking/{tracking_id}` endpoint.
///
/// Public lookup by tracking number; no actor required.
async fn handle_track_donation(
    AxumState(app_state): AxumState<AppState>,
    Path(tracking_id): Path<String>,
) -> Result<Json<Donation>, HttpError> {
    info!(tracking_id = %tracking_id, "Handling track_donation request");

    let mut persistence = lock_persistence(&app_state).await?;
    let donation: Donation = track_donation(&mut persistence, &tracking_id)?;
    drop(persistence);

    Ok(Json(donation))
}

// ============================================================================
// Requests
// ============================================================================

/// Handler for POST `/requests` endpoint.
async fn handle_create_request(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CommandRequest<CreateRequestRequest>>,
) -> Result<Json<CreateRequestResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        recipient_id = req.body.recipient_id,
        item_type = %req.body.item_type,
        quantity = req.body.quantity,
        urgency = %req.body.urgency,
        "Handling create_request request"
    );

    let actor: AuthenticatedActor = authenticate(&req.actor_id, &req.actor_role)?;
    let cause: Cause = Cause::new(req.cause_id, req.cause_description);

    let mut persistence = lock_persistence(&app_state).await?;
    let response: CreateRequestResponse = create_request(
        &mut persistence,
        req.body,
        &actor,
        cause,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/requests/available` endpoint.
async fn handle_list_available_requests(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<Request>>, HttpError> {
    info!("Handling list_available_requests request");

    let mut persistence = lock_persistence(&app_state).await?;
    let requests: Vec<Request> = list_available_requests(&mut persistence)?;
    drop(persistence);

    Ok(Json(requests))
}

/// Handler for GET `/requests/{request_id}` endpoint.
async fn handle_get_request(
    AxumState(app_state): AxumState<AppState>,
    Path(request_id): Path<i64>,
) -> Result<Json<Request>, HttpError> {
    info!(request_id, "Handling get_request request");

    let mut persistence = lock_persistence(&app_state).await?;
    let request: Request = get_request(&mut persistence, request_id)?;
    drop(persistence);

    Ok(Json(request))
}

/// Handler for POST `/requests/{request_id}/cancel` endpoint.
async fn handle_cancel_request(
    AxumState(app_state): AxumState<AppState>,
    Path(request_id): Path<i64>,
    Json(req): Json<CommandRequest<NoBody>>,
) -> Result<Json<RequestTransitionResponse>, HttpError> {
    info!(actor_id = %req.actor_id, request_id, "Handling cancel_request request");

    let actor: AuthenticatedActor = authenticate(&req.actor_id, &req.actor_role)?;
    let cause: Cause = Cause::new(req.cause_id, req.cause_description);

    let mut persistence = lock_persistence(&app_state).await?;
    let response: RequestTransitionResponse =
        cancel_request(&mut persistence, request_id, &actor, cause)?;
    drop(persistence);

    Ok(Json(response))
}

// ============================================================================
// Matching
// ============================================================================

/// Handler for GET `/matching/donation/{donation_id}` endpoint.
async fn handle_find_matches_for_donation(
    AxumState(app_state): AxumState<AppState>,
    Path(donation_id): Path<i64>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<Vec<ScoredRequest>>, HttpError> {
    info!(
        actor_id = %query.actor_id,
        donation_id,
        "Handling find_matches_for_donation request"
    );

    let actor: AuthenticatedActor = authenticate(&query.actor_id, &query.actor_role)?;

    let mut persistence = lock_persistence(&app_state).await?;
    let matches: Vec<ScoredRequest> = find_matches_for_donation(
        &mut persistence,
        donation_id,
        &actor,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(matches))
}

/// Handler for GET `/matching/request/{request_id}` endpoint.
async fn handle_find_matches_for_request(
    AxumState(app_state): AxumState<AppState>,
    Path(request_id): Path<i64>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<Vec<ScoredDonation>>, HttpError> {
    info!(
        actor_id = %query.actor_id,
        request_id,
        "Handling find_matches_for_request request"
    );

    let actor: AuthenticatedActor = authenticate(&query.actor_id, &query.actor_role)?;

    let mut persistence = lock_persistence(&app_state).await?;
    let matches: Vec<ScoredDonation> = find_matches_for_request(
        &mut persistence,
        request_id,
        &actor,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(matches))
}

/// Handler for POST `/matching/approve` endpoint.
///
/// A committed match whose notifications or logistics failed still
/// returns 200; the failures are listed under `side_effects`.
async fn handle_approve_match(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CommandRequest<ApproveMatchRequest>>,
) -> Result<Json<ApprovalOutcome>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        donation_id = req.body.donation_id,
        request_id = req.body.request_id,
        "Handling approve_match request"
    );

    let actor: AuthenticatedActor = authenticate(&req.actor_id, &req.actor_role)?;
    let cause: Cause = Cause::new(req.cause_id, req.cause_description);

    let mut persistence = lock_persistence(&app_state).await?;
    let outcome: ApprovalOutcome = approve_match(
        &mut persistence,
        &mut PersistedSideEffects,
        req.body,
        &actor,
        cause,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    if !outcome.is_complete() {
        warn!(
            donation_id = outcome.donation.donation_id,
            failures = outcome.side_effects.failures.len(),
            "Match committed with incomplete side effects"
        );
    }

    Ok(Json(outcome))
}

/// Handler for POST `/matching/auto-match` endpoint.
async fn handle_auto_match(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CommandRequest<AutoMatchRequest>>,
) -> Result<Json<AutoMatchReport>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        threshold = ?req.body.threshold,
        "Handling auto_match request"
    );

    let actor: AuthenticatedActor = authenticate(&req.actor_id, &req.actor_role)?;
    let cause: Cause = Cause::new(req.cause_id, req.cause_description);

    let mut persistence = lock_persistence(&app_state).await?;
    let report: AutoMatchReport = auto_match_donations(
        &mut persistence,
        &mut PersistedSideEffects,
        req.body,
        &actor,
        cause,
        OffsetDateTime::now_utc(),
        app_state.auto_match_threshold,
    )?;
    drop(persistence);

    Ok(Json(report))
}

// ============================================================================
// Notifications
// ============================================================================

/// Handler for GET `/notifications` endpoint.
async fn handle_list_notifications(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<NotificationQuery>,
) -> Result<Json<NotificationListResponse>, HttpError> {
    info!(
        actor_id = %query.actor_id,
        participant_id = query.participant_id,
        unread_only = query.unread_only,
        "Handling list_notifications request"
    );

    let actor: AuthenticatedActor = authenticate(&query.actor_id, &query.actor_role)?;

    let mut persistence = lock_persistence(&app_state).await?;
    let response: NotificationListResponse = list_notifications(
        &mut persistence,
        query.participant_id,
        query.unread_only,
        &actor,
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/notifications/count` endpoint.
async fn handle_unread_count(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<NotificationQuery>,
) -> Result<Json<UnreadCountResponse>, HttpError> {
    info!(
        actor_id = %query.actor_id,
        participant_id = query.participant_id,
        "Handling unread_count request"
    );

    let actor: AuthenticatedActor = authenticate(&query.actor_id, &query.actor_role)?;

    let mut persistence = lock_persistence(&app_state).await?;
    let response: UnreadCountResponse =
        unread_count(&mut persistence, query.participant_id, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/notifications/{notification_id}/read` endpoint.
async fn handle_mark_notification_read(
    AxumState(app_state): AxumState<AppState>,
    Path(notification_id): Path<i64>,
    Json(req): Json<ActorRequest>,
) -> Result<Json<Notification>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        notification_id,
        "Handling mark_notification_read request"
    );

    let actor: AuthenticatedActor = authenticate(&req.actor_id, &req.actor_role)?;

    let mut persistence = lock_persistence(&app_state).await?;
    let notification: Notification =
        mark_notification_read(&mut persistence, notification_id, &actor)?;
    drop(persistence);

    Ok(Json(notification))
}

/// Handler for POST `/notifications/read-all` endpoint.
async fn handle_mark_all_notifications_read(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<MarkAllReadApiRequest>,
) -> Result<Json<MarkAllReadResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        participant_id = req.participant_id,
        "Handling mark_all_notifications_read request"
    );

    let actor: AuthenticatedActor = authenticate(&req.actor_id, &req.actor_role)?;

    let mut persistence = lock_persistence(&app_state).await?;
    let response: MarkAllReadResponse =
        mark_all_notifications_read(&mut persistence, req.participant_id, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

// ============================================================================
// Logistics & Audit
// ============================================================================

/// Handler for GET `/logistics/donation/{donation_id}` endpoint.
async fn handle_get_logistics_for_donation(
    AxumState(app_state): AxumState<AppState>,
    Path(donation_id): Path<i64>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<Logistics>, HttpError> {
    info!(
        actor_id = %query.actor_id,
        donation_id,
        "Handling get_logistics_for_donation request"
    );

    let actor: AuthenticatedActor = authenticate(&query.actor_id, &query.actor_role)?;

    let mut persistence = lock_persistence(&app_state).await?;
    let logistics: Logistics = get_logistics_for_donation(&mut persistence, donation_id, &actor)?;
    drop(persistence);

    Ok(Json(logistics))
}

/// Handler for POST `/logistics/{logistics_id}/status` endpoint.
async fn handle_update_logistics_status(
    AxumState(app_state): AxumState<AppState>,
    Path(logistics_id): Path<i64>,
    Json(req): Json<CommandRequest<UpdateLogisticsStatusRequest>>,
) -> Result<Json<LogisticsTransitionResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        logistics_id,
        status = %req.body.status,
        "Handling update_logistics_status request"
    );

    let actor: AuthenticatedActor = authenticate(&req.actor_id, &req.actor_role)?;
    let cause: Cause = Cause::new(req.cause_id, req.cause_description);

    let mut persistence = lock_persistence(&app_state).await?;
    let response: LogisticsTransitionResponse = update_logistics_status(
        &mut persistence,
        &mut PersistedSideEffects,
        logistics_id,
        req.body,
        &actor,
        cause,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/audit/event/{event_id}` endpoint.
///
/// Returns a specific audit event by its ID.
async fn handle_get_audit_event(
    AxumState(app_state): AxumState<AppState>,
    Path(event_id): Path<i64>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<AuditEventResponse>, HttpError> {
    info!(event_id, "Handling get_audit_event request");

    let actor: AuthenticatedActor = authenticate(&query.actor_id, &query.actor_role)?;

    let mut persistence = lock_persistence(&app_state).await?;
    let response: AuditEventResponse = get_audit_event(&mut persistence, event_id, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/participants", post(handle_register_participant))
        .route("/participants/{participant_id}", get(handle_get_participant))
        .route("/donations", post(handle_create_donation))
        .route("/donations/pending", get(handle_list_pending_donations))
        .route("/donations/{donation_id}", get(handle_get_donation))
        .route("/donations/{donation_id}/approve", post(handle_approve_donation))
        .route("/donations/{donation_id}/reject", post(handle_reject_donation))
        .route(
            "/donations/{donation_id}/status",
            post(handle_update_donation_status),
        )
        .route("/tracking/{tracking_id}", get(handle_track_donation))
        .route("/requests", post(handle_create_request))
        .route("/requests/available", get(handle_list_available_requests))
        .route("/requests/{request_id}", get(handle_get_request))
        .route("/requests/{request_id}/cancel", post(handle_cancel_request))
        .route(
            "/matching/donation/{donation_id}",
            get(handle_find_matches_for_donation),
        )
        .route(
            "/matching/request/{request_id}",
            get(handle_find_matches_for_request),
        )
        .route("/matching/approve", post(handle_approve_match))
        .route("/matching/auto-match", post(handle_auto_match))
        .route("/notifications", get(handle_list_notifications))
        .route("/notifications/count", get(handle_unread_count))
        .route(
            "/notifications/{notification_id}/read",
            post(handle_mark_notification_read),
        )
        .route(
            "/notifications/read-all",
            post(handle_mark_all_notifications_read),
        )
        .route(
            "/logistics/donation/{donation_id}",
            get(handle_get_logistics_for_donation),
        )
        .route(
            "/logistics/{logistics_id}/status",
            post(handle_update_logistics_status),
        )
        .route("/audit/event/{event_id}", get(handle_get_audit_event))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing SDMS Server");

    let mut persistence: SqlitePersistence = if let Some(db_path) = &args.database {
        info!(path = %db_path, "Using file-based database");
        SqlitePersistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        SqlitePersistence::new_in_memory()?
    };
    persistence.set_busy_timeout(Duration::from_millis(args.busy_timeout_ms))?;

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        auto_match_threshold: args.auto_match_threshold,
        lock_timeout: Duration::from_millis(args.lock_timeout_ms),
    };

    let app: Router = build_router(app_state);

    let listener = tokio::net::TcpListener::bind((args.host.as_str(), args.port)).await?;
    let addr: std::net::SocketAddr = listener.local_addr()?;
    info!(
        address = %addr,
        auto_match_threshold = args.auto_match_threshold,
        "Server listening"
    );

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests;

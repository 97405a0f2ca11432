//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::insight_task::{insight_process, InsightOutcome};
use crate::web::protocol::{
    CatalogView, DashboardView, EffectsPayload, InsightStateView, InsightView, SessionPayload,
    SessionView,
};
use crate::web::state::{AppState, InsightEvent, InsightPhase};
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use lucid_logs_core::entry::DraftError;
use std::sync::Arc;
use tracing::{error, info};
use utoipa::OpenApi;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        list_sessions_handler,
        create_session_handler,
        dashboard_handler,
        catalog_handler,
        get_insight_handler,
        request_insight_handler,
        clear_insight_handler,
    ),
    components(
        schemas(
            SessionPayload,
            EffectsPayload,
            SessionView,
            DashboardView,
            CatalogView,
            InsightView,
            InsightStateView
        )
    ),
    tags(
        (name = "Lucid Logs API", description = "Session journal and pattern insight endpoints.")
    )
)]
pub struct ApiDoc;

type HandlerResult<T> = Result<(StatusCode, Json<T>), (StatusCode, String)>;

//=========================================================================================
// Journal Handlers
//=========================================================================================

/// List every recorded session, newest first.
#[utoipa::path(
    get,
    path = "/sessions",
    responses(
        (status = 200, description = "All sessions, newest first", body = [SessionView])
    )
)]
pub async fn list_sessions_handler(
    State(app_state): State<Arc<AppState>>,
) -> HandlerResult<Vec<SessionView>> {
    let records = app_state.store.all().await;
    let views = records.iter().map(SessionView::from).collect();
    Ok((StatusCode::OK, Json(views)))
}

/// Record a completed entry form.
///
/// A successful save invalidates any insight currently on display.
#[utoipa::path(
    post,
    path = "/sessions",
    request_body = SessionPayload,
    responses(
        (status = 201, description = "Session recorded", body = SessionView),
        (status = 400, description = "Unknown category or method, or a rating out of range"),
        (status = 422, description = "Product name is missing")
    )
)]
pub async fn create_session_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<SessionPayload>,
) -> HandlerResult<SessionView> {
    let draft = payload
        .into_draft()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let record = draft.finish(Utc::now()).map_err(|e| match e {
        DraftError::MissingProductName => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
        DraftError::AlreadyAtLastStep => {
            error!("Unexpected draft failure while saving a session: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    })?;

    let view = SessionView::from(&record);
    app_state.store.append(record).await;
    let (phase, invalidated) = app_state
        .apply_insight_event(InsightEvent::RecordsChanged)
        .await;
    if invalidated {
        info!("New session recorded; cached insight invalidated ({}).", phase.name());
    }
    info!("Recorded session {} ({}).", view.id, view.product_name);

    Ok((StatusCode::CREATED, Json(view)))
}

/// Summary numbers and the most recent entries for the landing page.
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Journal summary", body = DashboardView)
    )
)]
pub async fn dashboard_handler(
    State(app_state): State<Arc<AppState>>,
) -> HandlerResult<DashboardView> {
    let records = app_state.store.all().await;
    Ok((StatusCode::OK, Json(DashboardView::from_records(&records))))
}

/// The fixed choices offered by the entry form.
#[utoipa::path(
    get,
    path = "/catalog",
    responses(
        (status = 200, description = "Form choices", body = CatalogView)
    )
)]
pub async fn catalog_handler() -> HandlerResult<CatalogView> {
    Ok((StatusCode::OK, Json(CatalogView::current())))
}

//=========================================================================================
// Insight Handlers
//=========================================================================================

#[utoipa::path(
    get,
    path = "/insight",
    responses(
        (status = 200, description = "Current insight phase", body = InsightStateView)
    )
)]
pub async fn get_insight_handler(
    State(app_state): State<Arc<AppState>>,
) -> HandlerResult<InsightStateView> {
    let phase = app_state.current_insight_phase().await;
    Ok((StatusCode::OK, Json(InsightStateView::from(&phase))))
}

/// Analyze the most recent sessions.
///
/// Returns the cached result if one is already on display. A request made while
/// another is in flight does nothing and answers 202.
#[utoipa::path(
    post,
    path = "/insight",
    responses(
        (status = 200, description = "Insight ready", body = InsightStateView),
        (status = 202, description = "A request is already in flight", body = InsightStateView)
    )
)]
pub async fn request_insight_handler(
    State(app_state): State<Arc<AppState>>,
) -> HandlerResult<InsightStateView> {
    let (code, phase) = match insight_process(&app_state).await {
        InsightOutcome::Completed(phase) => (StatusCode::OK, phase),
        InsightOutcome::Ignored(phase @ InsightPhase::Requesting { .. }) => {
            (StatusCode::ACCEPTED, phase)
        }
        InsightOutcome::Ignored(phase) => (StatusCode::OK, phase),
    };
    Ok((code, Json(InsightStateView::from(&phase))))
}

/// Dismiss the insight on display. Has no effect while a request is in flight.
#[utoipa::path(
    delete,
    path = "/insight",
    responses(
        (status = 200, description = "Insight phase after the clear", body = InsightStateView)
    )
)]
pub async fn clear_insight_handler(
    State(app_state): State<Arc<AppState>>,
) -> HandlerResult<InsightStateView> {
    let (phase, _) = app_state.apply_insight_event(InsightEvent::Clear).await;
    Ok((StatusCode::OK, Json(InsightStateView::from(&phase))))
}

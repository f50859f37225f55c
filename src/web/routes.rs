//! Application route configuration.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Redirect, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::errors::{AppError, AppResult};
use crate::web::extractors::BoundForm;
use crate::web::forms::UserForm;
use crate::web::state::AppState;
use crate::web::views::View;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/login", get(home))
        .route("/signup", get(signup_form).post(signup))
        .route("/userForm", get(user_form).post(create_user))
        .route("/userForm/cancel", get(cancel_edit))
        .route("/editUser", post(edit_user))
        .route("/editUser/:id", get(edit_user_form))
        .route("/deleteUser/:id", get(delete_user))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Home and login landing page
async fn home(State(state): State<AppState>) -> AppResult<Response> {
    let view = state.controller.show_home();
    respond(&state, view)
}

async fn signup_form(State(state): State<AppState>) -> AppResult<Response> {
    let view = state.controller.show_signup().await?;
    respond(&state, view)
}

async fn signup(
    State(state): State<AppState>,
    BoundForm(form, binding): BoundForm<UserForm>,
) -> AppResult<Response> {
    let view = state.controller.submit_signup(form, binding).await?;
    respond(&state, view)
}

async fn user_form(State(state): State<AppState>) -> AppResult<Response> {
    let view = state.controller.show_user_form().await?;
    respond(&state, view)
}

async fn create_user(
    State(state): State<AppState>,
    BoundForm(form, binding): BoundForm<UserForm>,
) -> AppResult<Response> {
    let view = state.controller.create_user(form, binding).await?;
    respond(&state, view)
}

async fn edit_user_form(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Response> {
    let view = match state.controller.show_edit_form(id).await {
        Ok(view) => view,
        // A dead edit link falls back to the list with a banner
        Err(AppError::NotFound) => {
            state
                .controller
                .user_list_with_error("User not found".to_string())
                .await?
        }
        Err(err) => return Err(err),
    };

    respond(&state, view)
}

async fn edit_user(
    State(state): State<AppState>,
    BoundForm(form, binding): BoundForm<UserForm>,
) -> AppResult<Response> {
    let view = state.controller.submit_edit(form, binding).await?;
    respond(&state, view)
}

async fn cancel_edit(State(state): State<AppState>) -> AppResult<Response> {
    let view = state.controller.cancel_edit();
    respond(&state, view)
}

async fn delete_user(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Response> {
    let view = state.controller.delete_user(id).await?;
    respond(&state, view)
}

/// Render a view into an HTTP response
fn respond(state: &AppState, view: View) -> AppResult<Response> {
    match view {
        View::Redirect(location) => Ok(Redirect::to(&location).into_response()),
        View::Page(page) => {
            let html = state.renderer.render(page.template(), &page.attributes()?)?;
            Ok(Html(html).into_response())
        }
    }
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: ServiceStatus,
}

/// Service status
#[derive(Serialize)]
struct ServiceStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health check endpoint with database connectivity check
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = match state.database.ping().await {
        Ok(_) => ServiceStatus {
            status: "healthy",
            error: None,
        },
        Err(e) => ServiceStatus {
            status: "unhealthy",
            error: Some(e.to_string()),
        },
    };

    let healthy = database.status == "healthy";

    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" },
        database,
    };

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}

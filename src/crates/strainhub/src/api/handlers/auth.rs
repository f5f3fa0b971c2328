//! Login endpoint handler

use axum::{extract::State, http::HeaderMap, Json};

use crate::api::{
    bearer_token,
    error::ApiResult,
    models::{LoginRequest, LoginResponse},
    response,
    routes::AppState,
};
use crate::db::repositories::UserRepository;

/// Register or refresh a user after the authorization exchange
///
/// POST /api/v1/auth/login
///
/// The identity token proves who is calling; the optional credential in the
/// body is the long-lived grant stored for later engine and storage calls.
/// Re-login without a credential leaves any stored one untouched.
pub async fn login(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let principal = app_state
        .binder
        .resolve_principal(bearer_token(&headers))
        .await?;

    let pool = app_state.db.pool();
    let created = UserRepository::ensure_exists(pool, &principal.email).await?;

    if let Some(credential) = req.credential.as_deref() {
        UserRepository::set_credential(pool, &principal.email, credential).await?;
    }

    if created {
        tracing::info!("Registered new user {}", principal.email);
    }

    Ok(response::ok(LoginResponse {
        email: principal.email,
        created,
    }))
}

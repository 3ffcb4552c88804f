// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login routes.
//!
//! Both endpoints run behind the ID-token verification middleware; handlers
//! receive the already-verified [`DecodedToken`] as a request extension.

use crate::error::Result;
use crate::models::{DecodedToken, LoginNormalUserRequest};
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Extension, Json, Router,
};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login", post(login_normal_user))
        .route("/auth/admin/login", post(login_admin_user))
}

/// Normal-user login. Provisions the user record on first login and
/// normalizes the provider identity.
async fn login_normal_user(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<DecodedToken>,
    Json(request): Json<LoginNormalUserRequest>,
) -> Result<StatusCode> {
    tracing::debug!(uid = %token.uid, "Normal user login requested");

    state.auth_service.normal_user_login(&token, &request).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Admin login. Verifies the bearer against the admin store.
async fn login_admin_user(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<DecodedToken>,
) -> Result<StatusCode> {
    tracing::debug!(uid = %token.uid, "Admin login requested");

    state.auth_service.admin_user_login(&token).await?;

    Ok(StatusCode::NO_CONTENT)
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin provisioning routes (claim-gated).

use crate::error::Result;
use crate::models::{Admin, CreateAdminDto, CreateAdminProfileDto};
use crate::AppState;
use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

/// Admin management routes. The `isAdminUser` claim gate is applied in
/// routes/mod.rs.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/admins", post(create_admin).get(list_admins))
}

/// Request body for provisioning an admin.
#[derive(Debug, Deserialize)]
pub struct CreateAdminRequest {
    #[serde(flatten)]
    pub admin: CreateAdminDto,
    /// Optional free-form profile stored alongside the record.
    pub profile: Option<CreateAdminProfileDto>,
}

/// Provision an admin record.
async fn create_admin(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateAdminRequest>,
) -> Result<Json<Admin>> {
    request.admin.validate()?;

    tracing::info!(admin_id = %request.admin.admin_id, "Provisioning admin");

    let admin = state
        .admins_service
        .create_one_admin(&request.admin, request.profile.as_ref())
        .await?;

    Ok(Json(admin))
}

#[derive(Serialize)]
pub struct AdminsResponse {
    pub admins: Vec<Admin>,
}

/// List all admin records.
async fn list_admins(State(state): State<Arc<AppState>>) -> Result<Json<AdminsResponse>> {
    let admins = state
        .admins_service
        .find_all_admin_users()
        .await?
        .unwrap_or_default();

    Ok(Json(AdminsResponse { admins }))
}

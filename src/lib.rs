// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Firegate: identity bootstrap for phone-verified mobile sign-in
//!
//! This crate provides the backend API that sits between Firebase
//! Authentication and the Firestore-backed user and admin directories:
//! first-login provisioning, admin verification, and custom-claim sync.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::FirestoreDb;
use middleware::auth::FirebaseTokenVerifier;
use services::{AdminsService, AuthService};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub token_verifier: Arc<FirebaseTokenVerifier>,
    pub auth_service: AuthService,
    pub admins_service: AdminsService,
}

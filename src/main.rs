// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firegate API Server
//!
//! Bootstraps first-time logins from phone-verified Firebase identities and
//! keeps provider custom claims in sync with the admin and user directories.

use firegate::{
    config::Config,
    db::FirestoreDb,
    middleware::auth::FirebaseTokenVerifier,
    services::{AdminsService, AuthService, GoogleIdentityClient},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Firegate API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // Initialize ID-token verifier
    let token_verifier = Arc::new(
        FirebaseTokenVerifier::new(&config.gcp_project_id)
            .expect("Failed to initialize token verifier"),
    );

    // Initialize Identity Toolkit client
    let identity_client = GoogleIdentityClient::new(&config.gcp_project_id)
        .await
        .expect("Failed to initialize identity client");
    tracing::info!("Identity client initialized");

    // Wire the directories and services
    let admins_service = AdminsService::new(Arc::new(db.clone()));
    let auth_service = AuthService::new(
        Arc::new(db.clone()),
        admins_service.clone(),
        Arc::new(identity_client),
    );

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        token_verifier,
        auth_service,
        admins_service,
    });

    // Build router
    let app = firegate::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("firegate=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}

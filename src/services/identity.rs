// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity provider client (Firebase Auth accounts API).
//!
//! Wraps the Identity Toolkit v1 `accounts:update` endpoint, which is how the
//! Admin SDK expresses both `updateUser` and `setCustomUserClaims`. Calls are
//! fail-fast with no local retry; partial side effects are reconciled by the
//! next login.

use crate::error::AppError;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(5);

/// Account-level fields to normalize on the provider identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountUpdate {
    /// Unlink the phone provider from the account (`phoneNumber: null`).
    pub clear_phone_number: bool,
    /// Desired disabled state for the account.
    pub disabled: bool,
}

/// Custom role claims embedded into future ID tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CustomClaims {
    #[serde(rename = "isNormalUser", skip_serializing_if = "Option::is_none")]
    pub is_normal_user: Option<bool>,
    #[serde(rename = "isAdminUser", skip_serializing_if = "Option::is_none")]
    pub is_admin_user: Option<bool>,
}

impl CustomClaims {
    /// Claims marking the identity as a normal user.
    pub fn normal_user() -> Self {
        Self {
            is_normal_user: Some(true),
            is_admin_user: None,
        }
    }

    /// Claims marking the identity as an admin.
    pub fn admin_user() -> Self {
        Self {
            is_normal_user: None,
            is_admin_user: Some(true),
        }
    }
}

/// Port toward the managed identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Update account-level fields for a provider identity.
    async fn update_user(&self, uid: &str, update: &AccountUpdate) -> Result<(), AppError>;

    /// Replace the custom claims on a provider identity.
    async fn set_custom_user_claims(&self, uid: &str, claims: &CustomClaims)
        -> Result<(), AppError>;
}

/// Identity Toolkit REST client authenticated with application default
/// credentials.
pub struct GoogleIdentityClient {
    http_client: reqwest::Client,
    accounts_update_url: String,
    /// None when talking to the Auth emulator, which accepts `Bearer owner`.
    token_generator: Option<Arc<gcloud_sdk::GoogleAuthTokenGenerator>>,
}

impl GoogleIdentityClient {
    /// Create a client for the given project.
    ///
    /// For local development with the Auth emulator, set
    /// FIREBASE_AUTH_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| {
                AppError::IdentityProvider(format!("Failed building HTTP client: {}", e))
            })?;

        if let Ok(host) = std::env::var("FIREBASE_AUTH_EMULATOR_HOST") {
            tracing::info!(host = %host, "Using Firebase Auth emulator");

            return Ok(Self {
                http_client,
                accounts_update_url: format!(
                    "http://{}/identitytoolkit.googleapis.com/v1/projects/{}/accounts:update",
                    host, project_id
                ),
                token_generator: None,
            });
        }

        let token_generator = gcloud_sdk::GoogleAuthTokenGenerator::new(
            gcloud_sdk::TokenSourceType::Default,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
        )
        .await
        .map_err(|e| {
            AppError::IdentityProvider(format!("Failed to initialize GCP credentials: {}", e))
        })?;

        tracing::info!(project = project_id, "Identity Toolkit client initialized");

        Ok(Self {
            http_client,
            accounts_update_url: format!(
                "https://identitytoolkit.googleapis.com/v1/projects/{}/accounts:update",
                project_id
            ),
            token_generator: Some(Arc::new(token_generator)),
        })
    }

    async fn auth_header(&self) -> Result<String, AppError> {
        match &self.token_generator {
            None => Ok("Bearer owner".to_string()),
            Some(generator) => {
                let token = generator.create_token().await.map_err(|e| {
                    AppError::IdentityProvider(format!("Failed to mint access token: {}", e))
                })?;
                Ok(token.header_value())
            }
        }
    }

    async fn accounts_update(&self, body: serde_json::Value) -> Result<(), AppError> {
        let auth = self.auth_header().await?;

        let response = self
            .http_client
            .post(&self.accounts_update_url)
            .header(reqwest::header::AUTHORIZATION, auth)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::IdentityProvider(format!("accounts:update failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::IdentityProvider(format!(
                "accounts:update returned {}: {}",
                status, detail
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for GoogleIdentityClient {
    async fn update_user(&self, uid: &str, update: &AccountUpdate) -> Result<(), AppError> {
        let mut body = serde_json::json!({
            "localId": uid,
            "disableUser": update.disabled,
        });

        if update.clear_phone_number {
            body["deleteProvider"] = serde_json::json!(["phone"]);
        }

        tracing::debug!(
            uid,
            clear_phone_number = update.clear_phone_number,
            disabled = update.disabled,
            "Updating provider account"
        );

        self.accounts_update(body).await
    }

    async fn set_custom_user_claims(
        &self,
        uid: &str,
        claims: &CustomClaims,
    ) -> Result<(), AppError> {
        // The API takes the claims object as a JSON string attribute.
        let attributes = serde_json::to_string(claims)
            .map_err(|e| AppError::IdentityProvider(format!("Invalid claims payload: {}", e)))?;

        tracing::debug!(uid, claims = %attributes, "Setting custom user claims");

        self.accounts_update(serde_json::json!({
            "localId": uid,
            "customAttributes": attributes,
        }))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_user_claims_serialize_to_provider_shape() {
        let attributes = serde_json::to_string(&CustomClaims::normal_user()).unwrap();
        assert_eq!(attributes, r#"{"isNormalUser":true}"#);
    }

    #[test]
    fn admin_claims_serialize_to_provider_shape() {
        let attributes = serde_json::to_string(&CustomClaims::admin_user()).unwrap();
        assert_eq!(attributes, r#"{"isAdminUser":true}"#);
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Normal-user models and login DTOs.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Normal-user record stored in Firestore.
///
/// Created exactly once per distinct `uid` on first login; never mutated or
/// deleted by the login paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Provider-issued uid (also used as document ID)
    pub user_id: String,
    /// Phone number the identity was verified with
    pub phone_number: String,
    /// When the user record was provisioned
    pub created_at: String,
}

/// Fields persisted for a first-time user, validated before the write.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserDto {
    #[validate(length(min = 1, message = "userId must not be empty"))]
    pub user_id: String,
    #[validate(custom(function = validate_e164))]
    pub phone_number: String,
}

/// Free-form profile payload stored alongside the user record.
///
/// The login request body is copied into this structurally; the profile
/// schema is owned by the mobile client, not by this service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateUserProfileDto {
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// Request body for the normal-user login endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginNormalUserRequest {
    #[serde(flatten)]
    pub profile: serde_json::Map<String, serde_json::Value>,
}

impl From<&LoginNormalUserRequest> for CreateUserProfileDto {
    fn from(request: &LoginNormalUserRequest) -> Self {
        Self {
            fields: request.profile.clone(),
        }
    }
}

/// Loose E.164 shape check: leading `+`, then up to 15 digits.
///
/// The provider already verified the number; this only guards against
/// garbage landing in the user document.
fn validate_e164(value: &str) -> Result<(), ValidationError> {
    let digits = match value.strip_prefix('+') {
        Some(rest) => rest,
        None => return Err(ValidationError::new("phone_number_not_e164")),
    };

    if digits.is_empty() || digits.len() > 15 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::new("phone_number_not_e164"));
    }

    Ok(())
}

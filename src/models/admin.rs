// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin models and provisioning DTOs.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Admin record stored in Firestore, keyed by provider uid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    /// Provider-issued uid (also used as document ID)
    pub admin_id: String,
    /// Email the admin token must match byte-for-byte at login
    pub email: String,
    /// When the admin record was provisioned
    pub created_at: String,
}

/// Fields for provisioning an admin record.
///
/// Validation happens at the request boundary; the directory itself performs
/// no checks.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdminDto {
    #[validate(length(min = 1, message = "adminId must not be empty"))]
    pub admin_id: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
}

/// Free-form profile payload stored alongside the admin record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateAdminProfileDto {
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_create_admin_dto_passes() {
        let dto = CreateAdminDto {
            admin_id: "a1".to_string(),
            email: "a@example.com".to_string(),
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn bad_email_fails() {
        let dto = CreateAdminDto {
            admin_id: "a1".to_string(),
            email: "not-an-email".to_string(),
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }
}

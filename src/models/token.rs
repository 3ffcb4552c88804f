// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Verified ID-token claims consumed by the login paths.

use serde::{Deserialize, Serialize};

/// Claims extracted from a verified Firebase ID token.
///
/// This is a closed record: every field the login paths consume is explicit,
/// and absence must be handled by the caller. Custom role claims
/// (`isNormalUser`, `isAdminUser`) are `None` until the first successful
/// login sets them on the provider identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodedToken {
    /// Stable provider-issued identity (`sub` claim).
    pub uid: String,
    /// Email address, present on admin tokens.
    pub email: Option<String>,
    /// Phone number, present on phone-verified normal-user tokens.
    pub phone_number: Option<String>,
    /// Sign-in method hint from the provider (`"phone"`, `"password"`, ...).
    pub sign_in_provider: Option<String>,
    /// `isNormalUser` custom claim.
    pub is_normal_user: Option<bool>,
    /// `isAdminUser` custom claim.
    pub is_admin_user: Option<bool>,
}

impl DecodedToken {
    /// True once the provider identity is already marked as a normal user.
    pub fn has_normal_user_claim(&self) -> bool {
        self.is_normal_user == Some(true)
    }

    /// True once the provider identity is already marked as an admin.
    pub fn has_admin_user_claim(&self) -> bool {
        self.is_admin_user == Some(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> DecodedToken {
        DecodedToken {
            uid: "u1".to_string(),
            email: None,
            phone_number: None,
            sign_in_provider: None,
            is_normal_user: None,
            is_admin_user: None,
        }
    }

    #[test]
    fn absent_claim_is_not_set() {
        assert!(!token().has_normal_user_claim());
        assert!(!token().has_admin_user_claim());
    }

    #[test]
    fn explicit_false_claim_is_not_set() {
        let mut t = token();
        t.is_normal_user = Some(false);
        assert!(!t.has_normal_user_claim());
    }

    #[test]
    fn true_claim_is_set() {
        let mut t = token();
        t.is_admin_user = Some(true);
        assert!(t.has_admin_user_claim());
    }
}

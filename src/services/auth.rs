// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login orchestration.
//!
//! Each login call is a single sequential chain: storage read, optional
//! first-time provisioning, provider normalization, claim reconciliation.
//! Nothing is retried; any collaborator failure propagates and the next
//! login re-derives state from current records and claims.

use crate::db::UserDirectory;
use crate::error::AppError;
use crate::models::{CreateUserDto, CreateUserProfileDto, DecodedToken, LoginNormalUserRequest};
use crate::services::admins::AdminsService;
use crate::services::identity::{AccountUpdate, CustomClaims, IdentityProvider};
use std::sync::Arc;
use validator::Validate;

/// Decides, per verified token, whether the caller is a normal user or admin,
/// provisions new normal users, and keeps provider custom claims in sync.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserDirectory>,
    admins: AdminsService,
    identity: Arc<dyn IdentityProvider>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        admins: AdminsService,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            users,
            admins,
            identity,
        }
    }

    /// Normal-user login: provision on first login, then normalize the
    /// provider identity.
    pub async fn normal_user_login(
        &self,
        token: &DecodedToken,
        request: &LoginNormalUserRequest,
    ) -> Result<(), AppError> {
        let existing = self.users.find_one_user_by_id(&token.uid).await?;

        if existing.is_none() {
            self.create_first_time_login_user(token, request).await?;
        }

        // The phone number was only a one-time verification channel and must
        // not remain linked to the provider identity. The account must be
        // active post-login regardless of prior state.
        self.identity
            .update_user(
                &token.uid,
                &AccountUpdate {
                    clear_phone_number: true,
                    disabled: false,
                },
            )
            .await?;

        self.sync_role_claim(
            &token.uid,
            token.has_normal_user_claim(),
            CustomClaims::normal_user(),
        )
        .await?;

        tracing::info!(uid = %token.uid, "Normal user login complete");
        Ok(())
    }

    /// Admin login: verify the bearer against the admin store, then sync the
    /// admin claim. No record creation happens on this path.
    pub async fn admin_user_login(&self, token: &DecodedToken) -> Result<(), AppError> {
        let admin = self
            .admins
            .find_one_admin_by_id(&token.uid)
            .await?
            .ok_or_else(|| {
                AppError::Forbidden("User Id does not belong to an admin".to_string())
            })?;

        // Exact string match, no case or whitespace normalization.
        if token.email.as_deref() != Some(admin.email.as_str()) {
            return Err(AppError::Forbidden(
                "Email in access token does not match the admin record".to_string(),
            ));
        }

        self.sync_role_claim(
            &token.uid,
            token.has_admin_user_claim(),
            CustomClaims::admin_user(),
        )
        .await?;

        tracing::info!(uid = %token.uid, "Admin login complete");
        Ok(())
    }

    /// Create the user document (and profile) for a first-time login.
    async fn create_first_time_login_user(
        &self,
        token: &DecodedToken,
        request: &LoginNormalUserRequest,
    ) -> Result<(), AppError> {
        let phone_number = phone_payload(token)?;

        let create_user = CreateUserDto {
            user_id: token.uid.clone(),
            phone_number: phone_number.to_string(),
        };
        create_user.validate()?;

        let profile = CreateUserProfileDto::from(request);

        tracing::info!(uid = %token.uid, "Provisioning first-time login user");

        self.users.create_one_user(&create_user, &profile).await
    }

    /// Idempotent claim reconciliation: write the role claim only when the
    /// incoming token does not already carry it. Safe to re-run on every
    /// login.
    async fn sync_role_claim(
        &self,
        uid: &str,
        already_set: bool,
        claims: CustomClaims,
    ) -> Result<(), AppError> {
        if already_set {
            return Ok(());
        }

        self.identity.set_custom_user_claims(uid, &claims).await
    }
}

/// Require the phone-based first-factor payload on a normal-user token.
///
/// Normal-user identities are provisioned from phone-verified tokens only;
/// any other token shape at this point is a contract violation by the caller.
fn phone_payload(token: &DecodedToken) -> Result<&str, AppError> {
    if let Some(provider) = token.sign_in_provider.as_deref() {
        if provider != "phone" {
            return Err(AppError::BadRequest(format!(
                "Access token was not issued by phone sign-in (got '{}')",
                provider
            )));
        }
    }

    match token.phone_number.as_deref() {
        Some(phone) if !phone.is_empty() => Ok(phone),
        _ => Err(AppError::BadRequest(
            "Access token does not carry a phone number payload".to_string(),
        )),
    }
}

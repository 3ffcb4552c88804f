// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use firegate::config::Config;
use firegate::db::{AdminDirectory, FirestoreDb, UserDirectory};
use firegate::middleware::auth::FirebaseTokenVerifier;
use firegate::AppState;
use firegate::error::AppError;
use firegate::models::{
    Admin, CreateAdminDto, CreateAdminProfileDto, CreateUserDto, CreateUserProfileDto,
    DecodedToken, User,
};
use firegate::services::{AccountUpdate, AdminsService, AuthService, CustomClaims, IdentityProvider};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory user directory recording every create call.
#[derive(Default)]
pub struct MockUserDirectory {
    users: Mutex<HashMap<String, User>>,
    pub create_calls: Mutex<Vec<(CreateUserDto, CreateUserProfileDto)>>,
    pub fail_creates: bool,
}

impl MockUserDirectory {
    pub fn with_user(user: User) -> Self {
        let dir = Self::default();
        dir.users.lock().unwrap().insert(user.user_id.clone(), user);
        dir
    }

    pub fn failing() -> Self {
        Self {
            fail_creates: true,
            ..Self::default()
        }
    }

    pub fn create_call_count(&self) -> usize {
        self.create_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl UserDirectory for MockUserDirectory {
    async fn find_one_user_by_id(&self, user_id: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().unwrap().get(user_id).cloned())
    }

    async fn create_one_user(
        &self,
        user: &CreateUserDto,
        profile: &CreateUserProfileDto,
    ) -> Result<(), AppError> {
        self.create_calls
            .lock()
            .unwrap()
            .push((user.clone(), profile.clone()));

        if self.fail_creates {
            return Err(AppError::Database("write rejected".to_string()));
        }

        self.users.lock().unwrap().insert(
            user.user_id.clone(),
            User {
                user_id: user.user_id.clone(),
                phone_number: user.phone_number.clone(),
                created_at: "2026-01-01T00:00:00Z".to_string(),
            },
        );
        Ok(())
    }
}

/// In-memory admin directory.
#[derive(Default)]
pub struct MockAdminDirectory {
    admins: Mutex<HashMap<String, Admin>>,
}

impl MockAdminDirectory {
    pub fn with_admin(admin_id: &str, email: &str) -> Self {
        let dir = Self::default();
        dir.admins.lock().unwrap().insert(
            admin_id.to_string(),
            Admin {
                admin_id: admin_id.to_string(),
                email: email.to_string(),
                created_at: "2026-01-01T00:00:00Z".to_string(),
            },
        );
        dir
    }
}

#[async_trait]
impl AdminDirectory for MockAdminDirectory {
    async fn create_one_admin(
        &self,
        admin: &CreateAdminDto,
        _profile: Option<&CreateAdminProfileDto>,
    ) -> Result<Admin, AppError> {
        let record = Admin {
            admin_id: admin.admin_id.clone(),
            email: admin.email.clone(),
            created_at: "2026-01-01T00:00:00Z".to_string(),
        };
        self.admins
            .lock()
            .unwrap()
            .insert(record.admin_id.clone(), record.clone());
        Ok(record)
    }

    async fn find_one_admin_by_id(&self, admin_id: &str) -> Result<Option<Admin>, AppError> {
        Ok(self.admins.lock().unwrap().get(admin_id).cloned())
    }

    async fn find_all_admins(&self) -> Result<Vec<Admin>, AppError> {
        Ok(self.admins.lock().unwrap().values().cloned().collect())
    }
}

/// Identity provider fake that records every call.
#[derive(Default)]
pub struct RecordingIdentityProvider {
    pub update_calls: Mutex<Vec<(String, AccountUpdate)>>,
    pub claims_calls: Mutex<Vec<(String, CustomClaims)>>,
}

impl RecordingIdentityProvider {
    pub fn update_count(&self) -> usize {
        self.update_calls.lock().unwrap().len()
    }

    pub fn claims_count(&self) -> usize {
        self.claims_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl IdentityProvider for RecordingIdentityProvider {
    async fn update_user(&self, uid: &str, update: &AccountUpdate) -> Result<(), AppError> {
        self.update_calls
            .lock()
            .unwrap()
            .push((uid.to_string(), *update));
        Ok(())
    }

    async fn set_custom_user_claims(
        &self,
        uid: &str,
        claims: &CustomClaims,
    ) -> Result<(), AppError> {
        self.claims_calls
            .lock()
            .unwrap()
            .push((uid.to_string(), *claims));
        Ok(())
    }
}

/// Wire an AuthService from the given fakes.
#[allow(dead_code)]
pub fn auth_service(
    users: Arc<MockUserDirectory>,
    admins: Arc<MockAdminDirectory>,
    identity: Arc<RecordingIdentityProvider>,
) -> AuthService {
    AuthService::new(users, AdminsService::new(admins), identity)
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = FirestoreDb::new_mock();

    let token_verifier = Arc::new(
        FirebaseTokenVerifier::new_with_static_key(
            &config.gcp_project_id,
            "test-kid",
            jsonwebtoken::DecodingKey::from_secret(b"unused"),
        )
        .expect("static verifier"),
    );

    let admins_service = AdminsService::new(Arc::new(MockAdminDirectory::default()));
    let auth_service = AuthService::new(
        Arc::new(MockUserDirectory::default()),
        admins_service.clone(),
        Arc::new(RecordingIdentityProvider::default()),
    );

    let state = Arc::new(AppState {
        config,
        db,
        token_verifier,
        auth_service,
        admins_service,
    });

    (firegate::routes::create_router(state.clone()), state)
}

/// A verified token as issued by phone sign-in.
#[allow(dead_code)]
pub fn phone_token(uid: &str, phone_number: &str) -> DecodedToken {
    DecodedToken {
        uid: uid.to_string(),
        email: None,
        phone_number: Some(phone_number.to_string()),
        sign_in_provider: Some("phone".to_string()),
        is_normal_user: None,
        is_admin_user: None,
    }
}

/// A verified token as issued for an admin account.
#[allow(dead_code)]
pub fn admin_token(uid: &str, email: &str) -> DecodedToken {
    DecodedToken {
        uid: uid.to_string(),
        email: Some(email.to_string()),
        phone_number: None,
        sign_in_provider: Some("password".to_string()),
        is_normal_user: None,
        is_admin_user: None,
    }
}

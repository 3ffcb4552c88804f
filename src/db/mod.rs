// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer (Firestore) and the directory ports the login paths use.

pub mod firestore;

pub use firestore::FirestoreDb;

use crate::error::AppError;
use crate::models::{Admin, CreateAdminDto, CreateAdminProfileDto, CreateUserDto, CreateUserProfileDto, User};
use async_trait::async_trait;

/// Keyed store of normal-user records.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Point lookup by provider uid. Absence is not an error.
    async fn find_one_user_by_id(&self, user_id: &str) -> Result<Option<User>, AppError>;

    /// Persist a first-time user record together with its profile document.
    async fn create_one_user(
        &self,
        user: &CreateUserDto,
        profile: &CreateUserProfileDto,
    ) -> Result<(), AppError>;
}

/// Keyed store of admin records.
#[async_trait]
pub trait AdminDirectory: Send + Sync {
    /// Persist an admin record (and optional profile). No validation here;
    /// callers validate at the request boundary.
    async fn create_one_admin(
        &self,
        admin: &CreateAdminDto,
        profile: Option<&CreateAdminProfileDto>,
    ) -> Result<Admin, AppError>;

    /// Point lookup by provider uid. Absence is not an error.
    async fn find_one_admin_by_id(&self, admin_id: &str) -> Result<Option<Admin>, AppError>;

    /// All admin records, in no particular order.
    async fn find_all_admins(&self) -> Result<Vec<Admin>, AppError>;
}

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const USER_PROFILES: &str = "user_profiles";
    pub const ADMINS: &str = "admins";
    pub const ADMIN_PROFILES: &str = "admin_profiles";
}

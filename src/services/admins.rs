// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin directory accessor.

use crate::db::AdminDirectory;
use crate::error::AppError;
use crate::models::{Admin, CreateAdminDto, CreateAdminProfileDto};
use std::sync::Arc;

/// Thin accessor over the admin store. Provisioning validation happens at the
/// request boundary, not here.
#[derive(Clone)]
pub struct AdminsService {
    store: Arc<dyn AdminDirectory>,
}

impl AdminsService {
    pub fn new(store: Arc<dyn AdminDirectory>) -> Self {
        Self { store }
    }

    /// Persist an admin record, with an optional profile document.
    pub async fn create_one_admin(
        &self,
        admin: &CreateAdminDto,
        profile: Option<&CreateAdminProfileDto>,
    ) -> Result<Admin, AppError> {
        self.store.create_one_admin(admin, profile).await
    }

    /// Point lookup by provider uid.
    pub async fn find_one_admin_by_id(&self, admin_id: &str) -> Result<Option<Admin>, AppError> {
        self.store.find_one_admin_by_id(admin_id).await
    }

    /// All admin records, or `None` when the store has none.
    pub async fn find_all_admin_users(&self) -> Result<Option<Vec<Admin>>, AppError> {
        let admins = self.store.find_all_admins().await?;
        if admins.is_empty() {
            return Ok(None);
        }
        Ok(Some(admins))
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod admins;
pub mod auth;
pub mod identity;

pub use admins::AdminsService;
pub use auth::AuthService;
pub use identity::{AccountUpdate, CustomClaims, GoogleIdentityClient, IdentityProvider};

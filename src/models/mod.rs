// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod admin;
pub mod token;
pub mod user;

pub use admin::{Admin, CreateAdminDto, CreateAdminProfileDto};
pub use token::DecodedToken;
pub use user::{CreateUserDto, CreateUserProfileDto, LoginNormalUserRequest, User};

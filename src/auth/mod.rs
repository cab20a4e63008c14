// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Username/password accounts with server-signed JWT sessions.
//!
//! ## Auth Flow
//!
//! 1. Client signs up (`POST /api/auth/signup`), the password is stored as an
//!    argon2 hash
//! 2. Client logs in and receives an access token and a refresh token, both
//!    with the username as subject
//! 3. Client sends `Authorization: Bearer <access token>` on every order call
//! 4. Server verifies signature, expiry and token type, then looks the
//!    subject up in the user store on every request
//! 5. When the access token expires the client trades its refresh token at
//!    `POST /api/auth/refresh` for a new access token
//!
//! ## Security
//!
//! - Tokens are HS256-signed with `SECRET_KEY`
//! - Refresh tokens are never accepted as access tokens
//! - Clock skew tolerance is 60 seconds

pub mod claims;
pub mod error;
pub mod extractor;
pub mod password;
pub mod roles;
pub mod service;
pub mod tokens;

pub use claims::AuthenticatedUser;
pub use error::AuthError;
pub use extractor::{Auth, RefreshAuth};
pub use roles::Role;
pub use service::AuthService;
pub use tokens::{TokenPair, TokenService};

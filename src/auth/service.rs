// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account operations: sign-up, login, token refresh and the user directory.

use crate::{
    models::SignUpRequest,
    policy,
    storage::{NewUser, PizzaDatabase, StoredUser, UserRepository},
};

use super::{
    password::{hash_password, placeholder_hash, verify_password},
    tokens::{TokenPair, TokenService},
    AuthError, AuthenticatedUser,
};

/// Account operations backed by the user store.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    tokens: &'a TokenService,
}

impl<'a> AuthService<'a> {
    pub fn new(db: &'a PizzaDatabase, tokens: &'a TokenService) -> Self {
        Self {
            users: UserRepository::new(db),
            tokens,
        }
    }

    /// Register a new user. Only a salted hash of the password is stored.
    ///
    /// # Errors
    /// - `InvalidSignUp` if username, email or password is empty
    /// - `DuplicateEmail` / `DuplicateUsername` on an exact match
    pub fn sign_up(&self, request: SignUpRequest) -> Result<StoredUser, AuthError> {
        for (field, value) in [
            ("username", &request.username),
            ("email", &request.email),
            ("password", &request.password),
        ] {
            if value.trim().is_empty() {
                return Err(AuthError::InvalidSignUp(format!("{field} must not be empty")));
            }
        }

        let password_hash = hash_password(&request.password)?;
        let user = self
            .users
            .create(NewUser {
                username: request.username,
                email: request.email,
                password_hash,
                is_staff: request.is_staff.unwrap_or(false),
                is_active: request.is_active.unwrap_or(true),
            })
            .inspect_err(|e| tracing::info!(error = %e, "Sign-up rejected"))?;

        tracing::info!(user_id = user.id, is_staff = user.is_staff, "User signed up");
        Ok(user)
    }

    /// Verify credentials and issue an access + refresh token pair.
    ///
    /// An unknown username and a wrong password are indistinguishable to
    /// the caller, in the response and in the work done: an unknown user is
    /// checked against a placeholder hash.
    pub fn login(&self, username: &str, password: &str) -> Result<TokenPair, AuthError> {
        let user = self.users.find_by_username(username)?;
        let matches = verify_password(password, credential_hash(user.as_ref())?)?;

        let Some(user) = user else {
            tracing::warn!("Login failed: unknown username");
            return Err(AuthError::InvalidCredentials);
        };
        if !matches {
            tracing::warn!(user_id = user.id, "Login failed: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let pair = self.tokens.issue_pair(&user.username)?;
        tracing::info!(user_id = user.id, "User logged in");
        Ok(pair)
    }

    /// Mint a new access token from a refresh token.
    pub fn refresh(&self, refresh_token: &str) -> Result<String, AuthError> {
        self.tokens.refresh(refresh_token)
    }

    /// Resolve a token subject to the caller's identity.
    ///
    /// # Errors
    /// `UserNotFound` if the username no longer exists.
    pub fn resolve(&self, username: &str) -> Result<AuthenticatedUser, AuthError> {
        self.users
            .find_by_username(username)?
            .map(|user| AuthenticatedUser::from_user(&user))
            .ok_or(AuthError::UserNotFound)
    }

    /// Full record of the caller.
    pub fn current_user(&self, actor: &AuthenticatedUser) -> Result<StoredUser, AuthError> {
        self.users
            .get(actor.user_id)?
            .ok_or(AuthError::UserNotFound)
    }

    /// Every registered user. Staff only.
    pub fn list_users(&self, actor: &AuthenticatedUser) -> Result<Vec<StoredUser>, AuthError> {
        policy::require_staff(actor).map_err(|_| {
            tracing::warn!(user_id = actor.user_id, "Non-staff user attempted to list users");
            AuthError::InsufficientPermissions
        })?;
        Ok(self.users.list_all()?)
    }
}

/// Hash a login attempt is verified against.
fn credential_hash(user: Option<&StoredUser>) -> Result<&str, AuthError> {
    match user {
        Some(user) => Ok(user.password_hash.as_str()),
        None => placeholder_hash(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;

    fn sign_up_request(username: &str, email: &str, is_staff: bool) -> SignUpRequest {
        SignUpRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: "password".to_string(),
            is_staff: Some(is_staff),
            is_active: None,
        }
    }

    fn setup() -> (PizzaDatabase, TokenService) {
        (
            PizzaDatabase::in_memory().unwrap(),
            TokenService::new(b"test-secret"),
        )
    }

    #[test]
    fn sign_up_stores_hash_not_plaintext() {
        let (db, tokens) = setup();
        let service = AuthService::new(&db, &tokens);

        let user = service
            .sign_up(sign_up_request("johndoe", "john@example.com", false))
            .unwrap();
        assert_ne!(user.password_hash, "password");
        assert!(user.is_active);
        assert!(!user.is_staff);
    }

    #[test]
    fn sign_up_rejects_duplicates() {
        let (db, tokens) = setup();
        let service = AuthService::new(&db, &tokens);
        service
            .sign_up(sign_up_request("johndoe", "john@example.com", false))
            .unwrap();

        assert!(matches!(
            service.sign_up(sign_up_request("other", "john@example.com", false)),
            Err(AuthError::DuplicateEmail)
        ));
        assert!(matches!(
            service.sign_up(sign_up_request("johndoe", "other@example.com", false)),
            Err(AuthError::DuplicateUsername)
        ));
        // Exact match only
        assert!(service
            .sign_up(sign_up_request("JohnDoe", "John@example.com", false))
            .is_ok());
    }

    #[test]
    fn sign_up_rejects_empty_fields() {
        let (db, tokens) = setup();
        let service = AuthService::new(&db, &tokens);

        let err = service
            .sign_up(sign_up_request("  ", "john@example.com", false))
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidSignUp(_)));
    }

    #[test]
    fn login_issues_tokens_bound_to_username() {
        let (db, tokens) = setup();
        let service = AuthService::new(&db, &tokens);
        service
            .sign_up(sign_up_request("johndoe", "john@example.com", false))
            .unwrap();

        let pair = service.login("johndoe", "password").unwrap();
        assert_eq!(tokens.authenticate(&pair.access_token).unwrap(), "johndoe");

        let access = service.refresh(&pair.refresh_token).unwrap();
        assert_eq!(tokens.authenticate(&access).unwrap(), "johndoe");
    }

    #[test]
    fn wrong_password_and_unknown_user_look_the_same() {
        let (db, tokens) = setup();
        let service = AuthService::new(&db, &tokens);
        service
            .sign_up(sign_up_request("johndoe", "john@example.com", false))
            .unwrap();

        assert!(matches!(
            service.login("johndoe", "wrong"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            service.login("nobody", "wrong"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn unknown_user_is_checked_against_a_real_hash() {
        let (db, tokens) = setup();
        let service = AuthService::new(&db, &tokens);
        let user = service
            .sign_up(sign_up_request("johndoe", "john@example.com", false))
            .unwrap();

        assert_eq!(credential_hash(Some(&user)).unwrap(), user.password_hash);

        let fallback = credential_hash(None).unwrap();
        assert_eq!(fallback, placeholder_hash().unwrap());
        assert!(!verify_password("wrong", fallback).unwrap());
    }

    #[test]
    fn resolve_maps_staff_flag_to_role() {
        let (db, tokens) = setup();
        let service = AuthService::new(&db, &tokens);
        service
            .sign_up(sign_up_request("boss", "boss@example.com", true))
            .unwrap();

        assert_eq!(service.resolve("boss").unwrap().role, Role::Staff);
        assert!(matches!(
            service.resolve("ghost"),
            Err(AuthError::UserNotFound)
        ));
    }

    #[test]
    fn list_users_is_staff_only() {
        let (db, tokens) = setup();
        let service = AuthService::new(&db, &tokens);
        service
            .sign_up(sign_up_request("johndoe", "john@example.com", false))
            .unwrap();
        service
            .sign_up(sign_up_request("boss", "boss@example.com", true))
            .unwrap();

        let customer = service.resolve("johndoe").unwrap();
        let staff = service.resolve("boss").unwrap();

        assert!(matches!(
            service.list_users(&customer),
            Err(AuthError::InsufficientPermissions)
        ));
        let users = service.list_users(&staff).unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].username, "johndoe");
    }
}

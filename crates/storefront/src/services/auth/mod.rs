//! Authentication service.
//!
//! Customers and admins sign in against the mock accounts in the catalog.
//! There is no password hashing or token refresh; owners authenticate with
//! the backend instead (see [`crate::backend::BackendClient::owner_login`]).

mod error;

pub use error::AuthError;

use brewline_core::catalog::User;
use brewline_core::{Email, MembershipLevel, Points, UserRole};

use crate::catalog::Catalog;
use crate::services::SimulatedLatency;

/// Authentication service.
pub struct AuthService<'a> {
    catalog: &'a Catalog,
    latency: SimulatedLatency,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(catalog: &'a Catalog, latency: SimulatedLatency) -> Self {
        Self { catalog, latency }
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` for a malformed address and
    /// `AuthError::InvalidCredentials` when no account matches.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        self.latency.wait().await;

        self.catalog
            .authenticate(&email, password)
            .cloned()
            .ok_or(AuthError::InvalidCredentials)
    }

    /// Create a customer account and return it.
    ///
    /// The account only lives in the caller's auth store; it is not added to
    /// the catalog.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` for a malformed address and
    /// `AuthError::UserAlreadyExists` when the email is a seeded account.
    pub async fn signup(&self, email: &str, name: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        self.latency.wait().await;

        if self.catalog.email_registered(&email) {
            return Err(AuthError::UserAlreadyExists);
        }

        let user = User {
            id: self.catalog.next_user_id(),
            email,
            name: name.trim().to_owned(),
            role: UserRole::Customer,
            points: Points::ZERO,
            level: MembershipLevel::Green,
            stamps: 0,
            verified: false,
        };
        tracing::info!(user_id = %user.id, "Customer signed up");
        Ok(user)
    }
}

//! # Identity Provider
//!
//! Sign-up, sign-in and bearer tokens sit behind [`IdentityProvider`] so the
//! rest of the backend never sees a password or a signing key. The shipped
//! implementation, [`CredentialStore`], keeps Argon2id password hashes in the
//! `credentials` collection and issues HMAC-SHA256 signed tokens. A hosted
//! identity service can take its place by implementing the same trait.
//!
//! Profiles (`users` collection) and credentials are separate records that
//! share an id: the provider hands out the uid, the data layer stores the
//! profile under it.

mod credentials;
mod token;

pub use credentials::{Credential, CredentialStore};
pub use token::{TokenClaims, TokenSigner};

use crate::store::StoreError;
use common::model::user::Role;
use thiserror::Error;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("an account with this email already exists")]
    EmailTaken,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("current password is incorrect")]
    WrongPassword,

    #[error("no credentials for user {0}")]
    UnknownUser(String),

    #[error("malformed token")]
    MalformedToken,

    #[error("invalid token signature")]
    BadSignature,

    #[error("token expired")]
    Expired,

    #[error("token signing key rejected")]
    SigningKey,

    #[error("cannot encode token claims: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub trait IdentityProvider: Send + Sync {
    /// Creates credentials and returns the new user id.
    fn register(&self, email: &str, password: &str) -> Result<String, AuthError>;

    /// Returns the user id the credentials belong to.
    fn authenticate(&self, email: &str, password: &str) -> Result<String, AuthError>;

    fn issue_token(&self, uid: &str, role: Role) -> Result<String, AuthError>;

    fn verify_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    fn change_password(&self, uid: &str, current: &str, new: &str) -> Result<(), AuthError>;

    fn remove(&self, uid: &str) -> Result<(), AuthError>;
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

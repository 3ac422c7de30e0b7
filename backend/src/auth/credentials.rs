use super::{normalize_email, AuthError, IdentityProvider, TokenClaims, TokenSigner};
use crate::store::{self, Collection, DocumentStore, Record};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use common::model::user::Role;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub id: String,
    pub email: String,
    /// Argon2id hash in PHC string format.
    pub password_hash: String,
}

impl Record for Credential {
    const COLLECTION: Collection = Collection::Credentials;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Self-hosted identity provider backed by the document store.
pub struct CredentialStore {
    store: Arc<dyn DocumentStore>,
    signer: TokenSigner,
    params: Params,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn DocumentStore>, signer: TokenSigner) -> Self {
        Self {
            store,
            signer,
            params: Params::default(),
        }
    }

    /// Overrides the Argon2 cost parameters (tests use cheap ones).
    pub fn with_hash_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    fn hasher(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        self.hasher()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }

    fn matches(&self, password: &str, stored: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(stored).map_err(|e| AuthError::Hashing(e.to_string()))?;
        Ok(self
            .hasher()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<Credential>, AuthError> {
        let query = store::select::<Credential>()
            .eq("email", normalize_email(email))
            .limit(1);
        Ok(store::fetch_where::<Credential>(self.store.as_ref(), &query)?
            .into_iter()
            .next())
    }
}

impl IdentityProvider for CredentialStore {
    fn register(&self, email: &str, password: &str) -> Result<String, AuthError> {
        if self.find_by_email(email)?.is_some() {
            return Err(AuthError::EmailTaken);
        }
        let credential = Credential {
            id: Uuid::new_v4().to_string(),
            email: normalize_email(email),
            password_hash: self.hash(password)?,
        };
        store::save(self.store.as_ref(), &credential)?;
        debug!("registered credentials for {}", credential.id);
        Ok(credential.id)
    }

    fn authenticate(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let credential = self
            .find_by_email(email)?
            .ok_or(AuthError::InvalidCredentials)?;
        if self.matches(password, &credential.password_hash)? {
            Ok(credential.id)
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }

    fn issue_token(&self, uid: &str, role: Role) -> Result<String, AuthError> {
        self.signer.sign(uid, role)
    }

    fn verify_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        self.signer.verify(token)
    }

    fn change_password(&self, uid: &str, current: &str, new: &str) -> Result<(), AuthError> {
        let credential = store::fetch::<Credential>(self.store.as_ref(), uid)?
            .ok_or_else(|| AuthError::UnknownUser(uid.to_string()))?;
        if !self.matches(current, &credential.password_hash)? {
            return Err(AuthError::WrongPassword);
        }
        store::patch::<Credential>(
            self.store.as_ref(),
            uid,
            json!({ "passwordHash": self.hash(new)? }),
        )?;
        Ok(())
    }

    fn remove(&self, uid: &str) -> Result<(), AuthError> {
        store::remove::<Credential>(self.store.as_ref(), uid)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;
    use chrono::Duration;

    fn provider() -> CredentialStore {
        let store: Arc<dyn DocumentStore> =
            Arc::new(SqliteStore::open_in_memory().expect("store"));
        CredentialStore::new(store, TokenSigner::new("secret", Duration::hours(1)))
            .with_hash_params(Params::new(1024, 1, 1, None).expect("params"))
    }

    #[test]
    fn register_then_authenticate() {
        let auth = provider();
        let uid = auth.register("Alice@Example.com ", "secret1").expect("register");
        assert_eq!(auth.authenticate("alice@example.com", "secret1").expect("login"), uid);
        assert!(matches!(
            auth.authenticate("alice@example.com", "wrong"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.authenticate("bob@example.com", "secret1"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn duplicate_emails_are_rejected() {
        let auth = provider();
        auth.register("alice@example.com", "secret1").expect("register");
        assert!(matches!(
            auth.register("ALICE@example.com", "other-pass"),
            Err(AuthError::EmailTaken)
        ));
    }

    #[test]
    fn passwords_are_not_stored_in_clear() {
        let store = Arc::new(SqliteStore::open_in_memory().expect("store"));
        let auth = CredentialStore::new(store.clone(), TokenSigner::new("s", Duration::hours(1)))
            .with_hash_params(Params::new(1024, 1, 1, None).expect("params"));
        let uid = auth.register("a@b.co", "secret1").expect("register");
        let credential = store::fetch::<Credential>(store.as_ref(), &uid)
            .expect("fetch")
            .expect("exists");
        assert!(credential.password_hash.starts_with("$argon2id$"));
        assert!(!credential.password_hash.contains("secret1"));
    }

    #[test]
    fn change_password_requires_current_password() {
        let auth = provider();
        let uid = auth.register("a@b.co", "secret1").expect("register");
        assert!(matches!(
            auth.change_password(&uid, "nope", "secret2"),
            Err(AuthError::WrongPassword)
        ));
        auth.change_password(&uid, "secret1", "secret2").expect("change");
        assert!(auth.authenticate("a@b.co", "secret1").is_err());
        assert_eq!(auth.authenticate("a@b.co", "secret2").expect("login"), uid);
    }

    #[test]
    fn removed_credentials_no_longer_authenticate() {
        let auth = provider();
        let uid = auth.register("a@b.co", "secret1").expect("register");
        auth.remove(&uid).expect("remove");
        assert!(auth.authenticate("a@b.co", "secret1").is_err());
    }
}

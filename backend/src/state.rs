use crate::auth::{CredentialStore, IdentityProvider, TokenSigner};
use crate::config::Config;
use crate::storage::{LocalObjectStorage, ObjectStorage};
use crate::store::{DocumentStore, SqliteStore};
use chrono::Duration;
use log::info;
use std::sync::Arc;

/// Everything a request handler may touch. One instance is built at startup
/// and shared by every worker through `web::Data`; handlers never keep state
/// of their own.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn DocumentStore>,
    pub storage: Arc<dyn ObjectStorage>,
    pub auth: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn DocumentStore>,
        storage: Arc<dyn ObjectStorage>,
        auth: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store,
            storage,
            auth,
        }
    }

    /// Opens the SQLite store and the bucket directory named in `config`.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let store: Arc<dyn DocumentStore> = Arc::new(SqliteStore::open(&config.database_path)?);
        info!("document store at {}", config.database_path.display());

        let storage: Arc<dyn ObjectStorage> = Arc::new(LocalObjectStorage::new(
            config.storage_bucket.clone(),
            &config.storage_public_url,
        )?);
        info!("object storage at {}", config.storage_bucket.display());

        let signer = TokenSigner::new(
            config.service_account.private_key.as_bytes(),
            Duration::seconds(config.token_ttl_secs),
        );
        let auth: Arc<dyn IdentityProvider> =
            Arc::new(CredentialStore::new(store.clone(), signer));

        Ok(Self::new(config, store, storage, auth))
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    pub fn storage(&self) -> &dyn ObjectStorage {
        self.storage.as_ref()
    }
}

#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use alant_backend::auth::{CredentialStore, IdentityProvider, TokenSigner};
use alant_backend::config::Config;
use alant_backend::state::AppState;
use alant_backend::storage::{LocalObjectStorage, ObjectStorage};
use alant_backend::store::{DocumentStore, SqliteStore};
use argon2::Params;
use chrono::Duration;
use common::model::user::Role;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;

/// Origin the production-mode test app accepts for state-changing requests.
pub const ORIGIN: &str = "http://localhost:8080";

const ACCOUNT: &str =
    r#"{"project_id":"alant-test","client_email":"svc@alant.test","private_key":"integration-key"}"#;

pub struct TestEnv {
    pub state: AppState,
    pub bucket: TempDir,
}

fn production_config(bucket: &TempDir) -> Config {
    let vars: HashMap<String, String> = [
        ("ALANT_ENV", "production"),
        ("ALANT_AUTH_API_KEY", "test-key"),
        ("ALANT_AUTH_PROJECT_ID", "alant-test"),
        ("ALANT_AUTH_APP_ID", "alant-test-app"),
        ("ALANT_SERVICE_ACCOUNT", ACCOUNT),
        ("ALANT_MAX_UPLOAD_MB", "1"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .chain([(
        "ALANT_STORAGE_BUCKET".to_string(),
        bucket.path().display().to_string(),
    )])
    .collect();
    Config::from_vars(vars).expect("test config")
}

/// Production-mode state over an in-memory store and a temporary bucket.
pub fn test_env() -> TestEnv {
    let bucket = tempfile::tempdir().expect("bucket dir");
    let storage: Arc<dyn ObjectStorage> = Arc::new(
        LocalObjectStorage::new(bucket.path(), "http://localhost:8080/storage")
            .expect("local storage"),
    );
    test_env_with_storage(bucket, storage)
}

/// Same as [`test_env`] but with a caller-supplied object storage.
pub fn test_env_with_storage(bucket: TempDir, storage: Arc<dyn ObjectStorage>) -> TestEnv {
    let config = production_config(&bucket);
    env_from(config, bucket, storage)
}

/// Development-mode state: every setting defaulted, origin check off.
pub fn dev_env() -> TestEnv {
    let bucket = tempfile::tempdir().expect("bucket dir");
    let vars: HashMap<String, String> = [(
        "ALANT_STORAGE_BUCKET".to_string(),
        bucket.path().display().to_string(),
    )]
    .into_iter()
    .collect();
    let config = Config::from_vars(vars).expect("dev config");
    assert!(config.is_development());
    let storage: Arc<dyn ObjectStorage> = Arc::new(
        LocalObjectStorage::new(bucket.path(), "http://localhost:8080/storage")
            .expect("local storage"),
    );
    env_from(config, bucket, storage)
}

fn env_from(config: Config, bucket: TempDir, storage: Arc<dyn ObjectStorage>) -> TestEnv {
    let store: Arc<dyn DocumentStore> =
        Arc::new(SqliteStore::open_in_memory().expect("in-memory store"));
    let signer = TokenSigner::new(
        config.service_account.private_key.as_bytes(),
        Duration::seconds(config.token_ttl_secs),
    );
    let auth: Arc<dyn IdentityProvider> = Arc::new(
        CredentialStore::new(store.clone(), signer)
            .with_hash_params(Params::new(1024, 1, 1, None).expect("argon2 params")),
    );
    TestEnv {
        state: AppState::new(config, store, storage, auth),
        bucket,
    }
}

pub fn get(uri: &str, token: &str) -> TestRequest {
    TestRequest::get()
        .uri(uri)
        .insert_header(("authorization", format!("Bearer {}", token)))
}

/// A same-origin JSON POST without credentials.
pub fn post_public(uri: &str, body: Value) -> TestRequest {
    TestRequest::post()
        .uri(uri)
        .insert_header(("origin", ORIGIN))
        .insert_header(("referer", format!("{}/login", ORIGIN)))
        .set_json(body)
}

pub fn post(uri: &str, token: &str, body: Value) -> TestRequest {
    post_public(uri, body).insert_header(("authorization", format!("Bearer {}", token)))
}

pub fn put(uri: &str, token: &str, body: Value) -> TestRequest {
    TestRequest::put()
        .uri(uri)
        .insert_header(("origin", ORIGIN))
        .insert_header(("referer", format!("{}/settings", ORIGIN)))
        .insert_header(("authorization", format!("Bearer {}", token)))
        .set_json(body)
}

pub fn delete(uri: &str, token: &str) -> TestRequest {
    TestRequest::delete()
        .uri(uri)
        .insert_header(("origin", ORIGIN))
        .insert_header(("referer", format!("{}/", ORIGIN)))
        .insert_header(("authorization", format!("Bearer {}", token)))
}

pub async fn read<B: MessageBody>(resp: ServiceResponse<B>) -> (StatusCode, Value) {
    let status = resp.status();
    let bytes = test::read_body(resp).await;
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

pub fn signup_body(name: &str, email: &str, role: Role) -> Value {
    json!({
        "name": name,
        "email": email,
        "password": "secret1",
        "role": role,
    })
}

/// Writes a user straight into the store and returns a token for them,
/// bypassing sign-up (which refuses admins).
pub fn seed_user(env: &TestEnv, name: &str, email: &str, role: Role) -> (String, String) {
    let state = &env.state;
    let uid = state.auth.register(email, "secret1").expect("register");
    alant_backend::data::users::create_user(state.store(), &uid, name, email, role)
        .expect("create user");
    let token = state.auth.issue_token(&uid, role).expect("token");
    (uid, token)
}

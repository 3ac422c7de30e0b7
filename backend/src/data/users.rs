use super::batching::records_where_in;
use super::{require_text, ServiceError};
use crate::auth::normalize_email;
use crate::store::{self, Direction, DocumentStore};
use chrono::Utc;
use common::model::user::{Role, User};
use serde_json::json;

pub fn get_user(store: &dyn DocumentStore, id: &str) -> Result<Option<User>, ServiceError> {
    Ok(store::fetch::<User>(store, id)?)
}

pub fn require_user(store: &dyn DocumentStore, id: &str) -> Result<User, ServiceError> {
    get_user(store, id)?.ok_or_else(|| ServiceError::NotFound("user".to_string()))
}

pub fn find_user_by_email(
    store: &dyn DocumentStore,
    email: &str,
) -> Result<Option<User>, ServiceError> {
    let query = store::select::<User>()
        .eq("email", normalize_email(email))
        .limit(1);
    Ok(store::fetch_where::<User>(store, &query)?.into_iter().next())
}

/// Stores the profile for an account the identity provider already created.
pub fn create_user(
    store: &dyn DocumentStore,
    id: &str,
    name: &str,
    email: &str,
    role: Role,
) -> Result<User, ServiceError> {
    let user = User::new(id.to_string(), require_text(name, "name")?, email, role);
    store::save(store, &user)?;
    Ok(user)
}

pub fn update_profile(
    store: &dyn DocumentStore,
    id: &str,
    name: &str,
) -> Result<User, ServiceError> {
    let name = require_text(name, "name")?;
    require_user(store, id)?;
    store::patch::<User>(store, id, json!({ "name": name }))?;
    require_user(store, id)
}

pub fn record_login(store: &dyn DocumentStore, id: &str) -> Result<User, ServiceError> {
    require_user(store, id)?;
    store::patch::<User>(store, id, json!({ "lastLogin": Utc::now() }))?;
    require_user(store, id)
}

/// Removes the profile only. Enrollments, grades and files that reference the
/// user are left as they are.
pub fn delete_user(store: &dyn DocumentStore, id: &str) -> Result<(), ServiceError> {
    store::remove::<User>(store, id)?;
    Ok(())
}

pub fn list_users(store: &dyn DocumentStore) -> Result<Vec<User>, ServiceError> {
    let query = store::select::<User>().order_by("name", Direction::Asc);
    Ok(store::fetch_where::<User>(store, &query)?)
}

pub fn get_users_by_ids(
    store: &dyn DocumentStore,
    ids: &[String],
) -> Result<Vec<User>, ServiceError> {
    Ok(records_where_in::<User>(store, "id", ids)?)
}

pub fn set_role(store: &dyn DocumentStore, id: &str, role: Role) -> Result<User, ServiceError> {
    require_user(store, id)?;
    store::patch::<User>(store, id, json!({ "role": role }))?;
    require_user(store, id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;

    #[test]
    fn emails_match_case_insensitively() {
        let store = SqliteStore::open_in_memory().expect("store");
        create_user(&store, "u1", "Ann", " Ann@Example.COM", Role::Student).expect("create");
        let found = find_user_by_email(&store, "ann@example.com")
            .expect("lookup")
            .expect("found");
        assert_eq!(found.id, "u1");
        assert_eq!(found.email, "ann@example.com");
    }

    #[test]
    fn lookups_by_id_span_several_batches() {
        let store = SqliteStore::open_in_memory().expect("store");
        let ids: Vec<String> = (0..23).map(|i| format!("u{:02}", i)).collect();
        for id in &ids {
            create_user(&store, id, id, &format!("{}@x.io", id), Role::Student).expect("create");
        }
        let users = get_users_by_ids(&store, &ids).expect("batched lookup");
        assert_eq!(users.len(), 23);
        assert_eq!(users[0].id, "u00");
        assert_eq!(users[22].id, "u22");
    }

    #[test]
    fn role_changes_and_logins_are_persisted() {
        let store = SqliteStore::open_in_memory().expect("store");
        create_user(&store, "u1", "Ann", "ann@x.io", Role::Student).expect("create");
        assert_eq!(set_role(&store, "u1", Role::Professor).expect("role").role, Role::Professor);
        assert!(record_login(&store, "u1").expect("login").last_login.is_some());
        assert!(matches!(set_role(&store, "nobody", Role::Admin), Err(ServiceError::NotFound(_))));
    }
}

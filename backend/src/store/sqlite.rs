use super::{Collection, Direction, DocumentStore, Filter, Query, StoreError, WriteOp, MAX_IN_VALUES};
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS documents (
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    data TEXT NOT NULL,
    PRIMARY KEY (collection, id)
)";

/// Document store kept in a single SQLite table, one JSON document per row.
///
/// Filters run through `json_extract`, so any top-level field of a document
/// can be queried without a schema change.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(SCHEMA, [])?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl DocumentStore for SqliteStore {
    fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>, StoreError> {
        let conn = self.lock()?;
        let data: Option<String> = conn
            .query_row(
                "SELECT data FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection.name(), id],
                |row| row.get(0),
            )
            .optional()?;
        data.map(|text| parse_document(collection, id, &text))
            .transpose()
    }

    fn query(&self, query: &Query) -> Result<Vec<Value>, StoreError> {
        let Some((sql, bound)) = build_select(query)? else {
            return Ok(Vec::new());
        };

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(bound.iter()), |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut docs = Vec::new();
        for row in rows {
            let (id, text) = row?;
            docs.push(parse_document(query.collection, &id, &text)?);
        }
        Ok(docs)
    }

    fn set(&self, collection: Collection, id: &str, doc: &Value) -> Result<(), StoreError> {
        let conn = self.lock()?;
        upsert(&conn, collection, id, doc)
    }

    fn update(
        &self,
        collection: Collection,
        id: &str,
        patch: &Map<String, Value>,
    ) -> Result<(), StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let current: Option<String> = tx
            .query_row(
                "SELECT data FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection.name(), id],
                |row| row.get(0),
            )
            .optional()?;
        let Some(text) = current else {
            return Err(StoreError::NotFound {
                collection: collection.name(),
                id: id.to_string(),
            });
        };

        let mut doc = parse_document(collection, id, &text)?;
        if let Value::Object(fields) = &mut doc {
            for (key, value) in patch {
                fields.insert(key.clone(), value.clone());
            }
        }
        upsert(&tx, collection, id, &doc)?;
        tx.commit()?;
        Ok(())
    }

    fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute(
            "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
            params![collection.name(), id],
        )?;
        Ok(())
    }

    fn batch(&self, ops: Vec<WriteOp>) -> Result<(), StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        for op in &ops {
            match op {
                WriteOp::Set {
                    collection,
                    id,
                    doc,
                } => upsert(&tx, *collection, id, doc)?,
                WriteOp::Delete { collection, id } => {
                    tx.execute(
                        "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
                        params![collection.name(), id],
                    )?;
                }
            }
        }
        tx.commit()?;
        Ok(())
    }
}

/// Keeps the original rowid on conflict so insertion order survives updates.
fn upsert(
    conn: &Connection,
    collection: Collection,
    id: &str,
    doc: &Value,
) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO documents (collection, id, data) VALUES (?1, ?2, ?3)
         ON CONFLICT(collection, id) DO UPDATE SET data = excluded.data",
        params![collection.name(), id, serde_json::to_string(doc)?],
    )?;
    Ok(())
}

fn parse_document(collection: Collection, id: &str, text: &str) -> Result<Value, StoreError> {
    serde_json::from_str(text).map_err(|source| StoreError::Malformed {
        collection: collection.name(),
        id: id.to_string(),
        source,
    })
}

/// Returns `None` when the query cannot match anything (an empty membership
/// filter), so no statement needs to run.
fn build_select(query: &Query) -> Result<Option<(String, Vec<SqlValue>)>, StoreError> {
    let mut sql = String::from("SELECT id, data FROM documents WHERE collection = ?");
    let mut bound = vec![SqlValue::Text(query.collection.name().to_string())];
    let mut seen_in = false;

    for filter in &query.filters {
        match filter {
            Filter::Eq(field, value) => {
                check_field(field)?;
                sql.push_str(&format!(" AND json_extract(data, '$.{}') = ?", field));
                bound.push(to_sql(value));
            }
            Filter::In(field, values) => {
                check_field(field)?;
                if seen_in {
                    return Err(StoreError::MultipleInFilters);
                }
                seen_in = true;
                if values.len() > MAX_IN_VALUES {
                    return Err(StoreError::InFilterTooLarge {
                        field: *field,
                        len: values.len(),
                    });
                }
                if values.is_empty() {
                    return Ok(None);
                }
                let placeholders = vec!["?"; values.len()].join(", ");
                sql.push_str(&format!(
                    " AND json_extract(data, '$.{}') IN ({})",
                    field, placeholders
                ));
                bound.extend(values.iter().map(to_sql));
            }
        }
    }

    match query.order_by {
        Some((field, direction)) => {
            check_field(field)?;
            let dir = match direction {
                Direction::Asc => "ASC",
                Direction::Desc => "DESC",
            };
            sql.push_str(&format!(
                " ORDER BY json_extract(data, '$.{}') {}, rowid ASC",
                field, dir
            ));
        }
        None => sql.push_str(" ORDER BY rowid ASC"),
    }

    if let Some(limit) = query.limit {
        sql.push_str(&format!(" LIMIT {}", limit));
    }

    Ok(Some((sql, bound)))
}

/// Field names are spliced into the JSON path, so only plain identifiers pass.
fn check_field(field: &str) -> Result<(), StoreError> {
    let valid = !field.is_empty()
        && field
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidField(field.to_string()))
    }
}

/// Matches what `json_extract` yields for each JSON type.
fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => SqlValue::Real(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> SqliteStore {
        SqliteStore::open_in_memory().expect("in-memory store")
    }

    fn put(store: &SqliteStore, id: &str, course: &str, score: i64) {
        store
            .set(
                Collection::Grades,
                id,
                &json!({ "id": id, "courseId": course, "score": score }),
            )
            .expect("set");
    }

    #[test]
    fn get_returns_what_was_set() {
        let store = store();
        put(&store, "g1", "c1", 7);
        let doc = store.get(Collection::Grades, "g1").expect("get");
        assert_eq!(doc, Some(json!({ "id": "g1", "courseId": "c1", "score": 7 })));
        assert_eq!(store.get(Collection::Courses, "g1").expect("get"), None);
    }

    #[test]
    fn query_filters_and_keeps_insertion_order_after_updates() {
        let store = store();
        put(&store, "a", "c1", 1);
        put(&store, "b", "c2", 2);
        put(&store, "c", "c1", 3);

        let mut fields = Map::new();
        fields.insert("score".to_string(), json!(10));
        store.update(Collection::Grades, "a", &fields).expect("update");

        let docs = store
            .query(&Query::new(Collection::Grades).eq("courseId", "c1"))
            .expect("query");
        let ids: Vec<_> = docs.iter().map(|d| d["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(docs[0]["score"], json!(10));
    }

    #[test]
    fn membership_filter_limit_is_enforced() {
        let store = store();
        let ids: Vec<String> = (0..11).map(|i| format!("c{}", i)).collect();
        let err = store
            .query(&Query::new(Collection::Grades).one_of("courseId", ids.clone()))
            .unwrap_err();
        assert!(matches!(err, StoreError::InFilterTooLarge { len: 11, .. }));

        put(&store, "g", "c3", 1);
        let docs = store
            .query(&Query::new(Collection::Grades).one_of("courseId", ids[..10].to_vec()))
            .expect("ten values are allowed");
        assert_eq!(docs.len(), 1);
    }

    #[test]
    fn empty_membership_filter_matches_nothing() {
        let store = store();
        put(&store, "g", "c1", 1);
        let docs = store
            .query(&Query::new(Collection::Grades).one_of("courseId", Vec::<String>::new()))
            .expect("query");
        assert!(docs.is_empty());
    }

    #[test]
    fn order_by_and_limit() {
        let store = store();
        put(&store, "a", "c1", 5);
        put(&store, "b", "c1", 9);
        put(&store, "c", "c1", 1);
        let docs = store
            .query(
                &Query::new(Collection::Grades)
                    .order_by("score", Direction::Desc)
                    .limit(2),
            )
            .expect("query");
        let scores: Vec<_> = docs.iter().map(|d| d["score"].as_i64().unwrap()).collect();
        assert_eq!(scores, vec![9, 5]);
    }

    #[test]
    fn update_of_missing_document_is_not_found() {
        let store = store();
        let err = store
            .update(Collection::Users, "nobody", &Map::new())
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn field_names_are_validated() {
        let store = store();
        let err = store
            .query(&Query::new(Collection::Users).eq("name') OR 1=1 --", "x"))
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidField(_)));
    }

    #[test]
    fn batch_applies_sets_and_deletes() {
        let store = store();
        put(&store, "old", "c1", 1);
        store
            .batch(vec![
                WriteOp::Set {
                    collection: Collection::Grades,
                    id: "new".to_string(),
                    doc: json!({ "id": "new", "courseId": "c1", "score": 2 }),
                },
                WriteOp::Delete {
                    collection: Collection::Grades,
                    id: "old".to_string(),
                },
            ])
            .expect("batch");
        assert!(store.get(Collection::Grades, "old").expect("get").is_none());
        assert!(store.get(Collection::Grades, "new").expect("get").is_some());
    }
}

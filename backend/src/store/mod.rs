//! # Document Store
//!
//! The backend never talks to SQL directly outside this module. Everything
//! else sees a document-oriented store: named collections of JSON documents
//! keyed by an opaque string id, read with filtered queries and written one
//! document at a time.
//!
//! The store mirrors the limits of the managed database it stands in for. In
//! particular a membership filter (`field IN (...)`) accepts at most
//! [`MAX_IN_VALUES`] values; callers with longer id lists go through
//! `data::batching::fetch_in_batches`.
//!
//! Typed access goes through the [`Record`] trait, which ties each schema in
//! `common::model` to its collection.

mod sqlite;

pub use sqlite::SqliteStore;

use common::model::announcement::Announcement;
use common::model::assignment::Assignment;
use common::model::course::Course;
use common::model::enrollment::Enrollment;
use common::model::file::File;
use common::model::grade::Grade;
use common::model::user::User;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Largest value list a membership filter may carry.
pub const MAX_IN_VALUES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Courses,
    Enrollments,
    Assignments,
    Grades,
    Announcements,
    Files,
    Credentials,
}

impl Collection {
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Courses => "courses",
            Collection::Enrollments => "enrollments",
            Collection::Assignments => "assignments",
            Collection::Grades => "grades",
            Collection::Announcements => "announcements",
            Collection::Files => "files",
            Collection::Credentials => "credentials",
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("cannot encode document: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("malformed document {collection}/{id}: {source}")]
    Malformed {
        collection: &'static str,
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("document {collection}/{id} not found")]
    NotFound { collection: &'static str, id: String },

    #[error("membership filter on '{field}' has {len} values, the limit is {}", MAX_IN_VALUES)]
    InFilterTooLarge { field: &'static str, len: usize },

    #[error("a query may carry only one membership filter")]
    MultipleInFilters,

    #[error("invalid field name '{0}'")]
    InvalidField(String),

    #[error("patch for {0} must be a JSON object")]
    InvalidPatch(&'static str),

    #[error("store lock poisoned")]
    Poisoned,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(&'static str, Value),
    In(&'static str, Vec<Value>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// A filtered read against one collection. All filters must match.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub collection: Collection,
    pub filters: Vec<Filter>,
    pub order_by: Option<(&'static str, Direction)>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new(collection: Collection) -> Self {
        Self {
            collection,
            filters: Vec::new(),
            order_by: None,
            limit: None,
        }
    }

    pub fn eq(mut self, field: &'static str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq(field, value.into()));
        self
    }

    pub fn one_of<I, V>(mut self, field: &'static str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.filters
            .push(Filter::In(field, values.into_iter().map(Into::into).collect()));
        self
    }

    pub fn order_by(mut self, field: &'static str, direction: Direction) -> Self {
        self.order_by = Some((field, direction));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// A single write inside [`DocumentStore::batch`].
#[derive(Debug, Clone)]
pub enum WriteOp {
    Set {
        collection: Collection,
        id: String,
        doc: Value,
    },
    Delete {
        collection: Collection,
        id: String,
    },
}

impl WriteOp {
    pub fn set<T: Record>(record: &T) -> Result<Self, StoreError> {
        Ok(WriteOp::Set {
            collection: T::COLLECTION,
            id: record.id().to_string(),
            doc: serde_json::to_value(record)?,
        })
    }
}

pub trait DocumentStore: Send + Sync {
    fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>, StoreError>;

    /// Without an explicit order the documents come back in insertion order.
    fn query(&self, query: &Query) -> Result<Vec<Value>, StoreError>;

    /// Creates or replaces a document.
    fn set(&self, collection: Collection, id: &str, doc: &Value) -> Result<(), StoreError>;

    /// Shallow-merges `patch` into an existing document.
    fn update(
        &self,
        collection: Collection,
        id: &str,
        patch: &Map<String, Value>,
    ) -> Result<(), StoreError>;

    /// Deleting a missing document succeeds.
    fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError>;

    /// Applies every write or none of them.
    fn batch(&self, ops: Vec<WriteOp>) -> Result<(), StoreError>;
}

/// A schema stored in exactly one collection.
pub trait Record: Serialize + DeserializeOwned {
    const COLLECTION: Collection;

    fn id(&self) -> &str;
}

macro_rules! record {
    ($ty:ty, $collection:expr) => {
        impl Record for $ty {
            const COLLECTION: Collection = $collection;

            fn id(&self) -> &str {
                &self.id
            }
        }
    };
}

record!(User, Collection::Users);
record!(Course, Collection::Courses);
record!(Enrollment, Collection::Enrollments);
record!(Assignment, Collection::Assignments);
record!(Grade, Collection::Grades);
record!(Announcement, Collection::Announcements);
record!(File, Collection::Files);

/// Starts a query over the collection `T` lives in.
pub fn select<T: Record>() -> Query {
    Query::new(T::COLLECTION)
}

pub fn fetch<T: Record>(store: &dyn DocumentStore, id: &str) -> Result<Option<T>, StoreError> {
    store
        .get(T::COLLECTION, id)?
        .map(decode::<T>)
        .transpose()
}

pub fn fetch_where<T: Record>(
    store: &dyn DocumentStore,
    query: &Query,
) -> Result<Vec<T>, StoreError> {
    debug_assert_eq!(query.collection, T::COLLECTION);
    store.query(query)?.into_iter().map(decode::<T>).collect()
}

pub fn save<T: Record>(store: &dyn DocumentStore, record: &T) -> Result<(), StoreError> {
    store.set(T::COLLECTION, record.id(), &serde_json::to_value(record)?)
}

pub fn patch<T: Record>(
    store: &dyn DocumentStore,
    id: &str,
    fields: Value,
) -> Result<(), StoreError> {
    match fields {
        Value::Object(map) => store.update(T::COLLECTION, id, &map),
        _ => Err(StoreError::InvalidPatch(T::COLLECTION.name())),
    }
}

pub fn remove<T: Record>(store: &dyn DocumentStore, id: &str) -> Result<(), StoreError> {
    store.delete(T::COLLECTION, id)
}

fn decode<T: Record>(doc: Value) -> Result<T, StoreError> {
    let id = doc
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    serde_json::from_value(doc).map_err(|source| StoreError::Malformed {
        collection: T::COLLECTION.name(),
        id,
        source,
    })
}

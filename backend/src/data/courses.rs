use super::batching::records_where_in;
use super::{new_id, require_text, ServiceError};
use crate::store::{self, DocumentStore};
use common::model::course::{Course, CourseStatus};
use common::requests::UpdateCourseRequest;
use serde_json::{Map, Value};

pub struct NewCourse {
    pub title: String,
    pub description: String,
    pub professor_id: String,
    pub status: CourseStatus,
}

pub fn get_course(store: &dyn DocumentStore, id: &str) -> Result<Option<Course>, ServiceError> {
    Ok(store::fetch::<Course>(store, id)?)
}

pub fn require_course(store: &dyn DocumentStore, id: &str) -> Result<Course, ServiceError> {
    get_course(store, id)?.ok_or_else(|| ServiceError::NotFound("course".to_string()))
}

/// A professor's courses, archived ones excluded.
pub fn courses_for_professor(
    store: &dyn DocumentStore,
    professor_id: &str,
) -> Result<Vec<Course>, ServiceError> {
    let query = store::select::<Course>().eq("professorId", professor_id);
    Ok(store::fetch_where::<Course>(store, &query)?
        .into_iter()
        .filter(|course| course.status != CourseStatus::Archived)
        .collect())
}

pub fn active_courses(store: &dyn DocumentStore) -> Result<Vec<Course>, ServiceError> {
    let query = store::select::<Course>().eq("status", CourseStatus::Active.as_str());
    Ok(store::fetch_where::<Course>(store, &query)?)
}

pub fn all_courses(store: &dyn DocumentStore) -> Result<Vec<Course>, ServiceError> {
    Ok(store::fetch_where::<Course>(store, &store::select::<Course>())?)
}

pub fn get_courses_by_ids(
    store: &dyn DocumentStore,
    ids: &[String],
) -> Result<Vec<Course>, ServiceError> {
    Ok(records_where_in::<Course>(store, "id", ids)?)
}

/// Fails with a conflict when the professor already has a live course with
/// the same title (compared case-insensitively).
pub fn create_course(store: &dyn DocumentStore, new: NewCourse) -> Result<Course, ServiceError> {
    let title = require_text(&new.title, "title")?;
    ensure_unique_title(store, &new.professor_id, &title, None)?;

    let course = Course {
        id: new_id(),
        title,
        description: new.description.trim().to_string(),
        professor_id: new.professor_id,
        status: new.status,
    };
    store::save(store, &course)?;
    Ok(course)
}

pub fn update_course(
    store: &dyn DocumentStore,
    id: &str,
    changes: &UpdateCourseRequest,
) -> Result<Course, ServiceError> {
    let course = require_course(store, id)?;
    let mut fields = Map::new();

    let title = match &changes.title {
        Some(title) => Some(require_text(title, "title")?),
        None => None,
    };
    // A retitled or reactivated course must not collide with a live one.
    let status = changes.status.unwrap_or(course.status);
    if status != CourseStatus::Archived && (title.is_some() || status != course.status) {
        let resulting = title.as_deref().unwrap_or(&course.title);
        ensure_unique_title(store, &course.professor_id, resulting, Some(id))?;
    }

    if let Some(title) = title {
        fields.insert("title".to_string(), Value::String(title));
    }
    if let Some(description) = &changes.description {
        fields.insert(
            "description".to_string(),
            Value::String(description.trim().to_string()),
        );
    }
    if let Some(status) = changes.status {
        fields.insert(
            "status".to_string(),
            Value::String(status.as_str().to_string()),
        );
    }

    if !fields.is_empty() {
        store::patch::<Course>(store, id, Value::Object(fields))?;
    }
    require_course(store, id)
}

/// Soft delete: the course stays in the store with status `archived`.
pub fn archive_course(store: &dyn DocumentStore, id: &str) -> Result<Course, ServiceError> {
    update_course(
        store,
        id,
        &UpdateCourseRequest {
            status: Some(CourseStatus::Archived),
            ..Default::default()
        },
    )
}

fn ensure_unique_title(
    store: &dyn DocumentStore,
    professor_id: &str,
    title: &str,
    except_id: Option<&str>,
) -> Result<(), ServiceError> {
    let wanted = title.to_lowercase();
    let taken = courses_for_professor(store, professor_id)?
        .iter()
        .any(|c| Some(c.id.as_str()) != except_id && c.title.to_lowercase() == wanted);
    if taken {
        return Err(ServiceError::Conflict(format!(
            "a course titled '{}' already exists",
            title
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;

    fn new_course(title: &str, professor_id: &str) -> NewCourse {
        NewCourse {
            title: title.to_string(),
            description: "  about it  ".to_string(),
            professor_id: professor_id.to_string(),
            status: CourseStatus::Active,
        }
    }

    #[test]
    fn titles_are_unique_per_professor_ignoring_case() {
        let store = SqliteStore::open_in_memory().expect("store");
        let course = create_course(&store, new_course("Compilers", "p1")).expect("create");
        assert_eq!(course.description, "about it");

        let err = create_course(&store, new_course("  COMPILERS ", "p1")).unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        create_course(&store, new_course("Compilers", "p2")).expect("other professor");

        archive_course(&store, &course.id).expect("archive");
        create_course(&store, new_course("Compilers", "p1")).expect("archived title is free");
    }

    #[test]
    fn restoring_an_archived_course_rechecks_its_title() {
        let store = SqliteStore::open_in_memory().expect("store");
        let first = create_course(&store, new_course("Compilers", "p1")).expect("create");
        archive_course(&store, &first.id).expect("archive");
        create_course(&store, new_course("compilers", "p1")).expect("title is free again");

        let err = update_course(
            &store,
            &first.id,
            &UpdateCourseRequest {
                status: Some(CourseStatus::Active),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        let live: Vec<_> = courses_for_professor(&store, "p1")
            .expect("list")
            .into_iter()
            .filter(|c| c.title.eq_ignore_ascii_case("compilers"))
            .collect();
        assert_eq!(live.len(), 1);

        let restored = update_course(
            &store,
            &first.id,
            &UpdateCourseRequest {
                title: Some("Compilers II".to_string()),
                status: Some(CourseStatus::Draft),
                ..Default::default()
            },
        )
        .expect("restore under a new title");
        assert_eq!(restored.status, CourseStatus::Draft);
        assert_eq!(restored.title, "Compilers II");
    }

    #[test]
    fn archived_courses_leave_the_professor_list() {
        let store = SqliteStore::open_in_memory().expect("store");
        let keep = create_course(&store, new_course("Keep", "p1")).expect("create");
        let old = create_course(&store, new_course("Old", "p1")).expect("create");
        let archived = archive_course(&store, &old.id).expect("archive");
        assert_eq!(archived.status, CourseStatus::Archived);

        let listed = courses_for_professor(&store, "p1").expect("list");
        assert_eq!(listed.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(), vec![keep.id.as_str()]);
        assert_eq!(all_courses(&store).expect("all").len(), 2);
        assert_eq!(active_courses(&store).expect("active").len(), 1);
    }

    #[test]
    fn partial_updates_touch_only_given_fields() {
        let store = SqliteStore::open_in_memory().expect("store");
        let course = create_course(&store, new_course("Draft", "p1")).expect("create");
        let updated = update_course(
            &store,
            &course.id,
            &UpdateCourseRequest {
                description: Some("new text".to_string()),
                ..Default::default()
            },
        )
        .expect("update");
        assert_eq!(updated.title, "Draft");
        assert_eq!(updated.description, "new text");

        let err = update_course(&store, "missing", &UpdateCourseRequest::default()).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}

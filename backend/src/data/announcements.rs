use super::batching::records_where_in;
use super::{new_id, require_text, ServiceError};
use crate::store::{self, DocumentStore};
use chrono::Utc;
use common::model::announcement::Announcement;

pub fn post_announcement(
    store: &dyn DocumentStore,
    course_id: &str,
    professor_id: &str,
    title: &str,
    content: &str,
) -> Result<Announcement, ServiceError> {
    let announcement = Announcement {
        id: new_id(),
        course_id: course_id.to_string(),
        title: require_text(title, "title")?,
        content: require_text(content, "content")?,
        posted_date: Utc::now(),
        professor_id: professor_id.to_string(),
    };
    store::save(store, &announcement)?;
    Ok(announcement)
}

pub fn get_announcement(
    store: &dyn DocumentStore,
    id: &str,
) -> Result<Option<Announcement>, ServiceError> {
    Ok(store::fetch::<Announcement>(store, id)?)
}

/// Newest first.
pub fn announcements_for_course(
    store: &dyn DocumentStore,
    course_id: &str,
) -> Result<Vec<Announcement>, ServiceError> {
    let query = store::select::<Announcement>().eq("courseId", course_id);
    let mut announcements = store::fetch_where::<Announcement>(store, &query)?;
    announcements.sort_by(|a, b| b.posted_date.cmp(&a.posted_date));
    Ok(announcements)
}

pub fn announcements_for_courses(
    store: &dyn DocumentStore,
    course_ids: &[String],
) -> Result<Vec<Announcement>, ServiceError> {
    Ok(records_where_in::<Announcement>(
        store, "courseId", course_ids,
    )?)
}

/// Hard delete.
pub fn delete_announcement(store: &dyn DocumentStore, id: &str) -> Result<(), ServiceError> {
    if get_announcement(store, id)?.is_none() {
        return Err(ServiceError::NotFound("announcement".to_string()));
    }
    store::remove::<Announcement>(store, id)?;
    Ok(())
}

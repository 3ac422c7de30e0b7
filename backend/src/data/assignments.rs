use super::batching::records_where_in;
use super::courses::require_course;
use super::{new_id, require_text, ServiceError};
use crate::store::{self, DocumentStore};
use common::model::assignment::Assignment;
use common::requests::CreateAssignmentRequest;

pub fn create_assignment(
    store: &dyn DocumentStore,
    course_id: &str,
    request: &CreateAssignmentRequest,
) -> Result<Assignment, ServiceError> {
    let title = require_text(&request.title, "title")?;
    if !request.max_score.is_finite() || request.max_score <= 0.0 {
        return Err(ServiceError::Invalid(
            "maxScore must be a positive number".to_string(),
        ));
    }
    require_course(store, course_id)?;

    let assignment = Assignment {
        id: new_id(),
        course_id: course_id.to_string(),
        title,
        description: request.description.trim().to_string(),
        due_date: request.due_date,
        max_score: request.max_score,
        kind: request.kind,
    };
    store::save(store, &assignment)?;
    Ok(assignment)
}

pub fn get_assignment(
    store: &dyn DocumentStore,
    id: &str,
) -> Result<Option<Assignment>, ServiceError> {
    Ok(store::fetch::<Assignment>(store, id)?)
}

pub fn require_assignment(store: &dyn DocumentStore, id: &str) -> Result<Assignment, ServiceError> {
    get_assignment(store, id)?.ok_or_else(|| ServiceError::NotFound("assignment".to_string()))
}

/// Soonest due first.
pub fn assignments_for_course(
    store: &dyn DocumentStore,
    course_id: &str,
) -> Result<Vec<Assignment>, ServiceError> {
    let query = store::select::<Assignment>().eq("courseId", course_id);
    let mut assignments = store::fetch_where::<Assignment>(store, &query)?;
    assignments.sort_by_key(|a| a.due_date);
    Ok(assignments)
}

/// Assignments of several courses, in batch order.
pub fn assignments_for_courses(
    store: &dyn DocumentStore,
    course_ids: &[String],
) -> Result<Vec<Assignment>, ServiceError> {
    Ok(records_where_in::<Assignment>(store, "courseId", course_ids)?)
}

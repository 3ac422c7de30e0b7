use super::{new_id, require_text, ServiceError};
use crate::store::{self, DocumentStore};
use chrono::Utc;
use common::model::grade::Grade;
use serde_json::json;

pub struct GradeSubmission {
    pub student_id: String,
    pub assignment_id: String,
    pub course_id: String,
    pub score: f64,
    pub feedback: Option<String>,
    pub grader_id: String,
}

/// Upserts the grade for (student, assignment).
///
/// An existing grade keeps its id and gets the new score, feedback, grader
/// and date. The score is not checked against the assignment's `maxScore`.
pub fn submit_grade(
    store: &dyn DocumentStore,
    submission: GradeSubmission,
) -> Result<Grade, ServiceError> {
    let student_id = require_text(&submission.student_id, "studentId")?;
    let assignment_id = require_text(&submission.assignment_id, "assignmentId")?;
    if !submission.score.is_finite() || submission.score < 0.0 {
        return Err(ServiceError::Invalid(
            "score must be a non-negative number".to_string(),
        ));
    }
    let feedback = submission
        .feedback
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty());

    let query = store::select::<Grade>()
        .eq("studentId", student_id.as_str())
        .eq("assignmentId", assignment_id.as_str())
        .limit(1);
    let existing = store::fetch_where::<Grade>(store, &query)?.into_iter().next();

    let grade = match existing {
        Some(mut grade) => {
            grade.score = submission.score;
            grade.feedback = feedback;
            grade.grader_id = submission.grader_id;
            grade.graded_date = Utc::now();
            store::patch::<Grade>(
                store,
                &grade.id,
                json!({
                    "score": grade.score,
                    "feedback": grade.feedback,
                    "graderId": grade.grader_id,
                    "gradedDate": grade.graded_date,
                }),
            )?;
            grade
        }
        None => {
            let grade = Grade {
                id: new_id(),
                student_id,
                assignment_id,
                course_id: submission.course_id,
                score: submission.score,
                graded_date: Utc::now(),
                feedback,
                grader_id: submission.grader_id,
            };
            store::save(store, &grade)?;
            grade
        }
    };
    Ok(grade)
}

/// A student's grades, optionally limited to one course.
pub fn grades_for_student(
    store: &dyn DocumentStore,
    student_id: &str,
    course_id: Option<&str>,
) -> Result<Vec<Grade>, ServiceError> {
    let mut query = store::select::<Grade>().eq("studentId", student_id);
    if let Some(course_id) = course_id {
        query = query.eq("courseId", course_id);
    }
    Ok(store::fetch_where::<Grade>(store, &query)?)
}

pub fn grades_for_assignment(
    store: &dyn DocumentStore,
    assignment_id: &str,
) -> Result<Vec<Grade>, ServiceError> {
    let query = store::select::<Grade>().eq("assignmentId", assignment_id);
    Ok(store::fetch_where::<Grade>(store, &query)?)
}

pub fn grades_for_course(
    store: &dyn DocumentStore,
    course_id: &str,
) -> Result<Vec<Grade>, ServiceError> {
    let query = store::select::<Grade>().eq("courseId", course_id);
    Ok(store::fetch_where::<Grade>(store, &query)?)
}

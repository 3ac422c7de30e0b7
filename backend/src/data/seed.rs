//! One-time demo data, written through a single store batch.

use super::users::find_user_by_email;
use super::{new_id, ServiceError};
use crate::auth::IdentityProvider;
use crate::store::{DocumentStore, WriteOp};
use chrono::{Duration, Utc};
use common::model::announcement::Announcement;
use common::model::assignment::{Assignment, AssignmentType};
use common::model::course::{Course, CourseStatus};
use common::model::enrollment::{Enrollment, EnrollmentStatus};
use common::model::user::{Role, User};
use log::{info, warn};

const DEMO_USERS: &[(&str, &str, Role)] = &[
    ("Ada Admin", "admin@alant.dev", Role::Admin),
    ("Grace Hopper", "hopper@alant.dev", Role::Professor),
    ("Alan Turing", "turing@alant.dev", Role::Professor),
    ("Alice Student", "alice@alant.dev", Role::Student),
    ("Bob Student", "bob@alant.dev", Role::Student),
];

const DEMO_COURSES: &[(&str, &str, usize)] = &[
    ("Introduction to Compilers", "Lexing, parsing and code generation.", 1),
    ("Computability", "Machines, decidability and reductions.", 2),
    ("Operating Systems", "Processes, memory and file systems.", 1),
];

#[derive(Debug, Default, PartialEq)]
pub struct SeedSummary {
    pub users: usize,
    pub courses: usize,
    pub enrollments: usize,
    pub assignments: usize,
    pub announcements: usize,
}

/// Registers the demo accounts and writes their data in one batch.
///
/// Refuses to run twice: an existing demo email is a conflict.
pub fn seed_demo_data(
    store: &dyn DocumentStore,
    auth: &dyn IdentityProvider,
    password: &str,
) -> Result<SeedSummary, ServiceError> {
    for (_, email, _) in DEMO_USERS {
        if find_user_by_email(store, email)?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "demo data already present ({} exists)",
                email
            )));
        }
    }

    let mut users = Vec::new();
    let written = register_demo_users(auth, password, &mut users)
        .and_then(|()| write_demo_batch(store, &users));
    match written {
        Ok(summary) => {
            info!(
                "seeded {} users, {} courses, {} enrollments",
                summary.users, summary.courses, summary.enrollments
            );
            Ok(summary)
        }
        Err(e) => {
            // Credentials live outside the batch; take them back out.
            for user in &users {
                if let Err(cleanup) = auth.remove(&user.id) {
                    warn!("orphaned demo credentials {}: {}", user.id, cleanup);
                }
            }
            Err(e)
        }
    }
}

/// Pushes each registered account as it goes, so a failure part way leaves
/// `users` holding exactly the credentials that were created.
fn register_demo_users(
    auth: &dyn IdentityProvider,
    password: &str,
    users: &mut Vec<User>,
) -> Result<(), ServiceError> {
    for (name, email, role) in DEMO_USERS {
        let uid = auth.register(email, password)?;
        users.push(User::new(uid, name.to_string(), email, *role));
    }
    Ok(())
}

fn write_demo_batch(store: &dyn DocumentStore, users: &[User]) -> Result<SeedSummary, ServiceError> {
    let mut ops = Vec::new();
    let mut summary = SeedSummary::default();
    let now = Utc::now();

    for user in users {
        ops.push(WriteOp::set(user)?);
    }
    summary.users = users.len();

    let students: Vec<&User> = users.iter().filter(|u| u.role == Role::Student).collect();
    for (index, (title, description, professor)) in DEMO_COURSES.iter().enumerate() {
        let course = Course {
            id: new_id(),
            title: title.to_string(),
            description: description.to_string(),
            professor_id: users[*professor].id.clone(),
            status: CourseStatus::Active,
        };
        ops.push(WriteOp::set(&course)?);
        summary.courses += 1;

        for student in &students {
            let enrollment = Enrollment {
                id: new_id(),
                student_id: student.id.clone(),
                course_id: course.id.clone(),
                enrolled_date: now,
                status: EnrollmentStatus::Active,
            };
            ops.push(WriteOp::set(&enrollment)?);
            summary.enrollments += 1;
        }

        for week in 1..=2i64 {
            let assignment = Assignment {
                id: new_id(),
                course_id: course.id.clone(),
                title: format!("Problem set {}", week),
                description: format!("Week {} exercises for {}.", week, title),
                due_date: now + Duration::days(7 * week + index as i64),
                max_score: 100.0,
                kind: AssignmentType::Homework,
            };
            ops.push(WriteOp::set(&assignment)?);
            summary.assignments += 1;
        }

        let announcement = Announcement {
            id: new_id(),
            course_id: course.id.clone(),
            title: "Welcome".to_string(),
            content: format!("Welcome to {}!", title),
            posted_date: now,
            professor_id: course.professor_id.clone(),
        };
        ops.push(WriteOp::set(&announcement)?);
        summary.announcements += 1;
    }

    store.batch(ops)?;
    Ok(summary)
}

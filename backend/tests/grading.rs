mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use actix_web::web;
use alant_backend::build_app;
use alant_backend::data::{enrollments, grades};
use common::model::user::Role;
use serde_json::{json, Value};
use support::{get, post, read, test_env};

#[actix_web::test]
async fn regrading_replaces_the_previous_score() {
    let env = test_env();
    let (professor_id, professor) =
        support::seed_user(&env, "Prof", "prof@example.com", Role::Professor);
    let (student_id, _) = support::seed_user(&env, "Stu", "stu@example.com", Role::Student);
    let (_, colleague) = support::seed_user(&env, "Other", "other@example.com", Role::Professor);
    let app = test::init_service(build_app(web::Data::new(env.state.clone()))).await;

    let req = post(
        "/api/professor/courses",
        &professor,
        json!({ "title": "Databases", "description": "" }),
    );
    let (_, course) = read(test::call_service(&app, req.to_request()).await).await;
    let course_id = course["id"].as_str().expect("course id").to_string();
    enrollments::enroll_student(env.state.store(), &student_id, &course_id).expect("enroll");

    let req = post(
        &format!("/api/professor/courses/{}/assignments", course_id),
        &professor,
        json!({
            "title": "Normal forms",
            "description": "Decompose the schema",
            "dueDate": "2030-01-15T12:00:00Z",
            "maxScore": 100.0,
            "type": "homework"
        }),
    );
    let (status, assignment) = read(test::call_service(&app, req.to_request()).await).await;
    assert_eq!(status, StatusCode::CREATED);
    let assignment_id = assignment["id"].as_str().expect("assignment id").to_string();

    let grade = |score: f64, feedback: &str| -> Value {
        json!({
            "studentId": student_id,
            "assignmentId": assignment_id,
            "score": score,
            "feedback": feedback,
        })
    };

    let req = post("/api/professor/grades", &professor, grade(72.0, "decent"));
    let (status, first) = read(test::call_service(&app, req.to_request()).await).await;
    assert_eq!(status, StatusCode::OK);

    let req = post("/api/professor/grades", &professor, grade(91.5, "much better"));
    let (status, second) = read(test::call_service(&app, req.to_request()).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["id"], second["id"]);
    assert_eq!(second["graderId"], professor_id);
    assert_eq!(second["courseId"], course_id);

    let stored = grades::grades_for_assignment(env.state.store(), &assignment_id).expect("grades");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].score, 91.5);
    assert_eq!(stored[0].feedback.as_deref(), Some("much better"));

    let uri = format!("/api/professor/assignments/{}/grades", assignment_id);
    let (status, body) = read(test::call_service(&app, get(&uri, &professor).to_request()).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let (status, _) = read(test::call_service(&app, get(&uri, &colleague).to_request()).await).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let req = post("/api/professor/grades", &colleague, grade(0.0, "nope"));
    let (status, _) = read(test::call_service(&app, req.to_request()).await).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn grades_need_an_enrolled_student_and_a_valid_score() {
    let env = test_env();
    let (_, professor) = support::seed_user(&env, "Prof", "prof@example.com", Role::Professor);
    let (student_id, student) = support::seed_user(&env, "Stu", "stu@example.com", Role::Student);
    let app = test::init_service(build_app(web::Data::new(env.state.clone()))).await;

    let req = post(
        "/api/professor/courses",
        &professor,
        json!({ "title": "Networks", "description": "" }),
    );
    let (_, course) = read(test::call_service(&app, req.to_request()).await).await;
    let course_id = course["id"].as_str().expect("course id").to_string();

    let req = post(
        &format!("/api/professor/courses/{}/assignments", course_id),
        &professor,
        json!({ "title": "Routing", "dueDate": "2030-02-01T00:00:00Z", "maxScore": 10.0 }),
    );
    let (_, assignment) = read(test::call_service(&app, req.to_request()).await).await;

    let body = json!({ "studentId": student_id, "assignmentId": assignment["id"], "score": 8.0 });
    let req = post("/api/professor/grades", &professor, body.clone());
    let (status, _) = read(test::call_service(&app, req.to_request()).await).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    enrollments::enroll_student(env.state.store(), &student_id, &course_id).expect("enroll");

    let negative = json!({ "studentId": student_id, "assignmentId": assignment["id"], "score": -1.0 });
    let req = post("/api/professor/grades", &professor, negative);
    let (status, _) = read(test::call_service(&app, req.to_request()).await).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let over = json!({ "studentId": student_id, "assignmentId": assignment["id"], "score": 12.0 });
    let req = post("/api/professor/grades", &professor, over);
    let (status, _) = read(test::call_service(&app, req.to_request()).await).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) =
        read(test::call_service(&app, get("/api/student/grades", &student).to_request()).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["score"], 12.0);

    let uri = format!("/api/student/grades?courseId={}", "elsewhere");
    let (_, body) = read(test::call_service(&app, get(&uri, &student).to_request()).await).await;
    assert_eq!(body.as_array().map(Vec::len), Some(0));

    let req = post("/api/professor/grades", &student, body_for(&student_id, &assignment));
    let (status, _) = read(test::call_service(&app, req.to_request()).await).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

fn body_for(student_id: &str, assignment: &Value) -> Value {
    json!({ "studentId": student_id, "assignmentId": assignment["id"], "score": 5.0 })
}

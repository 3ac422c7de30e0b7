mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use actix_web::web;
use alant_backend::build_app;
use alant_backend::data::enrollments;
use common::model::user::Role;
use serde_json::json;
use support::{get, post, put, read, test_env};

#[actix_web::test]
async fn each_role_gets_its_own_dashboard() {
    let env = test_env();
    let (_, admin) = support::seed_user(&env, "Ada", "ada@example.com", Role::Admin);
    let (_, professor) = support::seed_user(&env, "Prof", "prof@example.com", Role::Professor);
    let (student_id, student) = support::seed_user(&env, "Stu", "stu@example.com", Role::Student);
    let app = test::init_service(build_app(web::Data::new(env.state.clone()))).await;

    let req = post("/api/professor/courses", &professor, json!({ "title": "Topology", "description": "" }));
    let (_, course) = read(test::call_service(&app, req.to_request()).await).await;
    let course_id = course["id"].as_str().expect("course id").to_string();
    enrollments::enroll_student(env.state.store(), &student_id, &course_id).expect("enroll");

    let req = post(
        &format!("/api/professor/courses/{}/assignments", course_id),
        &professor,
        json!({ "title": "Open sets", "dueDate": "2099-03-01T00:00:00Z", "maxScore": 20.0 }),
    );
    let (status, _) = read(test::call_service(&app, req.to_request()).await).await;
    assert_eq!(status, StatusCode::CREATED);

    let req = post(
        &format!("/api/professor/courses/{}/announcements", course_id),
        &professor,
        json!({ "title": "Welcome", "content": "First lecture on Monday" }),
    );
    let (status, _) = read(test::call_service(&app, req.to_request()).await).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) =
        read(test::call_service(&app, get("/api/dashboard", &student).to_request()).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "student");
    assert_eq!(body["courses"][0]["id"], course_id);
    assert_eq!(body["upcomingAssignments"][0]["title"], "Open sets");
    assert_eq!(body["recentAnnouncements"][0]["title"], "Welcome");

    let (_, body) =
        read(test::call_service(&app, get("/api/dashboard", &professor).to_request()).await).await;
    assert_eq!(body["role"], "professor");
    assert_eq!(body["courses"][0]["activeStudents"], 1);
    assert_eq!(body["totalStudents"], 1);

    let (_, body) = read(test::call_service(&app, get("/api/dashboard", &admin).to_request()).await).await;
    assert_eq!(body["role"], "admin");
    assert_eq!(body["students"], 1);
    assert_eq!(body["professors"], 1);
    assert_eq!(body["admins"], 1);
    assert_eq!(body["activeCourses"], 1);
}

#[actix_web::test]
async fn admins_manage_roles_and_see_every_course() {
    let env = test_env();
    let (_, admin) = support::seed_user(&env, "Ada", "ada@example.com", Role::Admin);
    let (professor_id, professor) = support::seed_user(&env, "Prof", "prof@example.com", Role::Professor);
    let (student_id, student) = support::seed_user(&env, "Stu", "stu@example.com", Role::Student);
    let app = test::init_service(build_app(web::Data::new(env.state.clone()))).await;

    let (status, _) =
        read(test::call_service(&app, get("/api/admin/users", &professor).to_request()).await).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, users) =
        read(test::call_service(&app, get("/api/admin/users", &admin).to_request()).await).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = users
        .as_array()
        .expect("user list")
        .iter()
        .filter_map(|u| u["name"].as_str())
        .collect();
    assert_eq!(names, ["Ada", "Prof", "Stu"]);

    let req = post(
        "/api/professor/courses",
        &admin,
        json!({ "title": "Assigned", "description": "", "professorId": professor_id }),
    );
    let (status, course) = read(test::call_service(&app, req.to_request()).await).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(course["professorId"], professor_id);

    let req = support::delete(&format!("/api/professor/courses/{}", course["id"].as_str().expect("id")), &professor);
    let (status, archived) = read(test::call_service(&app, req.to_request()).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(archived["status"], "archived");

    let (_, own) =
        read(test::call_service(&app, get("/api/professor/courses", &professor).to_request()).await).await;
    assert_eq!(own.as_array().map(Vec::len), Some(0));
    let (_, all) = read(test::call_service(&app, get("/api/admin/courses", &admin).to_request()).await).await;
    assert_eq!(all.as_array().map(Vec::len), Some(1));

    let req = put(
        &format!("/api/admin/users/{}/role", student_id),
        &admin,
        json!({ "role": "professor" }),
    );
    let (status, promoted) = read(test::call_service(&app, req.to_request()).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(promoted["role"], "professor");

    let (_, body) = read(test::call_service(&app, get("/api/dashboard", &student).to_request()).await).await;
    assert_eq!(body["role"], "professor");
}

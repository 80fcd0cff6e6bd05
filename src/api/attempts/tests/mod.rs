mod single_choice_flow;

use axum::http::{Method, StatusCode};
use tower::ServiceExt;

use crate::db::models::User;
use crate::db::types::UserRole;
use crate::test_support::{self, TestContext};

pub(super) struct Seed {
    pub(super) course_id: String,
    pub(super) class_id: String,
    pub(super) teacher: User,
    pub(super) student: User,
    pub(super) teacher_token: String,
    pub(super) student_token: String,
}

pub(super) async fn seed_course_with_student(ctx: &TestContext) -> Seed {
    let teacher = test_support::insert_user(ctx.state.db(), "Teacher User", UserRole::Teacher).await;
    let student = test_support::insert_user(ctx.state.db(), "Student User", UserRole::Student).await;
    let course_id = test_support::insert_course(ctx.state.db(), "Math 101").await;
    let class_id = test_support::insert_class(ctx.state.db(), &course_id, "7A").await;
    test_support::enroll(ctx.state.db(), &class_id, &student.id).await;

    let teacher_token = test_support::bearer_token(&teacher.id, ctx.state.settings());
    let student_token = test_support::bearer_token(&student.id, ctx.state.settings());

    Seed { course_id, class_id, teacher, student, teacher_token, student_token }
}

pub(super) async fn start_attempt(
    ctx: &TestContext,
    token: &str,
    activity_id: &str,
) -> serde_json::Value {
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/activities/{activity_id}/attempts"),
            Some(token),
            None,
        ))
        .await
        .expect("start attempt");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    body
}

pub(super) async fn submit_attempt(
    ctx: &TestContext,
    token: &str,
    attempt_id: &str,
    answers: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/attempts/{attempt_id}/submit"),
            Some(token),
            Some(serde_json::json!({ "answers": answers })),
        ))
        .await
        .expect("submit attempt");

    let status = response.status();
    let body = test_support::read_json(response).await;
    (status, body)
}

pub(super) async fn grade_attempt(
    ctx: &TestContext,
    token: &str,
    attempt_id: &str,
    grades: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PUT,
            &format!("/api/v1/attempts/{attempt_id}/grade"),
            Some(token),
            Some(serde_json::json!({ "grades": grades })),
        ))
        .await
        .expect("grade attempt");

    let status = response.status();
    let body = test_support::read_json(response).await;
    (status, body)
}

pub(super) async fn fetch_pending(
    ctx: &TestContext,
    token: &str,
    query: &str,
) -> serde_json::Value {
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/attempts/pending{query}"),
            Some(token),
            None,
        ))
        .await
        .expect("pending attempts");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    body
}

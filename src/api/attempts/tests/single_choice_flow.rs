use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::db::types::ActivityType;
use crate::test_support;

use super::{seed_course_with_student, start_attempt, submit_attempt};

#[tokio::test]
async fn auto_graded_activity_finishes_in_one_submit() {
    let ctx = test_support::setup_test_context().await;
    let seed = seed_course_with_student(&ctx).await;

    let activity = test_support::insert_activity(
        ctx.state.db(),
        &seed.course_id,
        "Fractions quiz",
        ActivityType::HomeworkTest,
        "fractions",
        None,
    )
    .await;
    let q1 = test_support::insert_single_choice_question(
        ctx.state.db(),
        &activity.id,
        0,
        2,
        &["1/2", "1/3", "1/4"],
        2,
    )
    .await;
    let q2 = test_support::insert_text_question(ctx.state.db(), &activity.id, 1, 3, "Three Fifths")
        .await;

    let started = start_attempt(&ctx, &seed.student_token, &activity.id).await;
    assert_eq!(started["resumed"], false);
    assert_eq!(started["status"], "in_progress");
    assert_eq!(started["attempt_number"], 1);
    assert_eq!(started["max_score"], 5);
    let attempt_id = started["id"].as_str().expect("attempt id");

    let (status, body) = submit_attempt(
        &ctx,
        &seed.student_token,
        attempt_id,
        json!([
            { "question_id": q1.id, "selected_option": 2 },
            { "question_id": q2.id, "text_answer": "  three   FIFTHS " },
        ]),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "response: {body}");

    assert_eq!(body["status"], "graded");
    assert_eq!(body["score"], 5);
    assert_eq!(body["max_score"], 5);
    assert!(body["submitted_at"].is_string());
    assert!(body["graded_at"].is_string());

    let answers = body["answers"].as_array().expect("answers");
    assert_eq!(answers.len(), 2);
    assert_eq!(answers[0]["is_correct"], true);
    assert_eq!(answers[0]["points_awarded"], 2);
    assert_eq!(answers[1]["is_correct"], true);
    assert_eq!(answers[1]["points_awarded"], 3);
}

#[tokio::test]
async fn wrong_answers_score_zero_per_question() {
    let ctx = test_support::setup_test_context().await;
    let seed = seed_course_with_student(&ctx).await;

    let activity = test_support::insert_activity(
        ctx.state.db(),
        &seed.course_id,
        "Quiz",
        ActivityType::HomeworkTest,
        "fractions",
        None,
    )
    .await;
    let q1 = test_support::insert_single_choice_question(
        ctx.state.db(),
        &activity.id,
        0,
        2,
        &["a", "b", "c"],
        1,
    )
    .await;
    let q2 =
        test_support::insert_text_question(ctx.state.db(), &activity.id, 1, 3, "correct").await;

    let started = start_attempt(&ctx, &seed.student_token, &activity.id).await;
    let attempt_id = started["id"].as_str().expect("attempt id");

    let (status, body) = submit_attempt(
        &ctx,
        &seed.student_token,
        attempt_id,
        json!([
            { "question_id": q1.id, "selected_option": 3 },
            { "question_id": q2.id, "text_answer": "wrong" },
        ]),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["status"], "graded");
    assert_eq!(body["score"], 0);

    let answers = body["answers"].as_array().expect("answers");
    assert_eq!(answers[0]["is_correct"], false);
    assert_eq!(answers[0]["points_awarded"], 0);
    assert_eq!(answers[1]["is_correct"], false);
}

#[tokio::test]
async fn activity_weight_scales_the_final_score() {
    let ctx = test_support::setup_test_context().await;
    let seed = seed_course_with_student(&ctx).await;

    let activity = test_support::insert_activity(
        ctx.state.db(),
        &seed.course_id,
        "Weighted quiz",
        ActivityType::WeeklyStar,
        "fractions",
        Some(0.5),
    )
    .await;
    let q1 = test_support::insert_single_choice_question(
        ctx.state.db(),
        &activity.id,
        0,
        4,
        &["a", "b"],
        1,
    )
    .await;

    let started = start_attempt(&ctx, &seed.student_token, &activity.id).await;
    let attempt_id = started["id"].as_str().expect("attempt id");

    let (status, body) = submit_attempt(
        &ctx,
        &seed.student_token,
        attempt_id,
        json!([{ "question_id": q1.id, "selected_option": 1 }]),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["score"], 4);
    assert_eq!(body["weighted_score"], 2.0);
    assert_eq!(body["weighted_max_score"], 2.0);
}

#[tokio::test]
async fn max_score_is_snapshotted_when_the_attempt_starts() {
    let ctx = test_support::setup_test_context().await;
    let seed = seed_course_with_student(&ctx).await;

    let activity = test_support::insert_activity(
        ctx.state.db(),
        &seed.course_id,
        "Quiz",
        ActivityType::HomeworkTest,
        "fractions",
        None,
    )
    .await;
    let q1 = test_support::insert_single_choice_question(
        ctx.state.db(),
        &activity.id,
        0,
        2,
        &["a", "b"],
        1,
    )
    .await;

    let started = start_attempt(&ctx, &seed.student_token, &activity.id).await;
    assert_eq!(started["max_score"], 2);
    let attempt_id = started["id"].as_str().expect("attempt id");

    // The catalog grows a question after the attempt opened.
    let q2 = test_support::insert_single_choice_question(
        ctx.state.db(),
        &activity.id,
        1,
        3,
        &["a", "b"],
        1,
    )
    .await;

    let (status, body) = submit_attempt(
        &ctx,
        &seed.student_token,
        attempt_id,
        json!([
            { "question_id": q1.id, "selected_option": 1 },
            { "question_id": q2.id, "selected_option": 2 },
        ]),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["status"], "graded");
    assert_eq!(body["score"], 2);
    assert_eq!(body["max_score"], 2);

    // A fresh attempt picks up the edited catalog.
    let second = start_attempt(&ctx, &seed.student_token, &activity.id).await;
    assert_eq!(second["resumed"], false);
    assert_eq!(second["max_score"], 5);
}

#[tokio::test]
async fn second_submit_conflicts_after_grading() {
    let ctx = test_support::setup_test_context().await;
    let seed = seed_course_with_student(&ctx).await;

    let activity = test_support::insert_activity(
        ctx.state.db(),
        &seed.course_id,
        "Quiz",
        ActivityType::HomeworkTest,
        "fractions",
        None,
    )
    .await;
    let q1 = test_support::insert_single_choice_question(
        ctx.state.db(),
        &activity.id,
        0,
        1,
        &["a", "b"],
        1,
    )
    .await;

    let started = start_attempt(&ctx, &seed.student_token, &activity.id).await;
    let attempt_id = started["id"].as_str().expect("attempt id");
    let payload = json!([{ "question_id": q1.id, "selected_option": 1 }]);

    let (status, _) = submit_attempt(&ctx, &seed.student_token, attempt_id, payload.clone()).await;
    assert_eq!(status, StatusCode::OK);

    let (status, error) = submit_attempt(&ctx, &seed.student_token, attempt_id, payload).await;
    assert_eq!(status, StatusCode::CONFLICT, "response: {error}");
}

#[tokio::test]
async fn starting_twice_resumes_the_open_attempt() {
    let ctx = test_support::setup_test_context().await;
    let seed = seed_course_with_student(&ctx).await;

    let activity = test_support::insert_activity(
        ctx.state.db(),
        &seed.course_id,
        "Quiz",
        ActivityType::HomeworkTest,
        "fractions",
        None,
    )
    .await;
    test_support::insert_open_question(ctx.state.db(), &activity.id, 0, 5).await;

    let first = start_attempt(&ctx, &seed.student_token, &activity.id).await;
    assert_eq!(first["resumed"], false);

    let second = start_attempt(&ctx, &seed.student_token, &activity.id).await;
    assert_eq!(second["resumed"], true);
    assert_eq!(second["id"], first["id"]);
    assert_eq!(second["attempt_number"], 1);
}

#[tokio::test]
async fn my_attempts_lists_history_in_order() {
    let ctx = test_support::setup_test_context().await;
    let seed = seed_course_with_student(&ctx).await;

    let activity = test_support::insert_activity(
        ctx.state.db(),
        &seed.course_id,
        "Quiz",
        ActivityType::HomeworkTest,
        "fractions",
        None,
    )
    .await;
    let q1 = test_support::insert_single_choice_question(
        ctx.state.db(),
        &activity.id,
        0,
        1,
        &["a", "b"],
        1,
    )
    .await;

    let first = start_attempt(&ctx, &seed.student_token, &activity.id).await;
    let first_id = first["id"].as_str().expect("attempt id");
    let (status, _) = submit_attempt(
        &ctx,
        &seed.student_token,
        first_id,
        json!([{ "question_id": q1.id, "selected_option": 2 }]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let second = start_attempt(&ctx, &seed.student_token, &activity.id).await;
    assert_eq!(second["attempt_number"], 2);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/activities/{}/attempts/my", activity.id),
            Some(&seed.student_token),
            None,
        ))
        .await
        .expect("my attempts");

    let status = response.status();
    let body = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");

    let attempts = body.as_array().expect("attempts");
    assert_eq!(attempts.len(), 2);
    assert_eq!(attempts[0]["attempt_number"], 1);
    assert_eq!(attempts[0]["status"], "graded");
    assert_eq!(attempts[1]["attempt_number"], 2);
    assert_eq!(attempts[1]["status"], "in_progress");
}

//! Donations, comments, ratings and reports on a project.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, create_project, create_user, dec, get, post_json_auth};
use crowdfund_db::repositories::CommentRepo;
use rust_decimal::Decimal;
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Donations
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn donate_and_list(pool: PgPool) {
    let (creator, _) = create_user(&pool, "creator", "user").await;
    let (donor, token) = create_user(&pool, "donor", "user").await;
    let project = create_project(&pool, creator.id, "Fund me", "100.00").await;
    let uri = format!("/api/v1/projects/{}/donations", project.id);

    let response = post_json_auth(build_test_app(pool.clone()), &uri, &token, json!({ "amount": "12.34" })).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["user_id"], donor.id);
    assert_eq!(dec(&json["data"]["amount"]), "12.34".parse::<Decimal>().unwrap());

    let json = body_json(get(build_test_app(pool), &uri).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn donation_amount_is_validated(pool: PgPool) {
    let (creator, token) = create_user(&pool, "creator", "user").await;
    let project = create_project(&pool, creator.id, "Fund me", "100.00").await;
    let uri = format!("/api/v1/projects/{}/donations", project.id);

    for amount in ["0", "-5.00", "1.001"] {
        let response =
            post_json_auth(build_test_app(pool.clone()), &uri, &token, json!({ "amount": amount })).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "amount {amount}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn donation_to_unknown_project_is_404(pool: PgPool) {
    let (_, token) = create_user(&pool, "donor", "user").await;
    let response = post_json_auth(
        build_test_app(pool),
        "/api/v1/projects/777/donations",
        &token,
        json!({ "amount": "5.00" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn comment_and_list_with_author(pool: PgPool) {
    let (creator, _) = create_user(&pool, "creator", "user").await;
    let (_, token) = create_user(&pool, "talker", "user").await;
    let project = create_project(&pool, creator.id, "Chatty", "10.00").await;
    let uri = format!("/api/v1/projects/{}/comments", project.id);

    let response =
        post_json_auth(build_test_app(pool.clone()), &uri, &token, json!({ "content": "  Great idea!  " })).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["content"], "Great idea!");

    let response = post_json_auth(build_test_app(pool.clone()), &uri, &token, json!({ "content": "   " })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(get(build_test_app(pool), &uri).await).await;
    let comments = json["data"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["username"], "talker");
}

// ---------------------------------------------------------------------------
// Ratings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn second_rating_is_conflict(pool: PgPool) {
    let (creator, _) = create_user(&pool, "creator", "user").await;
    let (_, token) = create_user(&pool, "rater", "user").await;
    let project = create_project(&pool, creator.id, "Rate me", "10.00").await;
    let uri = format!("/api/v1/projects/{}/ratings", project.id);

    let response = post_json_auth(build_test_app(pool.clone()), &uri, &token, json!({ "rating": 5 })).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json_auth(build_test_app(pool), &uri, &token, json!({ "rating": 3 })).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
    assert_eq!(json["error"], "You have already rated this project");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rating_out_of_range_is_400(pool: PgPool) {
    let (creator, token) = create_user(&pool, "creator", "user").await;
    let project = create_project(&pool, creator.id, "Rate me", "10.00").await;
    let uri = format!("/api/v1/projects/{}/ratings", project.id);

    for rating in [0, 6] {
        let response =
            post_json_auth(build_test_app(pool.clone()), &uri, &token, json!({ "rating": rating })).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn project_report_is_unique_per_user(pool: PgPool) {
    let (creator, _) = create_user(&pool, "creator", "user").await;
    let (_, token) = create_user(&pool, "reporter", "user").await;
    let (_, other_token) = create_user(&pool, "second", "user").await;
    let project = create_project(&pool, creator.id, "Suspicious", "10.00").await;
    let uri = format!("/api/v1/projects/{}/reports", project.id);
    let body = json!({ "reason": "Looks like spam" });

    let response = post_json_auth(build_test_app(pool.clone()), &uri, &token, body.clone()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(body_json(response).await["data"]["comment_id"].is_null());

    let response = post_json_auth(build_test_app(pool.clone()), &uri, &token, body.clone()).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = post_json_auth(build_test_app(pool), &uri, &other_token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn comment_report_flags_comment(pool: PgPool) {
    let (creator, _) = create_user(&pool, "creator", "user").await;
    let (author, _) = create_user(&pool, "author", "user").await;
    let (_, token) = create_user(&pool, "reporter", "user").await;
    let project = create_project(&pool, creator.id, "Chatty", "10.00").await;
    let comment = CommentRepo::create(&pool, project.id, author.id, "rude words").await.unwrap();
    let uri = format!("/api/v1/projects/{}/comments/{}/reports", project.id, comment.id);

    // A project-level report by the same user does not block a comment report.
    let response = post_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/projects/{}/reports", project.id),
        &token,
        json!({ "reason": "whole thread" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json_auth(build_test_app(pool.clone()), &uri, &token, json!({ "reason": "abusive" })).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["comment_id"], comment.id);

    let stored = CommentRepo::find_by_id(&pool, comment.id).await.unwrap().unwrap();
    assert!(stored.is_reported);

    let response = post_json_auth(build_test_app(pool), &uri, &token, json!({ "reason": "again" })).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn comment_report_requires_matching_project(pool: PgPool) {
    let (creator, token) = create_user(&pool, "creator", "user").await;
    let first = create_project(&pool, creator.id, "First", "10.00").await;
    let second = create_project(&pool, creator.id, "Second", "10.00").await;
    let comment = CommentRepo::create(&pool, first.id, creator.id, "hello").await.unwrap();

    let response = post_json_auth(
        build_test_app(pool),
        &format!("/api/v1/projects/{}/comments/{}/reports", second.id, comment.id),
        &token,
        json!({ "reason": "wrong place" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

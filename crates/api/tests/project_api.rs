//! HTTP-level tests for the public project list, detail, create and update.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{
    body_json, build_test_app, create_project, create_project_with_tags, create_user, dec, donate,
    get, get_auth, post_json_auth, put_json_auth,
};
use crowdfund_db::repositories::{CategoryRepo, RatingRepo, TagRepo};
use rust_decimal::Decimal;
use serde_json::json;
use sqlx::PgPool;

fn project_body(title: &str) -> serde_json::Value {
    let start = Utc::now() + Duration::hours(1);
    let end = start + Duration::days(20);
    json!({
        "title": title,
        "details": "Building a community garden",
        "total_target": "1000.00",
        "start_time": start,
        "end_time": end,
        "pictures": ["garden/cover.jpg", "garden/plot.jpg"],
    })
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_project_sets_creator(pool: PgPool) {
    let (user, token) = create_user(&pool, "creator", "user").await;

    let response = post_json_auth(
        build_test_app(pool),
        "/api/v1/projects",
        &token,
        project_body("Garden"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["creator_id"], user.id);
    assert_eq!(json["data"]["is_cancelled"], false);
    assert_eq!(dec(&json["data"]["total_target"]), "1000.00".parse::<Decimal>().unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_requires_auth(pool: PgPool) {
    let response = common::post_json(
        build_test_app(pool),
        "/api/v1/projects",
        project_body("Anonymous"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_rejects_bad_window_and_target(pool: PgPool) {
    let (_, token) = create_user(&pool, "creator", "user").await;

    let mut body = project_body("Backwards");
    body["end_time"] = json!(Utc::now() - Duration::days(1));
    let response = post_json_auth(build_test_app(pool.clone()), "/api/v1/projects", &token, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut body = project_body("Zero");
    body["total_target"] = json!("0");
    let response = post_json_auth(build_test_app(pool.clone()), "/api/v1/projects", &token, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut body = project_body("Past start");
    body["start_time"] = json!(Utc::now() - Duration::days(2));
    let response = post_json_auth(build_test_app(pool), "/api/v1/projects", &token, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_with_unknown_category_is_400(pool: PgPool) {
    let (_, token) = create_user(&pool, "creator", "user").await;
    let mut body = project_body("Orphan");
    body["category_id"] = json!(9999);

    let response = post_json_auth(build_test_app(pool), "/api/v1/projects", &token, body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Public list
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_excludes_cancelled_and_expired(pool: PgPool) {
    let (user, _) = create_user(&pool, "creator", "user").await;
    let open = create_project(&pool, user.id, "Open", "100.00").await;
    let cancelled = create_project(&pool, user.id, "Cancelled", "100.00").await;
    let expired = create_project(&pool, user.id, "Expired", "100.00").await;

    sqlx::query("UPDATE projects SET is_cancelled = true WHERE id = $1")
        .bind(cancelled.id)
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("UPDATE projects SET start_time = NOW() - INTERVAL '10 days', end_time = NOW() - INTERVAL '1 day' WHERE id = $1")
        .bind(expired.id)
        .execute(&pool)
        .await
        .unwrap();

    let json = body_json(get(build_test_app(pool), "/api/v1/projects").await).await;
    let items = json["data"]["items"].as_array().unwrap();

    assert_eq!(json["data"]["total"], 1);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], open.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_is_newest_first_and_paginated(pool: PgPool) {
    let (user, _) = create_user(&pool, "creator", "user").await;
    let mut ids = Vec::new();
    for i in 0..12 {
        ids.push(create_project(&pool, user.id, &format!("Project {i}"), "50.00").await.id);
    }

    let json = body_json(get(build_test_app(pool.clone()), "/api/v1/projects").await).await;
    assert_eq!(json["data"]["page"], 1);
    assert_eq!(json["data"]["page_size"], 10);
    assert_eq!(json["data"]["total"], 12);
    let items = json["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 10);
    assert_eq!(items[0]["id"], *ids.last().unwrap());

    let json = body_json(get(build_test_app(pool.clone()), "/api/v1/projects?page=2").await).await;
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 2);

    let json =
        body_json(get(build_test_app(pool), "/api/v1/projects?page_size=500").await).await;
    assert_eq!(json["data"]["page_size"], 50);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_annotates_ratings_and_funding(pool: PgPool) {
    let (creator, _) = create_user(&pool, "creator", "user").await;
    let (fan, _) = create_user(&pool, "fan", "user").await;
    let (critic, _) = create_user(&pool, "critic", "user").await;
    let project = create_project(&pool, creator.id, "Rated", "200.00").await;
    create_project(&pool, creator.id, "Unrated", "200.00").await;

    RatingRepo::create(&pool, project.id, fan.id, 5).await.unwrap();
    RatingRepo::create(&pool, project.id, critic.id, 2).await.unwrap();
    donate(&pool, project.id, fan.id, "50.00").await;

    let json = body_json(get(build_test_app(pool), "/api/v1/projects").await).await;
    let items = json["data"]["items"].as_array().unwrap();
    let rated = items.iter().find(|i| i["id"] == project.id).unwrap();
    let unrated = items.iter().find(|i| i["id"] != project.id).unwrap();

    assert_eq!(rated["avg_rating"], 3.5);
    assert_eq!(rated["rating_count"], 2);
    assert_eq!(dec(&rated["funding"]["progress_percent"]), Decimal::from(25));
    assert_eq!(rated["funding"]["can_cancel"], false);
    assert!(unrated["avg_rating"].is_null());
    assert_eq!(unrated["rating_count"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_category_slug(pool: PgPool) {
    let (user, _) = create_user(&pool, "creator", "user").await;
    let art = CategoryRepo::create(&pool, "Art", "art", "").await.unwrap();
    CategoryRepo::create(&pool, "Tech", "tech", "").await.unwrap();

    let in_art = create_project(&pool, user.id, "Mural", "10.00").await;
    sqlx::query("UPDATE projects SET category_id = $2 WHERE id = $1")
        .bind(in_art.id)
        .bind(art.id)
        .execute(&pool)
        .await
        .unwrap();
    create_project(&pool, user.id, "Uncategorised", "10.00").await;

    for uri in ["/api/v1/projects/category/art", "/api/v1/projects?category=art"] {
        let json = body_json(get(build_test_app(pool.clone()), uri).await).await;
        let items = json["data"]["items"].as_array().unwrap();
        assert_eq!(items.len(), 1, "{uri}");
        assert_eq!(items[0]["id"], in_art.id);
        assert_eq!(json["data"]["categories"].as_array().unwrap().len(), 2);
        assert_eq!(json["data"]["category"]["slug"], "art", "{uri}");
    }

    let json = body_json(get(build_test_app(pool.clone()), "/api/v1/projects").await).await;
    assert!(json["data"]["category"].is_null());

    let json = body_json(get(build_test_app(pool), "/api/v1/projects/category/missing").await).await;
    assert_eq!(json["data"]["total"], 0);
    assert!(json["data"]["category"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn search_matches_title_or_tag_once(pool: PgPool) {
    let (user, _) = create_user(&pool, "creator", "user").await;
    let solar = TagRepo::create(&pool, "solar").await.unwrap();
    let solar_panels = TagRepo::create(&pool, "solar-panels").await.unwrap();

    let by_title = create_project(&pool, user.id, "Solar kiln", "10.00").await;
    let by_tags = create_project_with_tags(
        &pool,
        user.id,
        "Rooftop power",
        "10.00",
        vec![solar.id, solar_panels.id],
    )
    .await;
    create_project(&pool, user.id, "Bakery", "10.00").await;

    let json = body_json(get(build_test_app(pool.clone()), "/api/v1/projects?search=SOLAR").await).await;
    let ids: Vec<_> = json["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_i64().unwrap())
        .collect();

    assert_eq!(json["data"]["total"], 2);
    assert_eq!(ids.len(), 2, "two matching tags must not duplicate a row");
    assert!(ids.contains(&by_title.id));
    assert!(ids.contains(&by_tags.id));

    // LIKE metacharacters are matched literally.
    let json = body_json(get(build_test_app(pool), "/api/v1/projects?search=%25").await).await;
    assert_eq!(json["data"]["total"], 0);
}

// ---------------------------------------------------------------------------
// Detail
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn detail_includes_funding_rating_and_similar(pool: PgPool) {
    let (creator, _) = create_user(&pool, "creator", "user").await;
    let (fan, fan_token) = create_user(&pool, "fan", "user").await;
    let tag = TagRepo::create(&pool, "garden").await.unwrap();

    let project =
        create_project_with_tags(&pool, creator.id, "Main", "1000.00", vec![tag.id]).await;
    let mut similar_ids = Vec::new();
    for i in 0..5 {
        let p = create_project_with_tags(&pool, creator.id, &format!("Similar {i}"), "10.00", vec![tag.id]).await;
        similar_ids.push(p.id);
    }
    create_project(&pool, creator.id, "Unrelated", "10.00").await;

    donate(&pool, project.id, fan.id, "100.00").await;
    RatingRepo::create(&pool, project.id, fan.id, 4).await.unwrap();

    let uri = format!("/api/v1/projects/{}", project.id);

    let json = body_json(get(build_test_app(pool.clone()), &uri).await).await;
    let data = &json["data"];
    assert_eq!(data["project"]["id"], project.id);
    assert_eq!(data["tags"][0]["name"], "garden");
    assert_eq!(dec(&data["funding"]["total_donated"]), "100.00".parse::<Decimal>().unwrap());
    assert_eq!(dec(&data["funding"]["progress_percent"]), Decimal::from(10));
    assert_eq!(data["funding"]["can_cancel"], true);
    assert_eq!(data["funding"]["state"], "active");
    assert!(data["funding"]["days_left"].as_i64().unwrap() >= 29);
    assert_eq!(data["average_rating"], 4.0);
    assert_eq!(data["rating_count"], 1);
    assert!(data["user_rating"].is_null());
    assert_eq!(data["can_rate"], true);

    let similar = data["similar"].as_array().unwrap();
    assert_eq!(similar.len(), 4);
    for s in similar {
        let id = s["id"].as_i64().unwrap();
        assert_ne!(id, project.id);
        assert!(similar_ids.contains(&id));
    }

    let json = body_json(get_auth(build_test_app(pool), &uri, &fan_token).await).await;
    assert_eq!(json["data"]["user_rating"], 4);
    assert_eq!(json["data"]["can_rate"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn detail_unknown_project_is_404(pool: PgPool) {
    let response = get(build_test_app(pool), "/api/v1/projects/424242").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn detail_with_bad_token_is_401(pool: PgPool) {
    let (user, _) = create_user(&pool, "creator", "user").await;
    let project = create_project(&pool, user.id, "Main", "10.00").await;

    let response = get_auth(
        build_test_app(pool),
        &format!("/api/v1/projects/{}", project.id),
        "garbage",
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn creator_can_update_fields_and_tags(pool: PgPool) {
    let (user, token) = create_user(&pool, "creator", "user").await;
    let tag = TagRepo::create(&pool, "music").await.unwrap();
    let project = create_project(&pool, user.id, "Old title", "10.00").await;

    let response = put_json_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/projects/{}", project.id),
        &token,
        json!({ "title": "New title", "total_target": "25.50", "tag_ids": [tag.id] }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], "New title");
    assert_eq!(json["data"]["details"], "Details for Old title");
    assert_eq!(dec(&json["data"]["total_target"]), "25.50".parse::<Decimal>().unwrap());

    let tags = TagRepo::list_for_project(&pool, project.id).await.unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].id, tag.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_creator_update_is_403(pool: PgPool) {
    let (owner, _) = create_user(&pool, "owner", "user").await;
    let (_, intruder_token) = create_user(&pool, "intruder", "user").await;
    let project = create_project(&pool, owner.id, "Mine", "10.00").await;

    let response = put_json_auth(
        build_test_app(pool),
        &format!("/api/v1/projects/{}", project.id),
        &intruder_token,
        json!({ "title": "Hijacked" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_cannot_cancel_or_touch_cancelled(pool: PgPool) {
    let (user, token) = create_user(&pool, "creator", "user").await;
    let project = create_project(&pool, user.id, "Project", "10.00").await;
    let uri = format!("/api/v1/projects/{}", project.id);

    // An `is_cancelled` field is ignored by the update DTO.
    let response = put_json_auth(
        build_test_app(pool.clone()),
        &uri,
        &token,
        json!({ "is_cancelled": true }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["is_cancelled"], false);

    sqlx::query("UPDATE projects SET is_cancelled = true WHERE id = $1")
        .bind(project.id)
        .execute(&pool)
        .await
        .unwrap();

    let response = put_json_auth(build_test_app(pool), &uri, &token, json!({ "title": "Again" })).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_validates_merged_window(pool: PgPool) {
    let (user, token) = create_user(&pool, "creator", "user").await;
    let project = create_project(&pool, user.id, "Project", "10.00").await;

    let response = put_json_auth(
        build_test_app(pool),
        &format!("/api/v1/projects/{}", project.id),
        &token,
        json!({ "end_time": project.start_time - Duration::minutes(5) }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

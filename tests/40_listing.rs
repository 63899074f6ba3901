mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

use common::{posgraduate, sample, TestApp, OWNER, RESOURCES, STRANGER};

#[tokio::test]
async fn list_shows_open_shape_without_token() -> Result<()> {
    let app = TestApp::new().await;
    app.create("/api/v1/educations", OWNER, posgraduate()).await?;

    let (status, body) = app.get("/api/v1/educations/list?user_id=1", None).await?;
    assert_eq!(status, StatusCode::OK);

    let rows = body.as_array().expect("array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["title"], "Posgraduate");
    assert_eq!(rows[0]["school"], "Lambton College");
    assert!(rows[0].get("owner_id").is_none(), "owner leaked: {}", rows[0]);
    Ok(())
}

#[tokio::test]
async fn listings_expose_owner_only_for_items_and_tags() -> Result<()> {
    let app = TestApp::new().await;

    for resource in RESOURCES {
        app.create(&format!("/api/v1/{}", resource), OWNER, sample(resource)).await?;

        let (status, body) = app.get(&format!("/api/v1/{}/list?user_id=1", resource), None).await?;
        assert_eq!(status, StatusCode::OK, "{}", resource);
        let rows = body.as_array().expect("array");
        assert_eq!(rows.len(), 1, "{}", resource);

        let exposes_owner = matches!(resource, "items" | "tags");
        assert_eq!(rows[0].get("owner_id").is_some(), exposes_owner, "{}: {}", resource, rows[0]);
    }
    Ok(())
}

#[tokio::test]
async fn default_user_id_lists_nothing() -> Result<()> {
    let app = TestApp::new().await;
    app.create("/api/v1/items", OWNER, json!({ "title": "a" })).await?;

    let (status, body) = app.get("/api/v1/items/list", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
    Ok(())
}

#[tokio::test]
async fn list_filters_by_owner() -> Result<()> {
    let app = TestApp::new().await;
    app.create("/api/v1/tags", OWNER, json!({ "name": "mine" })).await?;
    app.create("/api/v1/tags", STRANGER, json!({ "name": "theirs" })).await?;

    let (_, body) = app.get(&format!("/api/v1/tags/list?user_id={}", STRANGER), None).await?;
    let names: Vec<_> = body.as_array().unwrap().iter().map(|t| t["name"].clone()).collect();
    assert_eq!(names, vec![json!("theirs")]);

    // Items and tags expose the full record in listings
    assert_eq!(body[0]["owner_id"], STRANGER);
    Ok(())
}

#[tokio::test]
async fn skills_list_with_empty_tags() -> Result<()> {
    let app = TestApp::new().await;
    app.create("/api/v1/skills", OWNER, json!({ "name": "Rust" })).await?;

    let (_, body) = app.get("/api/v1/skills/list?user_id=1", None).await?;
    assert_eq!(body, json!([{ "name": "Rust", "tags": null }]));
    Ok(())
}

#[tokio::test]
async fn skip_and_limit_page_in_id_order() -> Result<()> {
    let app = TestApp::new().await;
    for name in ["a", "b", "c", "d"] {
        app.create("/api/v1/skills", OWNER, json!({ "name": name })).await?;
    }

    let (_, body) = app.get("/api/v1/skills/list?user_id=1&skip=1&limit=2", None).await?;
    let names: Vec<_> = body.as_array().unwrap().iter().map(|s| s["name"].clone()).collect();
    assert_eq!(names, vec![json!("b"), json!("c")]);

    let (status, body) = app.get("/api/v1/skills/list?user_id=1&skip=-3&limit=-1", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
    Ok(())
}

#[tokio::test]
async fn configured_cap_bounds_limit() -> Result<()> {
    let app = TestApp::with_list_limit(Some(2)).await;
    for title in ["a", "b", "c"] {
        app.create("/api/v1/items", OWNER, json!({ "title": title })).await?;
    }

    let (_, body) = app.get("/api/v1/items/list?user_id=1&limit=50", None).await?;
    assert_eq!(body.as_array().unwrap().len(), 2);
    Ok(())
}

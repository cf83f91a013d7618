//! Integration tests for the five record collections.

mod common;

use axum::http::StatusCode;
use common::{asset_json, expense_json, goal_json, income_json, liability_json, TestClient};
use serde_json::json;

async fn signed_in(username: &str) -> TestClient {
    let mut client = TestClient::new();
    client.register(username).await;
    client
}

#[tokio::test]
async fn test_collections_start_empty() {
    let client = signed_in("alice").await;
    for path in ["/api/incomes", "/api/expenses", "/api/assets", "/api/liabilities", "/api/goals"] {
        let (status, body) = client.get_json(path).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]), "{} should be empty", path);
    }
}

#[tokio::test]
async fn test_income_crud() {
    let client = signed_in("alice").await;

    let (status, created) = client
        .post_json("/api/incomes", income_json(1000.0, "weekly", "active"))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());
    assert_eq!(created["frequency"], "weekly");
    assert_eq!(created["type"], "active");

    let (status, listed) = client.get_json("/api/incomes").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["id"], id.as_str());

    let mut changed = income_json(1500.0, "monthly", "passive");
    changed["category"] = json!("Real Estate");
    let (status, updated) = client.put_json(&format!("/api/incomes/{}", id), changed).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["amount"], 1500.0);

    let (status, shown) = client.get_json(&format!("/api/incomes/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(shown["category"], "Real Estate");
    assert_eq!(shown["type"], "passive");

    assert_eq!(
        client.delete(&format!("/api/incomes/{}", id)).await,
        StatusCode::NO_CONTENT
    );
    let (status, body) = client.get_json(&format!("/api/incomes/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Income not found");
    assert_eq!(
        client.delete(&format!("/api/incomes/{}", id)).await,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_every_collection_round_trips() {
    let client = signed_in("alice").await;

    let fixtures = [
        ("expenses", expense_json("Food", 42.5)),
        ("assets", asset_json("Stocks", 10_000.0, 50.0)),
        ("liabilities", liability_json(8000.0)),
        ("goals", goal_json(5000.0, 1200.0)),
    ];

    for (collection, record) in fixtures {
        let id = client.create(collection, record.clone()).await;
        let (status, shown) = client.get_json(&format!("/api/{}/{}", collection, id)).await;
        assert_eq!(status, StatusCode::OK, "{}", collection);
        for (key, value) in record.as_object().unwrap() {
            assert_eq!(&shown[key], value, "{}.{}", collection, key);
        }
    }
}

#[tokio::test]
async fn test_client_supplied_id_is_kept() {
    let client = signed_in("alice").await;

    let mut record = expense_json("Housing", 1200.0);
    record["id"] = json!("rent-2024-03");
    let (status, body) = client.post_json("/api/expenses", record.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], "rent-2024-03");

    let (status, body) = client.post_json("/api/expenses", record).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("rent-2024-03"));
}

#[tokio::test]
async fn test_validation_errors() {
    let client = signed_in("alice").await;

    let (status, body) = client
        .post_json("/api/expenses", expense_json("Food", -5.0))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let mut blank = goal_json(100.0, 0.0);
    blank["description"] = json!("   ");
    let (status, _) = client.post_json("/api/goals", blank).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Unknown category values are rejected while decoding the body.
    let (status, _) = client
        .post_json("/api/expenses", expense_json("Yachts", 5.0))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, listed) = client.get_json("/api/expenses").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn test_update_checks_id_and_existence() {
    let client = signed_in("alice").await;
    let id = client.create("liabilities", liability_json(100.0)).await;

    let mut mismatched = liability_json(50.0);
    mismatched["id"] = json!("something-else");
    let (status, _) = client
        .put_json(&format!("/api/liabilities/{}", id), mismatched)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = client
        .put_json("/api/liabilities/missing", liability_json(50.0))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_records_are_private_to_their_owner() {
    let alice = signed_in("alice").await;
    let id = alice.create("assets", asset_json("Bonds", 2500.0, 0.0)).await;

    let mut bob = alice.other_user();
    bob.register("bob").await;

    let (status, listed) = bob.get_json("/api/assets").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([]));

    let (status, _) = bob.get(&format!("/api/assets/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = bob
        .put_json(&format!("/api/assets/{}", id), asset_json("Bonds", 1.0, 0.0))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        bob.delete(&format!("/api/assets/{}", id)).await,
        StatusCode::NOT_FOUND
    );

    // Bob cannot take the id over through a bulk save either.
    let mut hijack = asset_json("Bonds", 1.0, 0.0);
    hijack["id"] = json!(id.clone());
    let (status, _) = bob.put_json("/api/assets", json!([hijack])).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, shown) = alice.get_json(&format!("/api/assets/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(shown["value"], 2500.0);
}

#[tokio::test]
async fn test_bulk_save_upserts() {
    let client = signed_in("alice").await;
    let existing = client.create("goals", goal_json(1000.0, 100.0)).await;

    let mut changed = goal_json(1000.0, 400.0);
    changed["id"] = json!(existing.clone());
    let mut fresh = goal_json(300.0, 0.0);
    fresh["id"] = json!("vacation");

    let (status, saved) = client.put_json("/api/goals", json!([changed, fresh])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved.as_array().unwrap().len(), 2);

    let (_, listed) = client.get_json("/api/goals").await;
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["id"], existing.as_str());
    assert_eq!(listed[0]["currentAmount"], 400.0);
    assert_eq!(listed[1]["id"], "vacation");
}

#[tokio::test]
async fn test_bulk_save_is_all_or_nothing() {
    let client = signed_in("alice").await;

    let mut bad = income_json(-1.0, "monthly", "active");
    bad["id"] = json!("bad");
    let (status, _) = client
        .put_json(
            "/api/incomes",
            json!([income_json(100.0, "monthly", "active"), bad]),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, listed) = client.get_json("/api/incomes").await;
    assert_eq!(listed, json!([]));
}

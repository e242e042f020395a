use data_service::Data;
use serde_json::{json, Value};

use crate::support::{seeded_server, start_server};

#[tokio::test]
async fn list_returns_all() {
    let (server, _, _) = seeded_server().await;

    let resp = server.client.get(server.url("/data")).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    let body: Vec<Value> = resp.json().await.unwrap();
    let names: Vec<_> = body.iter().map(|d| d["name"].clone()).collect();
    assert_eq!(names, vec![json!("fido"), json!("kitty")]);
}

#[tokio::test]
async fn list_empty_store() {
    let server = start_server().await;
    let resp = server.client.get(server.url("/data")).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn get_one() {
    let (server, _, kitty) = seeded_server().await;

    let resp = server
        .client
        .get(server.url(&format!("/data/{}", kitty.id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        json!({ "id": kitty.id, "name": "kitty", "category": "cat", "available": true })
    );
}

#[tokio::test]
async fn get_missing_returns_404() {
    let (server, _, _) = seeded_server().await;

    for path in ["/data/0", "/data/5", "/data/abc"] {
        let resp = server.client.get(server.url(path)).send().await.unwrap();
        assert_eq!(resp.status(), 404, "{}", path);

        let body: Value = resp.json().await.unwrap();
        assert!(body["message"].as_str().unwrap().contains("was not found"));
    }
}

#[tokio::test]
async fn create_json() {
    let (server, _, _) = seeded_server().await;
    let before = server.count().await;

    let resp = server
        .client
        .post(server.url("/data"))
        .json(&json!({ "name": "sammy", "category": "snake", "available": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let location = resp
        .headers()
        .get("location")
        .expect("Location header")
        .to_str()
        .unwrap()
        .to_string();

    let created: Value = resp.json().await.unwrap();
    assert_eq!(created["name"], "sammy");
    let id = created["id"].as_u64().unwrap();
    assert!(id > 0);
    assert!(location.ends_with(&format!("/data/{}", id)));

    let resp = server.client.get(server.url("/data")).send().await.unwrap();
    let all: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(all.len(), before + 1);
    assert!(all.contains(&created));

    // The Location header points at the new resource.
    let resp = server.client.get(&location).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let fetched: Value = resp.json().await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn create_form() {
    let server = start_server().await;

    let resp = server
        .client
        .post(server.url("/data"))
        .header("content-type", "application/x-www-form-urlencoded")
        .body("name=rex&category=dog&available=False")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let created: Value = resp.json().await.unwrap();
    assert_eq!(created["name"], "rex");
    assert_eq!(created["category"], "dog");
    assert_eq!(created["available"], false);
}

#[tokio::test]
async fn create_ignores_payload_id() {
    let server = start_server().await;

    let resp = server
        .client
        .post(server.url("/data"))
        .json(&json!({ "id": 77, "name": "sammy" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let created: Value = resp.json().await.unwrap();
    assert_ne!(created["id"], 77);
    assert_eq!(created["available"], true);
    assert_eq!(created["category"], "");
}

#[tokio::test]
async fn create_without_name_returns_400() {
    let (server, _, _) = seeded_server().await;
    let before = server.count().await;

    let resp = server
        .client
        .post(server.url("/data"))
        .json(&json!({ "category": "dog" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "name is required");
    assert_eq!(server.count().await, before);
}

#[tokio::test]
async fn update() {
    let (server, _, kitty) = seeded_server().await;

    let resp = server
        .client
        .put(server.url(&format!("/data/{}", kitty.id)))
        .json(&json!({ "name": "kitty", "category": "tabby", "available": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = server
        .client
        .get(server.url(&format!("/data/{}", kitty.id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["category"], "tabby");
}

#[tokio::test]
async fn update_form() {
    let (server, _, kitty) = seeded_server().await;

    let resp = server
        .client
        .put(server.url(&format!("/data/{}", kitty.id)))
        .header("content-type", "application/x-www-form-urlencoded")
        .body("name=kitty&category=tabby&available=0")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["id"], kitty.id);
    assert_eq!(body["category"], "tabby");
    assert_eq!(body["available"], false);

    let stored = server.state.repo().find(kitty.id).unwrap().unwrap();
    assert_eq!(stored, Data { id: kitty.id, ..Data::new("kitty", "tabby", false) });
}

#[tokio::test]
async fn update_with_unknown_content_type_returns_415() {
    let (server, _, kitty) = seeded_server().await;

    let resp = server
        .client
        .put(server.url(&format!("/data/{}", kitty.id)))
        .header("content-type", "text/plain")
        .body("name=tom")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 415);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], 415);

    let unchanged = server.state.repo().find(kitty.id).unwrap().unwrap();
    assert_eq!(unchanged, kitty);
}

#[tokio::test]
async fn update_keeps_path_id() {
    let (server, fido, kitty) = seeded_server().await;

    let resp = server
        .client
        .put(server.url(&format!("/data/{}", kitty.id)))
        .json(&json!({ "id": fido.id, "name": "tom" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["id"], kitty.id);

    let fido_now = server.state.repo().find(fido.id).unwrap().unwrap();
    assert_eq!(fido_now, fido);
}

#[tokio::test]
async fn update_without_name_returns_400() {
    let (server, _, kitty) = seeded_server().await;

    let resp = server
        .client
        .put(server.url(&format!("/data/{}", kitty.id)))
        .json(&json!({ "category": "dog" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let unchanged = server.state.repo().find(kitty.id).unwrap().unwrap();
    assert_eq!(unchanged, kitty);
}

#[tokio::test]
async fn update_missing_returns_404() {
    let (server, _, _) = seeded_server().await;

    let resp = server
        .client
        .put(server.url("/data/0"))
        .json(&json!({ "name": "timothy", "category": "mouse" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    assert_eq!(server.count().await, 2);
}

#[tokio::test]
async fn delete() {
    let (server, _, kitty) = seeded_server().await;
    let before = server.count().await;

    let resp = server
        .client
        .delete(server.url(&format!("/data/{}", kitty.id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 204);
    assert!(resp.bytes().await.unwrap().is_empty());
    assert_eq!(server.count().await, before - 1);
}

#[tokio::test]
async fn delete_missing_returns_204() {
    let (server, _, _) = seeded_server().await;

    for path in ["/data/12345", "/data/abc"] {
        let resp = server.client.delete(server.url(path)).send().await.unwrap();
        assert_eq!(resp.status(), 204, "{}", path);
    }
    assert_eq!(server.count().await, 2);
}

#[tokio::test]
async fn health_check() {
    let server = start_server().await;

    let resp = server.client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "ok": true }));
}

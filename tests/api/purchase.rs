use serde_json::Value;

use crate::support::{seeded_server, start_server};

#[tokio::test]
async fn purchase() {
    let (server, _, kitty) = seeded_server().await;

    let resp = server
        .client
        .put(server.url(&format!("/data/{}/purchase", kitty.id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["available"], false);

    let resp = server
        .client
        .get(server.url(&format!("/data/{}", kitty.id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["available"], false);
}

#[tokio::test]
async fn purchase_not_available() {
    let (server, _, kitty) = seeded_server().await;
    let url = server.url(&format!("/data/{}/purchase", kitty.id));

    let resp = server.client.put(&url).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    let resp = server.client.put(&url).send().await.unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], 400);
    assert!(body["message"].as_str().unwrap().contains("not available"));
}

#[tokio::test]
async fn purchase_missing_returns_404() {
    let server = start_server().await;

    let resp = server
        .client
        .put(server.url("/data/9/purchase"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn purchase_race_has_one_winner() {
    for _ in 0..20 {
        let (server, fido, _) = seeded_server().await;
        let url = server.url(&format!("/data/{}/purchase", fido.id));

        let (a, b) = tokio::join!(
            server.client.put(&url).send(),
            server.client.put(&url).send(),
        );
        let mut statuses = vec![a.unwrap().status().as_u16(), b.unwrap().status().as_u16()];
        statuses.sort();
        assert_eq!(statuses, vec![200, 400]);

        let stored = server.state.repo().find(fido.id).unwrap().unwrap();
        assert!(!stored.available);
    }
}

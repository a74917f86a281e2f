mod common;

use chirpy::auth::make_access_token;
use common::spawn_app;
use serde_json::Value;
use uuid::Uuid;

#[tokio::test]
async fn create_chirp_returns_201_authored_by_token_subject() {
    let app = spawn_app();
    let user = app.logged_in_user("john@example.com").await;

    let response = app
        .create_chirp(user["token"].as_str().unwrap(), "I had something interesting for breakfast")
        .await;
    assert_eq!(201, response.status().as_u16());

    let chirp: Value = response.json().await.unwrap();
    assert_eq!(chirp["body"], "I had something interesting for breakfast");
    assert_eq!(chirp["user_id"], user["id"]);
    assert!(Uuid::parse_str(chirp["id"].as_str().unwrap()).is_ok());
}

#[tokio::test]
async fn create_chirp_requires_access_token() {
    let app = spawn_app();
    let user = app.logged_in_user("john@example.com").await;

    let missing = app
        .client
        .post(app.url("/api/chirps"))
        .json(&serde_json::json!({ "body": "hello" }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(401, missing.status().as_u16());

    let refresh_as_access = app
        .create_chirp(user["refresh_token"].as_str().unwrap(), "hello")
        .await;
    assert_eq!(401, refresh_as_access.status().as_u16());

    let list = app
        .client
        .get(app.url("/api/chirps"))
        .send()
        .await
        .expect("Failed to execute request.");
    let chirps: Vec<Value> = list.json().await.unwrap();
    assert!(chirps.is_empty());
}

#[tokio::test]
async fn create_chirp_returns_400_for_invalid_body() {
    let app = spawn_app();
    let user = app.logged_in_user("john@example.com").await;
    let token = user["token"].as_str().unwrap();

    let test_cases = vec![
        ("a".repeat(141), "too long"),
        ("   ".to_string(), "blank"),
    ];

    for (body, reason) in test_cases {
        let response = app.create_chirp(token, &body).await;
        assert_eq!(400, response.status().as_u16(), "Should reject: {}", reason);
    }

    let at_limit = app.create_chirp(token, &"a".repeat(140)).await;
    assert_eq!(201, at_limit.status().as_u16());
}

#[tokio::test]
async fn create_chirp_for_deleted_author_returns_404() {
    let app = spawn_app();
    // Correctly signed token whose subject was never registered
    let token = make_access_token(
        Uuid::new_v4(),
        &app.jwt.secret,
        chrono::Duration::hours(1),
    )
    .unwrap();

    let response = app.create_chirp(&token, "hello").await;
    assert_eq!(404, response.status().as_u16());
}

#[tokio::test]
async fn list_chirps_returns_all_oldest_first() {
    let app = spawn_app();
    let alice = app.logged_in_user("alice@example.com").await;
    let bob = app.logged_in_user("bob@example.com").await;

    app.create_chirp(alice["token"].as_str().unwrap(), "first").await;
    app.create_chirp(bob["token"].as_str().unwrap(), "second").await;
    app.create_chirp(alice["token"].as_str().unwrap(), "third").await;

    let response = app
        .client
        .get(app.url("/api/chirps"))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());

    let chirps: Vec<Value> = response.json().await.unwrap();
    let bodies: Vec<&str> = chirps.iter().map(|c| c["body"].as_str().unwrap()).collect();
    assert_eq!(bodies, vec!["first", "second", "third"]);
    assert_eq!(chirps[1]["user_id"], bob["id"]);
}

#[tokio::test]
async fn get_chirp_by_id() {
    let app = spawn_app();
    let user = app.logged_in_user("john@example.com").await;

    let created: Value = app
        .create_chirp(user["token"].as_str().unwrap(), "hello")
        .await
        .json()
        .await
        .unwrap();

    let response = app
        .client
        .get(app.url(&format!("/api/chirps/{}", created["id"].as_str().unwrap())))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());

    let chirp: Value = response.json().await.unwrap();
    assert_eq!(chirp["id"], created["id"]);
    assert_eq!(chirp["body"], "hello");
}

#[tokio::test]
async fn get_chirp_returns_404_for_unknown_id_and_400_for_bad_id() {
    let app = spawn_app();

    let unknown = app
        .client
        .get(app.url(&format!("/api/chirps/{}", Uuid::new_v4())))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(404, unknown.status().as_u16());

    let malformed = app
        .client
        .get(app.url("/api/chirps/not-a-uuid"))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(400, malformed.status().as_u16());
}

#[tokio::test]
async fn reset_removes_chirps() {
    let app = spawn_app();
    let user = app.logged_in_user("john@example.com").await;
    app.create_chirp(user["token"].as_str().unwrap(), "hello").await;

    let response = app
        .client
        .post(app.url("/admin/reset"))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, response.status().as_u16());

    let chirps: Vec<Value> = app
        .client
        .get(app.url("/api/chirps"))
        .send()
        .await
        .expect("Failed to execute request.")
        .json()
        .await
        .unwrap();
    assert!(chirps.is_empty());
}

mod common;

use std::net::TcpListener;

use actix_web::{http::header, test, web, App, HttpServer};
use common::{init_app, login, register, send, signup, PASSWORD};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use taskboard::{auth::AuthMiddleware, routes};

#[actix_rt::test]
async fn test_register_login_and_me_flow() {
    let app = init_app().await;

    let resp = register(&app, "Alice", "alice@x.io", PASSWORD).await;
    assert_eq!(resp.status(), 201);
    let user: Value = test::read_body_json(resp).await;
    assert_eq!(user["name"], "Alice");
    assert_eq!(user["email"], "alice@x.io");
    assert!(user["id"].is_string());
    assert!(user.get("passwordHash").is_none());
    assert!(user.get("password_hash").is_none());

    let resp = login(&app, "alice@x.io", "wrong-password").await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid email or password");

    let resp = login(&app, "alice@x.io", PASSWORD).await;
    assert_eq!(resp.status(), 200);
    let auth: Value = test::read_body_json(resp).await;
    assert_eq!(auth["userId"], user["id"]);
    let token = auth["token"].as_str().unwrap();

    let (status, me) = send(&app, token, test::TestRequest::get().uri("/auth/me")).await;
    assert_eq!(status, 200);
    assert_eq!(me, json!({ "userId": user["id"] }));
}

#[actix_rt::test]
async fn test_unknown_email_looks_like_wrong_password() {
    let app = init_app().await;
    let resp = login(&app, "nobody@x.io", PASSWORD).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid email or password");
}

#[actix_rt::test]
async fn test_duplicate_email_is_rejected_case_insensitively() {
    let app = init_app().await;
    assert_eq!(register(&app, "Alice", "alice@x.io", PASSWORD).await.status(), 201);
    assert_eq!(register(&app, "Alice", "alice@x.io", PASSWORD).await.status(), 400);
    assert_eq!(register(&app, "Alice", "ALICE@X.io", PASSWORD).await.status(), 400);

    // login matches the normalized address too
    assert_eq!(login(&app, "Alice@X.IO", PASSWORD).await.status(), 200);
}

#[actix_rt::test]
async fn test_invalid_registrations_are_bad_requests() {
    let app = init_app().await;
    assert_eq!(register(&app, "Alice", "not-an-email", PASSWORD).await.status(), 400);
    assert_eq!(register(&app, "Alice", "a@x.io", "short").await.status(), 400);
    assert_eq!(register(&app, "", "a@x.io", PASSWORD).await.status(), 400);
    assert_eq!(register(&app, "   ", "a@x.io", PASSWORD).await.status(), 400);

    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({ "email": "a@x.io", "password": PASSWORD }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);

    let req = test::TestRequest::post()
        .uri("/auth/register")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}

#[test_log::test(actix_rt::test)]
async fn test_gate_rejections_are_unauthorized() {
    let app = init_app().await;
    let token = signup(&app, "gate@x.io").await;

    let req = test::TestRequest::get().uri("/projects").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "No token provided");

    for value in [
        token.clone(),
        format!("Basic {}", token),
        format!("Bearer {} extra", token),
        "Bearer not-a-jwt".to_string(),
    ] {
        let req = test::TestRequest::get()
            .uri("/projects")
            .insert_header((header::AUTHORIZATION, value.clone()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401, "{:?}", value);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
    }
}

#[actix_rt::test]
async fn test_public_paths_skip_the_gate() {
    let app = init_app().await;
    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["store"], "memory");

    let resp = test::call_service(&app, test::TestRequest::get().uri("/auth/me").to_request()).await;
    assert_eq!(resp.status(), 401);
}

#[actix_rt::test]
async fn test_token_from_another_secret_is_rejected() {
    let app = init_app().await;
    let forged = taskboard::auth::TokenService::new("not-the-secret", chrono::Duration::hours(1))
        .generate_token(uuid::Uuid::new_v4())
        .unwrap();
    let (status, body) = send(&app, &forged, test::TestRequest::get().uri("/auth/me")).await;
    assert_eq!(status, 401);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid token"));
}

#[actix_rt::test]
async fn test_over_http() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let store = common::memory_store();
    let tokens = common::token_service();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .app_data(web::Data::new(tokens.clone()))
            .wrap(AuthMiddleware::new(tokens.clone()))
            .service(routes::health::health)
            .configure(routes::config)
    })
    .workers(1)
    .listen(listener)
    .unwrap()
    .run();
    let handle = server.handle();
    actix_rt::spawn(server);

    let base = format!("http://127.0.0.1:{}", port);
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/auth/register", base))
        .json(&json!({ "name": "Http", "email": "http@x.io", "password": PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let auth: Value = client
        .post(format!("{}/auth/login", base))
        .json(&json!({ "email": "http@x.io", "password": PASSWORD }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let token = auth["token"].as_str().unwrap();

    let resp = client
        .post(format!("{}/projects", base))
        .bearer_auth(token)
        .json(&json!({ "title": "Over the wire" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let project: Value = resp.json().await.unwrap();
    assert_eq!(project["status"], "active");

    let resp = client.get(format!("{}/projects", base)).send().await.unwrap();
    assert_eq!(resp.status(), 401);

    handle.stop(true).await;
}

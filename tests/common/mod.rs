#![allow(dead_code)]

use std::sync::Arc;

use actix_http::Request;
use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::header,
    test, web, App,
};
use chrono::Duration;
use serde_json::{json, Value};
use taskboard::{
    auth::{AuthMiddleware, TokenService},
    routes,
    store::{MemoryStore, Store},
};

pub const PASSWORD: &str = "secret123";

pub fn token_service() -> TokenService {
    TokenService::new("integration-secret", Duration::hours(1))
}

pub fn memory_store() -> web::Data<dyn Store> {
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    web::Data::from(store)
}

/// The full application over a fresh in-memory store.
pub async fn init_app(
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    let tokens = token_service();
    test::init_service(
        App::new()
            .app_data(memory_store())
            .app_data(web::Data::new(tokens.clone()))
            .wrap(AuthMiddleware::new(tokens))
            .service(routes::health::health)
            .configure(routes::config),
    )
    .await
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

pub async fn register<S, B>(app: &S, name: &str, email: &str, password: &str) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({ "name": name, "email": email, "password": password }))
        .to_request();
    test::call_service(app, req).await
}

pub async fn login<S, B>(app: &S, email: &str, password: &str) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    test::call_service(app, req).await
}

/// Registers and logs in, returning the bearer token.
pub async fn signup<S, B>(app: &S, email: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = register(app, "Tester", email, PASSWORD).await;
    assert_eq!(resp.status(), 201, "registering {}", email);
    let resp = login(app, email, PASSWORD).await;
    assert_eq!(resp.status(), 200, "logging in {}", email);
    let body: Value = test::read_body_json(resp).await;
    body["token"].as_str().expect("token in login response").to_string()
}

/// Sends an authenticated request and returns status and JSON body.
pub async fn send<S, B>(
    app: &S,
    token: &str,
    req: test::TestRequest,
) -> (actix_web::http::StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = test::call_service(app, req.insert_header(bearer(token)).to_request()).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON response body")
    };
    (status, json)
}

pub async fn create_project<S, B>(app: &S, token: &str, title: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = send(
        app,
        token,
        test::TestRequest::post()
            .uri("/projects")
            .set_json(json!({ "title": title })),
    )
    .await;
    assert_eq!(status, 201, "creating project {}: {}", title, body);
    body
}

pub async fn create_task<S, B>(app: &S, token: &str, project_id: &str, title: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = send(
        app,
        token,
        test::TestRequest::post()
            .uri("/tasks")
            .set_json(json!({ "projectId": project_id, "title": title })),
    )
    .await;
    assert_eq!(status, 201, "creating task {}: {}", title, body);
    body["task"].clone()
}

use crate::store::Store;
use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

/// Health check endpoint
///
/// Public. Returns the API status, the storage backend in use (`memory` or
/// `postgres`) and the current timestamp.
#[get("/health")]
pub async fn health(store: web::Data<dyn Store>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "store": store.backend(),
        "timestamp": Utc::now()
    }))
}

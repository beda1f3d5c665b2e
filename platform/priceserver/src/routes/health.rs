use actix_web::{get, HttpResponse};
use serde_json::json;

#[get("/")]
pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "service": "priceserver",
        "status": "running",
    }))
}

#[get("/health")]
pub async fn check() -> HttpResponse {
    HttpResponse::Ok().finish()
}

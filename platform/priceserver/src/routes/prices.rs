use actix_web::http::header;
use actix_web::web::{Data, Json, Path, Query};
use actix_web::{get, put, HttpRequest, HttpResponse};
use chrono::Duration;
use log::info;
use pricedesk::service::PriceQueryService;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;
use crate::routes::if_none_match_matches;

#[derive(Debug, Deserialize)]
pub struct UpdatePriceRequest {
    pub price: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaleQuery {
    #[serde(default = "default_older_than_seconds")]
    pub older_than_seconds: i64,
}

fn default_older_than_seconds() -> i64 {
    300
}

#[get("/api/prices")]
pub async fn get_all(service: Data<PriceQueryService>) -> HttpResponse {
    HttpResponse::Ok().json(service.get_all_prices())
}

#[get("/api/prices/stale")]
pub async fn get_stale(
    service: Data<PriceQueryService>,
    query: Query<StaleQuery>,
) -> Result<HttpResponse, ApiError> {
    let seconds = query.older_than_seconds;
    if !(1..=86_400).contains(&seconds) {
        return Err(ApiError::InvalidInput {
            title: "Invalid range",
            detail: "olderThanSeconds must be between 1 and 86400.".to_string(),
        });
    }

    let items = service.get_stale_prices(Duration::seconds(seconds));

    Ok(HttpResponse::Ok().json(json!({
        "olderThanSeconds": seconds,
        "count": items.len(),
        "items": items,
    })))
}

#[get("/api/prices/{symbol}")]
pub async fn get_by_symbol(
    service: Data<PriceQueryService>,
    path: Path<String>,
    request: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let symbol = path.into_inner();
    if symbol.trim().is_empty() {
        return Err(ApiError::InvalidInput {
            title: "Invalid symbol",
            detail: "A non-empty symbol is required.".to_string(),
        });
    }

    let item = match service.get_price(&symbol) {
        Some(item) => item,
        None => return Ok(HttpResponse::NotFound().finish()),
    };

    let etag = service.build_etag(&item);
    if if_none_match_matches(&request, &etag) {
        return Ok(HttpResponse::NotModified().finish());
    }

    Ok(HttpResponse::Ok()
        .insert_header((header::ETAG, etag))
        .insert_header((header::CACHE_CONTROL, "private, max-age=30"))
        .json(item))
}

#[put("/api/prices/{symbol}")]
pub async fn upsert(
    service: Data<PriceQueryService>,
    path: Path<String>,
    payload: Json<UpdatePriceRequest>,
) -> Result<HttpResponse, ApiError> {
    let symbol = path.into_inner();
    if symbol.trim().is_empty() {
        return Err(ApiError::InvalidInput {
            title: "Invalid symbol",
            detail: "A non-empty symbol is required.".to_string(),
        });
    }

    if payload.price <= Decimal::ZERO {
        return Err(ApiError::InvalidInput {
            title: "Invalid price",
            detail: "Price must be greater than zero.".to_string(),
        });
    }

    let updated = service.upsert_price(&symbol, payload.price);
    info!("{} updated to version {}", updated.symbol, updated.version);

    let etag = service.build_etag(&updated);

    Ok(HttpResponse::Ok()
        .insert_header((header::ETAG, etag))
        .json(updated))
}

use std::collections::{BTreeSet, HashMap};

use actix_web::http::header;
use actix_web::web::{Data, Json, Query};
use actix_web::{get, post, HttpRequest, HttpResponse};
use pricedesk::service::PriceQueryService;
use pricedesk::store::PriceRecord;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::routes::if_none_match_matches;

#[derive(Debug, Deserialize)]
pub struct WatchlistQuery {
    pub symbols: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceWatchlistResponse {
    pub requested_symbols: Vec<String>,
    pub matched_symbols: usize,
    pub prices: Vec<PriceRecord>,
}

#[derive(Debug, Deserialize)]
pub struct WatchlistValueRequest {
    #[serde(default)]
    pub holdings: Vec<HoldingRequest>,
}

#[derive(Debug, Deserialize)]
pub struct HoldingRequest {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub quantity: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingValue {
    pub symbol: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub market_value: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistValueResponse {
    pub total_market_value: Decimal,
    pub matched_count: usize,
    pub missing_symbols: Vec<String>,
    pub items: Vec<HoldingValue>,
}

#[get("/api/prices/watchlist")]
pub async fn get_watchlist(
    service: Data<PriceQueryService>,
    query: Query<WatchlistQuery>,
    request: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let raw = query.symbols.as_deref().unwrap_or_default();
    if raw.trim().is_empty() {
        return Err(ApiError::InvalidInput {
            title: "Invalid watchlist",
            detail: "Provide comma-separated symbols via query string. Example: ?symbols=BTC,ETH"
                .to_string(),
        });
    }

    let mut requested: Vec<String> = Vec::new();
    for symbol in raw.split(',') {
        let symbol = symbol.trim().to_uppercase();
        if !symbol.is_empty() && !requested.contains(&symbol) {
            requested.push(symbol);
        }
    }

    let prices = service.get_prices(&requested);
    if prices.is_empty() {
        return Err(ApiError::NotFound {
            title: "Symbols not found",
            detail: "None of the requested symbols exist in the store.".to_string(),
        });
    }

    let etag = service.build_collection_etag(&prices);
    if if_none_match_matches(&request, &etag) {
        return Ok(HttpResponse::NotModified().finish());
    }

    Ok(HttpResponse::Ok()
        .insert_header((header::ETAG, etag))
        .insert_header((header::CACHE_CONTROL, "private, max-age=20"))
        .json(PriceWatchlistResponse {
            matched_symbols: prices.len(),
            requested_symbols: requested,
            prices,
        }))
}

#[post("/api/prices/watchlist/value")]
pub async fn calculate_value(
    service: Data<PriceQueryService>,
    payload: Json<WatchlistValueRequest>,
) -> Result<HttpResponse, ApiError> {
    let holdings = &payload.holdings;
    if holdings.is_empty() {
        return Err(ApiError::InvalidInput {
            title: "Invalid holdings",
            detail: "At least one holding is required.".to_string(),
        });
    }

    let invalid = holdings
        .iter()
        .any(|holding| holding.symbol.trim().is_empty() || holding.quantity <= Decimal::ZERO);
    if invalid {
        return Err(ApiError::InvalidInput {
            title: "Invalid holding",
            detail: "Each holding requires symbol and quantity greater than zero.".to_string(),
        });
    }

    let symbols: Vec<String> = holdings
        .iter()
        .map(|holding| holding.symbol.trim().to_uppercase())
        .collect();

    let lookup: HashMap<String, PriceRecord> = service
        .get_prices(&symbols)
        .into_iter()
        .map(|record| (record.symbol.clone(), record))
        .collect();

    let mut items = Vec::with_capacity(holdings.len());
    let mut missing_symbols = BTreeSet::new();
    let mut total_market_value = Decimal::ZERO;

    for holding in holdings {
        let symbol = holding.symbol.trim().to_uppercase();
        let price = match lookup.get(&symbol) {
            Some(price) => price,
            None => {
                missing_symbols.insert(symbol);
                continue;
            }
        };

        let market_value = (price.price * holding.quantity)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        total_market_value += market_value;

        items.push(HoldingValue {
            symbol,
            quantity: holding.quantity,
            unit_price: price.price,
            market_value,
        });
    }

    Ok(HttpResponse::Ok().json(WatchlistValueResponse {
        total_market_value: total_market_value
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        matched_count: items.len(),
        missing_symbols: missing_symbols.into_iter().collect(),
        items,
    }))
}

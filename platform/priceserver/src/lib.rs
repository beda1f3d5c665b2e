pub mod error;
pub mod routes;

use std::net::TcpListener;
use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use pricedesk::service::PriceQueryService;
use pricedesk::store::InMemoryPriceStore;

pub fn run(listener: TcpListener) -> Result<Server, std::io::Error> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    let service = web::Data::new(PriceQueryService::new(Arc::new(
        InMemoryPriceStore::seeded(),
    )));

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(service.clone())
            .service(routes::health::root)
            .service(routes::health::check)
            .service(routes::prices::get_all)
            .service(routes::watchlist::get_watchlist)
            .service(routes::watchlist::calculate_value)
            .service(routes::prices::get_stale)
            .service(routes::prices::get_by_symbol)
            .service(routes::prices::upsert)
    })
    .listen(listener)?
    .run();

    Ok(server)
}

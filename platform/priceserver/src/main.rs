use std::env;
use std::io;
use std::net::TcpListener;
use std::num::ParseIntError;

use priceserver::run;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let server_port = env::var("SERVER_PORT").unwrap_or("8080".to_string());

    let server_port = server_port
        .parse::<u16>()
        .map_err(|e: ParseIntError| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    run(TcpListener::bind(("0.0.0.0", server_port))?)?.await
}

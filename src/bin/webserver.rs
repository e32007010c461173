use std::error::Error;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use warp::Filter;

mod endpoints;

use transit_map::config::Config;
use transit_map::data;

async fn run() -> Result<(), Box<dyn Error>> {
    let config = Config::from_env()?;
    let data = Arc::new(data::load_data(&config.data_dir)?);

    info!(
        addr = %config.addr,
        static_dir = %config.static_dir.display(),
        "starting web server"
    );
    warp::serve(
        endpoints::stops_route(data.clone())
            .or(endpoints::routes_route(data))
            .or(warp::fs::dir(config.static_dir))
            .with(warp::log("transit_map::webserver")),
    )
    .run(config.addr)
    .await;
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run().await {
        error!("{}", err);
        std::process::exit(1);
    }
}

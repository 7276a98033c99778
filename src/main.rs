use tracing_subscriber::{Layer, layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod errors;
mod middlewares;
mod models;
mod routes;
mod server;
mod services;
mod state;
mod utils;

#[tokio::main]
async fn main() {
    let config = match config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err:?}");
            std::process::exit(1);
        }
    };
    let level = config.logs.level;
    // Initialize logger tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_filter(tracing_subscriber::filter::LevelFilter::from_level(level))
                .with_filter(tracing_subscriber::filter::filter_fn(|metadata| {
                    metadata.target().starts_with("confboard")
                })),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_file(false)
                .with_target(false)
                .with_filter(tracing_subscriber::filter::filter_fn(|metadata| {
                    metadata.target().starts_with("tower_http")
                })),
        )
        .with(tracing_error::ErrorLayer::default())
        .init();
    if let Err(err) = server::run_until_done(config).await {
        tracing::error!("{err:?}");
        std::process::exit(1);
    }
}

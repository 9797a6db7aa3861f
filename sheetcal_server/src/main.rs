use std::{net::SocketAddr, path::PathBuf};

use anyhow::Result;
use axum::{routing::get, Router};
use clap::Parser;
use env_logger::Env;
use log::info;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

use crate::route::AppState;

mod route;

#[derive(Debug, Parser)]
#[command(version, about = "Serve a published spreadsheet as calendar events")]
pub struct Arguments {
    /// the CSV export URL of the published sheet
    #[arg(long, env = "SHEETCAL_CSV_URL")]
    pub csv_url: String,
    /// the address to listen on
    #[arg(long, env = "SHEETCAL_BIND", default_value = "0.0.0.0:8008")]
    pub bind: SocketAddr,
    /// a directory with the calendar widget page to serve
    #[arg(long, env = "SHEETCAL_SITE_DIR")]
    pub site_dir: Option<PathBuf>,
}

/// Build the application router.
pub fn app(state: AppState, site_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);
    let app = Router::new()
        .route("/events", get(route::events::handler))
        .route("/calendar", get(route::calendar::handler))
        .with_state(state);
    let app = match site_dir {
        Some(site_dir) => app.fallback_service(ServeDir::new(site_dir)),
        None => app,
    };
    app.layer(cors)
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Arguments::parse();
    let state = AppState {
        csv_url: args.csv_url,
    };
    let app = app(state, args.site_dir);
    info!("Listening on http://{}", args.bind);
    axum::Server::bind(&args.bind)
        .serve(app.into_make_service())
        .await?;
    Ok(())
}

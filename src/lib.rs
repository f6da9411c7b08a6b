pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod params;
pub mod routes;

use axum::{routing::get, Router};
use lambda_http::{run, Error};
use tracing::info;

use crate::config::Config;
use crate::routes::{openapi, products};

pub fn create_app() -> Router {
    Router::new()
        .route(&products::PRODUCT_ITEM.router_path(), get(products::handler))
        .route("/openapi.json", get(openapi::handler))
}

pub async fn run_app(config: Config) -> Result<(), Error> {
    logging::init_logger(config.log_level);
    info!(environment = %config.environment, "Starting product items api");

    let app = create_app();

    match config.listen_addr {
        Some(addr) => {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            info!(%addr, "Serving on local listener");
            axum::serve(listener, app).await?;
            Ok(())
        }
        None => run(app).await,
    }
}

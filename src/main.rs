use std::time::Duration;

use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::signal::{
    ctrl_c,
    unix::{signal, SignalKind},
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

mod config;
mod db;
mod error;
mod filters;
mod models;
mod reconcile;
mod routes;
mod state;
mod upstream;

use anyhow::Context;
use config::Config;
use error::Result;
use routes::{
    ingredient_info_handler, ingredient_search_handler, ingredient_substitutes_handler,
    menu_handler, products_handler, random_recipes_handler, recipe_search_handler,
    recipes_by_ingredients_handler, similar_recipes_handler, welcome_handler, wine_handler,
};
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = Config::load()?;

    info!("Initializing state...");
    let state = AppState::new(config).await?;

    let cors = build_cors(&state.config)?;

    let app = Router::new()
        .route("/", get(welcome_handler))
        .route("/ingredient/search", get(ingredient_search_handler))
        .route("/ingredient/info/{id}", get(ingredient_info_handler))
        .route(
            "/ingredient/substitutes/{name}",
            get(ingredient_substitutes_handler),
        )
        .route("/recipes/search/{title}", get(recipe_search_handler))
        .route("/recipes/ingredients/", get(recipes_by_ingredients_handler))
        .route("/recipes/{id}/similar_recipes", get(similar_recipes_handler))
        .route("/recipes/random", get(random_recipes_handler))
        .route("/menu/menu", get(menu_handler))
        .route("/products/products", get(products_handler))
        .route("/wine/wine", get(wine_handler))
        .layer(cors)
        .with_state(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutting down");
    Ok(())
}

fn build_cors(config: &Config) -> Result<CorsLayer> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Ok(match &config.cors_origin {
        Some(origin) => {
            let origin: HeaderValue = origin
                .parse()
                .map_err(|_| error::AppError::Config(format!("invalid CORS origin: {origin}")))?;
            cors.allow_origin(origin)
        }
        None => cors.allow_origin(Any),
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

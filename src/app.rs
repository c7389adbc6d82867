/*
 * Responsibility
 * - Load Config -> build state -> assemble the Router
 * - Apply middleware (allowed hosts / CORS / transport)
 * - Start with axum::serve()
 */
use std::{panic, process};

use anyhow::Result;
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{api, config::Config, error::AppError, middleware, state::AppState};

fn init_tracing(debug: bool) {
    // RUST_LOG wins when set, e.g.
    // RUST_LOG=info,baldkit=debug,tower_http=debug cargo run
    let default = if debug {
        "debug,tower_http=debug"
    } else {
        "info,tower_http=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Surface panics through tracing; stderr may be hidden.
        tracing::error!(?info, "panic");

        // Development fails fast; production keeps serving.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.debug);
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );
    if !config.auth.has_secret() {
        tracing::warn!("JWT_AUTH_SECRET is not set; guarded routes will answer 500");
    }

    let state = AppState::from_config(&config);
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .merge(api::pages::routes(&state, config))
        .nest("/api/v1", api::v1::routes(&state, config))
        .fallback(not_found)
        .with_state(state);

    let router = middleware::allowed_hosts::apply(router, config);
    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router, config)
}

async fn not_found() -> AppError {
    AppError::not_found("not found")
}

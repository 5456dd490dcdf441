//! stackd API server
//!
//! HTTP boundary over the identity, template, stack, and config services.

use axum::routing::{get, post};
use axum::Router;
use stackd_auth::{AuthConfig, IdentityService, MemoryCredentialStore};
use stackd_engine::{DockerCli, HttpEngineApi};
use stackd_stacks::{StackConfig, StackService};
use stackd_template::{FsTemplateStore, TemplateService};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod auth;
mod config;
mod error;
mod handlers;
mod models;

use config::{ConfigService, JsonFileConfigStore};
use handlers::*;

#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<IdentityService>,
    pub templates: Arc<TemplateService>,
    pub stacks: Arc<StackService>,
    pub config: Arc<ConfigService>,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn build_state() -> AppState {
    let identity = IdentityService::new(
        Arc::new(MemoryCredentialStore::new()),
        Vec::new(),
        AuthConfig::from_env(),
    );

    let templates = TemplateService::new(Arc::new(FsTemplateStore::new(env_or(
        "STACKD_TEMPLATES_DIR",
        "templates",
    ))));

    let mut stack_config = StackConfig::default();
    if let Ok(max) = std::env::var("STACKD_MAX_STACKS") {
        if let Ok(max) = max.parse() {
            stack_config.max_stacks_per_tenant = max;
        }
    }
    if let Ok(tag) = std::env::var("STACKD_TENANT_TAG") {
        stack_config.tenant_tag = tag;
    }
    if let Ok(constraints) = std::env::var("STACKD_PLACEMENT_CONSTRAINTS") {
        stack_config.placement_constraints = constraints
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(String::from)
            .collect();
    }
    let stacks = StackService::new(
        Arc::new(HttpEngineApi::new(env_or(
            "STACKD_ENGINE_ENDPOINT",
            "http://127.0.0.1:2375",
        ))),
        Arc::new(DockerCli::new()),
        stack_config,
    );

    let config = ConfigService::new(Arc::new(JsonFileConfigStore::new(env_or(
        "STACKD_CONFIG_FILE",
        "config.json",
    ))));

    AppState {
        identity: Arc::new(identity),
        templates: Arc::new(templates),
        stacks: Arc::new(stacks),
        config: Arc::new(config),
    }
}

fn router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/ping", get(ping))
        .route("/healthcheck", get(healthcheck))
        // Tokens
        .route("/token", post(create_token))
        .route("/bootstrap", post(create_bootstrap_token))
        // Users
        .route("/users", get(list_users).post(create_user))
        .route("/users/:name", axum::routing::put(update_user))
        // Stacks
        .route("/stacks", get(list_stacks).post(create_stack))
        .route("/stacks/:name", get(get_stack).delete(delete_stack))
        // Engine administration
        .route("/system/stacks", get(list_engine_stacks))
        .route("/system/prune", post(prune))
        // Templates
        .route("/templates", get(list_templates).post(create_template))
        .route(
            "/templates/:name",
            get(get_template).put(update_template).delete(delete_template),
        )
        // Config
        .route("/config", get(get_config).put(update_config))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = build_state();
    let app = router(state);

    let addr = format!(
        "{}:{}",
        env_or("STACKD_HOST", "0.0.0.0"),
        env_or("STACKD_PORT", "8080")
    );
    tracing::info!("stackd API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

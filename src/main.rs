//! Voxbot server
//!
//! Serves the dialogue over HTTP for a voice platform adapter.

use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voxbot::api::{create_router, AppState};
use voxbot::config::Config;
use voxbot::runtime::{DialogueRuntime, MemorySessionStore};
use voxbot::state_machine::DialogueContext;
use voxbot::tree::validate;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voxbot=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = Config::from_env()?;

    // Load the tree
    let store = config.load_tree()?;
    tracing::info!(
        source = %config
            .tree_path
            .as_ref()
            .map_or_else(|| "bundled".to_string(), |p| p.display().to_string()),
        root = %store.root(),
        nodes = store.len(),
        "Tree loaded"
    );

    let issues = validate(&store);
    if issues.is_empty() {
        tracing::info!("Tree validation passed");
    } else {
        for issue in &issues {
            tracing::warn!(issue = %issue, "Tree validation issue");
        }
    }

    // Create application state
    let context = DialogueContext::new(Arc::new(store))
        .with_page_size(config.page_size)
        .with_card_image_base_url(config.card_image_base_url.clone());
    let runtime = DialogueRuntime::new(Arc::new(context), MemorySessionStore::new());
    let state = AppState::new(runtime, issues);

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new().gzip(true).br(true);

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(compression);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Voxbot server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

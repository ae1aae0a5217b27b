//! Server wiring and startup.

use std::{future::Future, sync::Arc};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    config::Config,
    domain::MessageStore,
    error::ServerError,
    infrastructure::{
        broadcast::{BroadcastRouter, ConnectionRegistry},
        repository::SqliteMessageStore,
        storage::{UPLOADS_URL_PREFIX, UploadStorage},
    },
    ui::{
        handler::{get_history, health_check, index, upload_file, websocket_handler},
        signal::shutdown_signal,
        state::AppState,
    },
};

/// Build the application router
pub fn build_app(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    let uploads = ServeDir::new(state.uploads.dir());

    Router::new()
        .route("/", get(index))
        .route("/ws", get(websocket_handler))
        .route("/history", get(get_history))
        .route(
            "/upload",
            post(upload_file).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/api/health", get(health_check))
        .nest_service(UPLOADS_URL_PREFIX, uploads)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve on an already bound listener until `shutdown` resolves.
///
/// Opens the store, creates the upload directory and spawns the broadcast
/// router, which is stopped once the HTTP server has shut down.
pub async fn serve<F>(listener: TcpListener, config: Config, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let store: Arc<dyn MessageStore> = Arc::new(SqliteMessageStore::open(&config.database.path)?);
    tracing::info!(path = %config.database.path.display(), "opened message store");

    let uploads = UploadStorage::new(&config.server.upload_dir);
    uploads.init().await.map_err(ServerError::UploadDir)?;

    let registry = Arc::new(ConnectionRegistry::default());
    let (router, publisher) = BroadcastRouter::new(registry.clone(), config.server.queue_warn_depth);
    let router_task = router.spawn();

    let state = Arc::new(AppState {
        store,
        registry,
        publisher,
        uploads,
        max_history: config.history_limit(),
        session: config.session_settings(),
        ui: config.ui.clone(),
    });
    let app = build_app(state, config.max_upload_bytes());

    match listener.local_addr() {
        Ok(addr) => tracing::info!("listening on {}", addr),
        Err(e) => tracing::warn!(error = %e, "listening on unknown address"),
    }

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServerError::Serve);

    router_task.abort();
    tracing::info!("server stopped");
    result
}

/// Bind the configured address and serve until Ctrl-C / SIGTERM.
pub async fn run(config: Config) -> Result<(), ServerError> {
    let address = config.server.address.clone();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| ServerError::Bind { address, source })?;

    serve(listener, config, shutdown_signal()).await
}

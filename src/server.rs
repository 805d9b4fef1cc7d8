use axum::middleware;
use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::error_pages::{error_page_middleware, fallback_handler};
use crate::handlers;
use crate::services::dataset::Dataset;
use crate::state::AppState;

/// Build the application state and Axum router from a [`Config`].
///
/// The dataset slot starts empty; call [`spawn_dataset_load`] to fill it.
pub fn build_app(config: Config) -> (AppState, Router) {
    let state = AppState::new(config);
    let app = router(state.clone());
    (state, app)
}

/// The full middleware stack around [`handlers::routes`].
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(handlers::routes())
        .fallback(fallback_handler)
        .layer(middleware::from_fn(error_page_middleware))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Loads both CSV ledgers on the blocking pool and publishes the dataset.
///
/// Requests arriving before this finishes get `503`. A failed load is
/// recorded on the state, so later requests get the reason instead of
/// `503`, and is returned from the task.
pub fn spawn_dataset_load(state: AppState) -> JoinHandle<AppResult<()>> {
    tokio::spawn(async move {
        let config = state.config.clone();
        let result = tokio::task::spawn_blocking(move || Dataset::load(&config))
            .await
            .map_err(|e| AppError::Internal(format!("Budget data loader panicked: {}", e)))
            .and_then(|loaded| loaded);

        match result {
            Ok(dataset) => {
                if !state.publish(dataset) {
                    tracing::warn!("Dataset was already published, keeping the first one");
                }
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to load budget data: {}", e);
                state.fail(&e);
                Err(e)
            }
        }
    })
}

/// Bind the router to `host:port` and spawn the server as a tokio task.
///
/// Returns the actual port the server bound to (useful when `port` is 0 for
/// OS-assigned ports) and a [`JoinHandle`] for the server task.
pub async fn serve(
    app: Router,
    host: &str,
    port: u16,
) -> Result<(u16, JoinHandle<()>), Box<dyn std::error::Error>> {
    let addr = format!("{host}:{port}");
    let listener = TcpListener::bind(&addr).await?;
    let actual_port = listener.local_addr()?.port();

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok((actual_port, handle))
}

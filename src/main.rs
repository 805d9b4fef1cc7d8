use budgetmap::config::Config;
use budgetmap::server::{build_app, serve, spawn_dataset_load};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "budgetmap=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!("Starting budgetmap on {}", config.address());
    tracing::info!(
        expenses = %config.expenses_path.display(),
        income = %config.income_path.display(),
        "Loading budget data"
    );

    let (host, port) = (config.host.clone(), config.port);
    let (state, app) = build_app(config);
    let loader = spawn_dataset_load(state);

    let (port, server) = serve(app, &host, port)
        .await
        .expect("Failed to bind address");

    tracing::info!("Listening on http://{}:{}", host, port);

    if let Err(e) = loader.await.expect("Loader task failed") {
        tracing::error!("Shutting down: {}", e);
        std::process::exit(1);
    }

    server.await.expect("Server task failed");
}

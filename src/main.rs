use cashflow::config::Config;
use cashflow::server::build_app;
use tokio::net::TcpListener;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cashflow=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!("Starting cashflow {} on {}", cashflow::VERSION, config.address());

    let address = config.address();
    let (_state, app) = build_app(config).expect("Failed to initialise application");

    let listener = TcpListener::bind(&address)
        .await
        .expect("Failed to bind address");

    tracing::info!("Listening on http://{}", address);

    axum::serve(listener, app).await.expect("Server error");
}

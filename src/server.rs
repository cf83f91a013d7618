use axum::http::{header, HeaderValue, Method};
use axum::middleware;
use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth;
use crate::config::Config;
use crate::db::{create_pool, migrations};
use crate::error::AppError;
use crate::handlers;
use crate::state::AppState;

/// Allow the browser client's origin to call the API with a bearer token.
fn cors_layer(client_url: &str) -> CorsLayer {
    let origin = match client_url.parse::<HeaderValue>() {
        Ok(origin) => AllowOrigin::exact(origin),
        Err(_) => {
            tracing::warn!(client_url = %client_url, "Client URL is not a valid origin, allowing any");
            AllowOrigin::any()
        }
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

async fn fallback() -> AppError {
    AppError::NotFound("No such endpoint".into())
}

/// Assemble routes and the middleware stack around an existing state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(handlers::routes())
        .fallback(fallback)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ))
        .layer(cors_layer(&state.config.client_url))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the application state and Axum router from a [`Config`].
///
/// Creates the database pool and runs migrations before returning the shared
/// state and a ready-to-serve router.
pub fn build_app(config: Config) -> Result<(AppState, Router), Box<dyn std::error::Error>> {
    let db = create_pool(&config.database_path)?;

    {
        let conn = db.get()?;
        migrations::run_migrations(&conn, &config.migrations_path)?;
    }

    let state = AppState::new(db, config);
    let app = router(state.clone());

    Ok((state, app))
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

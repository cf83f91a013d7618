pub mod assets;
pub mod assistant;
pub mod expenses;
pub mod goals;
pub mod incomes;
pub mod liabilities;
pub mod summary;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;
use crate::{auth, oauth};

pub fn routes() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/google", get(oauth::google_start))
        .route("/api/auth/google/callback", get(oauth::google_callback))
        .route("/api/users/me", get(auth::me))
        // Incomes
        .route(
            "/api/incomes",
            get(incomes::list).post(incomes::create).put(incomes::save_all),
        )
        .route(
            "/api/incomes/:id",
            get(incomes::show).put(incomes::update).delete(incomes::delete),
        )
        // Expenses
        .route(
            "/api/expenses",
            get(expenses::list)
                .post(expenses::create)
                .put(expenses::save_all),
        )
        .route(
            "/api/expenses/:id",
            get(expenses::show)
                .put(expenses::update)
                .delete(expenses::delete),
        )
        // Assets
        .route(
            "/api/assets",
            get(assets::list).post(assets::create).put(assets::save_all),
        )
        .route(
            "/api/assets/:id",
            get(assets::show).put(assets::update).delete(assets::delete),
        )
        // Liabilities
        .route(
            "/api/liabilities",
            get(liabilities::list)
                .post(liabilities::create)
                .put(liabilities::save_all),
        )
        .route(
            "/api/liabilities/:id",
            get(liabilities::show)
                .put(liabilities::update)
                .delete(liabilities::delete),
        )
        // Goals
        .route(
            "/api/goals",
            get(goals::list).post(goals::create).put(goals::save_all),
        )
        .route(
            "/api/goals/:id",
            get(goals::show).put(goals::update).delete(goals::delete),
        )
        // Dashboard figures
        .route("/api/summary", get(summary::overview))
        .route("/api/summary/freedom", get(summary::freedom))
        .route(
            "/api/summary/expenses-by-category",
            get(summary::expenses_by_category),
        )
        .route(
            "/api/summary/assets-by-category",
            get(summary::assets_by_category),
        )
        // Financial assistant
        .route("/api/ai/assist", post(assistant::assist))
        .route("/api/ai/chat", post(assistant::chat))
        // Health check
        .route("/health", get(health))
}

async fn health() -> &'static str {
    "OK"
}

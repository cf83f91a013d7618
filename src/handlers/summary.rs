use axum::extract::State;
use axum::response::Json;
use axum::Extension;

use crate::auth::CurrentUser;
use crate::db::queries::{assets, expenses, incomes, liabilities};
use crate::error::AppResult;
use crate::models::{CategoryShare, FinancialSummary, FreedomTracker};
use crate::services::summary;
use crate::state::AppState;

/// `GET /api/summary`: the dashboard figures, computed from stored records.
pub async fn overview(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<FinancialSummary>> {
    let conn = state.db.get()?;
    let incomes = incomes::list_incomes(&conn, user.id)?;
    let expenses = expenses::list_expenses(&conn, user.id)?;
    let assets = assets::list_assets(&conn, user.id)?;
    let liabilities = liabilities::list_liabilities(&conn, user.id)?;

    Ok(Json(FinancialSummary::compute(
        &incomes,
        &expenses,
        &assets,
        &liabilities,
    )))
}

pub async fn freedom(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<FreedomTracker>> {
    let conn = state.db.get()?;
    let expenses = expenses::list_expenses(&conn, user.id)?;
    let assets = assets::list_assets(&conn, user.id)?;

    Ok(Json(FreedomTracker::compute(&expenses, &assets)))
}

pub async fn expenses_by_category(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<CategoryShare>>> {
    let conn = state.db.get()?;
    let expenses = expenses::list_expenses(&conn, user.id)?;
    Ok(Json(summary::expense_breakdown(&expenses)))
}

pub async fn assets_by_category(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<CategoryShare>>> {
    let conn = state.db.get()?;
    let assets = assets::list_assets(&conn, user.id)?;
    Ok(Json(summary::asset_distribution(&assets)))
}

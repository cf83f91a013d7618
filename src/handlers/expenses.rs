use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::Extension;

use crate::auth::CurrentUser;
use crate::db::queries::{self, expenses};
use crate::error::{AppError, AppResult};
use crate::models::{new_id, Expense};
use crate::state::AppState;

fn prepare(mut expense: Expense, user_id: i64) -> AppResult<Expense> {
    expense.validate().map_err(AppError::Validation)?;
    if expense.id.is_empty() {
        expense.id = new_id();
    }
    expense.user_id = Some(user_id);
    Ok(expense)
}

pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Expense>>> {
    let conn = state.db.get()?;
    Ok(Json(expenses::list_expenses(&conn, user.id)?))
}

pub async fn show(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Expense>> {
    let conn = state.db.get()?;
    expenses::get_expense(&conn, user.id, &id)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Expense not found".into()))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<Expense>,
) -> AppResult<(StatusCode, Json<Expense>)> {
    let expense = prepare(body, user.id)?;
    let conn = state.db.get()?;

    expenses::create_expense(&conn, user.id, &expense).map_err(|e| {
        if queries::is_constraint_violation(&e) {
            AppError::Conflict(format!("Expense {} already exists", expense.id))
        } else {
            e.into()
        }
    })?;

    Ok((StatusCode::CREATED, Json(expense)))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(mut body): Json<Expense>,
) -> AppResult<Json<Expense>> {
    if !body.id.is_empty() && body.id != id {
        return Err(AppError::Validation("Expense id does not match the URL".into()));
    }
    body.id = id;
    let expense = prepare(body, user.id)?;
    let conn = state.db.get()?;

    if !expenses::update_expense(&conn, user.id, &expense)? {
        return Err(AppError::NotFound("Expense not found".into()));
    }
    Ok(Json(expense))
}

/// `PUT /api/expenses` with an array body: insert or replace each record.
pub async fn save_all(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<Vec<Expense>>,
) -> AppResult<Json<Vec<Expense>>> {
    let saved = body
        .into_iter()
        .map(|expense| prepare(expense, user.id))
        .collect::<AppResult<Vec<_>>>()?;

    let mut conn = state.db.get()?;
    let tx = conn.transaction()?;
    for expense in &saved {
        if !expenses::upsert_expense(&tx, user.id, expense)? {
            return Err(AppError::NotFound(format!("Expense {} not found", expense.id)));
        }
    }
    tx.commit()?;

    Ok(Json(saved))
}

pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let conn = state.db.get()?;
    if !expenses::delete_expense(&conn, user.id, &id)? {
        return Err(AppError::NotFound("Expense not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}

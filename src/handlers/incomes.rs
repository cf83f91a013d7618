use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::Extension;

use crate::auth::CurrentUser;
use crate::db::queries::{self, incomes};
use crate::error::{AppError, AppResult};
use crate::models::{new_id, Income};
use crate::state::AppState;

fn prepare(mut income: Income, user_id: i64) -> AppResult<Income> {
    income.validate().map_err(AppError::Validation)?;
    if income.id.is_empty() {
        income.id = new_id();
    }
    income.user_id = Some(user_id);
    Ok(income)
}

pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Income>>> {
    let conn = state.db.get()?;
    Ok(Json(incomes::list_incomes(&conn, user.id)?))
}

pub async fn show(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Income>> {
    let conn = state.db.get()?;
    incomes::get_income(&conn, user.id, &id)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Income not found".into()))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<Income>,
) -> AppResult<(StatusCode, Json<Income>)> {
    let income = prepare(body, user.id)?;
    let conn = state.db.get()?;

    incomes::create_income(&conn, user.id, &income).map_err(|e| {
        if queries::is_constraint_violation(&e) {
            AppError::Conflict(format!("Income {} already exists", income.id))
        } else {
            e.into()
        }
    })?;

    Ok((StatusCode::CREATED, Json(income)))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(mut body): Json<Income>,
) -> AppResult<Json<Income>> {
    if !body.id.is_empty() && body.id != id {
        return Err(AppError::Validation("Income id does not match the URL".into()));
    }
    body.id = id;
    let income = prepare(body, user.id)?;
    let conn = state.db.get()?;

    if !incomes::update_income(&conn, user.id, &income)? {
        return Err(AppError::NotFound("Income not found".into()));
    }
    Ok(Json(income))
}

/// `PUT /api/incomes` with an array body: insert or replace each record.
pub async fn save_all(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<Vec<Income>>,
) -> AppResult<Json<Vec<Income>>> {
    let saved = body
        .into_iter()
        .map(|income| prepare(income, user.id))
        .collect::<AppResult<Vec<_>>>()?;

    let mut conn = state.db.get()?;
    let tx = conn.transaction()?;
    for income in &saved {
        if !incomes::upsert_income(&tx, user.id, income)? {
            return Err(AppError::NotFound(format!("Income {} not found", income.id)));
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
    if !incomes::delete_income(&conn, user.id, &id)? {
        return Err(AppError::NotFound("Income not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}

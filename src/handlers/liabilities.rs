use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::Extension;

use crate::auth::CurrentUser;
use crate::db::queries::{self, liabilities};
use crate::error::{AppError, AppResult};
use crate::models::{new_id, Liability};
use crate::state::AppState;

fn prepare(mut liability: Liability, user_id: i64) -> AppResult<Liability> {
    liability.validate().map_err(AppError::Validation)?;
    if liability.id.is_empty() {
        liability.id = new_id();
    }
    liability.user_id = Some(user_id);
    Ok(liability)
}

pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Liability>>> {
    let conn = state.db.get()?;
    Ok(Json(liabilities::list_liabilities(&conn, user.id)?))
}

pub async fn show(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Liability>> {
    let conn = state.db.get()?;
    liabilities::get_liability(&conn, user.id, &id)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Liability not found".into()))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<Liability>,
) -> AppResult<(StatusCode, Json<Liability>)> {
    let liability = prepare(body, user.id)?;
    let conn = state.db.get()?;

    liabilities::create_liability(&conn, user.id, &liability).map_err(|e| {
        if queries::is_constraint_violation(&e) {
            AppError::Conflict(format!("Liability {} already exists", liability.id))
        } else {
            e.into()
        }
    })?;

    Ok((StatusCode::CREATED, Json(liability)))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(mut body): Json<Liability>,
) -> AppResult<Json<Liability>> {
    if !body.id.is_empty() && body.id != id {
        return Err(AppError::Validation("Liability id does not match the URL".into()));
    }
    body.id = id;
    let liability = prepare(body, user.id)?;
    let conn = state.db.get()?;

    if !liabilities::update_liability(&conn, user.id, &liability)? {
        return Err(AppError::NotFound("Liability not found".into()));
    }
    Ok(Json(liability))
}

/// `PUT /api/liabilities` with an array body: insert or replace each record.
pub async fn save_all(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<Vec<Liability>>,
) -> AppResult<Json<Vec<Liability>>> {
    let saved = body
        .into_iter()
        .map(|liability| prepare(liability, user.id))
        .collect::<AppResult<Vec<_>>>()?;

    let mut conn = state.db.get()?;
    let tx = conn.transaction()?;
    for liability in &saved {
        if !liabilities::upsert_liability(&tx, user.id, liability)? {
            return Err(AppError::NotFound(format!("Liability {} not found", liability.id)));
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
    if !liabilities::delete_liability(&conn, user.id, &id)? {
        return Err(AppError::NotFound("Liability not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}

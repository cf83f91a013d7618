use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::Extension;

use crate::auth::CurrentUser;
use crate::db::queries::{self, goals};
use crate::error::{AppError, AppResult};
use crate::models::{new_id, Goal};
use crate::state::AppState;

fn prepare(mut goal: Goal, user_id: i64) -> AppResult<Goal> {
    goal.validate().map_err(AppError::Validation)?;
    if goal.id.is_empty() {
        goal.id = new_id();
    }
    goal.user_id = Some(user_id);
    Ok(goal)
}

pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Goal>>> {
    let conn = state.db.get()?;
    Ok(Json(goals::list_goals(&conn, user.id)?))
}

pub async fn show(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Goal>> {
    let conn = state.db.get()?;
    goals::get_goal(&conn, user.id, &id)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Goal not found".into()))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<Goal>,
) -> AppResult<(StatusCode, Json<Goal>)> {
    let goal = prepare(body, user.id)?;
    let conn = state.db.get()?;

    goals::create_goal(&conn, user.id, &goal).map_err(|e| {
        if queries::is_constraint_violation(&e) {
            AppError::Conflict(format!("Goal {} already exists", goal.id))
        } else {
            e.into()
        }
    })?;

    Ok((StatusCode::CREATED, Json(goal)))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(mut body): Json<Goal>,
) -> AppResult<Json<Goal>> {
    if !body.id.is_empty() && body.id != id {
        return Err(AppError::Validation("Goal id does not match the URL".into()));
    }
    body.id = id;
    let goal = prepare(body, user.id)?;
    let conn = state.db.get()?;

    if !goals::update_goal(&conn, user.id, &goal)? {
        return Err(AppError::NotFound("Goal not found".into()));
    }
    Ok(Json(goal))
}

/// `PUT /api/goals` with an array body: insert or replace each record.
pub async fn save_all(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<Vec<Goal>>,
) -> AppResult<Json<Vec<Goal>>> {
    let saved = body
        .into_iter()
        .map(|goal| prepare(goal, user.id))
        .collect::<AppResult<Vec<_>>>()?;

    let mut conn = state.db.get()?;
    let tx = conn.transaction()?;
    for goal in &saved {
        if !goals::upsert_goal(&tx, user.id, goal)? {
            return Err(AppError::NotFound(format!("Goal {} not found", goal.id)));
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
    if !goals::delete_goal(&conn, user.id, &id)? {
        return Err(AppError::NotFound("Goal not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}

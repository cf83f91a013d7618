use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::Extension;

use crate::auth::CurrentUser;
use crate::db::queries::{self, assets};
use crate::error::{AppError, AppResult};
use crate::models::{new_id, Asset};
use crate::state::AppState;

fn prepare(mut asset: Asset, user_id: i64) -> AppResult<Asset> {
    asset.validate().map_err(AppError::Validation)?;
    if asset.id.is_empty() {
        asset.id = new_id();
    }
    asset.user_id = Some(user_id);
    Ok(asset)
}

pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<Asset>>> {
    let conn = state.db.get()?;
    Ok(Json(assets::list_assets(&conn, user.id)?))
}

pub async fn show(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Asset>> {
    let conn = state.db.get()?;
    assets::get_asset(&conn, user.id, &id)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Asset not found".into()))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<Asset>,
) -> AppResult<(StatusCode, Json<Asset>)> {
    let asset = prepare(body, user.id)?;
    let conn = state.db.get()?;

    assets::create_asset(&conn, user.id, &asset).map_err(|e| {
        if queries::is_constraint_violation(&e) {
            AppError::Conflict(format!("Asset {} already exists", asset.id))
        } else {
            e.into()
        }
    })?;

    Ok((StatusCode::CREATED, Json(asset)))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(mut body): Json<Asset>,
) -> AppResult<Json<Asset>> {
    if !body.id.is_empty() && body.id != id {
        return Err(AppError::Validation("Asset id does not match the URL".into()));
    }
    body.id = id;
    let asset = prepare(body, user.id)?;
    let conn = state.db.get()?;

    if !assets::update_asset(&conn, user.id, &asset)? {
        return Err(AppError::NotFound("Asset not found".into()));
    }
    Ok(Json(asset))
}

/// `PUT /api/assets` with an array body: insert or replace each record.
pub async fn save_all(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<Vec<Asset>>,
) -> AppResult<Json<Vec<Asset>>> {
    let saved = body
        .into_iter()
        .map(|asset| prepare(asset, user.id))
        .collect::<AppResult<Vec<_>>>()?;

    let mut conn = state.db.get()?;
    let tx = conn.transaction()?;
    for asset in &saved {
        if !assets::upsert_asset(&tx, user.id, asset)? {
            return Err(AppError::NotFound(format!("Asset {} not found", asset.id)));
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
    if !assets::delete_asset(&conn, user.id, &id)? {
        return Err(AppError::NotFound("Asset not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}

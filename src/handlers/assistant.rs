use axum::extract::State;
use axum::response::Json;
use axum::Extension;

use crate::auth::CurrentUser;
use crate::config::AiConfig;
use crate::db::queries::{assets, expenses, goals, incomes, liabilities};
use crate::error::{AppError, AppResult};
use crate::models::{AssistRequest, AssistResponse, ChatRequest, ChatResponse, FinancialSnapshot};
use crate::services::assistant;
use crate::state::AppState;

fn ai_config(state: &AppState) -> AppResult<&AiConfig> {
    state
        .config
        .ai
        .as_ref()
        .ok_or_else(|| AppError::NotFound("AI assistant is not configured".into()))
}

fn stored_snapshot(state: &AppState, user_id: i64) -> AppResult<FinancialSnapshot> {
    let conn = state.db.get()?;
    Ok(FinancialSnapshot {
        incomes: incomes::list_incomes(&conn, user_id)?,
        expenses: expenses::list_expenses(&conn, user_id)?,
        assets: assets::list_assets(&conn, user_id)?,
        liabilities: liabilities::list_liabilities(&conn, user_id)?,
        goals: goals::list_goals(&conn, user_id)?,
    })
}

fn question(text: &str, field: &str) -> AppResult<String> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(text.to_string())
}

/// `POST /api/ai/assist`: advice on the figures the client sends, or on the
/// stored records when it sends none.
pub async fn assist(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<AssistRequest>,
) -> AppResult<Json<AssistResponse>> {
    let ai = ai_config(&state)?;
    let query = question(&body.query, "Query")?;
    let snapshot = match body.user_data {
        Some(data) => data,
        None => stored_snapshot(&state, user.id)?,
    };

    tracing::info!(user_id = user.id, "Assistant advice requested");
    let advice =
        assistant::complete(&state.http, ai, &assistant::user_prompt(&snapshot, &query)).await?;
    Ok(Json(AssistResponse { advice }))
}

/// `POST /api/ai/chat`: a free-form question answered against the stored
/// records.
pub async fn chat(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<ChatRequest>,
) -> AppResult<Json<ChatResponse>> {
    let ai = ai_config(&state)?;
    let message = question(&body.message, "Message")?;
    let snapshot = stored_snapshot(&state, user.id)?;

    tracing::info!(user_id = user.id, "Assistant chat message");
    let response =
        assistant::complete(&state.http, ai, &assistant::user_prompt(&snapshot, &message)).await?;
    Ok(Json(ChatResponse { response }))
}

use serde::{Deserialize, Serialize};

use super::{Asset, Expense, Goal, Income, Liability};

/// The five collections as the assistant sees them. Missing collections
/// deserialize as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialSnapshot {
    pub incomes: Vec<Income>,
    pub expenses: Vec<Expense>,
    pub assets: Vec<Asset>,
    pub liabilities: Vec<Liability>,
    pub goals: Vec<Goal>,
}

/// `POST /api/ai/assist` body. Without `userData` the stored records are used;
/// any client-computed summary inside it is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_data: Option<FinancialSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistResponse {
    pub advice: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

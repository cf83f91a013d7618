use serde::{Deserialize, Serialize};

/// Category label used when there are no expenses at all.
pub const NO_CATEGORY: &str = "None";

/// Derived dashboard figures. Never persisted; recomputed from the five
/// collections after every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub cash_flow: f64,
    pub per_day: f64,
    pub passive_income: f64,
    pub net_worth: f64,
    pub net_worth_change: f64,
    pub largest_expense_category: String,
    pub largest_expense_amount: f64,
}

impl FinancialSummary {
    pub fn empty() -> Self {
        Self {
            total_income: 0.0,
            total_expenses: 0.0,
            cash_flow: 0.0,
            per_day: 0.0,
            passive_income: 0.0,
            net_worth: 0.0,
            net_worth_change: 0.0,
            largest_expense_category: NO_CATEGORY.into(),
            largest_expense_amount: 0.0,
        }
    }
}

impl Default for FinancialSummary {
    fn default() -> Self {
        Self::empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LargestExpense {
    pub category: String,
    pub amount: f64,
}

/// One slice of a category chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: String,
    pub amount: f64,
    pub percentage: f64,
    pub count: usize,
}

/// How far passive income from assets goes towards covering daily expenses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreedomTracker {
    pub daily_expenses: f64,
    pub daily_passive_income: f64,
    pub progress_percent: f64,
    pub financially_free: bool,
    pub shortfall_per_day: f64,
}

/// Coarse bucket for colouring a progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressBand {
    Low,
    Fair,
    Good,
    High,
}

pub mod asset;
pub mod assistant;
pub mod expense;
pub mod goal;
pub mod income;
pub mod liability;
pub mod record;
pub mod summary;
pub mod user;

pub use asset::{Asset, AssetCategory};
pub use assistant::{AssistRequest, AssistResponse, ChatRequest, ChatResponse, FinancialSnapshot};
pub use expense::{Expense, ExpenseCategory};
pub use goal::Goal;
pub use income::{Frequency, Income, IncomeCategory, IncomeType};
pub use liability::{Liability, LiabilityType};
pub use record::{Collection, Record};
pub use summary::{
    CategoryShare, FinancialSummary, FreedomTracker, LargestExpense, ProgressBand, NO_CATEGORY,
};
pub use user::{AuthResponse, LoginRequest, RegisterRequest, User};

/// Generate a fresh record id.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Reject negative, NaN and infinite amounts.
pub(crate) fn check_amount(field: &str, value: f64) -> Result<(), String> {
    if !value.is_finite() {
        return Err(format!("{} must be a finite number", field));
    }
    if value < 0.0 {
        return Err(format!("{} must not be negative", field));
    }
    Ok(())
}

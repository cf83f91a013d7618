use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::check_amount;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpenseCategory {
    Housing,
    Transportation,
    Food,
    Utilities,
    Insurance,
    Healthcare,
    Debt,
    Entertainment,
    Personal,
    Education,
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 11] = [
        ExpenseCategory::Housing,
        ExpenseCategory::Transportation,
        ExpenseCategory::Food,
        ExpenseCategory::Utilities,
        ExpenseCategory::Insurance,
        ExpenseCategory::Healthcare,
        ExpenseCategory::Debt,
        ExpenseCategory::Entertainment,
        ExpenseCategory::Personal,
        ExpenseCategory::Education,
        ExpenseCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Housing => "Housing",
            ExpenseCategory::Transportation => "Transportation",
            ExpenseCategory::Food => "Food",
            ExpenseCategory::Utilities => "Utilities",
            ExpenseCategory::Insurance => "Insurance",
            ExpenseCategory::Healthcare => "Healthcare",
            ExpenseCategory::Debt => "Debt",
            ExpenseCategory::Entertainment => "Entertainment",
            ExpenseCategory::Personal => "Personal",
            ExpenseCategory::Education => "Education",
            ExpenseCategory::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

impl std::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A monthly spending entry. Amounts are taken as-is, without frequency
/// normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    #[serde(default)]
    pub id: String,
    pub description: String,
    pub category: ExpenseCategory,
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(default)]
    pub user_id: Option<i64>,
}

impl Expense {
    pub fn validate(&self) -> Result<(), String> {
        if self.description.trim().is_empty() {
            return Err("Expense description is required".into());
        }
        check_amount("Expense amount", self.amount)
    }
}

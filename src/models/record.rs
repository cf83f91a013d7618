use serde::Serialize;

use super::{Asset, Expense, Goal, Income, Liability};

/// The five per-user record collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Incomes,
    Expenses,
    Assets,
    Liabilities,
    Goals,
}

impl Collection {
    /// Path segment under `/api`.
    pub fn path(&self) -> &'static str {
        match self {
            Collection::Incomes => "incomes",
            Collection::Expenses => "expenses",
            Collection::Assets => "assets",
            Collection::Liabilities => "liabilities",
            Collection::Goals => "goals",
        }
    }

    /// Singular noun used in user-facing messages.
    pub fn noun(&self) -> &'static str {
        match self {
            Collection::Incomes => "income",
            Collection::Expenses => "expense",
            Collection::Assets => "asset",
            Collection::Liabilities => "liability",
            Collection::Goals => "goal",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// One record of any kind. Serializes as the bare entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Income(Income),
    Expense(Expense),
    Asset(Asset),
    Liability(Liability),
    Goal(Goal),
}

impl Record {
    pub fn id(&self) -> &str {
        match self {
            Record::Income(r) => &r.id,
            Record::Expense(r) => &r.id,
            Record::Asset(r) => &r.id,
            Record::Liability(r) => &r.id,
            Record::Goal(r) => &r.id,
        }
    }

    pub fn collection(&self) -> Collection {
        match self {
            Record::Income(_) => Collection::Incomes,
            Record::Expense(_) => Collection::Expenses,
            Record::Asset(_) => Collection::Assets,
            Record::Liability(_) => Collection::Liabilities,
            Record::Goal(_) => Collection::Goals,
        }
    }
}

impl From<Income> for Record {
    fn from(r: Income) -> Self {
        Record::Income(r)
    }
}

impl From<Expense> for Record {
    fn from(r: Expense) -> Self {
        Record::Expense(r)
    }
}

impl From<Asset> for Record {
    fn from(r: Asset) -> Self {
        Record::Asset(r)
    }
}

impl From<Liability> for Record {
    fn from(r: Liability) -> Self {
        Record::Liability(r)
    }
}

impl From<Goal> for Record {
    fn from(r: Goal) -> Self {
        Record::Goal(r)
    }
}

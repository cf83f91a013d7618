use serde::{Deserialize, Serialize};

use super::check_amount;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetCategory {
    #[serde(rename = "Real Estate")]
    RealEstate,
    Stocks,
    Bonds,
    #[serde(rename = "Mutual Funds")]
    MutualFunds,
    #[serde(rename = "ETFs")]
    Etfs,
    Business,
    #[serde(rename = "Cash Equivalents")]
    CashEquivalents,
    #[serde(rename = "Retirement Accounts")]
    RetirementAccounts,
    Collectibles,
    Other,
}

impl AssetCategory {
    pub const ALL: [AssetCategory; 10] = [
        AssetCategory::RealEstate,
        AssetCategory::Stocks,
        AssetCategory::Bonds,
        AssetCategory::MutualFunds,
        AssetCategory::Etfs,
        AssetCategory::Business,
        AssetCategory::CashEquivalents,
        AssetCategory::RetirementAccounts,
        AssetCategory::Collectibles,
        AssetCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetCategory::RealEstate => "Real Estate",
            AssetCategory::Stocks => "Stocks",
            AssetCategory::Bonds => "Bonds",
            AssetCategory::MutualFunds => "Mutual Funds",
            AssetCategory::Etfs => "ETFs",
            AssetCategory::Business => "Business",
            AssetCategory::CashEquivalents => "Cash Equivalents",
            AssetCategory::RetirementAccounts => "Retirement Accounts",
            AssetCategory::Collectibles => "Collectibles",
            AssetCategory::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

impl std::fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub category: AssetCategory,
    pub value: f64,
    /// Monthly income attributable to this asset.
    #[serde(default)]
    pub income_generated: f64,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
}

impl Asset {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Asset name is required".into());
        }
        check_amount("Asset value", self.value)?;
        check_amount("Income generated", self.income_generated)
    }
}

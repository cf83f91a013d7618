use serde::{Deserialize, Serialize};

use super::check_amount;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncomeCategory {
    Employment,
    Business,
    Investment,
    #[serde(rename = "Real Estate")]
    RealEstate,
    Dividend,
    Royalty,
    Other,
}

impl IncomeCategory {
    pub const ALL: [IncomeCategory; 7] = [
        IncomeCategory::Employment,
        IncomeCategory::Business,
        IncomeCategory::Investment,
        IncomeCategory::RealEstate,
        IncomeCategory::Dividend,
        IncomeCategory::Royalty,
        IncomeCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IncomeCategory::Employment => "Employment",
            IncomeCategory::Business => "Business",
            IncomeCategory::Investment => "Investment",
            IncomeCategory::RealEstate => "Real Estate",
            IncomeCategory::Dividend => "Dividend",
            IncomeCategory::Royalty => "Royalty",
            IncomeCategory::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

impl std::fmt::Display for IncomeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether an income needs active labor to keep flowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncomeType {
    Active,
    Passive,
}

impl IncomeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncomeType::Active => "active",
            IncomeType::Passive => "passive",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(IncomeType::Active),
            "passive" => Some(IncomeType::Passive),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    #[serde(rename = "monthly")]
    Monthly,
    #[serde(rename = "bi-weekly")]
    BiWeekly,
    #[serde(rename = "weekly")]
    Weekly,
    #[serde(rename = "annually")]
    Annually,
    #[serde(rename = "one-time")]
    OneTime,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Monthly => "monthly",
            Frequency::BiWeekly => "bi-weekly",
            Frequency::Weekly => "weekly",
            Frequency::Annually => "annually",
            Frequency::OneTime => "one-time",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "monthly" => Some(Frequency::Monthly),
            "bi-weekly" => Some(Frequency::BiWeekly),
            "weekly" => Some(Frequency::Weekly),
            "annually" => Some(Frequency::Annually),
            "one-time" => Some(Frequency::OneTime),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    #[serde(default)]
    pub id: String,
    pub source: String,
    pub category: IncomeCategory,
    pub amount: f64,
    #[serde(rename = "type")]
    pub income_type: IncomeType,
    pub frequency: Frequency,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
}

impl Income {
    pub fn validate(&self) -> Result<(), String> {
        if self.source.trim().is_empty() {
            return Err("Income source is required".into());
        }
        check_amount("Income amount", self.amount)
    }

    pub fn is_passive(&self) -> bool {
        self.income_type == IncomeType::Passive
    }
}

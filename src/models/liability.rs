use serde::{Deserialize, Serialize};

use super::check_amount;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LiabilityType {
    Mortgage,
    #[serde(rename = "Auto Loan")]
    AutoLoan,
    #[serde(rename = "Student Loan")]
    StudentLoan,
    #[serde(rename = "Credit Card")]
    CreditCard,
    #[serde(rename = "Personal Loan")]
    PersonalLoan,
    #[serde(rename = "Business Loan")]
    BusinessLoan,
    #[serde(rename = "Medical Debt")]
    MedicalDebt,
    #[serde(rename = "Long-term")]
    LongTerm,
    #[serde(rename = "Mid-term")]
    MidTerm,
    #[serde(rename = "Short-term")]
    ShortTerm,
    Other,
}

impl LiabilityType {
    pub const ALL: [LiabilityType; 11] = [
        LiabilityType::Mortgage,
        LiabilityType::AutoLoan,
        LiabilityType::StudentLoan,
        LiabilityType::CreditCard,
        LiabilityType::PersonalLoan,
        LiabilityType::BusinessLoan,
        LiabilityType::MedicalDebt,
        LiabilityType::LongTerm,
        LiabilityType::MidTerm,
        LiabilityType::ShortTerm,
        LiabilityType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LiabilityType::Mortgage => "Mortgage",
            LiabilityType::AutoLoan => "Auto Loan",
            LiabilityType::StudentLoan => "Student Loan",
            LiabilityType::CreditCard => "Credit Card",
            LiabilityType::PersonalLoan => "Personal Loan",
            LiabilityType::BusinessLoan => "Business Loan",
            LiabilityType::MedicalDebt => "Medical Debt",
            LiabilityType::LongTerm => "Long-term",
            LiabilityType::MidTerm => "Mid-term",
            LiabilityType::ShortTerm => "Short-term",
            LiabilityType::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

impl std::fmt::Display for LiabilityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Liability {
    #[serde(default)]
    pub id: String,
    pub description: String,
    #[serde(rename = "type")]
    pub liability_type: LiabilityType,
    /// Outstanding balance.
    pub amount: f64,
    /// Annual rate in percent.
    #[serde(default)]
    pub interest_rate: f64,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
}

impl Liability {
    pub fn validate(&self) -> Result<(), String> {
        if self.description.trim().is_empty() {
            return Err("Liability description is required".into());
        }
        check_amount("Liability amount", self.amount)?;
        check_amount("Interest rate", self.interest_rate)
    }
}

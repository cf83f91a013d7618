use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::check_amount;
use super::ProgressBand;
use crate::services::summary::{goal_progress, progress_band};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    #[serde(default)]
    pub id: String,
    pub description: String,
    pub target_amount: f64,
    #[serde(default)]
    pub current_amount: f64,
    pub target_date: NaiveDate,
    #[serde(default)]
    pub user_id: Option<i64>,
}

impl Goal {
    pub fn validate(&self) -> Result<(), String> {
        if self.description.trim().is_empty() {
            return Err("Goal description is required".into());
        }
        check_amount("Target amount", self.target_amount)?;
        check_amount("Current amount", self.current_amount)
    }

    /// Whole percent towards the target, clamped to 0..=100.
    pub fn progress(&self) -> u8 {
        goal_progress(self.current_amount, self.target_amount)
    }

    pub fn band(&self) -> ProgressBand {
        progress_band(self.progress())
    }

    pub fn remaining(&self) -> f64 {
        (self.target_amount - self.current_amount).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal(target: f64, current: f64) -> Goal {
        Goal {
            id: "g1".into(),
            description: "Emergency fund".into(),
            target_amount: target,
            current_amount: current,
            target_date: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            user_id: None,
        }
    }

    #[test]
    fn test_progress_and_remaining() {
        let g = goal(200.0, 50.0);
        assert_eq!(g.progress(), 25);
        assert_eq!(g.band(), ProgressBand::Fair);
        assert_eq!(g.remaining(), 150.0);

        let done = goal(200.0, 300.0);
        assert_eq!(done.progress(), 100);
        assert_eq!(done.band(), ProgressBand::High);
        assert_eq!(done.remaining(), 0.0);

        assert_eq!(goal(0.0, 5.0).progress(), 0);
    }

    #[test]
    fn test_validate() {
        assert!(goal(100.0, 0.0).validate().is_ok());
        assert!(goal(-1.0, 0.0).validate().is_err());
        assert!(goal(100.0, f64::NAN).validate().is_err());
    }
}

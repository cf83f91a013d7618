//! Dashboard aggregations over the five record collections.
//!
//! Everything here is pure: empty inputs produce zeroes and never an error.

use crate::models::{
    Asset, CategoryShare, Expense, FinancialSummary, Frequency, FreedomTracker, Income,
    LargestExpense, Liability, ProgressBand, NO_CATEGORY,
};

/// Average weeks per month.
pub const WEEKS_PER_MONTH: f64 = 4.33;
/// Average bi-weekly pay periods per month.
pub const BI_WEEKLY_PERIODS_PER_MONTH: f64 = 2.165;
/// Fixed divisor for per-day figures. Not calendar aware.
pub const DAYS_PER_MONTH: f64 = 30.0;

/// Convert an amount paid at `frequency` into its monthly equivalent.
/// One-time payments are not recurring and count as zero.
pub fn monthly_amount(amount: f64, frequency: Frequency) -> f64 {
    match frequency {
        Frequency::Weekly => amount * WEEKS_PER_MONTH,
        Frequency::BiWeekly => amount * BI_WEEKLY_PERIODS_PER_MONTH,
        Frequency::Annually => amount / 12.0,
        Frequency::OneTime => 0.0,
        Frequency::Monthly => amount,
    }
}

pub fn total_income(incomes: &[Income]) -> f64 {
    incomes
        .iter()
        .map(|i| monthly_amount(i.amount, i.frequency))
        .sum()
}

pub fn passive_income(incomes: &[Income]) -> f64 {
    incomes
        .iter()
        .filter(|i| i.is_passive())
        .map(|i| monthly_amount(i.amount, i.frequency))
        .sum()
}

pub fn total_expenses(expenses: &[Expense]) -> f64 {
    expenses.iter().map(|e| e.amount).sum()
}

pub fn cash_flow(total_income: f64, total_expenses: f64) -> f64 {
    total_income - total_expenses
}

pub fn per_day(monthly_amount: f64) -> f64 {
    monthly_amount / DAYS_PER_MONTH
}

pub fn net_worth(assets: &[Asset], liabilities: &[Liability]) -> f64 {
    let total_assets: f64 = assets.iter().map(|a| a.value).sum();
    let total_liabilities: f64 = liabilities.iter().map(|l| l.amount).sum();
    total_assets - total_liabilities
}

/// Sum amounts per key, keeping keys in first-seen order.
fn group_sums<I>(items: I) -> Vec<(&'static str, f64, usize)>
where
    I: Iterator<Item = (&'static str, f64)>,
{
    let mut groups: Vec<(&'static str, f64, usize)> = Vec::new();
    for (key, amount) in items {
        match groups.iter_mut().find(|(k, _, _)| *k == key) {
            Some(entry) => {
                entry.1 += amount;
                entry.2 += 1;
            }
            None => groups.push((key, amount, 1)),
        }
    }
    groups
}

/// The category with the highest summed spending. Ties go to the category
/// seen first; an empty list yields `"None"` and 0.
pub fn largest_expense_category(expenses: &[Expense]) -> LargestExpense {
    let groups = group_sums(expenses.iter().map(|e| (e.category.as_str(), e.amount)));

    let mut largest: Option<(&str, f64)> = None;
    for (category, amount, _) in groups {
        match largest {
            Some((_, best)) if amount <= best => {}
            _ => largest = Some((category, amount)),
        }
    }

    match largest {
        Some((category, amount)) => LargestExpense {
            category: category.to_string(),
            amount,
        },
        None => LargestExpense {
            category: NO_CATEGORY.into(),
            amount: 0.0,
        },
    }
}

/// Whole percent of `target` reached by `current`, clamped to 0..=100.
/// A zero target reports no progress.
pub fn goal_progress(current: f64, target: f64) -> u8 {
    if target <= 0.0 || !target.is_finite() || !current.is_finite() {
        return 0;
    }
    let progress = (current / target * 100.0).round();
    progress.clamp(0.0, 100.0) as u8
}

pub fn progress_band(percent: u8) -> ProgressBand {
    match percent {
        0..=24 => ProgressBand::Low,
        25..=49 => ProgressBand::Fair,
        50..=74 => ProgressBand::Good,
        _ => ProgressBand::High,
    }
}

fn shares(groups: Vec<(&'static str, f64, usize)>) -> Vec<CategoryShare> {
    let total: f64 = groups.iter().map(|(_, amount, _)| amount).sum();
    groups
        .into_iter()
        .map(|(category, amount, count)| CategoryShare {
            category: category.to_string(),
            amount,
            percentage: if total > 0.0 {
                amount / total * 100.0
            } else {
                0.0
            },
            count,
        })
        .collect()
}

/// Spending per category for the expense breakdown chart.
pub fn expense_breakdown(expenses: &[Expense]) -> Vec<CategoryShare> {
    shares(group_sums(
        expenses.iter().map(|e| (e.category.as_str(), e.amount)),
    ))
}

/// Asset value per category for the distribution chart.
pub fn asset_distribution(assets: &[Asset]) -> Vec<CategoryShare> {
    shares(group_sums(
        assets.iter().map(|a| (a.category.as_str(), a.value)),
    ))
}

impl FinancialSummary {
    pub fn compute(
        incomes: &[Income],
        expenses: &[Expense],
        assets: &[Asset],
        liabilities: &[Liability],
    ) -> Self {
        let total_income = total_income(incomes);
        let total_expenses = total_expenses(expenses);
        let cash_flow = cash_flow(total_income, total_expenses);
        let largest = largest_expense_category(expenses);

        Self {
            total_income,
            total_expenses,
            cash_flow,
            per_day: per_day(cash_flow),
            passive_income: passive_income(incomes),
            net_worth: net_worth(assets, liabilities),
            // Approximation: this month's cash flow stands in for the change.
            net_worth_change: cash_flow,
            largest_expense_category: largest.category,
            largest_expense_amount: largest.amount,
        }
    }
}

impl FreedomTracker {
    pub fn compute(expenses: &[Expense], assets: &[Asset]) -> Self {
        let daily_expenses = per_day(total_expenses(expenses));
        let monthly_passive: f64 = assets.iter().map(|a| a.income_generated).sum();
        let daily_passive_income = per_day(monthly_passive);

        let progress_percent = if daily_expenses > 0.0 {
            (daily_passive_income / daily_expenses * 100.0).min(100.0)
        } else {
            0.0
        };
        let financially_free = daily_expenses > 0.0 && daily_passive_income >= daily_expenses;

        Self {
            daily_expenses,
            daily_passive_income,
            progress_percent,
            financially_free,
            shortfall_per_day: (daily_expenses - daily_passive_income).max(0.0),
        }
    }
}

//! Monthly spending per category, category rankings and budget progress.

use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use time::OffsetDateTime;
use time_tz::Tz;

use crate::{
    budget::CategoryBudget,
    dashboard::period::{Period, period_bounds},
    money::{format_amount, ratio_to_percent},
    transaction::{Transaction, TransactionKind},
};

/// The category used for debits that were stored without one.
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// Quick-entry categories suggested when there is no spending this month.
pub const DEFAULT_QUICK_CATEGORIES: [&str; 7] = [
    "Food",
    "Groceries",
    "Transport",
    "Rent",
    "Shopping",
    "Bills",
    "Others",
];

/// How many categories are highlighted as top spending.
pub const TOP_CATEGORY_COUNT: usize = 3;

/// How many quick-entry categories are suggested from this month's spending.
pub const QUICK_CATEGORY_COUNT: usize = 6;

/// The sum of debit amounts per category. Only categories with spending are present.
pub type CategoryTotals = BTreeMap<String, Decimal>;

/// Sum this month's debits by category, where the month is the calendar month in `timezone`.
///
/// Undated transactions and credits are ignored. An empty category is
/// counted under [UNCATEGORIZED_LABEL].
pub fn compute_category_totals(
    transactions: &[Transaction],
    now: OffsetDateTime,
    timezone: &Tz,
) -> CategoryTotals {
    let month = period_bounds(Period::Month, now, timezone);
    let mut totals = CategoryTotals::new();

    for transaction in transactions {
        if transaction.kind != TransactionKind::Debit {
            continue;
        }

        let Some(occurred_at) = transaction.occurred_at else {
            continue;
        };

        if !month.contains(occurred_at) {
            continue;
        }

        let category = if transaction.category.is_empty() {
            UNCATEGORIZED_LABEL
        } else {
            &transaction.category
        };

        let total = totals.entry(category.to_owned()).or_default();
        *total = total.saturating_add(transaction.amount);
    }

    totals.retain(|_, total| !total.is_zero());

    totals
}

/// A category's spending and its share of all spending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    /// The category name.
    pub category: String,
    /// The amount spent in the category.
    pub total: Decimal,
    /// The percentage of all spending, rounded to one decimal place.
    pub percent_of_total: Decimal,
}

/// Rank categories by descending spend.
///
/// Ties keep the alphabetical order of [CategoryTotals].
pub fn rank_categories(totals: &CategoryTotals) -> Vec<CategoryShare> {
    let grand_total = totals
        .values()
        .fold(Decimal::ZERO, |sum, total| sum.saturating_add(*total));

    let mut ranked: Vec<CategoryShare> = totals
        .iter()
        .map(|(category, total)| {
            let percent_of_total = if grand_total > Decimal::ZERO {
                (*total * Decimal::ONE_HUNDRED)
                    .checked_div(grand_total)
                    .unwrap_or_default()
                    .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
            } else {
                Decimal::ZERO
            };

            CategoryShare {
                category: category.clone(),
                total: *total,
                percent_of_total,
            }
        })
        .collect();

    // Stable, so equal totals stay in key order.
    ranked.sort_by(|a, b| b.total.cmp(&a.total));

    ranked
}

/// The `count` categories with the highest spend.
pub fn top_categories(ranked: &[CategoryShare], count: usize) -> Vec<CategoryShare> {
    ranked.iter().take(count).cloned().collect()
}

/// Categories to offer as one-tap choices when entering a transaction.
///
/// The most spent-on categories this month, or [DEFAULT_QUICK_CATEGORIES]
/// if nothing has been spent yet.
pub fn quick_categories(ranked: &[CategoryShare]) -> Vec<String> {
    if ranked.is_empty() {
        return DEFAULT_QUICK_CATEGORIES
            .iter()
            .map(|category| (*category).to_owned())
            .collect();
    }

    ranked
        .iter()
        .take(QUICK_CATEGORY_COUNT)
        .map(|share| share.category.clone())
        .collect()
}

/// Whether a budget still has room or has been exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetStanding {
    /// Spending is at or below the limit.
    Left,
    /// Spending is above the limit.
    Over,
}

/// How much of a monthly category budget has been used.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetStatus {
    /// The budget's category, as the user spelled it.
    pub category: String,
    /// The monthly limit.
    pub limit: Decimal,
    /// The amount spent in the category this month.
    pub spent: Decimal,
    /// `limit - spent`, negative when over budget.
    pub remaining: Decimal,
    /// `spent / limit` clamped to `[0, 1]`.
    pub used_ratio: Decimal,
    /// `used_ratio` as a whole percentage.
    pub used_percent: u32,
    /// Whether the budget has been exceeded.
    pub standing: BudgetStanding,
    /// A short human readable summary, e.g. "20.00 left".
    pub message: String,
}

/// Compare each budget with this month's spending, sorted by category ignoring case.
///
/// Spending is looked up by the exact category name.
pub fn compute_budget_statuses(
    budgets: &[CategoryBudget],
    totals: &CategoryTotals,
) -> Vec<BudgetStatus> {
    let mut statuses: Vec<BudgetStatus> = budgets
        .iter()
        .map(|budget| {
            let limit = budget.monthly_limit;
            let spent = totals
                .get(&budget.category)
                .copied()
                .unwrap_or(Decimal::ZERO);
            let remaining = limit.saturating_sub(spent);
            let used_ratio = if limit > Decimal::ZERO {
                spent
                    .checked_div(limit)
                    .unwrap_or(Decimal::ONE)
                    .clamp(Decimal::ZERO, Decimal::ONE)
            } else {
                Decimal::ZERO
            };

            let (standing, message) = if remaining >= Decimal::ZERO {
                (BudgetStanding::Left, format!("{} left", format_amount(remaining)))
            } else {
                (
                    BudgetStanding::Over,
                    format!("Over by {}", format_amount(remaining.abs())),
                )
            };

            BudgetStatus {
                category: budget.category.clone(),
                limit,
                spent,
                remaining,
                used_ratio,
                used_percent: ratio_to_percent(used_ratio),
                standing,
                message,
            }
        })
        .collect();

    statuses.sort_by_key(|status| status.category.to_lowercase());

    statuses
}

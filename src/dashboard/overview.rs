//! Every dashboard figure, computed together from one ledger snapshot.

use rust_decimal::Decimal;
use serde::Serialize;
use time::OffsetDateTime;
use time_tz::Tz;

use crate::{
    budget::CategoryBudget,
    dashboard::{
        activity::{ActivityStats, compute_activity_stats},
        categories::{
            BudgetStatus, CategoryShare, TOP_CATEGORY_COUNT, compute_budget_statuses,
            compute_category_totals, quick_categories, rank_categories, top_categories,
        },
        goal::{SavingGoalProgress, compute_saving_goal_progress},
        summary::{PeriodSummaries, compute_period_summaries},
        trends::{DAILY_DEBIT_DAYS, DailyTotal, NET_TREND_DAYS, daily_debit_totals, daily_net_totals},
    },
    transaction::Transaction,
};

/// An immutable copy of everything a user has stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerSnapshot {
    /// The full ledger, in any order.
    pub transactions: Vec<Transaction>,
    /// The user's category budgets.
    pub budgets: Vec<CategoryBudget>,
    /// The monthly saving target, if set.
    pub saving_goal: Option<Decimal>,
}

/// All derived figures for a [LedgerSnapshot] at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    /// Debit, credit and net totals per calendar period.
    pub summaries: PeriodSummaries,
    /// This month's spending per category, largest first.
    pub category_totals: Vec<CategoryShare>,
    /// The largest spending categories this month.
    pub top_categories: Vec<CategoryShare>,
    /// Suggested categories for quick entry.
    pub quick_categories: Vec<String>,
    /// Budget progress, sorted by category ignoring case.
    pub budget_statuses: Vec<BudgetStatus>,
    /// Progress towards the saving goal using this month's net.
    pub saving_goal: SavingGoalProgress,
    /// Activity and streaks.
    pub activity: ActivityStats,
    /// The number of transactions in the ledger.
    pub transaction_count: usize,
    /// Debit totals for each of the last few days, oldest first.
    pub daily_debits: Vec<DailyTotal>,
    /// Net totals for each day of the last quarter, oldest first.
    pub net_trend: Vec<DailyTotal>,
}

impl Dashboard {
    /// Recompute every figure from `snapshot` as of `now`.
    ///
    /// Days, weeks, months and years are calendar periods in `timezone`.
    pub fn compute(snapshot: &LedgerSnapshot, now: OffsetDateTime, timezone: &Tz) -> Self {
        let transactions = &snapshot.transactions;

        let summaries = compute_period_summaries(transactions, now, timezone);
        let totals = compute_category_totals(transactions, now, timezone);
        let ranked = rank_categories(&totals);

        Self {
            summaries,
            top_categories: top_categories(&ranked, TOP_CATEGORY_COUNT),
            quick_categories: quick_categories(&ranked),
            budget_statuses: compute_budget_statuses(&snapshot.budgets, &totals),
            saving_goal: compute_saving_goal_progress(snapshot.saving_goal, summaries.month.net),
            activity: compute_activity_stats(transactions, now, timezone),
            transaction_count: transactions.len(),
            daily_debits: daily_debit_totals(transactions, now, timezone, DAILY_DEBIT_DAYS),
            net_trend: daily_net_totals(transactions, now, timezone, NET_TREND_DAYS),
            category_totals: ranked,
        }
    }
}

//! The aggregation engine behind the dashboard.
//!
//! Every function here is pure: it takes a snapshot of the ledger, the
//! evaluation instant `now` and the local timezone, and returns fresh
//! figures. Nothing is cached between requests.

mod activity;
mod categories;
mod goal;
mod handlers;
mod overview;
mod period;
mod summary;
mod trends;

pub use activity::{ActivityStats, compute_activity_stats};
pub use categories::{
    BudgetStanding, BudgetStatus, CategoryShare, CategoryTotals, DEFAULT_QUICK_CATEGORIES,
    QUICK_CATEGORY_COUNT, TOP_CATEGORY_COUNT, UNCATEGORIZED_LABEL, compute_budget_statuses,
    compute_category_totals, quick_categories, rank_categories, top_categories,
};
pub use goal::{GoalStatus, SavingGoalProgress, compute_saving_goal_progress};
pub use handlers::{DashboardState, get_dashboard};
pub use overview::{Dashboard, LedgerSnapshot};
pub use period::{
    Bounds, Period, end_of_period, local_today, next_day, period_bounds, start_of_month,
    start_of_next_month, start_of_next_year, start_of_period, start_of_week, start_of_year,
};
pub use summary::{PeriodSummaries, PeriodTotals, compute_period_summaries};
pub use trends::{DAILY_DEBIT_DAYS, DailyTotal, NET_TREND_DAYS, daily_debit_totals, daily_net_totals};

#[cfg(test)]
pub(crate) use summary::test_utils;

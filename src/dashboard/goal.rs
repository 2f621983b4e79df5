//! Progress towards the monthly saving goal.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::money::{format_amount, ratio_to_percent};

/// Where the user stands relative to their saving goal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GoalStatus {
    /// No goal has been set.
    NotSet,
    /// The goal is zero, so any saving counts.
    ZeroGoal,
    /// This month's net is zero or negative.
    NoSavingsYet,
    /// Some saving, but less than the goal.
    InProgress {
        /// How much more must be saved to reach the goal.
        remaining: Decimal,
    },
    /// The goal has been met or exceeded.
    Reached {
        /// How much was saved beyond the goal.
        excess: Decimal,
    },
}

/// The saving goal compared with this month's net.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingGoalProgress {
    /// The monthly target, if any.
    pub target: Option<Decimal>,
    /// Credits minus debits this month.
    pub current_month_net: Decimal,
    /// `current_month_net / target` clamped to `[0, 1]`.
    pub ratio: Decimal,
    /// `ratio` as a whole percentage.
    pub percent: u32,
    /// The decision reached for this goal.
    pub status: GoalStatus,
    /// A short human readable summary of `status`.
    pub message: String,
}

/// Compare `current_month_net` with the monthly `target`.
///
/// The checks run in a fixed order so that the ratio is only computed for a
/// positive target and a positive net.
pub fn compute_saving_goal_progress(
    target: Option<Decimal>,
    current_month_net: Decimal,
) -> SavingGoalProgress {
    let not_started = |status: GoalStatus, message: &str| SavingGoalProgress {
        target,
        current_month_net,
        ratio: Decimal::ZERO,
        percent: 0,
        status,
        message: message.to_owned(),
    };

    let Some(goal) = target else {
        return not_started(GoalStatus::NotSet, "Set a goal to see your progress.");
    };

    if goal.is_zero() {
        return not_started(
            GoalStatus::ZeroGoal,
            "Goal is zero. Any positive saving is progress.",
        );
    }

    if current_month_net <= Decimal::ZERO {
        return not_started(
            GoalStatus::NoSavingsYet,
            "You haven't saved anything yet this month.",
        );
    }

    let ratio = current_month_net
        .checked_div(goal)
        .unwrap_or(Decimal::ONE)
        .clamp(Decimal::ZERO, Decimal::ONE);
    let percent = ratio_to_percent(ratio);

    let (status, message) = if current_month_net >= goal {
        let excess = current_month_net - goal;
        (
            GoalStatus::Reached { excess },
            format!(
                "Goal reached! You are {} above your goal.",
                format_amount(excess)
            ),
        )
    } else {
        let remaining = goal - current_month_net;
        (
            GoalStatus::InProgress { remaining },
            format!(
                "{} more to reach your goal. ({percent}% done)",
                format_amount(remaining)
            ),
        )
    };

    SavingGoalProgress {
        target,
        current_month_net,
        ratio,
        percent,
        status,
        message,
    }
}

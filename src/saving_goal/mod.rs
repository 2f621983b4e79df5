//! The monthly saving goal: a target for credits minus debits over the current month.

mod core;
mod endpoints;

pub use core::{create_saving_goal_table, delete_saving_goal, get_saving_goal, set_saving_goal};
pub use endpoints::{SavingGoalState, get_saving_goal_endpoint, put_saving_goal};

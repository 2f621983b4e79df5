//! Per-category monthly spending limits.

mod core;
mod endpoints;

pub use core::{
    CategoryBudget, create_category_budget_table, delete_all_category_budgets,
    delete_category_budget, list_category_budgets, upsert_category_budget,
};
pub use endpoints::{
    BudgetState, delete_category_budget_endpoint, get_category_budgets, post_category_budget,
};

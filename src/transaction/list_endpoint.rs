//! Defines the endpoint for listing transactions with optional filters.

use axum::{
    Extension, Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    auth::UserID,
    dashboard::{PeriodTotals, local_today},
    timezone::{get_timezone, local_now},
    transaction::{
        Transaction, TransactionKind, TransactionState, list_transactions,
        range::{DateRange, RangePreset, filter_by_range, range_summary},
    },
};

/// The query parameters accepted by [list_transactions_endpoint].
#[derive(Debug, Default, Deserialize)]
pub struct TransactionQuery {
    /// A named range. Without one, `from` and `to` are used as given.
    pub preset: Option<RangePreset>,
    /// The first day to include.
    pub from: Option<Date>,
    /// The last day to include.
    pub to: Option<Date>,
    /// Only show debits or only show credits.
    pub kind: Option<TransactionKind>,
    /// Only show categories containing this text, ignoring case.
    pub category: Option<String>,
}

/// The transaction list and the totals of the selected range.
#[derive(Debug, Serialize)]
pub struct TransactionList {
    /// The matching transactions, newest first.
    pub transactions: Vec<Transaction>,
    /// Totals over every transaction in the range, ignoring the kind and
    /// category filters. `null` when no range is selected.
    pub range_summary: Option<PeriodTotals>,
}

/// A route handler for listing the logged in user's transactions.
pub async fn list_transactions_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<TransactionQuery>,
) -> Result<Json<TransactionList>, Error> {
    let timezone = get_timezone(&state.local_timezone)?;
    let today = local_today(local_now(timezone), timezone);
    let range = DateRange::from_preset(query.preset, query.from, query.to, today)?;

    let ledger = {
        let connection = state.connection()?;
        list_transactions(user_id, &connection)?
    };

    let in_range = filter_by_range(&ledger, &range, timezone);
    let range_summary = range_summary(&ledger, &range, timezone);

    let category_filter = query
        .category
        .as_deref()
        .map(str::trim)
        .filter(|category| !category.is_empty())
        .map(str::to_lowercase);

    let mut transactions: Vec<Transaction> = in_range
        .into_iter()
        .filter(|transaction| query.kind.is_none_or(|kind| transaction.kind == kind))
        .filter(|transaction| {
            category_filter.as_ref().is_none_or(|needle| {
                transaction.category.to_lowercase().contains(needle.as_str())
            })
        })
        .collect();

    // Undated transactions sort last.
    transactions.sort_by(|a, b| {
        b.occurred_at
            .cmp(&a.occurred_at)
            .then_with(|| b.id.cmp(&a.id))
    });

    Ok(Json(TransactionList {
        transactions,
        range_summary,
    }))
}

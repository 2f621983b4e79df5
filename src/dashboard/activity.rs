//! How often the user records transactions.

use std::collections::BTreeSet;

use serde::Serialize;
use time::OffsetDateTime;
use time_tz::Tz;

use crate::{dashboard::period::local_today, timezone::local_date, transaction::Transaction};

/// The number of trailing days, including today, counted by [ActivityStats::active_days_last_30].
const ACTIVE_DAYS_WINDOW: i32 = 30;

/// Activity and streak figures for a ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ActivityStats {
    /// The latest transaction timestamp.
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_activity: Option<OffsetDateTime>,
    /// Distinct days with a transaction in the last 30 days, including today.
    pub active_days_last_30: u32,
    /// Consecutive active days ending today, zero if today has no transactions.
    pub current_streak: u32,
    /// The longest run of consecutive active days.
    pub best_streak: u32,
}

/// Compute activity stats for `transactions` as of `now`.
///
/// Days are local calendar days in `timezone`. Undated transactions are ignored.
pub fn compute_activity_stats(
    transactions: &[Transaction],
    now: OffsetDateTime,
    timezone: &Tz,
) -> ActivityStats {
    let today = local_today(now, timezone).to_julian_day();

    let mut active_days = BTreeSet::new();
    let mut last_activity: Option<OffsetDateTime> = None;

    for transaction in transactions {
        let Some(occurred_at) = transaction.occurred_at else {
            continue;
        };

        if let Some(day) = local_date(occurred_at, timezone) {
            active_days.insert(day.to_julian_day());
        }

        if last_activity.is_none_or(|latest| occurred_at > latest) {
            last_activity = Some(occurred_at);
        }
    }

    let window_start = today - (ACTIVE_DAYS_WINDOW - 1);
    let active_days_last_30 = active_days.range(window_start..=today).count() as u32;

    ActivityStats {
        last_activity,
        active_days_last_30,
        current_streak: current_streak(&active_days, today),
        best_streak: best_streak(&active_days),
    }
}

fn best_streak(active_days: &BTreeSet<i32>) -> u32 {
    let mut best = 0;
    let mut run = 0;
    let mut previous: Option<i32> = None;

    for &day in active_days {
        run = match previous {
            Some(previous) if day == previous + 1 => run + 1,
            _ => 1,
        };
        best = best.max(run);
        previous = Some(day);
    }

    best
}

fn current_streak(active_days: &BTreeSet<i32>, today: i32) -> u32 {
    let mut streak = 0;
    let mut day = today;

    while active_days.contains(&day) {
        streak += 1;
        day -= 1;
    }

    streak
}

#[cfg(test)]
mod activity_tests {
    use rust_decimal_macros::dec;
    use time::{Duration, OffsetDateTime, macros::datetime};

    use crate::{
        dashboard::summary::test_utils::transaction,
        timezone::test_utils::{auckland, utc},
        transaction::TransactionKind::Debit,
    };

    use super::{ActivityStats, compute_activity_stats};

    const NOW: OffsetDateTime = datetime!(2025-10-10 18:00 UTC);

    fn on_days_ago(days: &[i64]) -> Vec<crate::transaction::Transaction> {
        days.iter()
            .enumerate()
            .map(|(i, days_ago)| {
                transaction(
                    i as i64,
                    dec!(1),
                    Debit,
                    "Food",
                    Some(NOW - Duration::days(*days_ago)),
                )
            })
            .collect()
    }

    #[test]
    fn empty_ledger_has_no_activity() {
        assert_eq!(compute_activity_stats(&[], NOW, utc()), ActivityStats::default());
    }

    #[test]
    fn gap_day_breaks_current_streak() {
        // Active 6 and 5 days ago, then a 3 day gap, then active yesterday. Today is a gap day.
        let transactions = on_days_ago(&[6, 5, 1]);

        let stats = compute_activity_stats(&transactions, NOW, utc());

        assert_eq!(stats.best_streak, 2);
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.active_days_last_30, 3);
    }

    #[test]
    fn current_streak_counts_back_from_today() {
        let transactions = on_days_ago(&[0, 0, 1, 2, 4, 5, 6, 7]);

        let stats = compute_activity_stats(&transactions, NOW, utc());

        assert_eq!(stats.current_streak, 3);
        assert_eq!(stats.best_streak, 4);
        assert!(stats.current_streak <= stats.best_streak);
    }

    #[test]
    fn window_is_thirty_days_inclusive() {
        let transactions = on_days_ago(&[0, 29, 30, 45]);

        let stats = compute_activity_stats(&transactions, NOW, utc());

        assert_eq!(stats.active_days_last_30, 2);
    }

    #[test]
    fn last_activity_is_latest_timestamp() {
        let mut transactions = on_days_ago(&[3, 1, 2]);
        transactions.push(transaction(9, dec!(1), Debit, "Food", None));

        let stats = compute_activity_stats(&transactions, NOW, utc());

        assert_eq!(stats.last_activity, Some(NOW - Duration::days(1)));
    }

    #[test]
    fn days_follow_the_local_timezone() {
        let now = datetime!(2025-10-10 08:00 +13:00);
        // 2025-10-09 20:00 UTC is 2025-10-10 09:00 in +13:00, which is today.
        let transactions = [transaction(
            1,
            dec!(1),
            Debit,
            "Food",
            Some(datetime!(2025-10-09 20:00 UTC)),
        )];

        let stats = compute_activity_stats(&transactions, now, auckland());

        assert_eq!(stats.current_streak, 1);
    }

    #[test]
    fn streak_survives_the_end_of_daylight_saving() {
        // Clocks went back at 3am on 2025-04-06. Half past midnight that morning was still +13:00.
        let now = datetime!(2025-04-07 10:00 +12:00);
        let transactions = [
            transaction(1, dec!(1), Debit, "Food", Some(datetime!(2025-04-06 00:30 +13:00))),
            transaction(2, dec!(1), Debit, "Food", Some(now)),
        ];

        let stats = compute_activity_stats(&transactions, now, auckland());

        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.best_streak, 2);
        assert_eq!(stats.active_days_last_30, 2);
    }
}

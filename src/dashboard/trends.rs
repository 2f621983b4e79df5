//! Per-day totals for the trailing days, used for charts.

use rust_decimal::Decimal;
use serde::Serialize;
use time::{Date, OffsetDateTime};
use time_tz::Tz;

use crate::{
    dashboard::period::local_today,
    timezone::local_date,
    transaction::{Transaction, TransactionKind},
};

/// The number of days in the daily spending chart.
pub const DAILY_DEBIT_DAYS: u16 = 7;
/// The number of days in the net trend chart.
pub const NET_TREND_DAYS: u16 = 90;

/// The total for a single local calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyTotal {
    /// The calendar day.
    pub date: Date,
    /// The total for that day.
    pub amount: Decimal,
}

/// Debit totals for each of the last `days` days in `timezone`, oldest first, ending today.
pub fn daily_debit_totals(
    transactions: &[Transaction],
    now: OffsetDateTime,
    timezone: &Tz,
    days: u16,
) -> Vec<DailyTotal> {
    daily_totals(transactions, now, timezone, days, |transaction| {
        match transaction.kind {
            TransactionKind::Debit => transaction.amount,
            TransactionKind::Credit => Decimal::ZERO,
        }
    })
}

/// Net totals (credit minus debit) for each of the last `days` days in `timezone`, oldest first,
/// ending today.
pub fn daily_net_totals(
    transactions: &[Transaction],
    now: OffsetDateTime,
    timezone: &Tz,
    days: u16,
) -> Vec<DailyTotal> {
    daily_totals(transactions, now, timezone, days, Transaction::signed_amount)
}

fn daily_totals(
    transactions: &[Transaction],
    now: OffsetDateTime,
    timezone: &Tz,
    days: u16,
    contribution: impl Fn(&Transaction) -> Decimal,
) -> Vec<DailyTotal> {
    if days == 0 {
        return Vec::new();
    }

    let today = local_today(now, timezone).to_julian_day();
    let first_day = today - (i32::from(days) - 1);

    let mut buckets: Vec<DailyTotal> = (first_day..=today)
        .filter_map(|julian_day| Date::from_julian_day(julian_day).ok())
        .map(|date| DailyTotal {
            date,
            amount: Decimal::ZERO,
        })
        .collect();

    let Some(first_date) = buckets.first().map(|bucket| bucket.date) else {
        return buckets;
    };

    for transaction in transactions {
        let Some(day) = transaction
            .occurred_at
            .and_then(|occurred_at| local_date(occurred_at, timezone))
        else {
            continue;
        };

        let index = day.to_julian_day() - first_date.to_julian_day();
        let Some(bucket) = usize::try_from(index)
            .ok()
            .and_then(|index| buckets.get_mut(index))
        else {
            continue;
        };

        bucket.amount = bucket.amount.saturating_add(contribution(transaction));
    }

    buckets
}

#[cfg(test)]
mod trend_tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use time::macros::{date, datetime};

    use crate::{
        dashboard::summary::test_utils::transaction,
        timezone::test_utils::{auckland, utc},
        transaction::TransactionKind::{Credit, Debit},
    };

    use super::{daily_debit_totals, daily_net_totals};

    const NOW: time::OffsetDateTime = datetime!(2025-10-10 12:00 UTC);

    #[test]
    fn seven_days_oldest_first() {
        let transactions = [
            transaction(1, dec!(5), Debit, "Food", Some(datetime!(2025-10-10 08:00 UTC))),
            transaction(2, dec!(7), Debit, "Food", Some(datetime!(2025-10-04 08:00 UTC))),
            transaction(3, dec!(9), Debit, "Food", Some(datetime!(2025-10-03 23:59 UTC))),
            transaction(4, dec!(100), Credit, "Pay", Some(datetime!(2025-10-10 08:00 UTC))),
        ];

        let totals = daily_debit_totals(&transactions, NOW, utc(), 7);

        assert_eq!(totals.len(), 7);
        assert_eq!(totals[0].date, date!(2025 - 10 - 04));
        assert_eq!(totals[0].amount, dec!(7));
        assert_eq!(totals[6].date, date!(2025 - 10 - 10));
        assert_eq!(totals[6].amount, dec!(5));
        assert_eq!(totals[3].amount, Decimal::ZERO);
    }

    #[test]
    fn net_trend_nets_debits_and_credits() {
        let transactions = [
            transaction(1, dec!(30), Debit, "Food", Some(datetime!(2025-10-09 08:00 UTC))),
            transaction(2, dec!(100), Credit, "Pay", Some(datetime!(2025-10-09 09:00 UTC))),
            transaction(3, dec!(1), Debit, "Old", Some(datetime!(2025-07-01 09:00 UTC))),
            transaction(4, dec!(1), Debit, "Undated", None),
        ];

        let totals = daily_net_totals(&transactions, NOW, utc(), 90);

        assert_eq!(totals.len(), 90);
        assert_eq!(totals[88].amount, dec!(70));
        let sum: Decimal = totals.iter().map(|total| total.amount).sum();
        assert_eq!(sum, dec!(70));
    }

    #[test]
    fn zero_days_is_empty() {
        assert!(daily_net_totals(&[], NOW, utc(), 0).is_empty());
    }

    #[test]
    fn buckets_follow_the_offset_of_each_day() {
        // Clocks went back at 3am on 2025-04-06, so the 5th was on +13:00 and the 7th on +12:00.
        let now = datetime!(2025-04-07 10:00 +12:00);
        let transactions = [
            transaction(1, dec!(3), Debit, "Food", Some(datetime!(2025-04-06 00:30 +13:00))),
            transaction(2, dec!(4), Debit, "Food", Some(datetime!(2025-04-05 23:30 +13:00))),
        ];

        let totals = daily_debit_totals(&transactions, now, auckland(), 3);

        assert_eq!(totals[0].date, date!(2025 - 04 - 05));
        assert_eq!(totals[0].amount, dec!(4));
        assert_eq!(totals[1].date, date!(2025 - 04 - 06));
        assert_eq!(totals[1].amount, dec!(3));
        assert_eq!(totals[2].amount, Decimal::ZERO);
    }
}

//! Debit, credit and net totals per calendar period.

use rust_decimal::Decimal;
use serde::Serialize;
use time::OffsetDateTime;
use time_tz::Tz;

use crate::{
    dashboard::period::{Period, period_bounds},
    transaction::{Transaction, TransactionKind},
};

/// The debit total, credit total and net of a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PeriodTotals {
    /// Sum of the debit amounts.
    pub debit_total: Decimal,
    /// Sum of the credit amounts.
    pub credit_total: Decimal,
    /// `credit_total - debit_total`.
    pub net: Decimal,
}

impl PeriodTotals {
    /// Add `transaction` to the totals.
    pub fn record(&mut self, transaction: &Transaction) {
        match transaction.kind {
            TransactionKind::Debit => {
                self.debit_total = self.debit_total.saturating_add(transaction.amount)
            }
            TransactionKind::Credit => {
                self.credit_total = self.credit_total.saturating_add(transaction.amount)
            }
        }

        self.net = self.credit_total.saturating_sub(self.debit_total);
    }

    /// Sum every transaction in `transactions`.
    pub fn from_transactions<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let mut totals = Self::default();

        for transaction in transactions {
            totals.record(transaction);
        }

        totals
    }
}

/// Totals for each calendar period containing `now`, plus all time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PeriodSummaries {
    /// Today, midnight to midnight.
    pub today: PeriodTotals,
    /// This week, starting Monday.
    pub week: PeriodTotals,
    /// This calendar month.
    pub month: PeriodTotals,
    /// This calendar year.
    pub year: PeriodTotals,
    /// Every transaction in the ledger.
    pub all_time: PeriodTotals,
}

/// Compute the totals of every period in a single pass over `transactions`.
///
/// Periods are calendar periods in `timezone`. Transactions without a timestamp only count
/// towards [PeriodSummaries::all_time].
pub fn compute_period_summaries(
    transactions: &[Transaction],
    now: OffsetDateTime,
    timezone: &Tz,
) -> PeriodSummaries {
    let today = period_bounds(Period::Today, now, timezone);
    let week = period_bounds(Period::Week, now, timezone);
    let month = period_bounds(Period::Month, now, timezone);
    let year = period_bounds(Period::Year, now, timezone);

    let mut summaries = PeriodSummaries::default();

    for transaction in transactions {
        summaries.all_time.record(transaction);

        let Some(occurred_at) = transaction.occurred_at else {
            continue;
        };

        if today.contains(occurred_at) {
            summaries.today.record(transaction);
        }
        if week.contains(occurred_at) {
            summaries.week.record(transaction);
        }
        if month.contains(occurred_at) {
            summaries.month.record(transaction);
        }
        if year.contains(occurred_at) {
            summaries.year.record(transaction);
        }
    }

    summaries
}


#[cfg(test)]
mod summary_tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use time::macros::datetime;

    use crate::{
        timezone::test_utils::{auckland, utc},
        transaction::TransactionKind::{Credit, Debit},
    };

    use super::{PeriodTotals, compute_period_summaries, test_utils::transaction};

    // Sunday afternoon.
    const NOW: time::OffsetDateTime = datetime!(2025-10-05 15:00 UTC);

    #[test]
    fn empty_ledger_is_all_zero() {
        let summaries = compute_period_summaries(&[], NOW, utc());

        assert_eq!(summaries.all_time, PeriodTotals::default());
        assert_eq!(summaries.today.net, Decimal::ZERO);
    }

    #[test]
    fn buckets_by_period() {
        let transactions = [
            transaction(1, dec!(10), Debit, "Food", Some(datetime!(2025-10-05 09:00 UTC))),
            transaction(2, dec!(100), Credit, "Salary", Some(datetime!(2025-09-30 09:00 UTC))),
            transaction(3, dec!(25), Debit, "Rent", Some(datetime!(2025-09-28 09:00 UTC))),
            transaction(4, dec!(40), Debit, "Gift", Some(datetime!(2025-01-01 00:00 UTC))),
            transaction(5, dec!(7), Debit, "Old", Some(datetime!(2024-12-31 23:59 UTC))),
        ];

        let summaries = compute_period_summaries(&transactions, NOW, utc());

        assert_eq!(summaries.today.debit_total, dec!(10));
        assert_eq!(summaries.today.credit_total, dec!(0));
        assert_eq!(summaries.week.debit_total, dec!(10));
        assert_eq!(summaries.week.credit_total, dec!(100));
        assert_eq!(summaries.week.net, dec!(90));
        assert_eq!(summaries.month.debit_total, dec!(10));
        assert_eq!(summaries.month.credit_total, dec!(0));
        assert_eq!(summaries.year.debit_total, dec!(75));
        assert_eq!(summaries.year.credit_total, dec!(100));
        assert_eq!(summaries.all_time.debit_total, dec!(82));
        assert_eq!(summaries.all_time.net, dec!(18));
    }

    #[test]
    fn undated_transactions_only_count_all_time() {
        let transactions = [
            transaction(1, dec!(10), Debit, "Food", None),
            transaction(2, dec!(5), Credit, "Gift", Some(datetime!(2025-10-05 09:00 UTC))),
        ];

        let summaries = compute_period_summaries(&transactions, NOW, utc());

        assert_eq!(summaries.today.debit_total, dec!(0));
        assert_eq!(summaries.year.debit_total, dec!(0));
        assert_eq!(summaries.all_time.debit_total, dec!(10));
        assert_eq!(summaries.all_time.net, dec!(-5));
    }

    #[test]
    fn all_time_net_matches_signed_sum() {
        let transactions = [
            transaction(1, dec!(0.1), Debit, "a", None),
            transaction(2, dec!(0.2), Credit, "b", Some(NOW)),
            transaction(3, dec!(3.33), Debit, "c", Some(datetime!(2020-02-29 12:00 UTC))),
        ];

        let summaries = compute_period_summaries(&transactions, NOW, utc());
        let signed_sum: Decimal = transactions.iter().map(|t| t.signed_amount()).sum();

        assert_eq!(summaries.all_time.net, signed_sum);
        assert_eq!(
            summaries.all_time.debit_total - summaries.all_time.credit_total,
            -signed_sum
        );
    }

    #[test]
    fn local_timezone_decides_the_day() {
        let now = datetime!(2025-10-05 08:00 +13:00);
        // 2025-10-04 18:00 UTC is 2025-10-05 07:00 in +13:00.
        let transactions = [transaction(
            1,
            dec!(10),
            Debit,
            "Food",
            Some(datetime!(2025-10-04 18:00 UTC)),
        )];

        let summaries = compute_period_summaries(&transactions, now, auckland());

        assert_eq!(summaries.today.debit_total, dec!(10));
    }

    #[test]
    fn year_start_in_summer_time_counts_from_winter() {
        // Auckland is on +12:00 in June but was on +13:00 at the start of the year.
        let now = datetime!(2025-06-15 12:00 +12:00);
        let transactions = [
            transaction(1, dec!(10), Debit, "Party", Some(datetime!(2025-01-01 00:30 +13:00))),
            transaction(2, dec!(4), Debit, "Late", Some(datetime!(2024-12-31 23:30 +13:00))),
        ];

        let summaries = compute_period_summaries(&transactions, now, auckland());

        assert_eq!(summaries.year.debit_total, dec!(10));
        assert_eq!(summaries.all_time.debit_total, dec!(14));
    }
}

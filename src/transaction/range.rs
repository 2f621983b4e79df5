//! Date-range filtering for the transaction list.
//!
//! A range only narrows what the list shows and the range summary beside it.
//! Dashboard figures always use the full ledger.

use serde::Deserialize;
use time::{Date, Duration, OffsetDateTime};
use time_tz::Tz;

use crate::{
    Error,
    dashboard::{
        PeriodTotals, next_day, start_of_month, start_of_next_month, start_of_next_year,
        start_of_week, start_of_year,
    },
    timezone::local_midnight,
    transaction::Transaction,
};

/// A named date range relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RangePreset {
    /// Just today.
    Today,
    /// Monday to Sunday of the current week.
    ThisWeek,
    /// The current calendar month.
    ThisMonth,
    /// The current calendar year.
    ThisYear,
    /// Today and the 29 days before it.
    #[serde(rename = "last-30-days")]
    Last30Days,
    /// Use the `from` and `to` dates given alongside the preset.
    Custom,
    /// Show everything.
    None,
}

/// An inclusive range of local calendar days. Either end may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    from: Option<Date>,
    to: Option<Date>,
}

impl DateRange {
    /// The range that contains every transaction, dated or not.
    pub const UNBOUNDED: Self = Self {
        from: None,
        to: None,
    };

    /// Create a range from `from` to `to`, both inclusive.
    ///
    /// # Errors
    /// Returns [Error::InvalidDateRange] if `from` comes after `to`.
    pub fn new(from: Option<Date>, to: Option<Date>) -> Result<Self, Error> {
        match (from, to) {
            (Some(from), Some(to)) if from > to => Err(Error::InvalidDateRange { from, to }),
            _ => Ok(Self { from, to }),
        }
    }

    /// Resolve a preset into concrete dates around `today`.
    ///
    /// `from` and `to` are only used by [RangePreset::Custom] or when no preset is given.
    ///
    /// # Errors
    /// Returns [Error::InvalidDateRange] if a custom `from` comes after `to`.
    pub fn from_preset(
        preset: Option<RangePreset>,
        from: Option<Date>,
        to: Option<Date>,
        today: Date,
    ) -> Result<Self, Error> {
        let last_day_before = |date: Date| date.previous_day().unwrap_or(Date::MIN);

        let range = match preset {
            Some(RangePreset::Custom) | None => return Self::new(from, to),
            Some(RangePreset::None) => Self::UNBOUNDED,
            Some(RangePreset::Today) => Self {
                from: Some(today),
                to: Some(today),
            },
            Some(RangePreset::ThisWeek) => {
                let monday = start_of_week(today);
                Self {
                    from: Some(monday),
                    to: Some(monday.checked_add(Duration::days(6)).unwrap_or(Date::MAX)),
                }
            }
            Some(RangePreset::ThisMonth) => Self {
                from: Some(start_of_month(today)),
                to: Some(last_day_before(start_of_next_month(today))),
            },
            Some(RangePreset::ThisYear) => Self {
                from: Some(start_of_year(today)),
                to: Some(last_day_before(start_of_next_year(today))),
            },
            Some(RangePreset::Last30Days) => Self {
                from: Some(today.checked_sub(Duration::days(29)).unwrap_or(Date::MIN)),
                to: Some(today),
            },
        };

        Ok(range)
    }

    /// The first day of the range, if bounded below.
    pub fn from(&self) -> Option<Date> {
        self.from
    }

    /// The last day of the range, if bounded above.
    pub fn to(&self) -> Option<Date> {
        self.to
    }

    /// Whether neither end of the range is set.
    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Whether `occurred_at` falls on a day inside the range, using local midnights in `timezone`.
    ///
    /// Undated transactions are only inside the unbounded range.
    fn contains(&self, occurred_at: Option<OffsetDateTime>, timezone: &Tz) -> bool {
        if self.is_unbounded() {
            return true;
        }

        let Some(occurred_at) = occurred_at else {
            return false;
        };

        let after_start = self
            .from
            .is_none_or(|from| occurred_at >= local_midnight(from, timezone));
        let before_end = self
            .to
            .is_none_or(|to| occurred_at < local_midnight(next_day(to), timezone));

        after_start && before_end
    }
}

/// The transactions inside `range`, in their original order.
///
/// An unbounded range returns `transactions` unchanged.
pub fn filter_by_range(
    transactions: &[Transaction],
    range: &DateRange,
    timezone: &Tz,
) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|transaction| range.contains(transaction.occurred_at, timezone))
        .cloned()
        .collect()
}

/// The debit, credit and net totals of the transactions inside `range`.
///
/// `None` when the range is unbounded, which is different from a range that
/// contains no transactions.
pub fn range_summary(
    transactions: &[Transaction],
    range: &DateRange,
    timezone: &Tz,
) -> Option<PeriodTotals> {
    if range.is_unbounded() {
        return None;
    }

    Some(PeriodTotals::from_transactions(
        transactions
            .iter()
            .filter(|transaction| range.contains(transaction.occurred_at, timezone)),
    ))
}

#[cfg(test)]
mod range_tests {
    use rust_decimal_macros::dec;
    use time::macros::{date, datetime};

    use crate::{
        Error,
        dashboard::{PeriodTotals, test_utils::transaction},
        timezone::test_utils::{auckland, utc},
        transaction::TransactionKind,
    };

    use super::{DateRange, RangePreset, filter_by_range, range_summary};

    #[test]
    fn from_after_to_is_rejected() {
        let result = DateRange::new(Some(date!(2025 - 10 - 05)), Some(date!(2025 - 10 - 01)));

        assert_eq!(
            result,
            Err(Error::InvalidDateRange {
                from: date!(2025 - 10 - 05),
                to: date!(2025 - 10 - 01),
            })
        );
    }

    #[test]
    fn unbounded_range_keeps_everything() {
        let transactions = vec![
            transaction(1, dec!(10), TransactionKind::Debit, "Food", None),
            transaction(
                2,
                dec!(20),
                TransactionKind::Credit,
                "Salary",
                Some(datetime!(2025-10-01 12:00 UTC)),
            ),
        ];

        let filtered = filter_by_range(&transactions, &DateRange::UNBOUNDED, utc());

        assert_eq!(filtered, transactions);
        assert_eq!(
            range_summary(&transactions, &DateRange::UNBOUNDED, utc()),
            None
        );
    }

    #[test]
    fn to_includes_the_whole_day_and_skips_undated() {
        let transactions = vec![
            transaction(
                1,
                dec!(10),
                TransactionKind::Debit,
                "Food",
                Some(datetime!(2025-10-03 23:59:59 UTC)),
            ),
            transaction(
                2,
                dec!(5),
                TransactionKind::Debit,
                "Food",
                Some(datetime!(2025-10-04 00:00 UTC)),
            ),
            transaction(3, dec!(99), TransactionKind::Debit, "Food", None),
        ];
        let range = DateRange::new(None, Some(date!(2025 - 10 - 03))).unwrap();

        let filtered = filter_by_range(&transactions, &range, utc());

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 1);
    }

    #[test]
    fn days_follow_the_local_timezone() {
        // 2025-10-03 20:00 UTC is already 2025-10-04 in Auckland.
        let transactions = vec![transaction(
            1,
            dec!(10),
            TransactionKind::Debit,
            "Food",
            Some(datetime!(2025-10-03 20:00 UTC)),
        )];
        let range = DateRange::new(Some(date!(2025 - 10 - 04)), Some(date!(2025 - 10 - 04))).unwrap();

        assert_eq!(filter_by_range(&transactions, &range, auckland()).len(), 1);
        assert_eq!(filter_by_range(&transactions, &range, utc()).len(), 0);
    }

    #[test]
    fn day_in_summer_time_is_matched_from_winter() {
        // Both transactions are on 2025-01-01 in Auckland, which was on +13:00 that day.
        let transactions = vec![
            transaction(
                1,
                dec!(10),
                TransactionKind::Debit,
                "Food",
                Some(datetime!(2025-01-01 00:30 +13:00)),
            ),
            transaction(
                2,
                dec!(5),
                TransactionKind::Debit,
                "Food",
                Some(datetime!(2025-01-01 23:30 +13:00)),
            ),
        ];
        let new_years_day = Some(date!(2025 - 01 - 01));
        let range = DateRange::new(new_years_day, new_years_day).unwrap();

        assert_eq!(filter_by_range(&transactions, &range, auckland()).len(), 2);
    }

    #[test]
    fn empty_bounded_range_has_zero_summary() {
        let range = DateRange::new(Some(date!(2025 - 10 - 01)), None).unwrap();

        assert_eq!(
            range_summary(&[], &range, utc()),
            Some(PeriodTotals::default())
        );
    }

    #[test]
    fn range_summary_totals_debits_and_credits() {
        let transactions = vec![
            transaction(
                1,
                dec!(40),
                TransactionKind::Debit,
                "Food",
                Some(datetime!(2025-10-02 09:00 UTC)),
            ),
            transaction(
                2,
                dec!(100),
                TransactionKind::Credit,
                "Salary",
                Some(datetime!(2025-10-02 10:00 UTC)),
            ),
        ];
        let range = DateRange::new(Some(date!(2025 - 10 - 02)), Some(date!(2025 - 10 - 02))).unwrap();

        assert_eq!(
            range_summary(&transactions, &range, utc()),
            Some(PeriodTotals {
                debit_total: dec!(40),
                credit_total: dec!(100),
                net: dec!(60),
            })
        );
    }

    #[test]
    fn presets_resolve_around_today() {
        // A Sunday.
        let today = date!(2025 - 10 - 12);
        let resolve = |preset| DateRange::from_preset(Some(preset), None, None, today).unwrap();

        let week = resolve(RangePreset::ThisWeek);
        assert_eq!(week.from(), Some(date!(2025 - 10 - 06)));
        assert_eq!(week.to(), Some(date!(2025 - 10 - 12)));

        let month = resolve(RangePreset::ThisMonth);
        assert_eq!(month.from(), Some(date!(2025 - 10 - 01)));
        assert_eq!(month.to(), Some(date!(2025 - 10 - 31)));

        let year = resolve(RangePreset::ThisYear);
        assert_eq!(year.from(), Some(date!(2025 - 01 - 01)));
        assert_eq!(year.to(), Some(date!(2025 - 12 - 31)));

        let last_30 = resolve(RangePreset::Last30Days);
        assert_eq!(last_30.from(), Some(date!(2025 - 09 - 13)));
        assert_eq!(last_30.to(), Some(today));

        assert!(resolve(RangePreset::None).is_unbounded());
    }

    #[test]
    fn custom_preset_uses_given_dates() {
        let range = DateRange::from_preset(
            Some(RangePreset::Custom),
            Some(date!(2025 - 01 - 01)),
            None,
            date!(2025 - 10 - 12),
        )
        .unwrap();

        assert_eq!(range.from(), Some(date!(2025 - 01 - 01)));
        assert_eq!(range.to(), None);
    }
}

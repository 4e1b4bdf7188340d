//! Exact decimal sums over fleet records.
//!
//! Provides the rollup of a monetary field over a month window and grouped
//! totals for the maintenance cost breakdowns.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use time::Date;

use crate::{maintenance::MaintenanceRecord, payment::Payment, report::window::MonthWindow};

/// A record that carries a date and an amount of money.
pub(crate) trait MonetaryRecord {
    /// The day the money moved.
    fn date(&self) -> Date;

    /// How much money moved.
    fn amount(&self) -> Decimal;
}

impl MonetaryRecord for Payment {
    fn date(&self) -> Date {
        self.date
    }

    fn amount(&self) -> Decimal {
        self.amount_paid
    }
}

impl MonetaryRecord for MaintenanceRecord {
    fn date(&self) -> Date {
        self.date
    }

    fn amount(&self) -> Decimal {
        self.cost
    }
}

/// Sums the amounts of the records that fall inside `window`.
///
/// Records outside the window are ignored, so the store may over-fetch.
/// Returns zero when no record matches.
pub(crate) fn sum_in_window<R: MonetaryRecord>(records: &[R], window: &MonthWindow) -> Decimal {
    records
        .iter()
        .filter(|record| window.contains(record.date()))
        .map(MonetaryRecord::amount)
        .sum()
}

/// Sums the amounts of all `records`.
pub(crate) fn sum_all<R: MonetaryRecord>(records: &[R]) -> Decimal {
    records.iter().map(MonetaryRecord::amount).sum()
}

/// Sums the amounts of `records` grouped by `key`.
///
/// # Returns
/// One `(key, total)` pair per distinct key, sorted by key.
pub(crate) fn sum_by_key<R, K, F>(records: &[R], key: F) -> Vec<(K, Decimal)>
where
    R: MonetaryRecord,
    K: Ord,
    F: Fn(&R) -> K,
{
    let mut totals: BTreeMap<K, Decimal> = BTreeMap::new();

    for record in records {
        *totals.entry(key(record)).or_insert(Decimal::ZERO) += record.amount();
    }

    totals.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use time::{Date, Month, macros::date};

    use crate::{
        payment::{Payment, test_payment},
        report::window::MonthWindow,
    };

    use super::{sum_all, sum_by_key, sum_in_window};

    fn payment(date: Date, amount: Decimal) -> Payment {
        test_payment("P", "R-1", date, amount)
    }

    #[test]
    fn empty_records_sum_to_zero() {
        let window = MonthWindow::new(2024, Month::March).unwrap();

        assert_eq!(sum_in_window::<Payment>(&[], &window), Decimal::ZERO);
        assert_eq!(sum_all::<Payment>(&[]), Decimal::ZERO);
    }

    #[test]
    fn only_records_inside_window_are_summed() {
        let window = MonthWindow::new(2024, Month::March).unwrap();
        let payments = vec![
            payment(date!(2024 - 02 - 29), dec!(1)),
            payment(date!(2024 - 03 - 01), dec!(10)),
            payment(date!(2024 - 03 - 31), dec!(100)),
            payment(date!(2024 - 04 - 01), dec!(1000)),
        ];

        assert_eq!(sum_in_window(&payments, &window), dec!(110));
    }

    #[test]
    fn repeated_cents_do_not_drift() {
        let window = MonthWindow::new(2024, Month::March).unwrap();
        let payments: Vec<Payment> = (1..=10)
            .map(|day| payment(Date::from_calendar_date(2024, Month::March, day).unwrap(), dec!(0.1)))
            .collect();

        assert_eq!(sum_in_window(&payments, &window), dec!(1.0));
    }

    #[test]
    fn adjacent_windows_partition_records() {
        let february = MonthWindow::new(2024, Month::February).unwrap();
        let march = MonthWindow::new(2024, Month::March).unwrap();
        let payments = vec![
            payment(date!(2024 - 02 - 01), dec!(12.34)),
            payment(date!(2024 - 02 - 29), dec!(0.66)),
            payment(date!(2024 - 03 - 01), dec!(7.5)),
            payment(date!(2024 - 03 - 15), dec!(2.5)),
        ];

        let split = sum_in_window(&payments, &february) + sum_in_window(&payments, &march);

        assert_eq!(split, sum_all(&payments));
        assert_eq!(sum_in_window(&payments, &february), dec!(13.00));
        assert_eq!(sum_in_window(&payments, &march), dec!(10.0));
    }

    #[test]
    fn sum_by_key_groups_and_sorts() {
        let mut payments = vec![
            payment(date!(2024 - 03 - 01), dec!(5)),
            payment(date!(2024 - 03 - 02), dec!(7)),
            payment(date!(2024 - 03 - 03), dec!(11)),
        ];
        payments[0].rental_id = "R-2".to_owned();

        let got = sum_by_key(&payments, |payment| payment.rental_id.clone());

        assert_eq!(
            got,
            vec![("R-1".to_owned(), dec!(18)), ("R-2".to_owned(), dec!(5))]
        );
    }
}

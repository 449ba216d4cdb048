//! Chart-ready aggregates over a user's transactions.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use time::{Date, UtcOffset};

use crate::transactions::model::{Transaction, TransactionKind};

/// Category label used for totals when a transaction has no category.
///
/// Intentionally different from the grouping label, see
/// [`crate::transactions::query::UNCATEGORIZED_LABEL`].
pub const OTHER_LABEL: &str = "Other";

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateTotal {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrandTotals {
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
}

/// Sums expense amounts per category, in order of first occurrence.
pub fn category_totals<'a, I>(txs: I) -> Vec<CategoryTotal>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<CategoryTotal> = Vec::new();

    for tx in txs.into_iter().filter(|t| t.kind == TransactionKind::Expense) {
        let label = tx.category.as_deref().unwrap_or(OTHER_LABEL);
        match index.get(label) {
            Some(&i) => totals[i].total += tx.amount,
            None => {
                index.insert(label, totals.len());
                totals.push(CategoryTotal {
                    category: label.to_string(),
                    total: tx.amount,
                });
            }
        }
    }

    totals
}

/// Sums amounts per calendar day as seen at `offset`, oldest day first.
pub fn date_totals<'a, I>(txs: I, offset: UtcOffset) -> Vec<DateTotal>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut by_day: BTreeMap<Date, f64> = BTreeMap::new();
    for tx in txs {
        *by_day.entry(tx.date.to_offset(offset).date()).or_insert(0.0) += tx.amount;
    }
    by_day
        .into_iter()
        .map(|(date, total)| DateTotal { date, total })
        .collect()
}

pub fn grand_totals<'a, I>(txs: I) -> GrandTotals
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut totals = GrandTotals::default();
    for tx in txs {
        match tx.kind {
            TransactionKind::Income => totals.total_income += tx.amount,
            TransactionKind::Expense => totals.total_expense += tx.amount,
        }
    }
    totals.balance = totals.total_income - totals.total_expense;
    totals
}

#[cfg(test)]
mod tests {
    use time::{
        macros::{date, datetime, offset},
        OffsetDateTime,
    };
    use uuid::Uuid;

    use super::*;
    use crate::transactions::query::{sort_transactions, SortOrder};

    fn tx(kind: TransactionKind, amount: f64, category: Option<&str>, date: OffsetDateTime) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            kind,
            amount,
            category: category.map(str::to_string),
            description: None,
            date,
        }
    }

    #[test]
    fn groceries_scenario() {
        let txs = vec![
            tx(TransactionKind::Expense, 50.0, Some("Groceries"), datetime!(2024-01-01 00:00 UTC)),
            tx(TransactionKind::Expense, 30.0, Some("Groceries"), datetime!(2024-01-02 00:00 UTC)),
        ];

        assert_eq!(
            category_totals(&txs),
            vec![CategoryTotal { category: "Groceries".into(), total: 80.0 }]
        );
        assert_eq!(
            date_totals(&txs, UtcOffset::UTC),
            vec![
                DateTotal { date: date!(2024-01-01), total: 50.0 },
                DateTotal { date: date!(2024-01-02), total: 30.0 },
            ]
        );
    }

    #[test]
    fn category_totals_ignore_income_and_use_other_label() {
        let txs = vec![
            tx(TransactionKind::Income, 500.0, Some("Salary"), datetime!(2024-02-01 00:00 UTC)),
            tx(TransactionKind::Expense, 10.0, None, datetime!(2024-02-02 00:00 UTC)),
            tx(TransactionKind::Expense, 15.0, Some("Bills"), datetime!(2024-02-03 00:00 UTC)),
            tx(TransactionKind::Expense, 5.0, None, datetime!(2024-02-04 00:00 UTC)),
        ];
        let totals = category_totals(&txs);
        assert_eq!(
            totals,
            vec![
                CategoryTotal { category: OTHER_LABEL.into(), total: 15.0 },
                CategoryTotal { category: "Bills".into(), total: 15.0 },
            ]
        );

        let summed: f64 = totals.iter().map(|c| c.total).sum();
        assert_eq!(summed, grand_totals(&txs).total_expense);
    }

    #[test]
    fn date_totals_are_ascending_whatever_the_sort() {
        let txs = vec![
            tx(TransactionKind::Expense, 1.0, None, datetime!(2024-03-03 10:00 UTC)),
            tx(TransactionKind::Expense, 2.0, None, datetime!(2024-03-01 10:00 UTC)),
            tx(TransactionKind::Expense, 4.0, None, datetime!(2024-03-02 10:00 UTC)),
            tx(TransactionKind::Expense, 8.0, None, datetime!(2024-03-01 23:00 UTC)),
        ];
        for order in [SortOrder::DateAsc, SortOrder::DateDesc, SortOrder::AmountAsc, SortOrder::AmountDesc] {
            let mut view: Vec<&Transaction> = txs.iter().collect();
            sort_transactions(&mut view, order);
            let totals = date_totals(view, UtcOffset::UTC);
            let days: Vec<Date> = totals.iter().map(|d| d.date).collect();
            assert_eq!(days, vec![date!(2024-03-01), date!(2024-03-02), date!(2024-03-03)]);
            assert_eq!(totals[0].total, 10.0);
        }
    }

    #[test]
    fn date_totals_bucket_by_local_day() {
        let txs = vec![tx(
            TransactionKind::Expense,
            20.0,
            None,
            datetime!(2024-01-01 22:30 UTC),
        )];
        assert_eq!(date_totals(&txs, UtcOffset::UTC)[0].date, date!(2024-01-01));
        assert_eq!(date_totals(&txs, offset!(+5:30))[0].date, date!(2024-01-02));
    }

    #[test]
    fn grand_totals_and_balance() {
        let txs = vec![
            tx(TransactionKind::Income, 1000.0, Some("Salary"), datetime!(2024-01-01 00:00 UTC)),
            tx(TransactionKind::Income, 250.0, None, datetime!(2024-01-05 00:00 UTC)),
            tx(TransactionKind::Expense, 400.0, Some("Bills"), datetime!(2024-01-06 00:00 UTC)),
        ];
        let totals = grand_totals(&txs);
        assert_eq!(totals.total_income, 1250.0);
        assert_eq!(totals.total_expense, 400.0);
        assert_eq!(totals.balance, 850.0);
        assert_eq!(grand_totals(std::iter::empty()), GrandTotals::default());
    }

    #[test]
    fn date_total_serializes_as_plain_date() {
        let json = serde_json::to_value(DateTotal { date: date!(2024-01-09), total: 3.5 }).unwrap();
        assert_eq!(json["date"], "2024-01-09");
    }
}

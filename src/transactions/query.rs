//! In-memory views over a user's transactions: kind filter, sorting and
//! category grouping. Everything here is pure and recomputed per request.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::transactions::model::{Transaction, TransactionKind};

/// Group label for transactions without a category.
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    DateAsc,
    #[default]
    DateDesc,
    AmountAsc,
    AmountDesc,
}

#[derive(Debug, Serialize)]
pub struct CategoryGroup<'a> {
    pub category: String,
    pub count: usize,
    pub transactions: Vec<&'a Transaction>,
}

pub fn filter_by_kind(txs: &[Transaction], kind: TransactionKind) -> Vec<&Transaction> {
    txs.iter().filter(|t| t.kind == kind).collect()
}

/// Stable sort: equal keys keep their input order.
pub fn sort_transactions(txs: &mut [&Transaction], order: SortOrder) {
    match order {
        SortOrder::DateAsc => txs.sort_by(|a, b| a.date.cmp(&b.date)),
        SortOrder::DateDesc => txs.sort_by(|a, b| b.date.cmp(&a.date)),
        SortOrder::AmountAsc => txs.sort_by(|a, b| a.amount.total_cmp(&b.amount)),
        SortOrder::AmountDesc => txs.sort_by(|a, b| b.amount.total_cmp(&a.amount)),
    }
}

/// Partitions `txs` by category label, keeping groups in order of first
/// occurrence and transactions in their input order within each group.
pub fn group_by_category<'a>(txs: &[&'a Transaction]) -> Vec<CategoryGroup<'a>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<CategoryGroup<'a>> = Vec::new();

    for &tx in txs {
        let label = tx.category.as_deref().unwrap_or(UNCATEGORIZED_LABEL);
        let slot = *index.entry(label).or_insert_with(|| {
            groups.push(CategoryGroup {
                category: label.to_string(),
                count: 0,
                transactions: Vec::new(),
            });
            groups.len() - 1
        });
        let group = &mut groups[slot];
        group.transactions.push(tx);
        group.count += 1;
    }

    groups
}

use crate::transactions::model::{Transaction, TransactionKind};

/// Per-kind settings for the transaction view.
#[derive(Debug, Clone, Copy)]
pub struct ViewConfig {
    pub kind: TransactionKind,
    pub suggested_categories: &'static [&'static str],
}

const INCOME_CATEGORIES: &[&str] = &["Salary", "Freelance", "Investment", "Gift", "Rental", "Other"];
const EXPENSE_CATEGORIES: &[&str] =
    &["Groceries", "Bills", "Transport", "Entertainment", "Health", "Other"];

impl ViewConfig {
    pub fn for_kind(kind: TransactionKind) -> Self {
        let suggested_categories = match kind {
            TransactionKind::Income => INCOME_CATEGORIES,
            TransactionKind::Expense => EXPENSE_CATEGORIES,
        };
        Self {
            kind,
            suggested_categories,
        }
    }

    /// Suggested vocabulary followed by the custom labels already used for
    /// this kind, each listed once in first-use order.
    pub fn categories<'a, I>(&self, txs: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut out: Vec<String> = self.suggested_categories.iter().map(|c| c.to_string()).collect();
        for tx in txs.into_iter().filter(|t| t.kind == self.kind) {
            if let Some(category) = tx.category.as_deref() {
                if !out.iter().any(|c| c == category) {
                    out.push(category.to_string());
                }
            }
        }
        out
    }
}

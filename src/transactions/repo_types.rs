use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::transactions::model::Transaction;

#[derive(Debug, FromRow)]
pub struct TransactionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub amount: f64,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date: OffsetDateTime,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = anyhow::Error;

    fn try_from(r: TransactionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            user_id: r.user_id,
            kind: r.kind.parse().map_err(anyhow::Error::msg)?,
            amount: r.amount,
            category: r.category,
            description: r.description,
            date: r.date,
        })
    }
}

use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::transactions::{
    model::{NewTransaction, Transaction, TransactionPatch},
    repo_types::TransactionRow,
};

/// Window over a user's listing. `None` fields mean unbounded.
#[derive(Debug, Clone, Copy, Default)]
pub struct Page {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Returns the user's transactions, newest date first.
    async fn list_by_user(&self, user_id: Uuid, page: Page) -> anyhow::Result<Vec<Transaction>>;
    async fn insert(&self, tx: NewTransaction) -> anyhow::Result<Transaction>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Transaction>>;
    async fn update(&self, id: Uuid, patch: TransactionPatch) -> anyhow::Result<Option<Transaction>>;
    /// Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgTransactionStore {
    db: PgPool,
}

impl PgTransactionStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TransactionStore for PgTransactionStore {
    async fn list_by_user(&self, user_id: Uuid, page: Page) -> anyhow::Result<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT id, user_id, kind, amount, category, description, date
            FROM transactions
            WHERE user_id = $1
            ORDER BY date DESC, created_at ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.db)
        .await
        .context("list transactions by user")?;

        rows.into_iter().map(Transaction::try_from).collect()
    }

    async fn insert(&self, tx: NewTransaction) -> anyhow::Result<Transaction> {
        let row = sqlx::query_as::<_, TransactionRow>(
            r#"
            INSERT INTO transactions (id, user_id, kind, amount, category, description, date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, kind, amount, category, description, date
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(tx.user_id)
        .bind(tx.kind.as_str())
        .bind(tx.amount)
        .bind(&tx.category)
        .bind(&tx.description)
        .bind(tx.date)
        .fetch_one(&self.db)
        .await
        .context("insert transaction")?;

        row.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Transaction>> {
        let row = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT id, user_id, kind, amount, category, description, date
            FROM transactions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find transaction by id")?;

        row.map(Transaction::try_from).transpose()
    }

    async fn update(&self, id: Uuid, patch: TransactionPatch) -> anyhow::Result<Option<Transaction>> {
        let row = sqlx::query_as::<_, TransactionRow>(
            r#"
            UPDATE transactions
               SET kind        = COALESCE($2, kind),
                   amount      = COALESCE($3, amount),
                   category    = COALESCE($4, category),
                   description = COALESCE($5, description),
                   date        = COALESCE($6, date)
             WHERE id = $1
            RETURNING id, user_id, kind, amount, category, description, date
            "#,
        )
        .bind(id)
        .bind(patch.kind.map(|k| k.as_str()))
        .bind(patch.amount)
        .bind(patch.category)
        .bind(patch.description)
        .bind(patch.date)
        .fetch_optional(&self.db)
        .await
        .context("update transaction")?;

        row.map(Transaction::try_from).transpose()
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM transactions WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete transaction")?;
        Ok(res.rows_affected() > 0)
    }
}

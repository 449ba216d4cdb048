//! In-memory stores backing `AppState::fake()`.

use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    auth::{
        repo::UserStore,
        repo_types::{NewUser, User},
    },
    transactions::{
        model::{NewTransaction, Transaction, TransactionPatch},
        repo::{Page, TransactionStore},
    },
};

/// Mirrors the `COALESCE` update in the Postgres store.
fn apply_patch(tx: &mut Transaction, patch: TransactionPatch) {
    if let Some(kind) = patch.kind {
        tx.kind = kind;
    }
    if let Some(amount) = patch.amount {
        tx.amount = amount;
    }
    if let Some(category) = patch.category {
        tx.category = Some(category);
    }
    if let Some(description) = patch.description {
        tx.description = Some(description);
    }
    if let Some(date) = patch.date {
        tx.date = date;
    }
}

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, user: NewUser) -> anyhow::Result<Option<User>> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Ok(None);
        }
        let created = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: OffsetDateTime::now_utc(),
        };
        users.insert(created.id, created.clone());
        Ok(Some(created))
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }
}

/// Rows are kept in insertion order so that equal dates list oldest
/// insert first, as the Postgres query does.
#[derive(Default)]
pub struct MemoryTransactionStore {
    rows: RwLock<Vec<Transaction>>,
}

#[async_trait]
impl TransactionStore for MemoryTransactionStore {
    async fn list_by_user(&self, user_id: Uuid, page: Page) -> anyhow::Result<Vec<Transaction>> {
        let mut items: Vec<Transaction> = self
            .rows
            .read()
            .await
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.date.cmp(&a.date));

        let offset = page.offset.unwrap_or(0).max(0) as usize;
        let limit = page.limit.map(|l| l.max(0) as usize).unwrap_or(usize::MAX);
        Ok(items.into_iter().skip(offset).take(limit).collect())
    }

    async fn insert(&self, tx: NewTransaction) -> anyhow::Result<Transaction> {
        let created = Transaction {
            id: Uuid::new_v4(),
            user_id: tx.user_id,
            kind: tx.kind,
            amount: tx.amount,
            category: tx.category,
            description: tx.description,
            date: tx.date,
        };
        self.rows.write().await.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Transaction>> {
        Ok(self.rows.read().await.iter().find(|t| t.id == id).cloned())
    }

    async fn update(&self, id: Uuid, patch: TransactionPatch) -> anyhow::Result<Option<Transaction>> {
        let mut rows = self.rows.write().await;
        let Some(tx) = rows.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        apply_patch(tx, patch);
        Ok(Some(tx.clone()))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|t| t.id != id);
        Ok(rows.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;
    use crate::transactions::model::TransactionKind;

    #[test]
    fn patch_only_touches_supplied_fields() {
        let mut tx = Transaction {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            kind: TransactionKind::Expense,
            amount: 12.5,
            category: Some("Bills".into()),
            description: None,
            date: datetime!(2024-03-01 10:00 UTC),
        };
        let before = tx.clone();
        apply_patch(
            &mut tx,
            TransactionPatch {
                amount: Some(99.0),
                description: Some("rent".into()),
                ..Default::default()
            },
        );

        assert_eq!(tx.amount, 99.0);
        assert_eq!(tx.description.as_deref(), Some("rent"));
        assert_eq!(tx.kind, before.kind);
        assert_eq!(tx.category, before.category);
        assert_eq!(tx.date, before.date);
    }

    #[tokio::test]
    async fn email_is_unique() {
        let store = MemoryUserStore::default();
        let new = || NewUser {
            username: "a".into(),
            email: "a@example.com".into(),
            password_hash: "x".into(),
        };
        assert!(store.create(new()).await.unwrap().is_some());
        assert!(store.create(new()).await.unwrap().is_none());
    }
}

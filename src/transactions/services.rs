use time::{OffsetDateTime, UtcOffset};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    state::AppState,
    transactions::{
        aggregate::{category_totals, date_totals, grand_totals},
        dto::{
            non_empty, non_empty_value, parse_amount, parse_date, parse_kind, CategoriesResponse,
            CreateTransactionRequest, GroupResponse, ListParams, Listing, SummaryResponse,
            UpdateTransactionRequest, ViewParams, ViewResponse,
        },
        model::{NewTransaction, Transaction, TransactionKind, TransactionPatch},
        query::{filter_by_kind, group_by_category, sort_transactions},
        repo::Page,
        view::ViewConfig,
    },
};

pub async fn list(state: &AppState, user_id: Uuid, params: ListParams) -> AppResult<Vec<Transaction>> {
    if params.limit.is_some_and(|l| l <= 0) || params.offset.is_some_and(|o| o < 0) {
        return Err(AppError::Validation(
            "limit must be positive and offset non-negative".into(),
        ));
    }
    let page = Page {
        limit: params.limit,
        offset: params.offset,
    };
    state
        .transactions
        .list_by_user(user_id, page)
        .await
        .map_err(AppError::Storage)
}

async fn list_all(state: &AppState, user_id: Uuid) -> AppResult<Vec<Transaction>> {
    list(state, user_id, ListParams::default()).await
}

pub async fn create(
    state: &AppState,
    user_id: Uuid,
    req: CreateTransactionRequest,
) -> AppResult<Transaction> {
    let kind = parse_kind(
        req.kind
            .as_deref()
            .ok_or_else(|| AppError::Validation("type is required".into()))?,
    )?;
    let amount = parse_amount(
        req.amount
            .as_ref()
            .ok_or_else(|| AppError::Validation("amount is required".into()))?,
    )?;
    let date = match non_empty(req.date) {
        Some(raw) => parse_date(&raw)?,
        None => OffsetDateTime::now_utc(),
    };

    let tx = state
        .transactions
        .insert(NewTransaction {
            user_id,
            kind,
            amount,
            category: non_empty(req.category),
            description: non_empty(req.description),
            date,
        })
        .await
        .map_err(AppError::Storage)?;

    info!(user_id = %user_id, transaction_id = %tx.id, kind = %tx.kind, "transaction created");
    Ok(tx)
}

/// Loads a transaction and checks that `user_id` owns it.
async fn owned(state: &AppState, user_id: Uuid, id: Uuid) -> AppResult<Transaction> {
    let tx = state
        .transactions
        .find_by_id(id)
        .await
        .map_err(AppError::Storage)?
        .ok_or(AppError::NotFound("Transaction not found"))?;

    if tx.user_id != user_id {
        warn!(user_id = %user_id, transaction_id = %id, "ownership mismatch");
        return Err(AppError::Forbidden);
    }
    Ok(tx)
}

fn build_patch(req: UpdateTransactionRequest) -> AppResult<TransactionPatch> {
    Ok(TransactionPatch {
        kind: non_empty(req.kind).as_deref().map(parse_kind).transpose()?,
        amount: non_empty_value(req.amount).as_ref().map(parse_amount).transpose()?,
        category: non_empty(req.category),
        description: non_empty(req.description),
        date: non_empty(req.date).as_deref().map(parse_date).transpose()?,
    })
}

pub async fn update(
    state: &AppState,
    user_id: Uuid,
    id: Uuid,
    req: UpdateTransactionRequest,
) -> AppResult<Transaction> {
    let current = owned(state, user_id, id).await?;
    let patch = build_patch(req)?;
    if patch.is_empty() {
        return Ok(current);
    }

    let tx = state
        .transactions
        .update(id, patch)
        .await
        .map_err(AppError::Storage)?
        .ok_or(AppError::NotFound("Transaction not found"))?;

    info!(user_id = %user_id, transaction_id = %id, "transaction updated");
    Ok(tx)
}

pub async fn delete(state: &AppState, user_id: Uuid, id: Uuid) -> AppResult<()> {
    owned(state, user_id, id).await?;
    let removed = state
        .transactions
        .delete(id)
        .await
        .map_err(AppError::Storage)?;
    if !removed {
        return Err(AppError::NotFound("Transaction not found"));
    }
    info!(user_id = %user_id, transaction_id = %id, "transaction removed");
    Ok(())
}

fn report_offset(state: &AppState, minutes: Option<i32>) -> AppResult<UtcOffset> {
    let minutes = minutes.unwrap_or(state.config.report_utc_offset_minutes);
    UtcOffset::from_whole_seconds(minutes.saturating_mul(60))
        .map_err(|_| AppError::Validation(format!("utc offset {minutes} minutes is out of range")))
}

pub async fn view(
    state: &AppState,
    user_id: Uuid,
    kind: TransactionKind,
    params: ViewParams,
) -> AppResult<ViewResponse> {
    let offset = report_offset(state, params.utc_offset_minutes)?;
    let all = list_all(state, user_id).await?;
    let config = ViewConfig::for_kind(kind);

    let mut selected = filter_by_kind(&all, kind);
    let chart = date_totals(selected.iter().copied(), offset);
    sort_transactions(&mut selected, params.sort);

    let listing = if params.grouped {
        Listing::Grouped {
            groups: group_by_category(&selected)
                .into_iter()
                .map(|g| GroupResponse {
                    category: g.category,
                    count: g.count,
                    transactions: g.transactions.into_iter().cloned().collect(),
                })
                .collect(),
        }
    } else {
        Listing::Flat {
            transactions: selected.into_iter().cloned().collect(),
        }
    };

    Ok(ViewResponse {
        kind,
        sort: params.sort,
        categories: config.categories(&all),
        chart,
        listing,
    })
}

pub async fn summary(state: &AppState, user_id: Uuid) -> AppResult<SummaryResponse> {
    let all = list_all(state, user_id).await?;
    Ok(SummaryResponse {
        totals: grand_totals(&all),
        transaction_count: all.len(),
        expenses_by_category: category_totals(&all),
    })
}

pub async fn categories(
    state: &AppState,
    user_id: Uuid,
    kind: TransactionKind,
) -> AppResult<CategoriesResponse> {
    let all = list_all(state, user_id).await?;
    Ok(CategoriesResponse {
        kind,
        categories: ViewConfig::for_kind(kind).categories(&all),
    })
}

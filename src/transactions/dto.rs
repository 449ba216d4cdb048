use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
};

use crate::{
    error::AppError,
    transactions::{
        aggregate::{CategoryTotal, DateTotal, GrandTotals},
        model::{Transaction, TransactionKind},
        query::SortOrder,
    },
};

/// Body of `POST /transactions`. Fields are kept loose so that bad values
/// surface as validation errors rather than extractor rejections.
#[derive(Debug, Default, Deserialize)]
pub struct CreateTransactionRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub amount: Option<Value>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
}

/// Body of `PUT /transactions/:id`; every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTransactionRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub amount: Option<Value>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewParams {
    #[serde(default)]
    pub sort: SortOrder,
    #[serde(default)]
    pub grouped: bool,
    pub utc_offset_minutes: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct GroupResponse {
    pub category: String,
    pub count: usize,
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "layout", rename_all = "lowercase")]
pub enum Listing {
    Flat { transactions: Vec<Transaction> },
    Grouped { groups: Vec<GroupResponse> },
}

#[derive(Debug, Serialize)]
pub struct ViewResponse {
    pub kind: TransactionKind,
    pub sort: SortOrder,
    pub categories: Vec<String>,
    pub chart: Vec<DateTotal>,
    pub listing: Listing,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    #[serde(flatten)]
    pub totals: GrandTotals,
    pub transaction_count: usize,
    pub expenses_by_category: Vec<CategoryTotal>,
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub kind: TransactionKind,
    pub categories: Vec<String>,
}

pub(crate) fn parse_kind(raw: &str) -> Result<TransactionKind, AppError> {
    raw.trim().parse().map_err(AppError::Validation)
}

/// Accepts a JSON number or a numeric string; the result must be finite
/// and positive.
pub(crate) fn parse_amount(raw: &Value) -> Result<f64, AppError> {
    let amount = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| AppError::Validation("amount must be a number".into()))?;

    if !amount.is_finite() || amount <= 0.0 {
        return Err(AppError::Validation("amount must be greater than zero".into()));
    }
    Ok(amount)
}

/// RFC 3339 timestamps, or `YYYY-MM-DD` taken as midnight UTC.
pub(crate) fn parse_date(raw: &str) -> Result<OffsetDateTime, AppError> {
    let raw = raw.trim();
    if let Ok(ts) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Ok(ts);
    }
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .map(|d| d.midnight().assume_utc())
        .map_err(|_| AppError::Validation(format!("invalid date '{raw}'")))
}

/// Empty or whitespace-only strings count as absent.
pub(crate) fn non_empty(raw: Option<String>) -> Option<String> {
    raw.filter(|s| !s.trim().is_empty())
}

/// Like [`non_empty`] for loosely typed fields: a blank JSON string is absent.
pub(crate) fn non_empty_value(raw: Option<Value>) -> Option<Value> {
    raw.filter(|v| !matches!(v, Value::String(s) if s.trim().is_empty()))
}

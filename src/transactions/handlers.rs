use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    error::{AppError, AppResult},
    state::AppState,
    transactions::{
        dto::{
            parse_kind, CategoriesResponse, CreateTransactionRequest, ListParams, MessageResponse,
            SummaryResponse, UpdateTransactionRequest, ViewParams, ViewResponse,
        },
        model::Transaction,
        services,
    },
};

pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/transactions/summary", get(summary))
        .route("/transactions/view/:kind", get(view))
        .route("/transactions/categories/:kind", get(categories))
}

pub fn crud_routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions).post(create_transaction))
        .route(
            "/transactions/:id",
            put(update_transaction).delete(delete_transaction),
        )
}

/// Malformed ids cannot name a stored transaction.
fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound("Transaction not found"))
}

#[instrument(skip(state, params))]
pub async fn list_transactions(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    params: Result<Query<ListParams>, QueryRejection>,
) -> AppResult<Json<Vec<Transaction>>> {
    let Query(p) = params?;
    let items = services::list(&state, user_id, p).await?;
    Ok(Json(items))
}

#[instrument(skip(state, payload))]
pub async fn create_transaction(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<CreateTransactionRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Transaction>)> {
    let Json(payload) = payload?;
    let tx = services::create(&state, user_id, payload).await?;
    Ok((StatusCode::CREATED, Json(tx)))
}

#[instrument(skip(state, payload))]
pub async fn update_transaction(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTransactionRequest>, JsonRejection>,
) -> AppResult<Json<Transaction>> {
    let id = parse_id(&id)?;
    let Json(payload) = payload?;
    let tx = services::update(&state, user_id, id, payload).await?;
    Ok(Json(tx))
}

#[instrument(skip(state))]
pub async fn delete_transaction(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_id(&id)?;
    services::delete(&state, user_id, id).await?;
    Ok(Json(MessageResponse {
        message: "Transaction removed".into(),
    }))
}

#[instrument(skip(state, params))]
pub async fn view(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(kind): Path<String>,
    params: Result<Query<ViewParams>, QueryRejection>,
) -> AppResult<Json<ViewResponse>> {
    let Query(p) = params?;
    let kind = parse_kind(&kind)?;
    let v = services::view(&state, user_id, kind, p).await?;
    Ok(Json(v))
}

#[instrument(skip(state))]
pub async fn summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<SummaryResponse>> {
    Ok(Json(services::summary(&state, user_id).await?))
}

#[instrument(skip(state))]
pub async fn categories(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(kind): Path<String>,
) -> AppResult<Json<CategoriesResponse>> {
    let kind = parse_kind(&kind)?;
    Ok(Json(services::categories(&state, user_id, kind).await?))
}

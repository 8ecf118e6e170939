//! API Routes
//!
//! HTTP endpoint definitions.

use std::str::FromStr;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query, State,
    },
    http::{header::HeaderName, HeaderValue},
    routing::{get, post},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::Instrument;

use crate::domain::{Account, ConvertedBalances, OperationContext, DEFAULT_PAGE_SIZE};
use crate::error::AppError;
use crate::service::{ListAccountsQuery, TransferCommand};

use super::AppState;

pub const PAGINATION_HEADER: &str = "x-pagination";

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateAccountRequest {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AmountRequest {
    pub amount: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TransferRequest {
    pub amount: String,
    pub sender_id: String,
    pub receiver_id: String,
}

#[derive(Debug, Deserialize)]
pub struct AccountsQuery {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub is_descending: bool,
    #[serde(default = "default_page_number")]
    pub page_number: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page_number() -> i64 {
    1
}

fn default_page_size() -> i64 {
    i64::from(DEFAULT_PAGE_SIZE)
}

impl From<AccountsQuery> for ListAccountsQuery {
    fn from(query: AccountsQuery) -> Self {
        ListAccountsQuery {
            name: query.name,
            sort_by: query.sort_by,
            is_descending: query.is_descending,
            page_number: query.page_number,
            page_size: query.page_size,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ConvertQuery {
    #[serde(default)]
    pub currencies: String,
}

#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    pub converted_currencies: ConvertedBalances,
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(get_accounts).post(create_account))
        .route("/accounts/transfers", post(transfer))
        .route("/accounts/:id", get(get_account))
        .route("/accounts/:id/deposits", post(deposit))
        .route("/accounts/:id/withdraws", post(withdraw))
        .route("/accounts/:id/convert", get(convert))
}

/// Parse a decimal amount sent as a string
fn parse_amount(raw: &str) -> Result<Decimal, AppError> {
    Decimal::from_str(raw.trim())
        .map_err(|_| AppError::InvalidRequest(format!("Invalid amount format: {}", raw)))
}

// =========================================================================
// GET /accounts
// =========================================================================

/// Search accounts; pagination metadata goes in the X-Pagination header
async fn get_accounts(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    query: Result<Query<AccountsQuery>, QueryRejection>,
) -> Result<([(HeaderName, HeaderValue); 1], Json<Vec<Account>>), AppError> {
    let Query(query) = query?;
    let listing = state
        .ledger
        .get_accounts(query.into())
        .instrument(context.span("get_accounts"))
        .await?;

    let metadata = serde_json::to_string(&listing.pagination)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let metadata = HeaderValue::from_str(&metadata).map_err(|e| AppError::Internal(e.to_string()))?;

    Ok((
        [(HeaderName::from_static(PAGINATION_HEADER), metadata)],
        Json(listing.accounts),
    ))
}

// =========================================================================
// POST /accounts
// =========================================================================

async fn create_account(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    request: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> Result<Json<Account>, AppError> {
    let Json(request) = request?;
    let account = state
        .ledger
        .create_account(&request.name)
        .instrument(context.span("create_account"))
        .await?;

    Ok(Json(account))
}

// =========================================================================
// GET /accounts/:id
// =========================================================================

async fn get_account(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Path(id): Path<String>,
) -> Result<Json<Account>, AppError> {
    let account = state
        .ledger
        .get_account(&id)
        .instrument(context.span("get_account"))
        .await?;

    Ok(Json(account))
}

// =========================================================================
// POST /accounts/:id/deposits
// =========================================================================

async fn deposit(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Path(id): Path<String>,
    request: Result<Json<AmountRequest>, JsonRejection>,
) -> Result<Json<Account>, AppError> {
    let Json(request) = request?;
    let amount = parse_amount(&request.amount)?;

    let account = state
        .ledger
        .deposit(&id, amount)
        .instrument(context.span("deposit"))
        .await?;

    Ok(Json(account))
}

// =========================================================================
// POST /accounts/:id/withdraws
// =========================================================================

async fn withdraw(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Path(id): Path<String>,
    request: Result<Json<AmountRequest>, JsonRejection>,
) -> Result<Json<Account>, AppError> {
    let Json(request) = request?;
    let amount = parse_amount(&request.amount)?;

    let account = state
        .ledger
        .withdraw(&id, amount)
        .instrument(context.span("withdraw"))
        .await?;

    Ok(Json(account))
}

// =========================================================================
// POST /accounts/transfers
// =========================================================================

/// Transfer between two accounts, returning the sender's updated account
async fn transfer(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    request: Result<Json<TransferRequest>, JsonRejection>,
) -> Result<Json<Account>, AppError> {
    let Json(request) = request?;
    let amount = parse_amount(&request.amount)?;
    let command = TransferCommand::new(amount, request.sender_id, request.receiver_id);

    let sender = state
        .ledger
        .transfer(command)
        .instrument(context.span("transfer"))
        .await?;

    Ok(Json(sender))
}

// =========================================================================
// GET /accounts/:id/convert
// =========================================================================

async fn convert(
    State(state): State<AppState>,
    Extension(context): Extension<OperationContext>,
    Path(id): Path<String>,
    query: Result<Query<ConvertQuery>, QueryRejection>,
) -> Result<Json<ConvertResponse>, AppError> {
    let Query(query) = query?;
    let converted = state
        .ledger
        .convert(&id, &query.currencies)
        .instrument(context.span("convert"))
        .await?;

    Ok(Json(ConvertResponse {
        converted_currencies: converted,
    }))
}

//! REST API over a shared ledger
//!
//! Exposes chain inspection, transaction submission and forced mining to the
//! surrounding application. Ledger calls that may mine are CPU-bound and run
//! on the blocking thread pool.

use axum::{
    extract::{Path, Request, State},
    http::{self, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::blockchain::{Block, ChainValidity, InvalidReason, Ledger};
use crate::config::ApiConfig;
use crate::error::ChainError;
use crate::transaction::{Transaction, TransactionType};

const API_NAME: &str = "Bitea API";

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub ledger: Ledger,
    started: Instant,
}

impl AppState {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger,
            started: Instant::now(),
        }
    }
}

// ============================================================================
// API Error Handling
// ============================================================================

#[derive(Debug)]
pub enum ApiError {
    BlockchainError(ChainError),
    InvalidInput(String),
    NotFound(String),
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BlockchainError(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<ChainError> for ApiError {
    fn from(err: ChainError) -> Self {
        ApiError::BlockchainError(err)
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::InternalError(format!("Ledger task failed: {}", err))
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Transaction descriptor supplied by the request layer
#[derive(Debug, Deserialize)]
pub struct SubmitTransactionRequest {
    pub sender: String,
    /// Type name such as `POST` or `topic_like`, matched case-insensitively
    #[serde(rename = "type")]
    pub tx_type: String,
    #[serde(default)]
    pub payload: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitTransactionResponse {
    pub id: String,
    pub mined_blocks: Vec<u64>,
    pub blocks: usize,
    pub pending: usize,
}

#[derive(Debug, Serialize)]
pub struct MineResponse {
    pub message: String,
    pub mined: Option<u64>,
    pub blocks: usize,
    pub pending: usize,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invalid_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<InvalidReason>,
}

impl From<ChainValidity> for ValidateResponse {
    fn from(validity: ChainValidity) -> Self {
        match validity {
            ChainValidity::Valid => ValidateResponse {
                valid: true,
                invalid_index: None,
                reason: None,
            },
            ChainValidity::Invalid { index, reason } => ValidateResponse {
                valid: false,
                invalid_index: Some(index),
                reason: Some(reason),
            },
        }
    }
}

/// Block without its transaction bodies, for chain listings
#[derive(Debug, Serialize)]
pub struct BlockSummary {
    pub index: u64,
    pub hash: String,
    pub previous_hash: String,
    pub timestamp: i64,
    pub nonce: u64,
    pub difficulty: u32,
    pub transactions: usize,
}

impl From<&Block> for BlockSummary {
    fn from(block: &Block) -> Self {
        BlockSummary {
            index: block.index,
            hash: block.hash.clone(),
            previous_hash: block.previous_hash.clone(),
            timestamp: block.timestamp,
            nonce: block.nonce,
            difficulty: block.difficulty,
            transactions: block.transactions.len(),
        }
    }
}

// ============================================================================
// Middleware
// ============================================================================

async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    tracing::info!(
        method = %method,
        path = %path,
        status = %response.status().as_u16(),
        duration_ms = %start.elapsed().as_millis(),
        "api.request"
    );

    response
}

// ============================================================================
// API Server
// ============================================================================

/// Build the API router with all endpoints
pub fn build_api_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(vec![
            http::Method::GET,
            http::Method::POST,
            http::Method::OPTIONS,
        ])
        .allow_headers(vec![http::header::CONTENT_TYPE]);

    let api_routes = Router::new()
        .route("/", get(api_info))
        .route("/health", get(health_check))
        // Blockchain endpoints
        .route("/blockchain", get(get_chain))
        .route("/blockchain/info", get(get_chain_info))
        .route("/blockchain/block/:index", get(get_block))
        .route("/blockchain/validate", get(validate_chain))
        // Transaction endpoints
        .route("/transaction", post(submit_transaction))
        .route("/mempool", get(get_mempool))
        // Mining
        .route("/mine", get(mine).post(mine))
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state);

    Router::new().nest("/api", api_routes).layer(cors)
}

/// Serve the API until the process is stopped
pub async fn run_api_server(ledger: Ledger, config: &ApiConfig) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_api_router(AppState::new(ledger));

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "API server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

// ============================================================================
// Route Handlers
// ============================================================================

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "uptime_seconds": state.started.elapsed().as_secs(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn api_info(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let ledger = state.ledger.clone();
    let info = tokio::task::spawn_blocking(move || ledger.info()).await?;
    Ok(Json(serde_json::json!({
        "name": API_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "blockchain": {
            "blocks": info.blocks,
            "pending": info.pending,
            "valid": info.valid
        }
    })))
}

async fn get_chain(State(state): State<AppState>) -> impl IntoResponse {
    let chain = state.ledger.chain();
    let blocks: Vec<BlockSummary> = chain.iter().map(|b| BlockSummary::from(&**b)).collect();
    Json(serde_json::json!({
        "total": blocks.len(),
        "blocks": blocks
    }))
}

async fn get_chain_info(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let ledger = state.ledger.clone();
    let info = tokio::task::spawn_blocking(move || ledger.info()).await?;
    Ok(Json(info))
}

async fn get_block(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<Block>, ApiError> {
    state
        .ledger
        .block(index)
        .map(|b| Json(Block::clone(&b)))
        .ok_or_else(|| ApiError::NotFound(format!("Block {} not found", index)))
}

async fn validate_chain(State(state): State<AppState>) -> Result<Json<ValidateResponse>, ApiError> {
    let ledger = state.ledger.clone();
    let validity = tokio::task::spawn_blocking(move || ledger.validate()).await?;
    Ok(Json(validity.into()))
}

async fn get_mempool(State(state): State<AppState>) -> impl IntoResponse {
    let transactions = state.ledger.pending_transactions();
    Json(serde_json::json!({
        "count": transactions.len(),
        "transactions": transactions
    }))
}

async fn submit_transaction(
    State(state): State<AppState>,
    Json(req): Json<SubmitTransactionRequest>,
) -> Result<Json<SubmitTransactionResponse>, ApiError> {
    if req.sender.trim().is_empty() {
        return Err(ApiError::InvalidInput("sender cannot be empty".to_string()));
    }
    // Hashed verbatim; never normalised.
    if req.sender.trim() != req.sender {
        return Err(ApiError::InvalidInput(
            "sender must not have leading or trailing whitespace".to_string(),
        ));
    }
    let tx_type: TransactionType = req.tx_type.parse()?;

    let tx = Transaction::new(req.sender, tx_type, req.payload);
    let id = tx.id().to_string();

    let ledger = state.ledger.clone();
    let (sealed, blocks, pending) = tokio::task::spawn_blocking(move || {
        let sealed = ledger.submit_transaction(tx);
        (sealed, ledger.chain_length(), ledger.pending_count())
    })
    .await?;

    Ok(Json(SubmitTransactionResponse {
        id,
        mined_blocks: sealed.iter().map(|b| b.index).collect(),
        blocks,
        pending,
    }))
}

async fn mine(State(state): State<AppState>) -> Result<Json<MineResponse>, ApiError> {
    let ledger = state.ledger.clone();
    let (mined, blocks, pending) = tokio::task::spawn_blocking(move || {
        let mined = ledger.mine_batch();
        (mined, ledger.chain_length(), ledger.pending_count())
    })
    .await?;

    let message = match &mined {
        Some(_) => "Block mined successfully",
        None => "No pending transactions to mine",
    };

    Ok(Json(MineResponse {
        message: message.to_string(),
        mined: mined.map(|b| b.index),
        blocks,
        pending,
    }))
}

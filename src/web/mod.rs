//! Web UI for Closing Desk
//!
//! A small server-rendered interface over the transaction store:
//!
//! - `GET /` lists every transaction and its tasks
//! - `POST /create` creates a transaction
//! - `POST /{transaction_id}/add-task` appends a task
//! - `POST /{transaction_id}/{task_index}/complete` completes a task
//!
//! Mutating routes redirect back to `/`. The same operations are available
//! as JSON under `/api`:
//!
//! - `GET /api/transactions` lists every transaction
//! - `POST /api/transactions` creates one (201)
//! - `GET /api/transactions/{transaction_id}` fetches one
//! - `POST /api/transactions/{transaction_id}/tasks` appends a task (201)

pub mod handlers;
pub mod templates;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;

use crate::error::{ClosingError, ClosingResult};
use crate::storage::TransactionStore;

/// Build the application router for a store
pub fn router(store: TransactionStore) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/create", post(handlers::create))
        .route("/{transaction_id}/add-task", post(handlers::add_task))
        .route(
            "/{transaction_id}/{task_index}/complete",
            post(handlers::complete_task),
        )
        .route(
            "/api/transactions",
            get(handlers::api_list).post(handlers::api_create),
        )
        .route("/api/transactions/{transaction_id}", get(handlers::api_get))
        .route(
            "/api/transactions/{transaction_id}/tasks",
            post(handlers::api_add_task),
        )
        .with_state(Arc::new(store))
}

/// Bind to `addr` and serve until the process is stopped
pub async fn serve(store: TransactionStore, addr: &str) -> ClosingResult<()> {
    let data_file = store.paths().data_file().display().to_string();
    let app = router(store);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ClosingError::Io(format!("Failed to bind {}: {}", addr, e)))?;

    log::info!(
        "Serving {} on http://{}",
        data_file,
        listener.local_addr()?
    );

    axum::serve(listener, app).await?;
    Ok(())
}

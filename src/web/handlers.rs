//! Route handlers
//!
//! Each handler translates a request into one store call. The store is
//! blocking, so calls run on tokio's blocking pool. HTML routes redirect back
//! to the index; `/api` routes answer with JSON.

use std::sync::Arc;

use axum::{
    extract::{Form, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde::Deserialize;

use crate::error::{ClosingError, ClosingResult};
use crate::models::{Task, Transaction, TransactionId};
use crate::storage::TransactionStore;

use super::templates::render_index;

/// Shared handler state
pub type AppState = Arc<TransactionStore>;

#[derive(Debug, Deserialize)]
pub struct CreateForm {
    pub address: String,
    pub closing_date: String,
}

#[derive(Debug, Deserialize)]
pub struct AddTaskForm {
    pub description: String,
    pub due_date: String,
}

/// JSON body for `POST /api/transactions`
#[derive(Debug, Deserialize)]
pub struct NewTransaction {
    pub property_address: String,
    pub closing_date: String,
}

/// JSON body for `POST /api/transactions/{id}/tasks`
#[derive(Debug, Deserialize)]
pub struct NewTask {
    pub description: String,
    pub due_date: String,
}

/// Store errors mapped onto HTTP responses
#[derive(Debug)]
pub struct WebError(ClosingError);

impl From<ClosingError> for WebError {
    fn from(err: ClosingError) -> Self {
        Self(err)
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ClosingError::TransactionNotFound(_) => StatusCode::NOT_FOUND,
            ClosingError::TaskIndexOutOfRange { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            log::error!("Request failed: {}", self.0);
        } else {
            log::warn!("Request rejected: {}", self.0);
        }

        (status, self.0.to_string()).into_response()
    }
}

async fn with_store<T, F>(store: AppState, op: F) -> Result<T, WebError>
where
    F: FnOnce(&TransactionStore) -> ClosingResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || op(&store))
        .await
        .map_err(|e| ClosingError::Storage(format!("Store task failed: {}", e)))?
        .map_err(WebError::from)
}

pub async fn index(State(store): State<AppState>) -> Result<Html<String>, WebError> {
    let data = with_store(store, |s| s.list_transactions()).await?;
    Ok(Html(render_index(data.values())))
}

pub async fn create(
    State(store): State<AppState>,
    Form(form): Form<CreateForm>,
) -> Result<Redirect, WebError> {
    with_store(store, move |s| s.create_transaction(&form.address, &form.closing_date)).await?;
    Ok(Redirect::to("/"))
}

pub async fn add_task(
    State(store): State<AppState>,
    Path(transaction_id): Path<String>,
    Form(form): Form<AddTaskForm>,
) -> Result<Redirect, WebError> {
    let id = TransactionId::from(transaction_id);
    with_store(store, move |s| s.add_task(&id, &form.description, &form.due_date)).await?;
    Ok(Redirect::to("/"))
}

pub async fn complete_task(
    State(store): State<AppState>,
    Path((transaction_id, task_index)): Path<(String, i64)>,
) -> Result<Redirect, WebError> {
    let id = TransactionId::from(transaction_id);
    with_store(store, move |s| s.complete_task(&id, task_index)).await?;
    Ok(Redirect::to("/"))
}

pub async fn api_list(
    State(store): State<AppState>,
) -> Result<Json<Vec<Transaction>>, WebError> {
    let data = with_store(store, |s| s.list_transactions()).await?;
    Ok(Json(data.into_values().collect()))
}

pub async fn api_get(
    State(store): State<AppState>,
    Path(transaction_id): Path<String>,
) -> Result<Json<Transaction>, WebError> {
    let id = TransactionId::from(transaction_id);
    let txn = with_store(store, move |s| s.get_transaction(&id)).await?;
    Ok(Json(txn))
}

pub async fn api_create(
    State(store): State<AppState>,
    Json(body): Json<NewTransaction>,
) -> Result<(StatusCode, Json<Transaction>), WebError> {
    let txn = with_store(store, move |s| {
        s.create_transaction(&body.property_address, &body.closing_date)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(txn)))
}

pub async fn api_add_task(
    State(store): State<AppState>,
    Path(transaction_id): Path<String>,
    Json(body): Json<NewTask>,
) -> Result<(StatusCode, Json<Task>), WebError> {
    let id = TransactionId::from(transaction_id);
    let task = with_store(store, move |s| {
        s.add_task(&id, &body.description, &body.due_date)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(task)))
}

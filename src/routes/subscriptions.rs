use std::fmt::Debug;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::subscriber_store::{StoreError, SubscriberStore};

#[derive(Debug, Deserialize)]
pub struct SubscriptionRequest {
    email: String,
}

#[derive(Serialize)]
pub struct SubscriptionResponse {
    message: String,
}

#[tracing::instrument(
    name = "Adding a new subscriber",
    skip(store, request),
    fields(subscriber_email = %request.email),
)]
pub async fn subscribe(
    State(store): State<Arc<SubscriberStore>>,
    Json(request): Json<SubscriptionRequest>,
) -> Result<Json<SubscriptionResponse>, SubscribeError> {
    let email = store.add(request.email).await?;

    Ok(Json(SubscriptionResponse {
        message: format!("Successfully subscribed {}!", email),
    }))
}

#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("{0}")]
    ValidationError(String),
    #[error("{0} is already subscribed")]
    DuplicateError(String),
    #[error("Failed to persist the new subscriber")]
    UnexpectedError(#[source] std::io::Error),
}

impl From<StoreError> for SubscribeError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Validation(reason) => SubscribeError::ValidationError(reason),
            StoreError::Duplicate(email) => SubscribeError::DuplicateError(email),
            StoreError::Persistence(error) => SubscribeError::UnexpectedError(error),
        }
    }
}

impl Debug for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl IntoResponse for SubscribeError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            SubscribeError::ValidationError(_) => StatusCode::BAD_REQUEST,
            SubscribeError::DuplicateError(_) => StatusCode::CONFLICT,
            SubscribeError::UnexpectedError(_) => {
                tracing::error!("{:?}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (
            status,
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}

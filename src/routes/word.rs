use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::word_client::{WordClient, WordOfTheDay};

#[tracing::instrument(name = "Serving the word of the day", skip(word_client))]
pub async fn get_word_of_the_day(
    State(word_client): State<WordClient>,
) -> Result<Json<WordOfTheDay>, WordProviderError> {
    let word = word_client.word_of_the_day().await?;

    Ok(Json(word))
}

#[derive(thiserror::Error, Debug)]
#[error("Failed to fetch the word of the day")]
pub struct WordProviderError(#[from] reqwest::Error);

impl IntoResponse for WordProviderError {
    fn into_response(self) -> axum::response::Response {
        tracing::error!(error.cause_chain = ?self.0, "The word provider is unavailable");

        (
            StatusCode::BAD_GATEWAY,
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

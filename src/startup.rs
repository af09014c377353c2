use std::sync::Arc;

use axum::extract::{FromRef, MatchedPath};
use axum::http::Request;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::configuration::Settings;
use crate::routes::{check_health, get_word_of_the_day, subscribe};
use crate::subscriber_store::SubscriberStore;
use crate::word_client::WordClient;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SubscriberStore>,
    pub word_client: WordClient,
}

impl FromRef<AppState> for Arc<SubscriberStore> {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl FromRef<AppState> for WordClient {
    fn from_ref(state: &AppState) -> Self {
        state.word_client.clone()
    }
}

pub async fn get_app_state(configuration: &Settings) -> AppState {
    let store = Arc::new(SubscriberStore::load(&configuration.subscriber_store.path).await);
    let word_client = WordClient::new(
        configuration.word_provider.access_url.clone(),
        configuration.word_provider.timeout(),
    );

    AppState { store, word_client }
}

pub async fn run(listener: TcpListener, state: AppState) {
    let app = router(state);

    axum::serve(listener, app)
        .await
        .expect("Failed to start up the application");
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health_check", get(check_health))
        .route("/subscriptions", post(subscribe))
        .route("/word-of-the-day", get(get_word_of_the_day))
        .with_state(state)
        .layer(
            // Refer to https://github.com/tokio-rs/axum/blob/main/examples/tracing-aka-logging/Cargo.toml
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                let path = request
                    .extensions()
                    .get::<MatchedPath>()
                    .map(MatchedPath::as_str);
                tracing::info_span!(
                    "Starting HTTP request",
                    method = ?request.method(),
                    path,
                    request_id = %Uuid::new_v4(),
                )
            }),
        )
}

use std::fmt::Debug;
use std::time::Duration;

use crate::domain::SubscriberEmail;
use crate::subscriber_store::SubscriberStore;

/// Delivery collaborator for one subscriber. Implemented by
/// [`EmailClient`](crate::email_client::EmailClient); the seam keeps
/// pacing and failure isolation testable without a live provider.
#[allow(async_fn_in_trait)]
pub trait Notifier {
    /// Check that the notifier is usable at all (credentials present,
    /// provider reachable) before any delivery is attempted.
    async fn verify(&self) -> Result<(), anyhow::Error>;

    async fn notify(&self, recipient: &SubscriberEmail) -> Result<(), anyhow::Error>;
}

/// Per-run outcome. Ephemeral: logged at the end of the run, never
/// persisted.
#[derive(Debug, Default)]
pub struct DispatchOutcome {
    pub attempted: Vec<SubscriberEmail>,
    pub succeeded: Vec<SubscriberEmail>,
    pub failed: Vec<SubscriberEmail>,
}

#[derive(thiserror::Error)]
pub enum DispatchError {
    #[error("The notifier configuration is unusable")]
    Configuration(#[source] anyhow::Error),
}

impl Debug for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Send the daily notification to every stored subscriber.
///
/// Subscribers are notified sequentially with a pacing sleep between
/// consecutive sends, as deliberate backpressure against the provider's
/// rate limits. A single subscriber's failure (including exceeding
/// `per_send_timeout`) is recorded and never aborts the run; there is
/// no retry within a run, the next scheduled run is the retry boundary.
#[tracing::instrument(name = "Running daily dispatch", skip(store, notifier, pacing, per_send_timeout))]
pub async fn run_daily_dispatch<N: Notifier>(
    store: &SubscriberStore,
    notifier: &N,
    pacing: Duration,
    per_send_timeout: Duration,
) -> Result<DispatchOutcome, DispatchError> {
    notifier
        .verify()
        .await
        .map_err(DispatchError::Configuration)?;

    let subscribers = store.snapshot().await;
    if subscribers.is_empty() {
        tracing::info!("No subscribers, nothing to send");
        return Ok(DispatchOutcome::default());
    }

    let mut outcome = DispatchOutcome::default();
    for (position, subscriber) in subscribers.iter().enumerate() {
        if position > 0 {
            tokio::time::sleep(pacing).await;
        }

        outcome.attempted.push(subscriber.clone());
        match tokio::time::timeout(per_send_timeout, notifier.notify(subscriber)).await {
            Ok(Ok(())) => outcome.succeeded.push(subscriber.clone()),
            Ok(Err(error)) => {
                tracing::warn!(
                    error.cause_chain = ?error,
                    subscriber = %subscriber,
                    "Failed to deliver the daily notification"
                );
                outcome.failed.push(subscriber.clone());
            }
            Err(_) => {
                tracing::warn!(
                    subscriber = %subscriber,
                    timeout_ms = per_send_timeout.as_millis() as u64,
                    "Delivery timed out"
                );
                outcome.failed.push(subscriber.clone());
            }
        }
    }

    let failed_recipients: Vec<&str> = outcome.failed.iter().map(AsRef::as_ref).collect();
    tracing::info!(
        attempted = outcome.attempted.len(),
        succeeded = outcome.succeeded.len(),
        failed = outcome.failed.len(),
        failed_recipients = ?failed_recipients,
        "Daily dispatch completed"
    );

    Ok(outcome)
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

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use crate::domain::SubscriberEmail;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),
    #[error("{0} is already subscribed")]
    Duplicate(String),
    #[error("Failed to persist the subscriber list")]
    Persistence(#[from] std::io::Error),
}

/// File-backed set of subscriber email addresses.
///
/// The persisted form is a JSON array of strings. Writes go through a
/// sibling temporary file followed by an atomic rename, so a crash
/// mid-write never leaves a truncated file behind for the next load.
///
/// Single-writer discipline: only the subscription intake path calls
/// [`add`](SubscriberStore::add) / [`remove`](SubscriberStore::remove);
/// a dispatch run only takes a [`snapshot`](SubscriberStore::snapshot).
pub struct SubscriberStore {
    path: PathBuf,
    subscribers: Mutex<BTreeSet<SubscriberEmail>>,
}

impl SubscriberStore {
    /// Load the store from `path`.
    ///
    /// Fails soft: a missing or unreadable file yields an empty store,
    /// and entries that no longer validate are skipped. Both cases are
    /// logged, never surfaced to the caller.
    pub async fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let subscribers = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => match serde_json::from_str::<Vec<String>>(&contents) {
                Ok(entries) => {
                    let subscribers: BTreeSet<_> = entries
                        .into_iter()
                        .filter_map(|entry| match SubscriberEmail::parse(entry) {
                            Ok(email) => Some(email),
                            Err(error) => {
                                tracing::warn!(error = %error, "Skipping an invalid stored subscriber");
                                None
                            }
                        })
                        .collect();
                    tracing::info!(
                        count = subscribers.len(),
                        path = %path.display(),
                        "Loaded subscriber list"
                    );
                    subscribers
                }
                Err(error) => {
                    tracing::warn!(
                        error = %error,
                        path = %path.display(),
                        "Subscriber list is corrupt, starting empty"
                    );
                    BTreeSet::new()
                }
            },
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "No subscriber list yet, starting empty");
                BTreeSet::new()
            }
            Err(error) => {
                tracing::warn!(
                    error = %error,
                    path = %path.display(),
                    "Failed to read subscriber list, starting empty"
                );
                BTreeSet::new()
            }
        };

        Self {
            path,
            subscribers: Mutex::new(subscribers),
        }
    }

    /// Validate, normalize and insert a new subscriber, then persist
    /// the full set. A failed persist rolls the insertion back, so
    /// memory and disk never disagree.
    #[tracing::instrument(name = "Adding a subscriber to the store", skip(self))]
    pub async fn add(&self, email: String) -> Result<SubscriberEmail, StoreError> {
        let email = SubscriberEmail::parse(email).map_err(StoreError::Validation)?;

        let mut subscribers = self.subscribers.lock().await;
        if !subscribers.insert(email.clone()) {
            return Err(StoreError::Duplicate(email.to_string()));
        }
        if let Err(error) = self.persist(&subscribers).await {
            subscribers.remove(&email);
            return Err(error.into());
        }

        Ok(email)
    }

    /// Remove a subscriber. Hook for the external unsubscribe
    /// collaborator; returns whether the address was present. A failed
    /// persist reinstates the entry, so it cannot resurrect from disk
    /// on the next load.
    #[tracing::instrument(name = "Removing a subscriber from the store", skip(self, email))]
    pub async fn remove(&self, email: &SubscriberEmail) -> Result<bool, StoreError> {
        let mut subscribers = self.subscribers.lock().await;
        let removed = subscribers.remove(email);
        if removed {
            if let Err(error) = self.persist(&subscribers).await {
                subscribers.insert(email.clone());
                return Err(error.into());
            }
        }

        Ok(removed)
    }

    /// Ordered copy of the current set, taken once per dispatch run.
    pub async fn snapshot(&self) -> Vec<SubscriberEmail> {
        self.subscribers.lock().await.iter().cloned().collect()
    }

    async fn persist(&self, subscribers: &BTreeSet<SubscriberEmail>) -> Result<(), std::io::Error> {
        let entries: Vec<&str> = subscribers.iter().map(AsRef::as_ref).collect();
        let contents = serde_json::to_string_pretty(&entries)?;

        // Write-to-temp-then-rename keeps the previous list readable if
        // the process dies mid-write.
        let temporary = self.path.with_extension("tmp");
        tokio::fs::write(&temporary, contents).await?;
        tokio::fs::rename(&temporary, &self.path).await?;

        Ok(())
    }
}

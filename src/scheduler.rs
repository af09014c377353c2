use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Days, NaiveTime, Utc};
use tokio::sync::Mutex;

use crate::configuration::DispatchSettings;
use crate::dispatch::{run_daily_dispatch, DispatchOutcome, Notifier};
use crate::subscriber_store::SubscriberStore;

/// Fires one dispatch run per day at a configured UTC time-of-day.
///
/// The next trigger instant is recomputed from the current clock on
/// every iteration, so the schedule stays correct across process
/// restarts. Overlapping triggers are skipped, never queued: the run
/// mutex guarantees at most one dispatch run in flight.
pub struct DailyScheduler<N> {
    store: Arc<SubscriberStore>,
    notifier: N,
    send_time: NaiveTime,
    pacing: Duration,
    send_timeout: Duration,
    run_in_progress: Mutex<()>,
}

#[derive(Debug)]
pub enum TriggerOutcome {
    /// The run went through; individual failures are inside the outcome.
    Completed(DispatchOutcome),
    /// The run aborted before any send (unusable notifier configuration).
    Aborted,
    /// A run was already in flight, this trigger did nothing.
    Skipped,
}

impl<N: Notifier> DailyScheduler<N> {
    pub fn new(store: Arc<SubscriberStore>, notifier: N, settings: &DispatchSettings) -> Self {
        Self {
            store,
            notifier,
            send_time: settings.send_time,
            pacing: settings.pacing(),
            send_timeout: settings.send_timeout(),
            run_in_progress: Mutex::new(()),
        }
    }

    /// Fire one dispatch run now, unless one is already in flight.
    pub async fn trigger(&self) -> TriggerOutcome {
        let Ok(_guard) = self.run_in_progress.try_lock() else {
            tracing::warn!("A dispatch run is already in progress, skipping this trigger");
            return TriggerOutcome::Skipped;
        };

        match run_daily_dispatch(&self.store, &self.notifier, self.pacing, self.send_timeout).await
        {
            Ok(outcome) => TriggerOutcome::Completed(outcome),
            Err(error) => {
                tracing::error!(
                    error.cause_chain = ?error,
                    "Dispatch run aborted, will retry at the next scheduled trigger"
                );
                TriggerOutcome::Aborted
            }
        }
    }

    pub async fn run_forever(&self) {
        loop {
            let now = Utc::now();
            let next = next_occurrence(now, self.send_time);
            let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
            tracing::info!(next_run = %next, "Scheduled the next daily dispatch");

            tokio::time::sleep(wait).await;
            self.trigger().await;
        }
    }
}

/// First instant strictly after `after` whose UTC time-of-day equals
/// `send_time`. Calendar-aware: today's slot if still ahead, otherwise
/// the same slot tomorrow.
pub fn next_occurrence(after: DateTime<Utc>, send_time: NaiveTime) -> DateTime<Utc> {
    let today = after.date_naive().and_time(send_time).and_utc();
    if today > after {
        today
    } else {
        (after.date_naive() + Days::new(1))
            .and_time(send_time)
            .and_utc()
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Upper bound on the number of recently shown words kept per user.
pub const WORD_HISTORY_LIMIT: usize = 5;

/// Per-user learning progress, owned and persisted by the client
/// session. The server never stores a copy.
///
/// Dates are plain calendar days; the caller supplies `today` as
/// observed in the user's local timezone and this module only ever
/// compares calendar dates, never instants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProgress {
    pub last_seen: NaiveDate,
    pub streak: u32,
    pub word_history: Vec<String>,
}

impl UserProgress {
    /// Decode a previously persisted progress blob.
    ///
    /// Malformed input (unparseable JSON, a streak of 0) is treated as
    /// no record at all, so the next `advance` restarts the streak at 1.
    pub fn decode(raw: &str) -> Option<UserProgress> {
        serde_json::from_str::<UserProgress>(raw)
            .ok()
            .filter(|progress| progress.streak >= 1)
            .map(|mut progress| {
                progress.word_history.truncate(WORD_HISTORY_LIMIT);
                progress
            })
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Outcome of one streak evaluation.
///
/// `updated` is false exactly when the user already visited today;
/// callers must persist `progress` only when it is true.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreakUpdate {
    pub progress: UserProgress,
    pub updated: bool,
}

/// Evaluate the streak for a visit on `today`.
///
/// - Same-day revisit: unchanged, nothing to persist.
/// - Visited yesterday: streak continues, +1.
/// - No record, a gap of two or more days, or `last_seen` in the
///   future (clock skew): streak resets to 1.
///
/// On any update the current word is pushed to the front of the
/// history, bounded to [`WORD_HISTORY_LIMIT`] entries.
pub fn advance(progress: Option<UserProgress>, today: NaiveDate, todays_word: &str) -> StreakUpdate {
    if let Some(progress) = &progress {
        if progress.last_seen == today {
            return StreakUpdate {
                progress: progress.clone(),
                updated: false,
            };
        }
    }

    let continues = progress
        .as_ref()
        .map(|p| Some(p.last_seen) == today.pred_opt())
        .unwrap_or(false);
    let streak = match (continues, &progress) {
        (true, Some(p)) => p.streak + 1,
        _ => 1,
    };

    let mut word_history = progress.map(|p| p.word_history).unwrap_or_default();
    word_history.insert(0, todays_word.to_string());
    word_history.truncate(WORD_HISTORY_LIMIT);

    StreakUpdate {
        progress: UserProgress {
            last_seen: today,
            streak,
            word_history,
        },
        updated: true,
    }
}

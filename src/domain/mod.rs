pub mod streak;
pub mod subscriber_email;

pub use streak::{advance, StreakUpdate, UserProgress, WORD_HISTORY_LIMIT};
pub use subscriber_email::SubscriberEmail;

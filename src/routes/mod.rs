mod health_check;
mod subscriptions;
mod word;

pub use health_check::check_health;
pub use subscriptions::subscribe;
pub use word::get_word_of_the_day;

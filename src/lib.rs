pub mod configuration;
pub mod dispatch;
pub mod domain;
pub mod email_client;
pub mod routes;
pub mod scheduler;
pub mod startup;
pub mod subscriber_store;
pub mod telemetry;
pub mod word_client;

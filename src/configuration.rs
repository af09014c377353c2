use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveTime;
use config::{Config, Environment, File, FileFormat};
use secrecy::Secret;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::domain::SubscriberEmail;

#[derive(Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub subscriber_store: SubscriberStoreSettings,
    pub email_client: EmailClientSettings,
    pub word_provider: WordProviderSettings,
    pub dispatch: DispatchSettings,
}

#[derive(Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

#[derive(Deserialize)]
pub struct SubscriberStoreSettings {
    pub path: PathBuf,
}

#[derive(Deserialize)]
pub struct EmailClientSettings {
    pub access_url: String,
    pub sender: String,
    pub authorization_token: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl EmailClientSettings {
    pub fn sender(&self) -> Result<SubscriberEmail, String> {
        SubscriberEmail::parse(self.sender.clone())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }
}

#[derive(Deserialize)]
pub struct WordProviderSettings {
    pub access_url: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl WordProviderSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_milliseconds)
    }
}

#[derive(Deserialize)]
pub struct DispatchSettings {
    /// Daily trigger time, interpreted in UTC.
    pub send_time: NaiveTime,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub pacing_milliseconds: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub send_timeout_milliseconds: u64,
}

impl DispatchSettings {
    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_milliseconds)
    }

    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_milliseconds)
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let settings = Config::builder()
        .add_source(File::new("configuration.yaml", FileFormat::Yaml))
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("_"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

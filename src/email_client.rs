use std::time::Duration;

use anyhow::Context;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;

use crate::dispatch::Notifier;
use crate::domain::SubscriberEmail;

const DAILY_REMINDER_SUBJECT: &str = "New Word of the Day Available!";

#[derive(Clone)]
pub struct EmailClient {
    http_client: Client,
    access_url: String,
    sender: SubscriberEmail,
    authorization_token: Secret<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html_body: &'a str,
    text_body: &'a str,
}

impl EmailClient {
    pub fn new(
        access_url: String,
        sender: SubscriberEmail,
        authorization_token: Secret<String>,
        timeout: Duration,
    ) -> EmailClient {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build a HTTP client");

        EmailClient {
            http_client,
            access_url,
            sender,
            authorization_token,
        }
    }

    /// Credential and connectivity check against the provider, run
    /// once at the start of every dispatch run.
    pub async fn verify(&self) -> Result<(), anyhow::Error> {
        if self.authorization_token.expose_secret().is_empty() {
            anyhow::bail!("No authorization token configured for the email provider");
        }

        let url = format!("{}/server", self.access_url);
        self.http_client
            .get(&url)
            .header(
                "X-Postmark-Server-Token",
                self.authorization_token.expose_secret(),
            )
            .send()
            .await
            .context("Failed to reach the email provider")?
            .error_for_status()
            .context("The email provider rejected the configured credentials")?;

        Ok(())
    }

    /// Send today's reminder to one subscriber. The message body is a
    /// fixed nudge towards the site; rendering a richer template is the
    /// display layer's concern.
    #[tracing::instrument(name = "Sending a daily reminder email", skip(self))]
    pub async fn send_daily_reminder(
        &self,
        recipient: &SubscriberEmail,
    ) -> Result<(), reqwest::Error> {
        let url = format!("{}/email", self.access_url);
        let body = SendEmailRequest {
            from: self.sender.as_ref(),
            to: recipient.as_ref(),
            subject: DAILY_REMINDER_SUBJECT,
            html_body: "<p>A fresh word of the day is waiting for you!</p>",
            text_body: "A fresh word of the day is waiting for you!",
        };

        self.http_client
            .post(&url)
            .header(
                "X-Postmark-Server-Token",
                self.authorization_token.expose_secret(),
            )
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

impl Notifier for EmailClient {
    async fn verify(&self) -> Result<(), anyhow::Error> {
        EmailClient::verify(self).await
    }

    async fn notify(&self, recipient: &SubscriberEmail) -> Result<(), anyhow::Error> {
        self.send_daily_reminder(recipient)
            .await
            .with_context(|| format!("Failed to send a daily reminder to {}", recipient))
    }
}

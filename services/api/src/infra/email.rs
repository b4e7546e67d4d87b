//! Outbound email relay client. The relay is a plain HTTP API taking a JSON
//! payload and a bearer key; delivery itself is the relay's problem.

use anyhow::anyhow;
use reqwest::Client;
use serde::Serialize;

use crate::domain::repository::EmailSender;
use crate::error::ApiError;

#[derive(Clone)]
pub struct HttpEmailSender {
    client: Client,
    relay_url: String,
    api_key: String,
    from: String,
}

impl HttpEmailSender {
    pub fn new(relay_url: &str, api_key: &str, from: &str) -> Self {
        Self {
            client: Client::new(),
            relay_url: relay_url.to_owned(),
            api_key: api_key.to_owned(),
            from: from.to_owned(),
        }
    }
}

#[derive(Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

impl EmailSender for HttpEmailSender {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .post(&self.relay_url)
            .bearer_auth(&self.api_key)
            .json(&SendRequest {
                from: &self.from,
                to,
                subject,
                html: html_body,
            })
            .send()
            .await
            .map_err(|e| ApiError::Provider(anyhow::Error::new(e).context("send email")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Provider(anyhow!(
                "email relay returned {status} for message to {to}"
            )));
        }
        tracing::info!(to, subject, "email accepted by relay");
        Ok(())
    }
}

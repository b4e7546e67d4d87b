//! Identity Toolkit compatible REST client for the external identity
//! provider. Account lifecycle and token verification both live here; the
//! local `users` table is only a projection of what these endpoints report.

use anyhow::{Context as _, anyhow};
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::repository::IdentityProvider;
use crate::domain::types::{ProviderAccount, ProviderSession};
use crate::error::ApiError;

#[derive(Clone)]
pub struct HttpIdentityProvider {
    client: Client,
    base_url: String,
    secure_token_url: String,
    api_key: String,
}

impl HttpIdentityProvider {
    pub fn new(base_url: &str, secure_token_url: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            secure_token_url: secure_token_url.trim_end_matches('/').to_owned(),
            api_key: api_key.to_owned(),
        }
    }

    fn account_url(&self, op: &str) -> String {
        format!("{}/v1/accounts:{op}?key={}", self.base_url, self.api_key)
    }

    async fn post_json<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        url: &str,
        body: &Req,
    ) -> Result<Resp, ApiError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Provider(anyhow::Error::new(e).context("send request")))?;

        let status = response.status();
        if !status.is_success() {
            let body: serde_json::Value = response.json().await.unwrap_or_default();
            let message = body
                .pointer("/error/message")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown error");
            return Err(ApiError::Provider(anyhow!(
                "identity provider returned {status}: {message}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Provider(anyhow::Error::new(e).context("decode response")))
    }

    async fn lookup(&self, request: &LookupRequest, key: &str) -> Result<ProviderAccount, ApiError> {
        let response: LookupResponse = self
            .post_json(&self.account_url("lookup"), request)
            .await?;
        response
            .users
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(ProviderAccount::from)
            .ok_or_else(|| ApiError::NotFound(format!("{key} not found in identity provider.")))
    }
}

impl IdentityProvider for HttpIdentityProvider {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderAccount, ApiError> {
        let response: SignUpResponse = self
            .post_json(
                &self.account_url("signUp"),
                &SignUpRequest {
                    email,
                    password,
                    return_secure_token: false,
                },
            )
            .await?;
        Ok(ProviderAccount {
            subject: response.local_id,
            email: response.email,
            email_verified: false,
        })
    }

    async fn get_account(&self, subject: &str) -> Result<ProviderAccount, ApiError> {
        self.lookup(
            &LookupRequest {
                local_id: Some(vec![subject.to_owned()]),
                ..Default::default()
            },
            &format!("account with authId {subject}"),
        )
        .await
    }

    async fn get_account_by_email(&self, email: &str) -> Result<ProviderAccount, ApiError> {
        self.lookup(
            &LookupRequest {
                email: Some(vec![email.to_owned()]),
                ..Default::default()
            },
            &format!("account with email {email}"),
        )
        .await
    }

    async fn update_email(&self, subject: &str, email: &str) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .post_json(
                &self.account_url("update"),
                &UpdateRequest {
                    local_id: subject,
                    email: Some(email),
                    valid_since: None,
                },
            )
            .await?;
        Ok(())
    }

    async fn delete_account(&self, subject: &str) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .post_json(
                &self.account_url("delete"),
                &DeleteRequest { local_id: subject },
            )
            .await?;
        Ok(())
    }

    async fn verify_token(&self, access_token: &str) -> Result<ProviderAccount, ApiError> {
        self.lookup(
            &LookupRequest {
                id_token: Some(access_token.to_owned()),
                ..Default::default()
            },
            "account for access token",
        )
        .await
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderSession, ApiError> {
        let response: SignInResponse = self
            .post_json(
                &self.account_url("signInWithPassword"),
                &SignInPasswordRequest {
                    email,
                    password,
                    return_secure_token: true,
                },
            )
            .await?;
        Ok(ProviderSession {
            subject: response.local_id,
            access_token: response.id_token,
            refresh_token: response.refresh_token,
        })
    }

    async fn sign_in_with_google(
        &self,
        id_token: &str,
    ) -> Result<(ProviderSession, ProviderAccount), ApiError> {
        let response: SignInIdpResponse = self
            .post_json(
                &self.account_url("signInWithIdp"),
                &SignInIdpRequest {
                    post_body: &format!("id_token={id_token}&providerId=google.com"),
                    request_uri: "http://localhost",
                    return_secure_token: true,
                },
            )
            .await?;
        let account = ProviderAccount {
            subject: response.local_id.clone(),
            email: response.email,
            email_verified: response.email_verified,
        };
        let session = ProviderSession {
            subject: response.local_id,
            access_token: response.id_token,
            refresh_token: response.refresh_token,
        };
        Ok((session, account))
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<String, ApiError> {
        let url = format!("{}/v1/token?key={}", self.secure_token_url, self.api_key);
        let response = self
            .client
            .post(&url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await
            .map_err(|e| ApiError::Provider(anyhow::Error::new(e).context("send request")))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Provider(anyhow!(
                "token exchange returned {status}"
            )));
        }
        let body: RefreshResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Provider(anyhow::Error::new(e).context("decode response")))?;
        Ok(body.id_token)
    }

    async fn revoke_refresh_tokens(&self, subject: &str) -> Result<(), ApiError> {
        let valid_since = chrono::Utc::now().timestamp().to_string();
        let _: serde_json::Value = self
            .post_json(
                &self.account_url("update"),
                &UpdateRequest {
                    local_id: subject,
                    email: None,
                    valid_since: Some(&valid_since),
                },
            )
            .await?;
        Ok(())
    }

    async fn email_verification_link(&self, email: &str) -> Result<String, ApiError> {
        self.oob_link("VERIFY_EMAIL", email).await
    }

    async fn password_reset_link(&self, email: &str) -> Result<String, ApiError> {
        self.oob_link("PASSWORD_RESET", email).await
    }
}

impl HttpIdentityProvider {
    async fn oob_link(&self, request_type: &str, email: &str) -> Result<String, ApiError> {
        let response: SendOobResponse = self
            .post_json(
                &self.account_url("sendOobCode"),
                &SendOobRequest {
                    request_type,
                    email,
                    return_oob_link: true,
                },
            )
            .await?;
        response
            .oob_link
            .context("provider response missing oobLink")
            .map_err(ApiError::Provider)
    }
}

// ── Wire payloads ────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignUpRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignUpResponse {
    local_id: String,
    email: String,
}

#[derive(Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct LookupRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    id_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    local_id: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<Vec<String>>,
}

#[derive(serde::Deserialize)]
struct LookupResponse {
    users: Option<Vec<RawAccount>>,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAccount {
    local_id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    email_verified: bool,
}

impl From<RawAccount> for ProviderAccount {
    fn from(raw: RawAccount) -> Self {
        Self {
            subject: raw.local_id,
            email: raw.email,
            email_verified: raw.email_verified,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateRequest<'a> {
    local_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    valid_since: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteRequest<'a> {
    local_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInPasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    id_token: String,
    refresh_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInIdpRequest<'a> {
    post_body: &'a str,
    request_uri: &'a str,
    return_secure_token: bool,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInIdpResponse {
    local_id: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    email_verified: bool,
    id_token: String,
    refresh_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendOobRequest<'a> {
    request_type: &'a str,
    email: &'a str,
    return_oob_link: bool,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendOobResponse {
    oob_link: Option<String>,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "snake_case")]
struct RefreshResponse {
    id_token: String,
}

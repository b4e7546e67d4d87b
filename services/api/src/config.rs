/// API service configuration loaded from environment variables.
#[derive(Debug)]
pub struct ApiConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server (default 5000). Env var: `API_PORT`.
    pub api_port: u16,
    /// Identity provider base URL (Identity Toolkit compatible REST API).
    /// Env var: `IDENTITY_BASE_URL`.
    pub identity_base_url: String,
    /// Token exchange base URL for refresh grants. Env var: `SECURE_TOKEN_URL`.
    pub secure_token_url: String,
    /// Identity provider API key. Env var: `IDENTITY_API_KEY`.
    pub identity_api_key: String,
    /// Outbound email relay endpoint. Env var: `EMAIL_RELAY_URL`.
    pub email_relay_url: String,
    /// Bearer key for the email relay. Env var: `EMAIL_RELAY_API_KEY`.
    pub email_relay_api_key: String,
    /// Sender address for all outbound mail. Env var: `EMAIL_FROM`.
    pub email_from: String,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            api_port: std::env::var("API_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
            identity_base_url: std::env::var("IDENTITY_BASE_URL")
                .unwrap_or_else(|_| "https://identitytoolkit.googleapis.com".to_owned()),
            secure_token_url: std::env::var("SECURE_TOKEN_URL")
                .unwrap_or_else(|_| "https://securetoken.googleapis.com".to_owned()),
            identity_api_key: std::env::var("IDENTITY_API_KEY").expect("IDENTITY_API_KEY"),
            email_relay_url: std::env::var("EMAIL_RELAY_URL").expect("EMAIL_RELAY_URL"),
            email_relay_api_key: std::env::var("EMAIL_RELAY_API_KEY")
                .expect("EMAIL_RELAY_API_KEY"),
            email_from: std::env::var("EMAIL_FROM").expect("EMAIL_FROM"),
        }
    }
}

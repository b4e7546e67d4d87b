use farmbase_api::config::ApiConfig;
use farmbase_api::graphql::build_schema;
use farmbase_api::infra::email::HttpEmailSender;
use farmbase_api::infra::identity::HttpIdentityProvider;
use farmbase_api::router::{RouterState, build_router};
use farmbase_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    farmbase_core::tracing::init_tracing();

    let config = ApiConfig::from_env();
    let db = sea_orm::Database::connect(&config.database_url).await?;
    let identity = HttpIdentityProvider::new(
        &config.identity_base_url,
        &config.secure_token_url,
        &config.identity_api_key,
    );
    let mailer = HttpEmailSender::new(
        &config.email_relay_url,
        &config.email_relay_api_key,
        &config.email_from,
    );

    let schema = build_schema(AppState::new(db.clone(), identity, mailer));
    let router = build_router(RouterState { schema, db });

    let addr = format!("0.0.0.0:{}", config.api_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "api listening");
    axum::serve(listener, router).await?;
    Ok(())
}

use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{get, post};
use sea_orm::DatabaseConnection;
use tower_http::trace::TraceLayer;

use farmbase_core::middleware::request_id_layer;

use crate::graphql::ApiSchema;
use crate::graphql::guard::AuthHeader;

#[derive(Clone)]
pub struct RouterState {
    pub schema: ApiSchema,
    pub db: DatabaseConnection,
}

pub fn build_router(state: RouterState) -> Router {
    Router::new()
        .route("/graphql", post(graphql_handler))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}

/// Single GraphQL endpoint. The raw `Authorization` header is injected into
/// the request context so gated resolvers can run their predicates.
async fn graphql_handler(
    State(state): State<RouterState>,
    headers: HeaderMap,
    request: GraphQLRequest,
) -> GraphQLResponse {
    let auth = AuthHeader(
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned),
    );
    state
        .schema
        .execute(request.into_inner().data(auth))
        .await
        .into()
}

async fn healthz() -> &'static str {
    "OK"
}

async fn readyz(State(state): State<RouterState>) -> Result<&'static str, StatusCode> {
    state
        .db
        .ping()
        .await
        .map_err(|_| StatusCode::SERVICE_UNAVAILABLE)?;
    Ok("OK")
}

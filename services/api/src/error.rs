use async_graphql::ErrorExtensions as _;

/// API service error variants.
///
/// Every variant carries a stable `kind()` string that the GraphQL layer
/// attaches as the `code` extension, so clients can branch without parsing
/// messages. `Unauthorized` is deliberately its own kind (`UNAUTHENTICATED`)
/// so the transport can distinguish authentication failures.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing row; the message embeds the lookup key.
    #[error("{0}")]
    NotFound(String),
    /// Uniqueness violation translated into a user-facing message.
    #[error("{0}")]
    Conflict(String),
    #[error("you are not authorized to perform this action")]
    Unauthorized,
    #[error("{0}")]
    BadUserInput(String),
    /// Network or API failure from the identity or email provider.
    #[error("external provider request failed")]
    Provider(#[source] anyhow::Error),
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Unauthorized => "UNAUTHENTICATED",
            Self::BadUserInput(_) => "BAD_USER_INPUT",
            Self::Provider(_) => "PROVIDER",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl From<ApiError> for async_graphql::Error {
    fn from(err: ApiError) -> Self {
        // 5xx-class failures get logged here with their source chain; the
        // 4xx-class kinds are expected client errors and would be noise.
        match &err {
            ApiError::Provider(e) => {
                tracing::error!(error = %e, kind = "PROVIDER", "provider error")
            }
            ApiError::Internal(e) => {
                tracing::error!(error = %e, kind = "INTERNAL", "internal error")
            }
            _ => {}
        }
        let kind = err.kind();
        async_graphql::Error::new(err.to_string()).extend_with(|_, ext| ext.set("code", kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_error(error: ApiError, expected_kind: &str, expected_message: &str) {
        assert_eq!(error.kind(), expected_kind);
        let gql: async_graphql::Error = error.into();
        assert_eq!(gql.message, expected_message);
        let extensions = gql.extensions.expect("code extension");
        assert_eq!(
            extensions.get("code"),
            Some(&async_graphql::Value::from(expected_kind))
        );
    }

    #[test]
    fn should_map_not_found_with_lookup_key_in_message() {
        assert_error(
            ApiError::NotFound("userId 42 not found.".into()),
            "NOT_FOUND",
            "userId 42 not found.",
        );
    }

    #[test]
    fn should_map_conflict_with_user_facing_message() {
        assert_error(
            ApiError::Conflict("A farm with that USDA farm ID already exists.".into()),
            "CONFLICT",
            "A farm with that USDA farm ID already exists.",
        );
    }

    #[test]
    fn should_map_unauthorized_to_unauthenticated_kind() {
        assert_error(
            ApiError::Unauthorized,
            "UNAUTHENTICATED",
            "you are not authorized to perform this action",
        );
    }

    #[test]
    fn should_map_bad_user_input() {
        assert_error(
            ApiError::BadUserInput("Password is required for password signup".into()),
            "BAD_USER_INPUT",
            "Password is required for password signup",
        );
    }

    #[test]
    fn should_map_provider_failure_to_generic_message() {
        assert_error(
            ApiError::Provider(anyhow::anyhow!("connection refused")),
            "PROVIDER",
            "external provider request failed",
        );
    }

    #[test]
    fn should_map_internal_to_generic_message() {
        assert_error(
            ApiError::Internal(anyhow::anyhow!("db error")),
            "INTERNAL",
            "internal server error",
        );
    }
}

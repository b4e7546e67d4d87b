pub mod guard;
pub mod types;

mod auth;
mod email;
mod farm;
mod sample;
mod user;

use async_graphql::{EmptySubscription, MergedObject, Schema};

use crate::state::AppState;

#[derive(MergedObject, Default)]
pub struct QueryRoot(
    sample::SampleQuery,
    user::UserQuery,
    farm::FarmQuery,
    auth::AuthQuery,
);

#[derive(MergedObject, Default)]
pub struct MutationRoot(
    sample::SampleMutation,
    user::UserMutation,
    farm::FarmMutation,
    auth::AuthMutation,
    email::EmailMutation,
);

pub type ApiSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(state: AppState) -> ApiSchema {
    Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        EmptySubscription,
    )
    .data(state)
    .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::email::HttpEmailSender;
    use crate::infra::identity::HttpIdentityProvider;

    fn schema() -> ApiSchema {
        build_schema(AppState::new(
            sea_orm::DatabaseConnection::default(),
            HttpIdentityProvider::new(
                "https://identity.invalid",
                "https://tokens.invalid",
                "test-key",
            ),
            HttpEmailSender::new("https://relay.invalid", "test-key", "noreply@example.com"),
        ))
    }

    #[test]
    fn should_publish_boolean_returns_for_delete_mutations() {
        let sdl = schema().sdl();
        assert!(sdl.contains("deleteUserById(id: UUID!): Boolean!"));
        assert!(sdl.contains("deleteUserByEmail(email: String!): Boolean!"));
        assert!(sdl.contains("deleteFarmById(id: UUID!): Boolean!"));
    }

    #[test]
    fn should_publish_every_operation() {
        let sdl = schema().sdl();
        for field in [
            "sampleById", "samples", "userById", "userByEmail", "users", "farmById",
            "farmsByUserId", "farms", "isAuthorizedByRole", "isAuthorizedByUserId",
            "isAuthorizedByEmail", "createSample", "updateSample", "deleteSampleById",
            "createUser", "updateUser", "createFarm", "updateFarm", "login",
            "loginWithGoogle", "register", "refresh", "logout", "resetPassword", "sendEmail",
        ] {
            assert!(sdl.contains(field), "schema is missing {field}");
        }
    }
}

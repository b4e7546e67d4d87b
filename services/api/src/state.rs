use sea_orm::DatabaseConnection;

use crate::infra::db::{DbFarmRepository, DbSampleRepository, DbUserRepository};
use crate::infra::email::HttpEmailSender;
use crate::infra::identity::HttpIdentityProvider;

/// Shared handles for the service. Cloning is cheap; the connection pool and
/// HTTP clients are internally reference-counted.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub identity: HttpIdentityProvider,
    pub mailer: HttpEmailSender,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        identity: HttpIdentityProvider,
        mailer: HttpEmailSender,
    ) -> Self {
        Self {
            db,
            identity,
            mailer,
        }
    }

    pub fn sample_repo(&self) -> DbSampleRepository {
        DbSampleRepository {
            db: self.db.clone(),
        }
    }

    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn farm_repo(&self) -> DbFarmRepository {
        DbFarmRepository {
            db: self.db.clone(),
        }
    }

    pub fn identity(&self) -> HttpIdentityProvider {
        self.identity.clone()
    }

    pub fn mailer(&self) -> HttpEmailSender {
        self.mailer.clone()
    }
}

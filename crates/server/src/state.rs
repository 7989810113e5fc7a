use std::sync::Arc;

use sea_orm::DatabaseConnection;
use service::auth::repo::SeaOrmUserDirectory;
use service::auth::{AuthConfig, AuthService};
use service::email::NotificationGateway;
use service::users::UsersService;

/// Shared, read-only application state. The config and gateway are fixed
/// at startup; only the pool inside the connection is internally mutable.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub auth: AuthConfig,
    pub gateway: Arc<dyn NotificationGateway>,
}

impl AppState {
    pub fn directory(&self) -> Arc<SeaOrmUserDirectory> {
        Arc::new(SeaOrmUserDirectory { db: self.db.clone() })
    }

    pub fn auth_service(&self) -> AuthService<SeaOrmUserDirectory> {
        AuthService::new(self.directory(), Arc::clone(&self.gateway), self.auth.clone())
    }

    pub fn users_service(&self) -> UsersService<SeaOrmUserDirectory> {
        UsersService::new(self.directory(), Arc::clone(&self.gateway), self.auth.clone())
    }
}

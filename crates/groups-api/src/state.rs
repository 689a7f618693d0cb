use std::sync::Arc;

use groups_core::repositories::GroupRepository;
use groups_core::services::GroupService;
use groups_security::JwtService;
use groups_shared::config::AppConfig;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub groups: Arc<GroupService<dyn GroupRepository>>,
    pub jwt: Arc<JwtService>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(repository: Arc<dyn GroupRepository>, config: AppConfig) -> Self {
        let jwt = JwtService::new(&config.jwt.secret, config.jwt.access_token_expiry);
        Self {
            groups: Arc::new(GroupService::new(repository)),
            jwt: Arc::new(jwt),
            config,
        }
    }
}

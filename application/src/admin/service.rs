use std::sync::Arc;

use crate::ban::service::BanController;
use crate::infrastructure_config::Config;
use crate::ports::incoming::admin::AdminUseCase;

pub struct AdminService {
    ban_controller: Arc<BanController>,
    config: Arc<Config>,
}

impl AdminService {
    #[must_use]
    pub fn new(ban_controller: Arc<BanController>, config: Arc<Config>) -> Self {
        Self {
            ban_controller,
            config,
        }
    }
}

#[async_trait::async_trait]
impl AdminUseCase for AdminService {
    fn authorize(&self, token: &str) -> bool {
        self.config.is_admin_token(token)
    }

    async fn ban_uid(&self, uid: u32) {
        self.ban_controller.ban_uid(uid);
    }

    async fn unban_uid(&self, uid: u32) {
        self.ban_controller.unban_uid(uid);
    }
}

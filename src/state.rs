use std::sync::Arc;

use crate::config::AppConfig;
use crate::store::{
    JsonLoginLogStore, JsonResumeStore, JsonUserStore, LoginLogStore, ResumeStore, UserStore,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub login_logs: Arc<dyn LoginLogStore>,
    pub resume: Arc<dyn ResumeStore>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        Self::open(config).await
    }

    /// Wire up flat-file stores for the paths in `config`, seeding any
    /// missing files.
    pub async fn open(config: Arc<AppConfig>) -> anyhow::Result<Self> {
        let users =
            Arc::new(JsonUserStore::open(config.data.users_file.clone()).await?) as Arc<dyn UserStore>;
        let login_logs = Arc::new(JsonLoginLogStore::open(config.data.login_logs_file.clone()).await?)
            as Arc<dyn LoginLogStore>;
        let resume = Arc::new(JsonResumeStore::open(config.data.resume_file.clone()).await?)
            as Arc<dyn ResumeStore>;

        Ok(Self {
            config,
            users,
            login_logs,
            resume,
        })
    }
}

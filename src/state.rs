use std::sync::Arc;

use crate::auth::{jwt::JwtKeys, password::PasswordPool, repo::UserStore};
use crate::config::AppConfig;
use crate::courses::repo::CourseStore;
use crate::db::{self, PgStore};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub courses: Arc<dyn CourseStore>,
    pub keys: Arc<JwtKeys>,
    pub passwords: PasswordPool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let pool = db::connect(&config).await?;
        db::migrate(&pool).await?;
        let store = Arc::new(PgStore::new(pool));

        Ok(Self::from_parts(
            store.clone() as Arc<dyn UserStore>,
            store as Arc<dyn CourseStore>,
            config,
        ))
    }

    pub fn from_parts(
        users: Arc<dyn UserStore>,
        courses: Arc<dyn CourseStore>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            users,
            courses,
            keys: Arc::new(JwtKeys::from_config(&config.jwt)),
            passwords: PasswordPool::new(config.hash_concurrency),
            config,
        }
    }
}

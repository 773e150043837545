use crate::auth::{AuthService, JsonUserRepository, JwtKeys, UserRepository};
use crate::categories::repo_types::Category;
use crate::config::AppConfig;
use crate::recipes::repo_types::Recipe;
use crate::storage::JsonStore;
use anyhow::Context;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub jwt: JwtKeys,
    pub auth: AuthService,
    pub categories: Arc<JsonStore<Category>>,
    pub recipes: Arc<JsonStore<Recipe>>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        Self::from_config(config).await
    }

    pub async fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let users = JsonUserRepository::open(config.users_path())
            .await
            .context("load users")?;
        let categories = JsonStore::open(config.categories_path())
            .await
            .context("load categories")?;
        let recipes = JsonStore::open(config.recipes_path())
            .await
            .context("load recipes")?;

        let jwt = JwtKeys::new(&config.jwt);
        let users = Arc::new(users) as Arc<dyn UserRepository>;

        Ok(Self {
            config: Arc::new(config),
            auth: AuthService::new(users, jwt.clone()),
            jwt,
            categories: Arc::new(categories),
            recipes: Arc::new(recipes),
        })
    }

    #[cfg(test)]
    pub async fn fake(data_dir: &std::path::Path) -> Self {
        let config = AppConfig {
            data_dir: data_dir.to_path_buf(),
            jwt: crate::config::JwtConfig {
                secret: "test-secret".into(),
            },
        };
        Self::from_config(config).await.expect("fake state")
    }
}

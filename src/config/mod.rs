pub mod tracing;

use figment::providers::{Env, Format, Json, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppCfg {
    pub listen_addr: String,
    pub store: StoreKind,
    pub database_url: Option<String>,
    pub db_pool_size: usize,
    pub run_migrations: bool,
    /// Allowed CORS origins; empty allows any origin.
    pub cors_origins: Vec<String>,
    /// JSON file of users and events loaded into the memory store.
    pub seed_file: Option<String>,
}

impl Default for AppCfg {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:5000".into(),
            store: StoreKind::Postgres,
            database_url: None,
            db_pool_size: 10,
            run_migrations: true,
            cors_origins: Vec::new(),
            seed_file: None,
        }
    }
}

impl AppCfg {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(AppCfg::default()))
            .merge(Json::file("appsettings.json"))
            .merge(Env::prefixed("APP_"))
    }

    pub fn load() -> anyhow::Result<Self> {
        Ok(Self::figment().extract()?)
    }
}

//! Process bootstrap: logging and dependency wiring.
//!
//! 进程引导：日志初始化与依赖装配。

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use onboard_app::{AppContext, AppDeps};
use onboard_infra::db::pool::init_db_pool;
use onboard_infra::db::SqliteAvatarCache;
use onboard_infra::kv::FileKvStore;
use onboard_infra::{ImageCodec, InfraConfig, MockApiGateway};

/// Install the global tracing subscriber. `RUST_LOG` overrides the
/// default `info` level.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

/// Build the wired application context from infrastructure config.
///
/// 根据基础设施配置装配应用上下文。
pub fn build_context(config: &InfraConfig) -> Result<Arc<AppContext>> {
    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("创建数据目录失败: {:?}", config.data_dir))?;

    let db_path = config.blob_db_path();
    let db_url = db_path
        .to_str()
        .with_context(|| format!("数据库路径不是合法 UTF-8: {:?}", db_path))?;
    let pool = init_db_pool(db_url)?;

    // Both gateway ports come from one shared mock so claimed usernames
    // and registered accounts stay consistent.
    let gateway = Arc::new(MockApiGateway::new(config.api_latency()));

    let deps = AppDeps {
        auth: gateway.clone(),
        profile: gateway,
        codec: Arc::new(ImageCodec::new()),
        avatar_cache: Arc::new(SqliteAvatarCache::new(pool)),
        kv: Arc::new(FileKvStore::with_defaults(config.data_dir.clone())),
    };

    info!(data_dir = ?config.data_dir, "bootstrap complete");
    Ok(AppContext::init(deps))
}

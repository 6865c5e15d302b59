//! Onboard Library
//!
//! 账户引导流程库
//!
//! Composition root: wires the mocked gateways, the SQLite avatar cache
//! and the file-backed session store into an [`AppContext`].

pub mod bootstrap;

// 重新导出常用类型
pub use bootstrap::{build_context, init_tracing};
pub use onboard_app::AppContext;
pub use onboard_infra::InfraConfig;

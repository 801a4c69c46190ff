// ==========================================
// 地铁列车投运编排系统 - 配置层
// ==========================================
// 职责: 优化器参数与运营策略,支持 config_kv 覆写
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod config_reader_trait;
pub mod operator_policy;
pub mod optimizer_config;

// 重导出核心配置
pub use config_manager::{config_keys, ConfigManager};
pub use config_reader_trait::{ConfigReadResult, OptimizerConfigReader};
pub use operator_policy::OperatorPolicy;
pub use optimizer_config::OptimizerConfig;

// ==========================================
// 地铁列车投运编排系统 - 优化配置读取 Trait
// ==========================================
// 职责: 定义 API 层所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::{OperatorPolicy, OptimizerConfig};
use async_trait::async_trait;
use std::error::Error;

pub type ConfigReadResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

// ==========================================
// OptimizerConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait OptimizerConfigReader: Send + Sync {
    /// 获取优化器参数（阈值/权重/评分区间）
    ///
    /// 缺失的键使用 OptimizerConfig::default() 中的值
    async fn get_optimizer_config(&self) -> ConfigReadResult<OptimizerConfig>;

    /// 获取运营策略（默认目标配额、请求超时）
    async fn get_operator_policy(&self) -> ConfigReadResult<OperatorPolicy>;
}

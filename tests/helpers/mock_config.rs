// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

use async_trait::async_trait;
use metro_induction::config::{
    ConfigReadResult, OperatorPolicy, OptimizerConfig, OptimizerConfigReader,
};

/// 内存配置,不依赖 config_kv
#[derive(Debug, Clone, Default)]
pub struct MockConfigReader {
    pub optimizer: OptimizerConfig,
    pub policy: OperatorPolicy,
    /// 为 true 时读取失败
    pub fail: bool,
}

impl MockConfigReader {
    pub fn with_policy(policy: OperatorPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl OptimizerConfigReader for MockConfigReader {
    async fn get_optimizer_config(&self) -> ConfigReadResult<OptimizerConfig> {
        if self.fail {
            return Err("mock config unavailable".into());
        }
        Ok(self.optimizer)
    }

    async fn get_operator_policy(&self) -> ConfigReadResult<OperatorPolicy> {
        if self.fail {
            return Err("mock config unavailable".into());
        }
        Ok(self.policy)
    }
}

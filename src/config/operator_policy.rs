use crate::domain::InductionTargets;
use serde::{Deserialize, Serialize};

/// 运营策略（不属于优化核心）
///
/// - 默认目标配额: 运营 15 / 备用 5 / 检修 5
/// - 请求超时: 10 秒,与客户端 HTTP 超时一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatorPolicy {
    pub default_targets: InductionTargets,
    pub request_timeout_ms: u64,
}

impl Default for OperatorPolicy {
    fn default() -> Self {
        Self {
            default_targets: InductionTargets::new(15, 5, 5),
            request_timeout_ms: 10_000,
        }
    }
}

impl OperatorPolicy {
    /// 校验运营策略
    ///
    /// 超时为 0 时任何优化都会立即判超时,视为配置错误
    pub fn validate(&self) -> Result<(), String> {
        if self.request_timeout_ms == 0 {
            return Err("request_timeout_ms 必须 >= 1".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_valid() {
        assert!(OperatorPolicy::default().validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let policy = OperatorPolicy {
            request_timeout_ms: 0,
            ..OperatorPolicy::default()
        };
        assert!(policy.validate().is_err());
    }
}

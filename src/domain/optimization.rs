// ==========================================
// 地铁列车投运编排系统 - 优化过程与结果实体
// ==========================================
// 职责: 约束信号、车队统计、分配记录、优化结果
// 红线: 每次运行新建,返回后不可变,核心不负责持久化
// ==========================================

use crate::domain::trainset::{InductionTargets, Trainset};
use crate::domain::types::{AssignReason, BlockedReason, InductionStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// EligibilitySignal - 约束评估信号
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EligibilitySignal {
    pub hard_blocked: bool,
    pub blocked_reason: Option<BlockedReason>,
    pub soft_penalty: f64,
}

impl EligibilitySignal {
    pub fn blocked(reason: BlockedReason) -> Self {
        Self {
            hard_blocked: true,
            blocked_reason: Some(reason),
            soft_penalty: 0.0,
        }
    }

    pub fn eligible(soft_penalty: f64) -> Self {
        Self {
            hard_blocked: false,
            blocked_reason: None,
            soft_penalty,
        }
    }
}

// ==========================================
// FleetStats - 车队均值 (评分基准)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct FleetStats {
    pub trainset_count: usize,
    pub average_mileage_km: f64,
    pub average_branding_hours: f64,
}

// ==========================================
// ScoredTrainset - 分配器输入三元组
// ==========================================
#[derive(Debug, Clone)]
pub struct ScoredTrainset<'a> {
    pub trainset: &'a Trainset,
    pub eligibility: EligibilitySignal,
    pub score: f64,
}

// ==========================================
// InductionAssignment - 单车分配记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InductionAssignment {
    pub trainset_id: i64,
    pub status: InductionStatus,
    pub score: f64,
    pub eligibility: EligibilitySignal,
    /// 在可投运车组中的排名（从 1 开始）,硬阻断车组为 None
    pub rank: Option<usize>,
    pub assign_reason: AssignReason,
}

// ==========================================
// 分布统计
// ==========================================

/// 实际状态分布（字段名与客户端一致）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StatusDistribution {
    #[serde(rename = "Ready")]
    pub ready: usize,
    #[serde(rename = "Standby")]
    pub standby: usize,
    #[serde(rename = "Maintenance")]
    pub maintenance: usize,
}

impl StatusDistribution {
    pub fn total(&self) -> usize {
        self.ready + self.standby + self.maintenance
    }

    pub fn count_of(&self, status: InductionStatus) -> usize {
        match status {
            InductionStatus::Ready => self.ready,
            InductionStatus::Standby => self.standby,
            InductionStatus::Maintenance => self.maintenance,
        }
    }

    pub(crate) fn increment(&mut self, status: InductionStatus) {
        match status {
            InductionStatus::Ready => self.ready += 1,
            InductionStatus::Standby => self.standby += 1,
            InductionStatus::Maintenance => self.maintenance += 1,
        }
    }
}

/// 目标分布（请求回显）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TargetDistribution {
    pub ready: usize,
    pub standby: usize,
    pub maintenance: usize,
}

impl From<InductionTargets> for TargetDistribution {
    fn from(targets: InductionTargets) -> Self {
        Self {
            ready: targets.ready,
            standby: targets.standby,
            maintenance: targets.maintenance,
        }
    }
}

/// 目标缺口（target - actual,下限 0）
///
/// 检修不受目标约束,因此只统计运营与备用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TargetShortfall {
    pub ready: usize,
    pub standby: usize,
}

impl TargetShortfall {
    pub fn is_empty(&self) -> bool {
        self.ready == 0 && self.standby == 0
    }
}

// ==========================================
// OptimizationSummary - 汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationSummary {
    pub total_trainsets: usize,
    pub blocked_count: usize,
    pub status_distribution: StatusDistribution,
    pub target_distribution: TargetDistribution,
    pub shortfall: TargetShortfall,
    pub fleet_stats: FleetStats,
    pub optimization_timestamp: DateTime<Utc>,
}

// ==========================================
// OptimizationResult - 优化结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// 已写入 status 的编组集合（按 id 升序）
    pub optimized_trainsets: Vec<Trainset>,
    /// 分配明细（按 id 升序）
    pub assignments: Vec<InductionAssignment>,
    pub summary: OptimizationSummary,
    pub optimization_score: f64,
}

impl OptimizationResult {
    pub fn status_distribution(&self) -> StatusDistribution {
        self.summary.status_distribution
    }

    pub fn target_distribution(&self) -> TargetDistribution {
        self.summary.target_distribution
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.summary.optimization_timestamp
    }

    /// 指定状态下的编组 id（升序）
    pub fn ids_with_status(&self, status: InductionStatus) -> Vec<i64> {
        self.assignments
            .iter()
            .filter(|a| a.status == status)
            .map(|a| a.trainset_id)
            .collect()
    }

    pub fn assignment_for(&self, trainset_id: i64) -> Option<&InductionAssignment> {
        self.assignments
            .iter()
            .find(|a| a.trainset_id == trainset_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_distribution_serializes_with_client_keys() {
        let dist = StatusDistribution {
            ready: 2,
            standby: 1,
            maintenance: 4,
        };
        let json = serde_json::to_value(dist).unwrap();
        assert_eq!(json["Ready"], 2);
        assert_eq!(json["Standby"], 1);
        assert_eq!(json["Maintenance"], 4);
        assert_eq!(dist.total(), 7);
    }
}

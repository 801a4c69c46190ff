// ==========================================
// 地铁列车投运编排系统 - 列车编组实体
// ==========================================
// 职责: 定义编组快照与优化请求
// 红线: status 为分配器输出,不作为决策输入
// ==========================================

use crate::domain::types::{CleaningStatus, FitnessStatus, InductionStatus};
use serde::{Deserialize, Serialize};

// ==========================================
// Trainset - 列车编组 (一列物理车组)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trainset {
    // ===== 主键 =====
    pub id: i64, // 快照生命周期内不可变

    // ===== 展示信息 =====
    pub name: String,

    // ===== 约束输入 =====
    pub fitness_status: FitnessStatus,
    pub job_cards_open: u32,
    pub cleaning_status: CleaningStatus,

    // ===== 均衡输入 =====
    pub branding_hours: f64, // 已累计广告曝光小时
    pub mileage_km: f64,     // 累计里程

    // ===== 报表信息 =====
    pub stabling_position: i32, // 停放股道,仅用于报表

    // ===== 输出 =====
    #[serde(default)]
    pub status: Option<InductionStatus>,
}

// ==========================================
// OptimizationRequest - 优化请求 (目标配额)
// ==========================================
// 说明:
// - 字段保留有符号/可缺失形态,以便在分配前显式报出校验错误,而不是静默修正
// - 三者之和不要求等于车队规模
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OptimizationRequest {
    #[serde(default)]
    pub target_ready: Option<i64>,
    #[serde(default)]
    pub target_standby: Option<i64>,
    #[serde(default)]
    pub target_maintenance: Option<i64>,
}

impl OptimizationRequest {
    /// 以完整目标构造请求
    pub fn new(target_ready: i64, target_standby: i64, target_maintenance: i64) -> Self {
        Self {
            target_ready: Some(target_ready),
            target_standby: Some(target_standby),
            target_maintenance: Some(target_maintenance),
        }
    }

    /// 用给定默认值补齐缺失的目标（运营策略层使用,核心本身不补默认值）
    pub fn with_defaults(self, defaults: InductionTargets) -> Self {
        Self {
            target_ready: self.target_ready.or(Some(defaults.ready as i64)),
            target_standby: self.target_standby.or(Some(defaults.standby as i64)),
            target_maintenance: self
                .target_maintenance
                .or(Some(defaults.maintenance as i64)),
        }
    }
}

// ==========================================
// InductionTargets - 已校验的目标配额
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct InductionTargets {
    pub ready: usize,
    pub standby: usize,
    pub maintenance: usize,
}

impl InductionTargets {
    pub fn new(ready: usize, standby: usize, maintenance: usize) -> Self {
        Self {
            ready,
            standby,
            maintenance,
        }
    }
}

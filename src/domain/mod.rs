// ==========================================
// 地铁列车投运编排系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod optimization;
pub mod trainset;
pub mod types;

// 重导出核心类型
pub use optimization::{
    EligibilitySignal, FleetStats, InductionAssignment, OptimizationResult, OptimizationSummary,
    ScoredTrainset, StatusDistribution, TargetDistribution, TargetShortfall,
};
pub use trainset::{InductionTargets, OptimizationRequest, Trainset};
pub use types::{AssignReason, BlockedReason, CleaningStatus, FitnessStatus, InductionStatus};

// ==========================================
// 地铁列车投运编排系统 - 引擎层（投运优化核心）
// ==========================================
// 职责: 约束评估 → 评分 → 分配 → 汇总
// 红线: 引擎不做 I/O, 所有分配必须输出 reason
// ==========================================

pub mod allocator;
pub mod constraint;
pub mod error;
pub mod optimizer;
pub mod scoring;
pub mod summary;

// 重导出核心引擎
pub use allocator::{AllocationOutcome, InductionAllocator};
pub use constraint::ConstraintEvaluator;
pub use error::{OptimizerError, OptimizerResult, ValidationIssue};
pub use optimizer::InductionOptimizer;
pub use scoring::ScoringEngine;
pub use summary::SummaryBuilder;

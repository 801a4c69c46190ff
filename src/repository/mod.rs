// ==========================================
// 地铁列车投运编排系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化
// ==========================================

pub mod error;
pub mod optimization_run_repo;
pub mod trainset_repo;

use crate::domain::Trainset;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use optimization_run_repo::{OptimizationRunEntity, OptimizationRunRepository};
pub use trainset_repo::TrainsetRepository;

// ==========================================
// TrainsetSnapshotProvider - 编组快照来源
// ==========================================
/// 为一次优化请求提供时点一致的编组快照
///
/// 优化核心只接收快照切片,不直接依赖此 trait
pub trait TrainsetSnapshotProvider: Send + Sync {
    fn snapshot(&self) -> RepositoryResult<Vec<Trainset>>;
}

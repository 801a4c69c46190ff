// ==========================================
// 地铁列车投运编排系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供命令行调用
// ==========================================

pub mod error;
pub mod induction_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use induction_api::{HealthStatus, InductionApi, OptimizeResponse, RunSummaryView};

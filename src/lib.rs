// ==========================================
// 地铁列车投运编排系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite + tokio
// 系统定位: 夜间投运决策支持 (人工最终控制权)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 投运优化核心
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 性能埋点
pub mod perf;

// API 层 - 业务接口
pub mod api;

// 应用层 - 装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    AssignReason, BlockedReason, CleaningStatus, FitnessStatus, InductionStatus,
};

// 领域实体
pub use domain::{
    InductionAssignment, InductionTargets, OptimizationRequest, OptimizationResult,
    OptimizationSummary, Trainset,
};

// 引擎
pub use engine::{InductionOptimizer, OptimizerError, ValidationIssue};

// 配置
pub use config::{OperatorPolicy, OptimizerConfig};

// API
pub use api::{ApiError, InductionApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "地铁列车投运编排系统";

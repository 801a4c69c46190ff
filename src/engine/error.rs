// ==========================================
// 地铁列车投运编排系统 - 优化核心错误类型
// ==========================================
// 分类:
// - Validation: 分配前校验失败,调用方需修正请求,不返回部分结果
// - InconsistentState: 分配后不变量失败,属内部缺陷,中止本次运行
// ==========================================

use thiserror::Error;

/// 校验失败明细
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationIssue {
    #[error("目标配额缺失: {field}")]
    MissingTarget { field: &'static str },

    #[error("目标配额不得为负: {field}={value}")]
    NegativeTarget { field: &'static str, value: i64 },

    #[error("编组 id 重复: id={id}")]
    DuplicateTrainsetId { id: i64 },

    #[error("编组字段非法: id={id}, field={field}, value={value}")]
    InvalidTrainsetField {
        id: i64,
        field: &'static str,
        value: f64,
    },

    #[error("优化器参数非法: {0}")]
    InvalidConfig(String),
}

/// 优化核心错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptimizerError {
    #[error("请求校验失败: {0}")]
    Validation(#[from] ValidationIssue),

    #[error("分配结果不一致: {detail} (expected={expected}, actual={actual})")]
    InconsistentState {
        detail: String,
        expected: usize,
        actual: usize,
    },
}

impl OptimizerError {
    pub fn is_validation(&self) -> bool {
        matches!(self, OptimizerError::Validation(_))
    }
}

/// Result 类型别名
pub type OptimizerResult<T> = Result<T, OptimizerError>;

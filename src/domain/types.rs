// ==========================================
// 地铁列车投运编排系统 - 领域类型定义
// ==========================================
// 红线: 状态均为封闭枚举,不做字符串比较
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 适用性证书状态 (Fitness Status)
// ==========================================
// Expired 为投运硬阻断
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FitnessStatus {
    Valid,   // 有效
    Pending, // 待复核
    Expired, // 已过期
}

impl fmt::Display for FitnessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitnessStatus::Valid => write!(f, "Valid"),
            FitnessStatus::Pending => write!(f, "Pending"),
            FitnessStatus::Expired => write!(f, "Expired"),
        }
    }
}

impl FromStr for FitnessStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "valid" => Ok(FitnessStatus::Valid),
            "pending" => Ok(FitnessStatus::Pending),
            "expired" => Ok(FitnessStatus::Expired),
            other => Err(format!("未知适用性状态: {}", other)),
        }
    }
}

// ==========================================
// 清洁状态 (Cleaning Status)
// ==========================================
// 序列化格式与客户端一致: "In Progress" 含空格
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CleaningStatus {
    Complete, // 已完成
    #[serde(rename = "In Progress")]
    InProgress, // 进行中
    Pending, // 未开始
}

impl fmt::Display for CleaningStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CleaningStatus::Complete => write!(f, "Complete"),
            CleaningStatus::InProgress => write!(f, "In Progress"),
            CleaningStatus::Pending => write!(f, "Pending"),
        }
    }
}

impl FromStr for CleaningStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', '-'], " ").as_str() {
            "complete" => Ok(CleaningStatus::Complete),
            "in progress" | "inprogress" => Ok(CleaningStatus::InProgress),
            "pending" => Ok(CleaningStatus::Pending),
            other => Err(format!("未知清洁状态: {}", other)),
        }
    }
}

// ==========================================
// 投运状态 (Induction Status)
// ==========================================
// 分配器的唯一输出
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum InductionStatus {
    Ready,       // 投入运营
    Standby,     // 备用
    Maintenance, // 检修留置
}

impl InductionStatus {
    /// 全部状态,按汇总展示顺序
    pub const ALL: [InductionStatus; 3] = [
        InductionStatus::Ready,
        InductionStatus::Standby,
        InductionStatus::Maintenance,
    ];
}

impl fmt::Display for InductionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InductionStatus::Ready => write!(f, "Ready"),
            InductionStatus::Standby => write!(f, "Standby"),
            InductionStatus::Maintenance => write!(f, "Maintenance"),
        }
    }
}

impl FromStr for InductionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ready" => Ok(InductionStatus::Ready),
            "standby" => Ok(InductionStatus::Standby),
            "maintenance" => Ok(InductionStatus::Maintenance),
            other => Err(format!("未知投运状态: {}", other)),
        }
    }
}

// ==========================================
// 硬阻断原因 (Blocked Reason)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockedReason {
    FitnessExpired,        // 适用性证书过期
    ExcessiveOpenJobCards, // 未关闭工单过多
}

impl fmt::Display for BlockedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockedReason::FitnessExpired => write!(f, "FITNESS_EXPIRED"),
            BlockedReason::ExcessiveOpenJobCards => write!(f, "EXCESSIVE_OPEN_JOB_CARDS"),
        }
    }
}

// ==========================================
// 分配原因 (Assign Reason)
// ==========================================
// 可解释性: 每条分配结果必须带原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignReason {
    HardBlocked,           // 硬阻断,强制检修
    ReadyByRank,           // 按排名进入运营
    StandbyByRank,         // 按排名进入备用
    OverflowToMaintenance, // 超出目标,落入检修
}

impl fmt::Display for AssignReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignReason::HardBlocked => write!(f, "HARD_BLOCKED"),
            AssignReason::ReadyByRank => write!(f, "READY_BY_RANK"),
            AssignReason::StandbyByRank => write!(f, "STANDBY_BY_RANK"),
            AssignReason::OverflowToMaintenance => write!(f, "OVERFLOW_TO_MAINTENANCE"),
        }
    }
}

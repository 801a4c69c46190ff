// ==========================================
// 地铁列车投运编排系统 - 汇总构建器
// ==========================================
// 职责: 分布统计、目标回显、缺口、运行评分、完成时间
// 输入: 分配明细 + 编组快照 + 目标配额 + 完成时刻
// 输出: OptimizationResult
// 红线: 分布合计必须等于编组总数,否则中止
// ==========================================

use crate::domain::types::InductionStatus;
use crate::domain::{
    FleetStats, InductionAssignment, InductionTargets, OptimizationResult, OptimizationSummary,
    StatusDistribution, TargetDistribution, TargetShortfall, Trainset,
};
use crate::engine::error::{OptimizerError, OptimizerResult};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::{error, warn};

// ==========================================
// SummaryBuilder - 汇总构建器
// ==========================================
pub struct SummaryBuilder;

impl SummaryBuilder {
    pub fn new() -> Self {
        Self
    }

    /// 构建优化结果
    ///
    /// # 参数
    /// - `trainsets`: 本次运行的编组快照（按 id 升序）
    /// - `assignments`: 分配明细（按 id 升序）
    /// - `targets`: 目标配额
    /// - `fleet_stats`: 评分所用车队均值
    /// - `blocked_count`: 硬阻断数量
    /// - `completed_at`: 运行完成时刻（调用方只取一次）
    ///
    /// # 返回
    /// - Err(InconsistentState): 有编组缺少分配 / 分布合计不等于总数
    pub fn summarize(
        &self,
        trainsets: &[Trainset],
        assignments: Vec<InductionAssignment>,
        targets: InductionTargets,
        fleet_stats: FleetStats,
        blocked_count: usize,
        completed_at: DateTime<Utc>,
    ) -> OptimizerResult<OptimizationResult> {
        let status_distribution = Self::count_statuses(&assignments);

        // 不变量 1: 分布合计 == 编组总数
        if status_distribution.total() != trainsets.len() {
            error!(
                expected = trainsets.len(),
                actual = status_distribution.total(),
                "状态分布合计与编组总数不一致"
            );
            return Err(OptimizerError::InconsistentState {
                detail: "status_distribution 合计与编组总数不一致".to_string(),
                expected: trainsets.len(),
                actual: status_distribution.total(),
            });
        }

        // 不变量 2: 每个编组恰有一条分配
        let status_by_id: HashMap<i64, InductionStatus> = assignments
            .iter()
            .map(|a| (a.trainset_id, a.status))
            .collect();
        let mut optimized_trainsets = Vec::with_capacity(trainsets.len());
        for trainset in trainsets {
            let status = match status_by_id.get(&trainset.id) {
                Some(status) => *status,
                None => {
                    error!(trainset_id = trainset.id, "编组缺少分配结果");
                    return Err(OptimizerError::InconsistentState {
                        detail: format!("编组 id={} 缺少分配结果", trainset.id),
                        expected: trainsets.len(),
                        actual: status_by_id.len(),
                    });
                }
            };
            let mut assigned = trainset.clone();
            assigned.status = Some(status);
            optimized_trainsets.push(assigned);
        }

        let target_distribution = TargetDistribution::from(targets);
        let shortfall = TargetShortfall {
            ready: targets.ready.saturating_sub(status_distribution.ready),
            standby: targets.standby.saturating_sub(status_distribution.standby),
        };
        if !shortfall.is_empty() {
            warn!(
                ready_shortfall = shortfall.ready,
                standby_shortfall = shortfall.standby,
                "可投运编组不足，目标未满足"
            );
        }

        let optimization_score = Self::ready_mean_score(&assignments);

        Ok(OptimizationResult {
            optimized_trainsets,
            assignments,
            summary: OptimizationSummary {
                total_trainsets: trainsets.len(),
                blocked_count,
                status_distribution,
                target_distribution,
                shortfall,
                fleet_stats,
                optimization_timestamp: completed_at,
            },
            optimization_score,
        })
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    fn count_statuses(assignments: &[InductionAssignment]) -> StatusDistribution {
        let mut dist = StatusDistribution::default();
        for a in assignments {
            dist.increment(a.status);
        }
        dist
    }

    /// 运行评分 = 运营编组评分均值,运营为空时为 0
    fn ready_mean_score(assignments: &[InductionAssignment]) -> f64 {
        let ready: Vec<f64> = assignments
            .iter()
            .filter(|a| a.status == InductionStatus::Ready)
            .map(|a| a.score)
            .collect();

        if ready.is_empty() {
            return 0.0;
        }
        ready.iter().sum::<f64>() / ready.len() as f64
    }
}

impl Default for SummaryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{AssignReason, CleaningStatus, FitnessStatus};
    use crate::domain::EligibilitySignal;
    use chrono::TimeZone;

    fn create_test_trainset(id: i64) -> Trainset {
        Trainset {
            id,
            name: format!("Rake {:02}", id),
            fitness_status: FitnessStatus::Valid,
            job_cards_open: 0,
            branding_hours: 100.0,
            mileage_km: 80_000.0,
            cleaning_status: CleaningStatus::Complete,
            stabling_position: 1,
            status: Some(InductionStatus::Maintenance),
        }
    }

    fn create_assignment(id: i64, status: InductionStatus, score: f64) -> InductionAssignment {
        InductionAssignment {
            trainset_id: id,
            status,
            score,
            eligibility: EligibilitySignal::eligible(0.0),
            rank: Some(id as usize),
            assign_reason: AssignReason::ReadyByRank,
        }
    }

    fn completed_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 20, 22, 30, 0).unwrap()
    }

    #[test]
    fn test_summary_counts_and_mean_ready_score() {
        let builder = SummaryBuilder::new();
        let fleet: Vec<Trainset> = (1..=4).map(create_test_trainset).collect();
        let assignments = vec![
            create_assignment(1, InductionStatus::Ready, 90.0),
            create_assignment(2, InductionStatus::Ready, 80.0),
            create_assignment(3, InductionStatus::Standby, 70.0),
            create_assignment(4, InductionStatus::Maintenance, 10.0),
        ];

        let result = builder
            .summarize(
                &fleet,
                assignments,
                InductionTargets::new(2, 2, 0),
                FleetStats::default(),
                0,
                completed_at(),
            )
            .unwrap();

        assert_eq!(result.status_distribution().ready, 2);
        assert_eq!(result.status_distribution().standby, 1);
        assert_eq!(result.status_distribution().maintenance, 1);
        assert_eq!(result.summary.total_trainsets, 4);
        assert_eq!(result.summary.shortfall.standby, 1);
        assert_eq!(result.summary.shortfall.ready, 0);
        assert!((result.optimization_score - 85.0).abs() < 1e-9);
        assert_eq!(result.timestamp(), completed_at());
        assert_eq!(result.optimized_trainsets[0].status, Some(InductionStatus::Ready));
    }

    #[test]
    fn test_empty_ready_scores_zero() {
        let builder = SummaryBuilder::new();
        let fleet = vec![create_test_trainset(1)];
        let assignments = vec![create_assignment(1, InductionStatus::Maintenance, 99.0)];

        let result = builder
            .summarize(
                &fleet,
                assignments,
                InductionTargets::new(0, 0, 0),
                FleetStats::default(),
                0,
                completed_at(),
            )
            .unwrap();

        assert_eq!(result.optimization_score, 0.0);
    }

    #[test]
    fn test_missing_assignment_is_inconsistent_state() {
        let builder = SummaryBuilder::new();
        let fleet: Vec<Trainset> = (1..=2).map(create_test_trainset).collect();
        let assignments = vec![create_assignment(1, InductionStatus::Ready, 90.0)];

        let err = builder
            .summarize(
                &fleet,
                assignments,
                InductionTargets::new(1, 0, 0),
                FleetStats::default(),
                0,
                completed_at(),
            )
            .unwrap_err();

        assert!(matches!(
            err,
            OptimizerError::InconsistentState {
                expected: 2,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_foreign_assignment_is_inconsistent_state() {
        // 分布合计相同但 id 对不上
        let builder = SummaryBuilder::new();
        let fleet: Vec<Trainset> = (1..=2).map(create_test_trainset).collect();
        let assignments = vec![
            create_assignment(1, InductionStatus::Ready, 90.0),
            create_assignment(9, InductionStatus::Standby, 90.0),
        ];

        let err = builder
            .summarize(
                &fleet,
                assignments,
                InductionTargets::new(1, 1, 0),
                FleetStats::default(),
                0,
                completed_at(),
            )
            .unwrap_err();

        assert!(!err.is_validation());
    }
}

// ==========================================
// 地铁列车投运编排系统 - 投运优化器（编排入口）
// ==========================================
// 流程: 校验 → 约束评估 → 评分 → 分配 → 汇总
// 红线: 纯同步单遍计算,无 I/O,不共享可变状态
// 红线: 决策只依赖约束/评分,不读取编组既有 status
// ==========================================

use crate::config::OptimizerConfig;
use crate::domain::{
    InductionTargets, OptimizationRequest, OptimizationResult, ScoredTrainset, Trainset,
};
use crate::engine::allocator::InductionAllocator;
use crate::engine::constraint::ConstraintEvaluator;
use crate::engine::error::{OptimizerResult, ValidationIssue};
use crate::engine::scoring::ScoringEngine;
use crate::engine::summary::SummaryBuilder;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tracing::{debug, info, instrument};

// ==========================================
// InductionOptimizer - 投运优化器
// ==========================================
pub struct InductionOptimizer {
    config: OptimizerConfig,
    evaluator: ConstraintEvaluator,
    scorer: ScoringEngine,
    allocator: InductionAllocator,
    summary_builder: SummaryBuilder,
}

impl InductionOptimizer {
    /// 创建优化器
    ///
    /// # 返回
    /// - Err(Validation(InvalidConfig)): 参数非法
    pub fn new(config: OptimizerConfig) -> OptimizerResult<Self> {
        config.validate().map_err(ValidationIssue::InvalidConfig)?;

        Ok(Self {
            config,
            evaluator: ConstraintEvaluator::new(config),
            scorer: ScoringEngine::new(config),
            allocator: InductionAllocator::new(),
            summary_builder: SummaryBuilder::new(),
        })
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 执行一次投运优化
    ///
    /// # 参数
    /// - `trainsets`: 编组快照（只读,不会被修改）
    /// - `request`: 目标配额
    ///
    /// # 返回
    /// - Ok(OptimizationResult): 新建的、独立的结果集合
    /// - Err(Validation): 目标缺失/为负、id 重复、数值字段非法
    /// - Err(InconsistentState): 分配后不变量失败
    pub fn optimize(
        &self,
        trainsets: &[Trainset],
        request: &OptimizationRequest,
    ) -> OptimizerResult<OptimizationResult> {
        self.optimize_with_clock(trainsets, request, Utc::now)
    }

    /// 执行一次投运优化,完成时刻由 `clock` 提供（只调用一次）
    #[instrument(skip(self, trainsets, clock), fields(fleet_size = trainsets.len()))]
    pub fn optimize_with_clock<F>(
        &self,
        trainsets: &[Trainset],
        request: &OptimizationRequest,
        clock: F,
    ) -> OptimizerResult<OptimizationResult>
    where
        F: FnOnce() -> DateTime<Utc>,
    {
        // === 步骤 1: 校验 ===
        let targets = Self::validate_request(request)?;
        Self::validate_trainsets(trainsets)?;

        // 快照副本按 id 升序,与输入顺序无关
        let mut snapshot: Vec<Trainset> = trainsets.to_vec();
        snapshot.sort_by_key(|t| t.id);

        // === 步骤 2: 约束评估 ===
        let signals = self.evaluator.evaluate_fleet(&snapshot);

        // === 步骤 3: 评分 ===
        let fleet_stats = ScoringEngine::fleet_stats(&snapshot);
        let candidates: Vec<ScoredTrainset<'_>> = snapshot
            .iter()
            .zip(signals)
            .map(|(trainset, eligibility)| ScoredTrainset {
                trainset,
                eligibility,
                score: self.scorer.score(trainset, &eligibility, &fleet_stats),
            })
            .collect();
        debug!(
            average_mileage_km = fleet_stats.average_mileage_km,
            average_branding_hours = fleet_stats.average_branding_hours,
            "评分完成"
        );

        // === 步骤 4: 分配 ===
        let outcome = self.allocator.allocate(&candidates, targets);

        // === 步骤 5: 汇总 ===
        let completed_at = clock();
        let result = self.summary_builder.summarize(
            &snapshot,
            outcome.assignments,
            targets,
            fleet_stats,
            outcome.blocked_count,
            completed_at,
        )?;

        info!(
            ready = result.summary.status_distribution.ready,
            standby = result.summary.status_distribution.standby,
            maintenance = result.summary.status_distribution.maintenance,
            blocked = result.summary.blocked_count,
            optimization_score = result.optimization_score,
            "投运优化完成"
        );

        Ok(result)
    }

    // ==========================================
    // 校验
    // ==========================================

    /// 校验目标配额（缺失或为负均报错,不做静默修正）
    pub fn validate_request(request: &OptimizationRequest) -> OptimizerResult<InductionTargets> {
        let ready = Self::validate_target("target_ready", request.target_ready)?;
        let standby = Self::validate_target("target_standby", request.target_standby)?;
        let maintenance = Self::validate_target("target_maintenance", request.target_maintenance)?;
        Ok(InductionTargets::new(ready, standby, maintenance))
    }

    fn validate_target(field: &'static str, value: Option<i64>) -> OptimizerResult<usize> {
        match value {
            None => Err(ValidationIssue::MissingTarget { field }.into()),
            Some(v) if v < 0 => Err(ValidationIssue::NegativeTarget { field, value: v }.into()),
            Some(v) => Ok(v as usize),
        }
    }

    /// 校验编组快照
    ///
    /// - id 唯一
    /// - mileage_km / branding_hours 为非负有限数
    pub fn validate_trainsets(trainsets: &[Trainset]) -> OptimizerResult<()> {
        let mut seen: HashSet<i64> = HashSet::with_capacity(trainsets.len());

        for trainset in trainsets {
            if !seen.insert(trainset.id) {
                return Err(ValidationIssue::DuplicateTrainsetId { id: trainset.id }.into());
            }

            let numeric_fields = [
                ("mileage_km", trainset.mileage_km),
                ("branding_hours", trainset.branding_hours),
            ];
            for (field, value) in numeric_fields {
                if !value.is_finite() || value < 0.0 {
                    return Err(ValidationIssue::InvalidTrainsetField {
                        id: trainset.id,
                        field,
                        value,
                    }
                    .into());
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{CleaningStatus, FitnessStatus, InductionStatus};
    use crate::engine::error::OptimizerError;
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
            stabling_position: id as i32,
            status: None,
        }
    }

    fn fixed_clock() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 20, 23, 0, 0).unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = InductionOptimizer::new(OptimizerConfig {
            branding_epsilon: 0.0,
            ..OptimizerConfig::default()
        });
        assert!(matches!(
            result,
            Err(OptimizerError::Validation(ValidationIssue::InvalidConfig(_)))
        ));
    }

    #[test]
    fn test_non_finite_or_inverted_score_range_rejected() {
        let configs = [
            OptimizerConfig {
                score_min: f64::NAN,
                ..OptimizerConfig::default()
            },
            OptimizerConfig {
                score_max: f64::INFINITY,
                ..OptimizerConfig::default()
            },
            OptimizerConfig {
                score_min: 150.0,
                score_max: 50.0,
                ..OptimizerConfig::default()
            },
        ];
        for config in configs {
            assert!(matches!(
                InductionOptimizer::new(config),
                Err(OptimizerError::Validation(ValidationIssue::InvalidConfig(_)))
            ));
        }
    }

    #[test]
    fn test_negative_target_rejected() {
        let optimizer = InductionOptimizer::new(OptimizerConfig::default()).unwrap();
        let err = optimizer
            .optimize(&[create_test_trainset(1)], &OptimizationRequest::new(1, -1, 0))
            .unwrap_err();
        assert_eq!(
            err,
            OptimizerError::Validation(ValidationIssue::NegativeTarget {
                field: "target_standby",
                value: -1
            })
        );
    }

    #[test]
    fn test_missing_target_rejected() {
        let optimizer = InductionOptimizer::new(OptimizerConfig::default()).unwrap();
        let request = OptimizationRequest {
            target_ready: Some(1),
            target_standby: Some(1),
            target_maintenance: None,
        };
        let err = optimizer.optimize(&[], &request).unwrap_err();
        assert_eq!(
            err,
            OptimizerError::Validation(ValidationIssue::MissingTarget {
                field: "target_maintenance"
            })
        );
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let optimizer = InductionOptimizer::new(OptimizerConfig::default()).unwrap();
        let fleet = vec![create_test_trainset(4), create_test_trainset(4)];
        let err = optimizer
            .optimize(&fleet, &OptimizationRequest::new(1, 0, 0))
            .unwrap_err();
        assert_eq!(
            err,
            OptimizerError::Validation(ValidationIssue::DuplicateTrainsetId { id: 4 })
        );
    }

    #[test]
    fn test_nan_mileage_rejected() {
        let optimizer = InductionOptimizer::new(OptimizerConfig::default()).unwrap();
        let mut t = create_test_trainset(1);
        t.mileage_km = f64::NAN;
        let err = optimizer
            .optimize(&[t], &OptimizationRequest::new(1, 0, 0))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let optimizer = InductionOptimizer::new(OptimizerConfig::default()).unwrap();
        let mut fleet: Vec<Trainset> = (1..=6).map(create_test_trainset).collect();
        fleet[2].mileage_km = 20_000.0;
        fleet[4].branding_hours = 10.0;
        let mut reversed = fleet.clone();
        reversed.reverse();

        let request = OptimizationRequest::new(2, 2, 2);
        let a = optimizer.optimize_with_clock(&fleet, &request, fixed_clock).unwrap();
        let b = optimizer.optimize_with_clock(&reversed, &request, fixed_clock).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.optimized_trainsets[0].id, 1);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let optimizer = InductionOptimizer::new(OptimizerConfig::default()).unwrap();
        let fleet: Vec<Trainset> = (1..=3).map(create_test_trainset).collect();
        let before = fleet.clone();

        let result = optimizer
            .optimize(&fleet, &OptimizationRequest::new(1, 1, 1))
            .unwrap();

        assert_eq!(fleet, before);
        assert!(result
            .optimized_trainsets
            .iter()
            .all(|t| t.status.is_some()));
        assert_eq!(result.ids_with_status(InductionStatus::Ready).len(), 1);
    }
}

// ==========================================
// 地铁列车投运编排系统 - 约束评估器
// ==========================================
// 红线: 证书过期 / 工单过多 的编组不得投入运营
// ==========================================
// 职责: 逐车给出硬阻断与软惩罚信号
// 输入: Trainset 快照
// 输出: EligibilitySignal（不可变值）
// 红线: 无状态、无副作用、无 I/O 操作
// ==========================================

use crate::config::OptimizerConfig;
use crate::domain::types::{BlockedReason, CleaningStatus, FitnessStatus};
use crate::domain::{EligibilitySignal, Trainset};

// ==========================================
// ConstraintEvaluator - 约束评估器
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct ConstraintEvaluator {
    config: OptimizerConfig,
}

impl ConstraintEvaluator {
    /// 调用方须先通过 `OptimizerConfig::validate`,外部经 `InductionOptimizer::new` 构造
    pub(crate) fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    /// 评估单个编组
    ///
    /// # 规则（固定顺序,首个硬规则命中即返回）
    /// 1. fitness_status = Expired → 硬阻断 FITNESS_EXPIRED
    /// 2. job_cards_open >= high_job_card_threshold → 硬阻断 EXCESSIVE_OPEN_JOB_CARDS
    /// 3. 否则累计软惩罚:
    ///    - fitness_status = Pending → P1
    ///    - job_cards_open > 0 → P2 × job_cards_open
    ///    - cleaning_status = In Progress / Pending → 对应清洁惩罚（Pending 更重）
    pub fn evaluate(&self, trainset: &Trainset) -> EligibilitySignal {
        // 规则 1: 证书过期
        if trainset.fitness_status == FitnessStatus::Expired {
            return EligibilitySignal::blocked(BlockedReason::FitnessExpired);
        }

        // 规则 2: 工单过多
        if trainset.job_cards_open >= self.config.high_job_card_threshold {
            return EligibilitySignal::blocked(BlockedReason::ExcessiveOpenJobCards);
        }

        // 规则 3: 软惩罚
        EligibilitySignal::eligible(self.soft_penalty(trainset))
    }

    /// 批量评估,输出顺序与输入一致
    pub fn evaluate_fleet(&self, trainsets: &[Trainset]) -> Vec<EligibilitySignal> {
        trainsets.iter().map(|t| self.evaluate(t)).collect()
    }

    fn soft_penalty(&self, trainset: &Trainset) -> f64 {
        let fitness = match trainset.fitness_status {
            FitnessStatus::Pending => self.config.fitness_pending_penalty,
            FitnessStatus::Valid | FitnessStatus::Expired => 0.0,
        };

        let job_cards = self.config.job_card_penalty * f64::from(trainset.job_cards_open);

        let cleaning = match trainset.cleaning_status {
            CleaningStatus::Complete => 0.0,
            CleaningStatus::InProgress => self.config.cleaning_in_progress_penalty,
            CleaningStatus::Pending => self.config.cleaning_pending_penalty,
        };

        fitness + job_cards + cleaning
    }
}

impl Default for ConstraintEvaluator {
    fn default() -> Self {
        Self::new(OptimizerConfig::default())
    }
}

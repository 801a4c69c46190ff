// ==========================================
// 地铁列车投运编排系统 - 优化器参数
// ==========================================
// 职责: 硬阻断阈值、软惩罚权重、均衡系数、评分区间
// 说明: 所有常量均可配置,默认值见 Default 实现
// ==========================================

use serde::{Deserialize, Serialize};

/// 优化器参数
///
/// # 默认值
/// | 参数 | 默认 |
/// |------|------|
/// | high_job_card_threshold | 3 |
/// | fitness_pending_penalty (P1) | 15.0 |
/// | job_card_penalty (P2, 每张) | 5.0 |
/// | cleaning_in_progress_penalty | 5.0 |
/// | cleaning_pending_penalty (P3) | 20.0 |
/// | mileage_weight (k1) | 10.0 |
/// | branding_weight (k2) | 10.0 |
/// | branding_epsilon (ε) | 1.0 |
/// | score_min / score_max | 0.0 / 200.0 |
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// 未关闭工单数达到该值即硬阻断
    pub high_job_card_threshold: u32,
    pub fitness_pending_penalty: f64,
    pub job_card_penalty: f64,
    pub cleaning_in_progress_penalty: f64,
    pub cleaning_pending_penalty: f64,
    pub mileage_weight: f64,
    pub branding_weight: f64,
    pub branding_epsilon: f64,
    pub score_min: f64,
    pub score_max: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            high_job_card_threshold: 3,
            fitness_pending_penalty: 15.0,
            job_card_penalty: 5.0,
            cleaning_in_progress_penalty: 5.0,
            cleaning_pending_penalty: 20.0,
            mileage_weight: 10.0,
            branding_weight: 10.0,
            branding_epsilon: 1.0,
            score_min: 0.0,
            score_max: 200.0,
        }
    }
}

impl OptimizerConfig {
    /// 校验参数
    ///
    /// # 返回
    /// - Ok(()): 参数合法
    /// - Err(String): 第一条不合法原因
    pub fn validate(&self) -> Result<(), String> {
        if self.high_job_card_threshold == 0 {
            return Err("high_job_card_threshold 必须 >= 1".to_string());
        }

        let weights = [
            ("fitness_pending_penalty", self.fitness_pending_penalty),
            ("job_card_penalty", self.job_card_penalty),
            ("cleaning_in_progress_penalty", self.cleaning_in_progress_penalty),
            ("cleaning_pending_penalty", self.cleaning_pending_penalty),
            ("mileage_weight", self.mileage_weight),
            ("branding_weight", self.branding_weight),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} 必须为非负有限数 (实际: {})", name, value));
            }
        }

        if self.cleaning_pending_penalty < self.cleaning_in_progress_penalty {
            return Err(format!(
                "cleaning_pending_penalty ({}) 不得小于 cleaning_in_progress_penalty ({})",
                self.cleaning_pending_penalty, self.cleaning_in_progress_penalty
            ));
        }

        if !self.branding_epsilon.is_finite() || self.branding_epsilon <= 0.0 {
            return Err(format!(
                "branding_epsilon 必须为正有限数 (实际: {})",
                self.branding_epsilon
            ));
        }

        if !self.score_min.is_finite() || !self.score_max.is_finite() {
            return Err("评分区间必须为有限数".to_string());
        }
        if self.score_min > self.score_max {
            return Err(format!(
                "score_min ({}) 不得大于 score_max ({})",
                self.score_min, self.score_max
            ));
        }

        Ok(())
    }
}

// ==========================================
// 地铁列车投运编排系统 - 评分引擎
// ==========================================
// 职责: 计算编组进入运营状态的期望分（越高越优先）
// 输入: Trainset + EligibilitySignal + FleetStats
// 输出: f64 评分（已截断至配置区间）
// 红线: 无随机数、不读时钟,相同输入必得相同评分
// ==========================================

use crate::config::OptimizerConfig;
use crate::domain::{EligibilitySignal, FleetStats, Trainset};

/// 评分基准分
pub const BASE_SCORE: f64 = 100.0;

// ==========================================
// ScoringEngine - 评分引擎
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct ScoringEngine {
    config: OptimizerConfig,
}

impl ScoringEngine {
    /// 调用方须先通过 `OptimizerConfig::validate`,外部经 `InductionOptimizer::new` 构造
    pub(crate) fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    /// 计算车队均值（里程、广告小时）
    ///
    /// 空车队返回全 0
    pub fn fleet_stats(trainsets: &[Trainset]) -> FleetStats {
        if trainsets.is_empty() {
            return FleetStats::default();
        }

        let n = trainsets.len() as f64;
        let total_mileage: f64 = trainsets.iter().map(|t| t.mileage_km).sum();
        let total_branding: f64 = trainsets.iter().map(|t| t.branding_hours).sum();

        FleetStats {
            trainset_count: trainsets.len(),
            average_mileage_km: total_mileage / n,
            average_branding_hours: total_branding / n,
        }
    }

    /// 计算评分
    ///
    /// score = clamp(
    ///     (100 - soft_penalty)
    ///   - k1 × (mileage - avg_mileage) / avg_mileage
    ///   - k2 × (branding - avg_branding) / (avg_branding + ε),
    ///   [score_min, score_max])
    ///
    /// 硬阻断编组同样计分（用于报表）,是否可投运由分配器决定
    pub fn score(
        &self,
        trainset: &Trainset,
        eligibility: &EligibilitySignal,
        fleet_stats: &FleetStats,
    ) -> f64 {
        let base = BASE_SCORE - eligibility.soft_penalty;
        let raw = base
            + self.mileage_term(trainset, fleet_stats)
            + self.branding_term(trainset, fleet_stats);

        raw.clamp(self.config.score_min, self.config.score_max)
    }

    /// 里程均衡项: 高于车队均值的编组扣分,促进里程拉平
    fn mileage_term(&self, trainset: &Trainset, fleet_stats: &FleetStats) -> f64 {
        let avg = fleet_stats.average_mileage_km;
        if avg <= 0.0 {
            return 0.0;
        }
        -self.config.mileage_weight * (trainset.mileage_km - avg) / avg
    }

    /// 广告公平项: 已累计曝光高于均值的编组扣分,优先补足曝光不足的编组
    fn branding_term(&self, trainset: &Trainset, fleet_stats: &FleetStats) -> f64 {
        let avg = fleet_stats.average_branding_hours;
        -self.config.branding_weight * (trainset.branding_hours - avg)
            / (avg + self.config.branding_epsilon)
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(OptimizerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{BlockedReason, CleaningStatus, FitnessStatus};

    fn create_test_trainset(id: i64, mileage_km: f64, branding_hours: f64) -> Trainset {
        Trainset {
            id,
            name: format!("Rake {:02}", id),
            fitness_status: FitnessStatus::Valid,
            job_cards_open: 0,
            branding_hours,
            mileage_km,
            cleaning_status: CleaningStatus::Complete,
            stabling_position: 1,
            status: None,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_fleet_stats_averages() {
        let fleet = vec![
            create_test_trainset(1, 60_000.0, 100.0),
            create_test_trainset(2, 100_000.0, 300.0),
        ];
        let stats = ScoringEngine::fleet_stats(&fleet);
        assert_eq!(stats.trainset_count, 2);
        assert_close(stats.average_mileage_km, 80_000.0);
        assert_close(stats.average_branding_hours, 200.0);
    }

    #[test]
    fn test_fleet_stats_empty_fleet() {
        let stats = ScoringEngine::fleet_stats(&[]);
        assert_eq!(stats, FleetStats::default());
    }

    #[test]
    fn test_average_trainset_scores_base_minus_penalty() {
        let engine = ScoringEngine::default();
        let t = create_test_trainset(1, 80_000.0, 200.0);
        let stats = FleetStats {
            trainset_count: 3,
            average_mileage_km: 80_000.0,
            average_branding_hours: 200.0,
        };

        assert_close(engine.score(&t, &EligibilitySignal::eligible(0.0), &stats), 100.0);
        assert_close(engine.score(&t, &EligibilitySignal::eligible(25.0), &stats), 75.0);
    }

    #[test]
    fn test_high_mileage_loses_score() {
        let engine = ScoringEngine::default();
        let stats = FleetStats {
            trainset_count: 2,
            average_mileage_km: 80_000.0,
            average_branding_hours: 0.0,
        };
        let high = create_test_trainset(1, 120_000.0, 0.0);
        let low = create_test_trainset(2, 40_000.0, 0.0);
        let signal = EligibilitySignal::eligible(0.0);

        // 120k: -10 × 0.5 = -5 ; 40k: -10 × -0.5 = +5
        assert_close(engine.score(&high, &signal, &stats), 95.0);
        assert_close(engine.score(&low, &signal, &stats), 105.0);
    }

    #[test]
    fn test_zero_average_mileage_is_guarded() {
        let engine = ScoringEngine::default();
        let stats = FleetStats {
            trainset_count: 1,
            average_mileage_km: 0.0,
            average_branding_hours: 0.0,
        };
        let t = create_test_trainset(1, 0.0, 0.0);
        let score = engine.score(&t, &EligibilitySignal::eligible(0.0), &stats);
        assert!(score.is_finite());
        assert_close(score, 100.0);
    }

    #[test]
    fn test_branding_shortfall_is_preferred() {
        let engine = ScoringEngine::default();
        let stats = FleetStats {
            trainset_count: 2,
            average_mileage_km: 80_000.0,
            average_branding_hours: 99.0,
        };
        let behind = create_test_trainset(1, 80_000.0, 49.0);
        let ahead = create_test_trainset(2, 80_000.0, 149.0);
        let signal = EligibilitySignal::eligible(0.0);

        // ε = 1: ±10 × 50 / 100 = ±5
        assert_close(engine.score(&behind, &signal, &stats), 105.0);
        assert_close(engine.score(&ahead, &signal, &stats), 95.0);
    }

    #[test]
    fn test_score_is_clamped() {
        let engine = ScoringEngine::new(OptimizerConfig {
            score_min: 10.0,
            score_max: 100.0,
            ..OptimizerConfig::default()
        });
        let stats = FleetStats {
            trainset_count: 2,
            average_mileage_km: 80_000.0,
            average_branding_hours: 100.0,
        };

        let fresh = create_test_trainset(1, 0.0, 0.0);
        assert_close(engine.score(&fresh, &EligibilitySignal::eligible(0.0), &stats), 100.0);

        let worn = create_test_trainset(2, 80_000.0, 100.0);
        assert_close(engine.score(&worn, &EligibilitySignal::eligible(500.0), &stats), 10.0);
    }

    #[test]
    fn test_blocked_trainset_is_still_scored() {
        let engine = ScoringEngine::default();
        let t = create_test_trainset(1, 80_000.0, 100.0);
        let stats = ScoringEngine::fleet_stats(std::slice::from_ref(&t));
        let score = engine.score(
            &t,
            &EligibilitySignal::blocked(BlockedReason::FitnessExpired),
            &stats,
        );
        assert_close(score, 100.0);
    }
}

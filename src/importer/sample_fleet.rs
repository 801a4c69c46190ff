// ==========================================
// 地铁列车投运编排系统 - 示例车队
// ==========================================
// 用途: 新库初始化 / 演示
// 取值范围: 广告时长 50-300h, 里程 50000-120000km, 停放位 1-10
// 确定性生成,同一版本多次调用结果一致
// ==========================================

use crate::domain::types::{CleaningStatus, FitnessStatus};
use crate::domain::Trainset;

/// 示例车队规模
pub const SAMPLE_FLEET_SIZE: usize = 25;

/// 生成示例车队（Rake 01 .. Rake 25）
pub fn sample_fleet() -> Vec<Trainset> {
    (1..=SAMPLE_FLEET_SIZE as i64).map(sample_trainset).collect()
}

fn sample_trainset(id: i64) -> Trainset {
    let fitness_status = match id % 9 {
        0 => FitnessStatus::Expired,
        4 | 7 => FitnessStatus::Pending,
        _ => FitnessStatus::Valid,
    };
    let cleaning_status = match id % 5 {
        1 => CleaningStatus::InProgress,
        3 => CleaningStatus::Pending,
        _ => CleaningStatus::Complete,
    };

    Trainset {
        id,
        name: format!("Rake {:02}", id),
        fitness_status,
        job_cards_open: ((id * 7) % 6) as u32,
        branding_hours: 50.0 + ((id * 37) % 251) as f64,
        mileage_km: 50_000.0 + ((id * 2_713) % 70_001) as f64,
        cleaning_status,
        stabling_position: ((id % 10) + 1) as i32,
        status: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_fleet_shape() {
        let fleet = sample_fleet();
        assert_eq!(fleet.len(), SAMPLE_FLEET_SIZE);
        assert_eq!(fleet[0].name, "Rake 01");
        assert_eq!(fleet[24].name, "Rake 25");

        for t in &fleet {
            assert!((50.0..=300.0).contains(&t.branding_hours));
            assert!((50_000.0..=120_000.0).contains(&t.mileage_km));
            assert!((1..=10).contains(&t.stabling_position));
            assert!(t.status.is_none());
        }
    }

    #[test]
    fn test_sample_fleet_is_deterministic() {
        assert_eq!(sample_fleet(), sample_fleet());
    }

    #[test]
    fn test_sample_fleet_has_blocked_rakes() {
        let fleet = sample_fleet();
        assert!(fleet
            .iter()
            .any(|t| t.fitness_status == FitnessStatus::Expired));
        assert!(fleet.iter().any(|t| t.job_cards_open > 3));
    }
}

// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use metro_induction::domain::types::{CleaningStatus, FitnessStatus, InductionStatus};
use metro_induction::domain::Trainset;

// ==========================================
// Trainset 构建器
// ==========================================
// 默认: 证书有效、无工单、清洁完成、里程 80000、广告 100h
pub struct TrainsetBuilder {
    trainset: Trainset,
}

impl TrainsetBuilder {
    pub fn new(id: i64) -> Self {
        Self {
            trainset: Trainset {
                id,
                name: format!("Rake {:02}", id),
                fitness_status: FitnessStatus::Valid,
                job_cards_open: 0,
                branding_hours: 100.0,
                mileage_km: 80_000.0,
                cleaning_status: CleaningStatus::Complete,
                stabling_position: 1,
                status: None,
            },
        }
    }

    pub fn fitness(mut self, status: FitnessStatus) -> Self {
        self.trainset.fitness_status = status;
        self
    }

    pub fn job_cards(mut self, open: u32) -> Self {
        self.trainset.job_cards_open = open;
        self
    }

    pub fn cleaning(mut self, status: CleaningStatus) -> Self {
        self.trainset.cleaning_status = status;
        self
    }

    pub fn mileage(mut self, km: f64) -> Self {
        self.trainset.mileage_km = km;
        self
    }

    pub fn branding(mut self, hours: f64) -> Self {
        self.trainset.branding_hours = hours;
        self
    }

    pub fn stabling(mut self, position: i32) -> Self {
        self.trainset.stabling_position = position;
        self
    }

    pub fn status(mut self, status: InductionStatus) -> Self {
        self.trainset.status = Some(status);
        self
    }

    pub fn build(self) -> Trainset {
        self.trainset
    }
}

// ==========================================
// 车队构建
// ==========================================

/// id 1..=n 的同质车队
pub fn uniform_fleet(n: i64) -> Vec<Trainset> {
    (1..=n).map(|id| TrainsetBuilder::new(id).build()).collect()
}

/// 混合车队: 含过期证书、高工单、待检、清洁中等各类情况
pub fn mixed_fleet() -> Vec<Trainset> {
    vec![
        TrainsetBuilder::new(1).mileage(60_000.0).branding(200.0).build(),
        TrainsetBuilder::new(2).fitness(FitnessStatus::Expired).mileage(40_000.0).build(),
        TrainsetBuilder::new(3).job_cards(5).build(),
        TrainsetBuilder::new(4).fitness(FitnessStatus::Pending).build(),
        TrainsetBuilder::new(5).cleaning(CleaningStatus::InProgress).build(),
        TrainsetBuilder::new(6).cleaning(CleaningStatus::Pending).mileage(95_000.0).build(),
        TrainsetBuilder::new(7).job_cards(2).branding(50.0).build(),
        TrainsetBuilder::new(8).mileage(110_000.0).branding(300.0).build(),
        TrainsetBuilder::new(9).job_cards(3).build(),
        TrainsetBuilder::new(10).mileage(55_000.0).branding(80.0).build(),
    ]
}

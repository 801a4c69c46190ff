// ==========================================
// 地铁列车投运编排系统 - 投运分配器
// ==========================================
// 红线: 硬阻断编组无条件进入检修,不受目标配额影响
// ==========================================
// 职责: 按评分与目标配额,为每个编组分配唯一状态
// 输入: (编组, 约束信号, 评分) 三元组 + 已校验目标配额
// 输出: InductionAssignment 列表（按 id 升序）
// ==========================================
// 配额松弛策略:
// - 先填运营,再填备用,其余全部进入检修
// - 可投运编组不足时不报错,缺口由汇总中的 target/status 分布体现
// - target_maintenance 从不作为上限（检修股道容量不在本核心职责内）
// ==========================================

use crate::domain::types::{AssignReason, InductionStatus};
use crate::domain::{InductionAssignment, InductionTargets, ScoredTrainset};
use std::cmp::Ordering;
use tracing::{debug, instrument};

// ==========================================
// AllocationOutcome - 分配结果
// ==========================================
#[derive(Debug, Clone)]
pub struct AllocationOutcome {
    /// 分配明细（按 trainset_id 升序）
    pub assignments: Vec<InductionAssignment>,
    pub blocked_count: usize,
    pub eligible_count: usize,
}

// ==========================================
// InductionAllocator - 投运分配器
// ==========================================
pub struct InductionAllocator {
    // 无状态引擎,不需要注入依赖
}

impl InductionAllocator {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 分配投运状态
    ///
    /// 规则:
    /// 1) 按 hard_blocked 划分为 阻断 / 可投运 两组
    /// 2) 阻断组全部 → Maintenance
    /// 3) 可投运组按 评分降序、id 升序 排序
    /// 4) 前 min(target_ready, n) 个 → Ready
    /// 5) 随后 min(target_standby, 剩余) 个 → Standby
    /// 6) 其余 → Maintenance
    ///
    /// # 参数
    /// - `candidates`: 评分后的编组（id 唯一,由调用方保证）
    /// - `targets`: 已校验的目标配额
    #[instrument(skip(self, candidates), fields(
        candidates_count = candidates.len(),
        target_ready = targets.ready,
        target_standby = targets.standby
    ))]
    pub fn allocate(
        &self,
        candidates: &[ScoredTrainset<'_>],
        targets: InductionTargets,
    ) -> AllocationOutcome {
        let mut assignments = Vec::with_capacity(candidates.len());

        // 1. 划分
        let (blocked, mut eligible): (Vec<&ScoredTrainset<'_>>, Vec<&ScoredTrainset<'_>>) =
            candidates.iter().partition(|c| c.eligibility.hard_blocked);

        // 2. 阻断组强制检修
        for candidate in &blocked {
            assignments.push(Self::create_assignment(
                candidate,
                InductionStatus::Maintenance,
                None,
                AssignReason::HardBlocked,
            ));
        }

        // 3. 可投运组排序
        eligible.sort_by(|a, b| Self::compare_candidates(a, b));

        // 4-6. 按配额顺序填充
        let ready_quota = targets.ready.min(eligible.len());
        let standby_quota = targets.standby.min(eligible.len() - ready_quota);

        for (idx, candidate) in eligible.iter().enumerate() {
            let (status, reason) = if idx < ready_quota {
                (InductionStatus::Ready, AssignReason::ReadyByRank)
            } else if idx < ready_quota + standby_quota {
                (InductionStatus::Standby, AssignReason::StandbyByRank)
            } else {
                (InductionStatus::Maintenance, AssignReason::OverflowToMaintenance)
            };

            assignments.push(Self::create_assignment(candidate, status, Some(idx + 1), reason));
        }

        debug!(
            blocked = blocked.len(),
            eligible = eligible.len(),
            ready = ready_quota,
            standby = standby_quota,
            "分配完成"
        );

        assignments.sort_by_key(|a| a.trainset_id);

        AllocationOutcome {
            assignments,
            blocked_count: blocked.len(),
            eligible_count: eligible.len(),
        }
    }

    // ==========================================
    // 比较方法
    // ==========================================

    /// 比较两个可投运编组的优先级
    ///
    /// 1. score 降序
    /// 2. id 升序（保证结果可复现）
    ///
    /// # 返回
    /// Ordering::Less 表示 a 优先于 b
    fn compare_candidates(a: &ScoredTrainset<'_>, b: &ScoredTrainset<'_>) -> Ordering {
        match b.score.total_cmp(&a.score) {
            Ordering::Equal => a.trainset.id.cmp(&b.trainset.id),
            other => other,
        }
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    fn create_assignment(
        candidate: &ScoredTrainset<'_>,
        status: InductionStatus,
        rank: Option<usize>,
        assign_reason: AssignReason,
    ) -> InductionAssignment {
        InductionAssignment {
            trainset_id: candidate.trainset.id,
            status,
            score: candidate.score,
            eligibility: candidate.eligibility,
            rank,
            assign_reason,
        }
    }
}

// ==========================================
// Default trait 实现
// ==========================================
impl Default for InductionAllocator {
    fn default() -> Self {
        Self::new()
    }
}

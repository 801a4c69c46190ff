// ==========================================
// 地铁列车投运编排系统 - 投运编排 API
// ==========================================
// 职责: 快照读取 → 优化 → 状态回写 → 运行记录
// 说明:
// - 缺失的目标配额在此层按运营策略补齐,核心本身不补默认值
// - 优化在阻塞线程池执行,受请求超时约束
// - 超时或失败时不回写任何状态
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{OperatorPolicy, OptimizerConfig, OptimizerConfigReader};
use crate::domain::{InductionTargets, OptimizationRequest, OptimizationResult, Trainset};
use crate::engine::InductionOptimizer;
use crate::importer::{sample_fleet, TrainsetCsvImporter};
use crate::perf::PerfGuard;
use crate::repository::{
    OptimizationRunEntity, OptimizationRunRepository, TrainsetRepository,
    TrainsetSnapshotProvider,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

// ==========================================
// 响应结构
// ==========================================

/// 优化响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeResponse {
    /// 运行记录 ID
    pub run_id: String,
    /// 实际生效的目标配额（已补齐默认值）
    pub effective_targets: InductionTargets,
    #[serde(flatten)]
    pub result: OptimizationResult,
}

/// 运行记录摘要（不含完整结果）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSummaryView {
    pub run_id: String,
    pub targets: InductionTargets,
    pub ready_count: usize,
    pub standby_count: usize,
    pub maintenance_count: usize,
    pub optimization_score: f64,
    pub completed_at: DateTime<Utc>,
}

impl From<OptimizationRunEntity> for RunSummaryView {
    fn from(entity: OptimizationRunEntity) -> Self {
        Self {
            run_id: entity.run_id,
            targets: InductionTargets::new(
                entity.target_ready,
                entity.target_standby,
                entity.target_maintenance,
            ),
            ready_count: entity.ready_count,
            standby_count: entity.standby_count,
            maintenance_count: entity.maintenance_count,
            optimization_score: entity.optimization_score,
            completed_at: entity.completed_at,
        }
    }
}

/// 健康检查
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub fleet_size: usize,
}

// ==========================================
// InductionApi
// ==========================================
pub struct InductionApi<C: OptimizerConfigReader> {
    trainset_repo: Arc<TrainsetRepository>,
    run_repo: Arc<OptimizationRunRepository>,
    config_reader: Arc<C>,
}

impl<C: OptimizerConfigReader> InductionApi<C> {
    pub fn new(
        trainset_repo: Arc<TrainsetRepository>,
        run_repo: Arc<OptimizationRunRepository>,
        config_reader: Arc<C>,
    ) -> Self {
        Self {
            trainset_repo,
            run_repo,
            config_reader,
        }
    }

    // ==========================================
    // 查询
    // ==========================================

    /// 当前编组快照（按 id 升序）
    pub fn list_trainsets(&self) -> ApiResult<Vec<Trainset>> {
        let _perf = PerfGuard::new("api.list_trainsets");
        Ok(self.trainset_repo.snapshot()?)
    }

    /// 最近的优化运行
    pub fn list_recent_runs(&self, limit: usize) -> ApiResult<Vec<RunSummaryView>> {
        if limit == 0 {
            return Err(ApiError::InvalidInput("limit 必须大于 0".to_string()));
        }
        let runs = self.run_repo.list_recent(limit)?;
        Ok(runs.into_iter().map(RunSummaryView::from).collect())
    }

    /// 查询某次运行的完整结果
    pub fn get_run_result(&self, run_id: &str) -> ApiResult<OptimizationResult> {
        let entity = self
            .run_repo
            .find_by_id(run_id)?
            .ok_or_else(|| ApiError::NotFound(format!("优化运行(run_id={})不存在", run_id)))?;
        Ok(entity.result()?)
    }

    /// 健康检查
    pub fn health_check(&self) -> ApiResult<HealthStatus> {
        Ok(HealthStatus {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
            fleet_size: self.trainset_repo.count()?,
        })
    }

    // ==========================================
    // 数据写入
    // ==========================================

    /// 从 CSV 导入编组快照（UPSERT）
    pub fn import_csv(&self, path: impl Into<PathBuf>) -> ApiResult<usize> {
        let path = path.into();
        let _perf = PerfGuard::new("api.import_csv");
        let trainsets = TrainsetCsvImporter::new().import_file(&path)?;
        Ok(self.trainset_repo.upsert_batch(&trainsets)?)
    }

    /// 写入示例车队
    pub fn seed_sample_fleet(&self) -> ApiResult<usize> {
        let fleet = sample_fleet();
        let written = self.trainset_repo.upsert_batch(&fleet)?;
        info!(written, "示例车队已写入");
        Ok(written)
    }

    // ==========================================
    // 优化
    // ==========================================

    /// 执行一次投运优化
    ///
    /// # 参数
    /// - `request`: 目标配额,缺失项按运营策略补齐
    ///
    /// # 返回
    /// - Ok(OptimizeResponse): 结果 + 运行 ID
    /// - Err(ValidationError): 目标为负 / 快照数据非法
    /// - Err(ConfigError): 配置读取失败 / 配置或运营策略非法
    /// - Err(Timeout): 超过运营策略中的请求超时
    #[instrument(skip(self), fields(target_ready = ?request.target_ready))]
    pub async fn optimize(&self, request: OptimizationRequest) -> ApiResult<OptimizeResponse> {
        let _perf = PerfGuard::new("api.optimize");

        let config = self
            .config_reader
            .get_optimizer_config()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        let policy = self
            .config_reader
            .get_operator_policy()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        policy.validate().map_err(ApiError::ConfigError)?;

        let request = request.with_defaults(policy.default_targets);
        let effective_targets = InductionOptimizer::validate_request(&request)?;

        let result = self.run_with_timeout(config, policy, request).await?;

        // 仅在成功时回写
        let assigned: Vec<_> = result
            .assignments
            .iter()
            .map(|a| (a.trainset_id, a.status))
            .collect();
        let config_snapshot = serde_json::to_string(&config)
            .map_err(|e| ApiError::InternalError(format!("配置序列化失败: {}", e)))?;

        // 状态回写与运行记录同一事务
        let run_repo = self.run_repo.clone();
        let result_for_record = result.clone();
        let run_id = tokio::task::spawn_blocking(move || -> ApiResult<String> {
            Ok(run_repo.commit_run(
                &assigned,
                effective_targets,
                &result_for_record,
                Some(config_snapshot),
            )?)
        })
        .await
        .map_err(|e| ApiError::InternalError(format!("任务执行失败: {}", e)))??;

        info!(
            run_id = %run_id,
            ready = result.summary.status_distribution.ready,
            standby = result.summary.status_distribution.standby,
            maintenance = result.summary.status_distribution.maintenance,
            "优化结果已回写"
        );

        Ok(OptimizeResponse {
            run_id,
            effective_targets,
            result,
        })
    }

    async fn run_with_timeout(
        &self,
        config: OptimizerConfig,
        policy: OperatorPolicy,
        request: OptimizationRequest,
    ) -> ApiResult<OptimizationResult> {
        let optimizer = InductionOptimizer::new(config)?;
        let trainset_repo = self.trainset_repo.clone();

        let task = tokio::task::spawn_blocking(move || -> ApiResult<OptimizationResult> {
            let snapshot = trainset_repo.snapshot()?;
            Ok(optimizer.optimize(&snapshot, &request)?)
        });

        let timeout = Duration::from_millis(policy.request_timeout_ms);
        match tokio::time::timeout(timeout, task).await {
            Ok(joined) => {
                joined.map_err(|e| ApiError::InternalError(format!("任务执行失败: {}", e)))?
            }
            Err(_) => {
                warn!(timeout_ms = policy.request_timeout_ms, "优化超时,结果丢弃");
                Err(ApiError::Timeout {
                    timeout_ms: policy.request_timeout_ms,
                })
            }
        }
    }
}

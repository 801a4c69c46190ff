// ==========================================
// 地铁列车投运编排系统 - 优化运行记录仓储
// ==========================================
// 职责: 记录每次优化运行（目标、分布、评分、完整结果）
// 红线: 只做数据映射,run_id 在此层生成,不进入优化核心
// ==========================================

use crate::domain::types::InductionStatus;
use crate::domain::{InductionTargets, OptimizationResult};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::TrainsetRepository;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

// ==========================================
// OptimizationRunEntity - 运行记录
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptimizationRunEntity {
    pub run_id: String,
    pub target_ready: usize,
    pub target_standby: usize,
    pub target_maintenance: usize,
    pub ready_count: usize,
    pub standby_count: usize,
    pub maintenance_count: usize,
    pub optimization_score: f64,
    pub completed_at: DateTime<Utc>,
    pub config_snapshot_json: Option<String>,
    pub result_json: String,
}

impl OptimizationRunEntity {
    /// 反序列化完整结果
    pub fn result(&self) -> RepositoryResult<OptimizationResult> {
        Ok(serde_json::from_str(&self.result_json)?)
    }
}

// ==========================================
// OptimizationRunRepository
// ==========================================
pub struct OptimizationRunRepository {
    conn: Arc<Mutex<Connection>>,
}

impl OptimizationRunRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 记录一次优化运行
    ///
    /// # 参数
    /// - `targets`: 本次生效的目标配额
    /// - `result`: 优化结果
    /// - `config_snapshot_json`: 运行时配置快照（可选）
    ///
    /// # 返回
    /// - `Ok(run_id)`: 新生成的 UUID v4
    pub fn record(
        &self,
        targets: InductionTargets,
        result: &OptimizationResult,
        config_snapshot_json: Option<String>,
    ) -> RepositoryResult<String> {
        let run_id = Uuid::new_v4().to_string();
        let result_json = serde_json::to_string(result)?;

        let conn = self.get_conn()?;
        Self::insert_run(&conn, &run_id, targets, result, config_snapshot_json, &result_json)?;

        Ok(run_id)
    }

    /// 回写编组状态并记录运行（单事务）
    ///
    /// 任一步失败则整体回滚: 不会出现状态已回写但运行记录缺失的情况
    pub fn commit_run(
        &self,
        assigned: &[(i64, InductionStatus)],
        targets: InductionTargets,
        result: &OptimizationResult,
        config_snapshot_json: Option<String>,
    ) -> RepositoryResult<String> {
        let run_id = Uuid::new_v4().to_string();
        let result_json = serde_json::to_string(result)?;

        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        TrainsetRepository::write_statuses(&tx, assigned)?;
        Self::insert_run(&tx, &run_id, targets, result, config_snapshot_json, &result_json)?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(run_id)
    }

    fn insert_run(
        conn: &Connection,
        run_id: &str,
        targets: InductionTargets,
        result: &OptimizationResult,
        config_snapshot_json: Option<String>,
        result_json: &str,
    ) -> RepositoryResult<()> {
        let dist = result.status_distribution();
        conn.execute(
            r#"
            INSERT INTO optimization_run (
                run_id, target_ready, target_standby, target_maintenance,
                ready_count, standby_count, maintenance_count,
                optimization_score, completed_at, config_snapshot_json, result_json
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                run_id,
                targets.ready as i64,
                targets.standby as i64,
                targets.maintenance as i64,
                dist.ready as i64,
                dist.standby as i64,
                dist.maintenance as i64,
                result.optimization_score,
                result.timestamp().to_rfc3339(),
                config_snapshot_json,
                result_json,
            ],
        )?;
        Ok(())
    }

    /// 按 run_id 查询
    pub fn find_by_id(&self, run_id: &str) -> RepositoryResult<Option<OptimizationRunEntity>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT run_id, target_ready, target_standby, target_maintenance,
                   ready_count, standby_count, maintenance_count,
                   optimization_score, completed_at, config_snapshot_json, result_json
            FROM optimization_run
            WHERE run_id = ?1
            "#,
        )?;

        match stmt.query_row(params![run_id], Self::map_row) {
            Ok(entity) => Ok(Some(entity)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 最近的运行记录（按完成时间倒序）
    pub fn list_recent(&self, limit: usize) -> RepositoryResult<Vec<OptimizationRunEntity>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT run_id, target_ready, target_standby, target_maintenance,
                   ready_count, standby_count, maintenance_count,
                   optimization_score, completed_at, config_snapshot_json, result_json
            FROM optimization_run
            ORDER BY completed_at DESC, rowid DESC
            LIMIT ?1
            "#,
        )?;

        let runs = stmt
            .query_map(params![limit as i64], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(runs)
    }

    fn map_row(row: &Row<'_>) -> SqliteResult<OptimizationRunEntity> {
        let completed_at_raw: String = row.get(8)?;
        let completed_at = DateTime::parse_from_rfc3339(&completed_at_raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(8, rusqlite::types::Type::Text, Box::new(e))
            })?;

        Ok(OptimizationRunEntity {
            run_id: row.get(0)?,
            target_ready: row.get::<_, i64>(1)? as usize,
            target_standby: row.get::<_, i64>(2)? as usize,
            target_maintenance: row.get::<_, i64>(3)? as usize,
            ready_count: row.get::<_, i64>(4)? as usize,
            standby_count: row.get::<_, i64>(5)? as usize,
            maintenance_count: row.get::<_, i64>(6)? as usize,
            optimization_score: row.get(7)?,
            completed_at,
            config_snapshot_json: row.get(9)?,
            result_json: row.get(10)?,
        })
    }
}

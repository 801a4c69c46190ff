// ==========================================
// 地铁列车投运编排系统 - 编组数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::types::InductionStatus;
use crate::domain::Trainset;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::TrainsetSnapshotProvider;
use chrono::Utc;
use rusqlite::{params, Connection, Row};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

// ==========================================
// TrainsetRepository - 编组仓储
// ==========================================
/// 编组仓储
/// 职责: 管理 trainset 表的读写,并作为优化核心的快照提供者
pub struct TrainsetRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TrainsetRepository {
    /// 创建新的 TrainsetRepository 实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询全部编组（按 id 升序）
    pub fn list_all(&self) -> RepositoryResult<Vec<Trainset>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                id, name, fitness_status, job_cards_open,
                branding_hours, mileage_km, cleaning_status,
                stabling_position, status
            FROM trainset
            ORDER BY id ASC
            "#,
        )?;

        let rows = stmt.query_map([], |row| Ok(Self::map_row(row)))?;

        let mut trainsets = Vec::new();
        for row in rows {
            trainsets.push(row??);
        }
        Ok(trainsets)
    }

    /// 按 id 查询
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Trainset>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                id, name, fitness_status, job_cards_open,
                branding_hours, mileage_km, cleaning_status,
                stabling_position, status
            FROM trainset
            WHERE id = ?1
            "#,
        )?;

        let mut rows = stmt.query(params![id])?;
        match rows.next()? {
            Some(row) => Ok(Some(Self::map_row(row)?)),
            None => Ok(None),
        }
    }

    /// 编组数量
    pub fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM trainset", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// 批量写入编组（UPSERT,单事务）
    ///
    /// # 返回
    /// - 写入的记录数
    pub fn upsert_batch(&self, trainsets: &[Trainset]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let now = Utc::now().to_rfc3339();
        let mut count = 0;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO trainset (
                    id, name, fitness_status, job_cards_open,
                    branding_hours, mileage_km, cleaning_status,
                    stabling_position, status, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                ON CONFLICT(id) DO UPDATE SET
                    name = excluded.name,
                    fitness_status = excluded.fitness_status,
                    job_cards_open = excluded.job_cards_open,
                    branding_hours = excluded.branding_hours,
                    mileage_km = excluded.mileage_km,
                    cleaning_status = excluded.cleaning_status,
                    stabling_position = excluded.stabling_position,
                    status = excluded.status,
                    updated_at = excluded.updated_at
                "#,
            )?;

            for t in trainsets {
                count += stmt.execute(params![
                    t.id,
                    t.name,
                    t.fitness_status.to_string(),
                    t.job_cards_open,
                    t.branding_hours,
                    t.mileage_km,
                    t.cleaning_status.to_string(),
                    t.stabling_position,
                    t.status.map(|s| s.to_string()),
                    now,
                ])?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(count)
    }

    /// 回写分配后的状态（单事务）
    ///
    /// # 返回
    /// - 更新的记录数
    pub fn apply_statuses(&self, assigned: &[(i64, InductionStatus)]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let count = Self::write_statuses(&tx, assigned)?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(count)
    }

    /// 在调用方给定的连接/事务上写状态，不自行提交
    pub(crate) fn write_statuses(
        conn: &Connection,
        assigned: &[(i64, InductionStatus)],
    ) -> RepositoryResult<usize> {
        let now = Utc::now().to_rfc3339();
        let mut stmt =
            conn.prepare("UPDATE trainset SET status = ?1, updated_at = ?2 WHERE id = ?3")?;
        let mut count = 0;
        for (id, status) in assigned {
            count += stmt.execute(params![status.to_string(), now, id])?;
        }
        Ok(count)
    }

    // ==========================================
    // 辅助方法
    // ==========================================

    fn map_row(row: &Row<'_>) -> RepositoryResult<Trainset> {
        let fitness_raw: String = row.get(2)?;
        let cleaning_raw: String = row.get(6)?;
        let status_raw: Option<String> = row.get(8)?;

        Ok(Trainset {
            id: row.get(0)?,
            name: row.get(1)?,
            fitness_status: parse_field("fitness_status", &fitness_raw)?,
            job_cards_open: row.get(3)?,
            branding_hours: row.get(4)?,
            mileage_km: row.get(5)?,
            cleaning_status: parse_field("cleaning_status", &cleaning_raw)?,
            stabling_position: row.get(7)?,
            status: status_raw
                .map(|s| parse_field::<InductionStatus>("status", &s))
                .transpose()?,
        })
    }
}

fn parse_field<T>(field: &str, raw: &str) -> RepositoryResult<T>
where
    T: FromStr<Err = String>,
{
    raw.parse::<T>().map_err(|message| RepositoryError::FieldValueError {
        field: field.to_string(),
        message,
    })
}

// ==========================================
// TrainsetSnapshotProvider 实现
// ==========================================
impl TrainsetSnapshotProvider for TrainsetRepository {
    /// 单次加锁读取,保证一次请求拿到一致的时点视图
    fn snapshot(&self) -> RepositoryResult<Vec<Trainset>> {
        self.list_all()
    }
}

// ==========================================
// 地铁列车投运编排系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::config_reader_trait::{ConfigReadResult, OptimizerConfigReader};
use crate::config::{OperatorPolicy, OptimizerConfig};
use crate::db::open_sqlite_connection;
use crate::domain::InductionTargets;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::BTreeMap;
use std::error::Error;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> ConfigReadResult<Option<String>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> ConfigReadResult<Option<String>> {
        self.get_config_value(key)
    }

    /// 读取并解析配置,缺失或格式错误时使用默认值
    ///
    /// 格式错误会记录 warn 日志,不中断读取
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> ConfigReadResult<T>
    where
        T: FromStr + Copy + std::fmt::Display,
    {
        let raw = match self.get_config_value(key)? {
            Some(v) => v,
            None => return Ok(default),
        };

        match raw.trim().parse::<T>() {
            Ok(value) => Ok(value),
            Err(_) => {
                tracing::warn!(
                    config_key = key,
                    raw_value = %raw,
                    default_value = %default,
                    "配置格式错误，使用默认值"
                );
                Ok(default)
            }
        }
    }

    /// 写入 global scope 配置（UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> ConfigReadResult<()> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        tracing::info!(config_key = key, value = value, "配置已更新");
        Ok(())
    }

    /// 获取所有配置的快照（JSON格式）
    ///
    /// 只包含显式覆写过的键,未覆写的键使用默认值
    pub fn get_config_snapshot(&self) -> ConfigReadResult<String> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }
}

// ==========================================
// OptimizerConfigReader Trait 实现
// ==========================================
#[async_trait]
impl OptimizerConfigReader for ConfigManager {
    async fn get_optimizer_config(&self) -> ConfigReadResult<OptimizerConfig> {
        let d = OptimizerConfig::default();

        Ok(OptimizerConfig {
            high_job_card_threshold: self
                .get_parsed_or_default(config_keys::HIGH_JOB_CARD_THRESHOLD, d.high_job_card_threshold)?,
            fitness_pending_penalty: self
                .get_parsed_or_default(config_keys::FITNESS_PENDING_PENALTY, d.fitness_pending_penalty)?,
            job_card_penalty: self.get_parsed_or_default(config_keys::JOB_CARD_PENALTY, d.job_card_penalty)?,
            cleaning_in_progress_penalty: self.get_parsed_or_default(
                config_keys::CLEANING_IN_PROGRESS_PENALTY,
                d.cleaning_in_progress_penalty,
            )?,
            cleaning_pending_penalty: self
                .get_parsed_or_default(config_keys::CLEANING_PENDING_PENALTY, d.cleaning_pending_penalty)?,
            mileage_weight: self.get_parsed_or_default(config_keys::MILEAGE_WEIGHT, d.mileage_weight)?,
            branding_weight: self.get_parsed_or_default(config_keys::BRANDING_WEIGHT, d.branding_weight)?,
            branding_epsilon: self.get_parsed_or_default(config_keys::BRANDING_EPSILON, d.branding_epsilon)?,
            score_min: self.get_parsed_or_default(config_keys::SCORE_MIN, d.score_min)?,
            score_max: self.get_parsed_or_default(config_keys::SCORE_MAX, d.score_max)?,
        })
    }

    async fn get_operator_policy(&self) -> ConfigReadResult<OperatorPolicy> {
        let d = OperatorPolicy::default();

        Ok(OperatorPolicy {
            default_targets: InductionTargets::new(
                self.get_parsed_or_default(config_keys::DEFAULT_TARGET_READY, d.default_targets.ready)?,
                self.get_parsed_or_default(config_keys::DEFAULT_TARGET_STANDBY, d.default_targets.standby)?,
                self.get_parsed_or_default(
                    config_keys::DEFAULT_TARGET_MAINTENANCE,
                    d.default_targets.maintenance,
                )?,
            ),
            request_timeout_ms: self
                .get_parsed_or_default(config_keys::REQUEST_TIMEOUT_MS, d.request_timeout_ms)?,
        })
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 硬阻断
    pub const HIGH_JOB_CARD_THRESHOLD: &str = "high_job_card_threshold";

    // 软惩罚
    pub const FITNESS_PENDING_PENALTY: &str = "fitness_pending_penalty";
    pub const JOB_CARD_PENALTY: &str = "job_card_penalty";
    pub const CLEANING_IN_PROGRESS_PENALTY: &str = "cleaning_in_progress_penalty";
    pub const CLEANING_PENDING_PENALTY: &str = "cleaning_pending_penalty";

    // 均衡系数
    pub const MILEAGE_WEIGHT: &str = "mileage_weight";
    pub const BRANDING_WEIGHT: &str = "branding_weight";
    pub const BRANDING_EPSILON: &str = "branding_epsilon";

    // 评分区间
    pub const SCORE_MIN: &str = "score_min";
    pub const SCORE_MAX: &str = "score_max";

    // 运营策略
    pub const DEFAULT_TARGET_READY: &str = "default_target_ready";
    pub const DEFAULT_TARGET_STANDBY: &str = "default_target_standby";
    pub const DEFAULT_TARGET_MAINTENANCE: &str = "default_target_maintenance";
    pub const REQUEST_TIMEOUT_MS: &str = "request_timeout_ms";
}

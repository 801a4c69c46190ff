// ==========================================
// 地铁列车投运编排系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享连接和 API 实例
// ==========================================

use crate::api::InductionApi;
use crate::config::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::repository::{OptimizationRunRepository, TrainsetRepository};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "METRO_INDUCTION_DB_PATH";

/// 应用状态
///
/// 所有仓储共享同一连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 投运编排 API
    pub induction_api: Arc<InductionApi<ConfigManager>>,

    /// 配置管理器（用于配置覆写/快照）
    pub config_manager: Arc<ConfigManager>,
}

impl AppState {
    /// 创建新的 AppState 实例
    ///
    /// 打开数据库、建表（幂等）、装配仓储与 API
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("建表失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        let trainset_repo = Arc::new(TrainsetRepository::from_connection(conn.clone()));
        let run_repo = Arc::new(OptimizationRunRepository::new(conn.clone()));
        let config_manager = Arc::new(ConfigManager::from_connection(conn));

        let induction_api = Arc::new(InductionApi::new(
            trainset_repo,
            run_repo,
            config_manager.clone(),
        ));

        Ok(Self {
            db_path,
            induction_api,
            config_manager,
        })
    }
}

/// 默认数据库路径
///
/// 优先级: 环境变量 METRO_INDUCTION_DB_PATH > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./metro_induction.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("metro-induction");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("metro_induction.db");
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_app_state_initializes_schema() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("state.db").to_string_lossy().to_string();

        let state = AppState::new(db_path.clone()).unwrap();
        assert_eq!(state.db_path, db_path);
        assert_eq!(state.induction_api.health_check().unwrap().fleet_size, 0);
    }

    #[test]
    fn test_bad_path_is_reported() {
        let dir = tempdir().unwrap();
        let db_path = dir
            .path()
            .join("missing")
            .join("nested")
            .join("x.db")
            .to_string_lossy()
            .to_string();

        assert!(AppState::new(db_path).is_err());
    }
}

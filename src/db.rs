// ==========================================
// 地铁列车投运编排系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 建表幂等（CREATE TABLE IF NOT EXISTS）
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let mut conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    crate::perf::install_sqlite_tracing(&mut conn);
    Ok(conn)
}

/// 初始化表结构（幂等）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS trainset (
            id                INTEGER PRIMARY KEY,
            name              TEXT    NOT NULL,
            fitness_status    TEXT    NOT NULL,
            job_cards_open    INTEGER NOT NULL DEFAULT 0,
            branding_hours    REAL    NOT NULL DEFAULT 0,
            mileage_km        REAL    NOT NULL DEFAULT 0,
            cleaning_status   TEXT    NOT NULL,
            stabling_position INTEGER NOT NULL DEFAULT 0,
            status            TEXT,
            updated_at        TEXT    NOT NULL
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key      TEXT NOT NULL,
            value    TEXT NOT NULL,
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS optimization_run (
            run_id              TEXT PRIMARY KEY,
            target_ready        INTEGER NOT NULL,
            target_standby      INTEGER NOT NULL,
            target_maintenance  INTEGER NOT NULL,
            ready_count         INTEGER NOT NULL,
            standby_count       INTEGER NOT NULL,
            maintenance_count   INTEGER NOT NULL,
            optimization_score  REAL    NOT NULL,
            completed_at        TEXT    NOT NULL,
            config_snapshot_json TEXT,
            result_json         TEXT    NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_optimization_run_completed_at
            ON optimization_run (completed_at);
        "#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN ('trainset','config_kv','optimization_run')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 3);
    }
}

// ==========================================
// 炼钢生产计划 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 建库（幂等）
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

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
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 建表（IF NOT EXISTS，可重复执行）
///
/// 表:
/// - month_steel_production: 月度钢种产量（短吨）
/// - month_group_order_forecast: 月度质量组订单预测（炉数）
/// - daily_charge_schedule: 日装炉计划
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS month_steel_production (
            month TEXT NOT NULL,
            grade TEXT NOT NULL,
            quality_group TEXT NOT NULL
                CHECK (quality_group IN ('REBAR', 'SBQ', 'MBQ', 'CHQ')),
            short_tons INTEGER NOT NULL,
            PRIMARY KEY (month, grade)
        );

        CREATE TABLE IF NOT EXISTS month_group_order_forecast (
            month TEXT NOT NULL,
            quality_group TEXT NOT NULL
                CHECK (quality_group IN ('REBAR', 'SBQ', 'MBQ', 'CHQ')),
            heats_orders_forecasted INTEGER NOT NULL,
            PRIMARY KEY (month, quality_group)
        );

        CREATE TABLE IF NOT EXISTS daily_charge_schedule (
            day TEXT NOT NULL,
            start_time TEXT NOT NULL,
            grade TEXT,
            mould_size TEXT,
            PRIMARY KEY (day, start_time, grade)
        );
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::OptionalExtension;

    /// 读取 schema_version（若表不存在则返回 None）
    fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
        let has_table: bool = conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
                [],
                |_row| Ok(true),
            )
            .optional()?
            .unwrap_or(false);

        if !has_table {
            return Ok(None);
        }

        let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
        Ok(v)
    }

    #[test]
    fn test_init_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(read_schema_version(&conn).unwrap(), None);

        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();

        assert_eq!(read_schema_version(&conn).unwrap(), Some(CURRENT_SCHEMA_VERSION));
    }
}

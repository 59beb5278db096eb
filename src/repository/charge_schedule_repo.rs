// ==========================================
// 炼钢生产计划 - 日装炉计划仓储
// ==========================================

use crate::domain::production::ChargeScheduleEntry;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{NaiveDate, NaiveTime};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

/// 日装炉计划仓储
/// 职责: 管理 daily_charge_schedule 表
pub struct ChargeScheduleRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ChargeScheduleRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 批量插入（单事务）
    pub fn insert_batch(&self, entries: &[ChargeScheduleEntry]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let mut count = 0;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO daily_charge_schedule (day, start_time, grade, mould_size)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )?;
            for entry in entries {
                count += stmt.execute(params![
                    entry.day.format("%Y-%m-%d").to_string(),
                    entry.start_time.format("%H:%M:%S").to_string(),
                    entry.grade,
                    entry.mould_size,
                ])?;
            }
        }

        tx.commit()?;
        Ok(count)
    }

    /// 查询某日装炉计划（按开始时间排序）
    pub fn list_by_day(&self, day: NaiveDate) -> RepositoryResult<Vec<ChargeScheduleEntry>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT day, start_time, grade, mould_size
            FROM daily_charge_schedule
            WHERE day = ?1
            ORDER BY start_time
            "#,
        )?;

        let rows = stmt
            .query_map(params![day.format("%Y-%m-%d").to_string()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(day, start_time, grade, mould_size)| {
                Ok(ChargeScheduleEntry {
                    day: NaiveDate::parse_from_str(&day, "%Y-%m-%d").map_err(|e| {
                        RepositoryError::FieldValueError {
                            field: "day".to_string(),
                            message: e.to_string(),
                        }
                    })?,
                    start_time: NaiveTime::parse_from_str(&start_time, "%H:%M:%S").map_err(
                        |e| RepositoryError::FieldValueError {
                            field: "start_time".to_string(),
                            message: e.to_string(),
                        },
                    )?,
                    grade,
                    mould_size,
                })
            })
            .collect()
    }

    pub fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM daily_charge_schedule", [], |row| {
            row.get(0)
        })?;
        Ok(n as usize)
    }
}

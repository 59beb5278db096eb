// ==========================================
// 炼钢生产计划 - 月度钢种产量仓储
// ==========================================
// 红线: Repository 不含业务逻辑（炉数折算在 API 层）
// ==========================================

use crate::domain::production::MonthProductionEntry;
use crate::domain::types::{QualityGroup, YearMonth};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// 行解析辅助
// ==========================================

pub(crate) fn parse_stored_month(raw: &str) -> RepositoryResult<YearMonth> {
    YearMonth::parse_lenient(raw).ok_or_else(|| RepositoryError::FieldValueError {
        field: "month".to_string(),
        message: format!("无法解析月份: {}", raw),
    })
}

pub(crate) fn parse_stored_group(raw: &str) -> RepositoryResult<QualityGroup> {
    raw.parse::<QualityGroup>()
        .map_err(|message| RepositoryError::FieldValueError {
            field: "quality_group".to_string(),
            message,
        })
}

// ==========================================
// MonthSteelProductionRepository
// ==========================================

/// 月度钢种产量仓储
/// 职责: 管理 month_steel_production 表
pub struct MonthSteelProductionRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MonthSteelProductionRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 批量插入（单事务,全部成功或全部回滚）
    ///
    /// # 返回
    /// - Ok(usize): 插入行数
    /// - Err(UniqueConstraintViolation): (month, grade) 已存在
    pub fn insert_batch(&self, entries: &[MonthProductionEntry]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let mut count = 0;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO month_steel_production (month, grade, quality_group, short_tons)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )?;
            for entry in entries {
                count += stmt.execute(params![
                    entry.month.first_day().format("%Y-%m-%d").to_string(),
                    entry.grade,
                    entry.quality_group.as_str(),
                    entry.short_tons,
                ])?;
            }
        }

        tx.commit()?;
        Ok(count)
    }

    /// 查询全量历史产量（按 month, quality_group, grade 排序）
    pub fn list_all(&self) -> RepositoryResult<Vec<MonthProductionEntry>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT month, quality_group, grade, short_tons
            FROM month_steel_production
            ORDER BY month, quality_group, grade
            "#,
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(month, group, grade, short_tons)| {
                Ok(MonthProductionEntry {
                    month: parse_stored_month(&month)?,
                    quality_group: parse_stored_group(&group)?,
                    grade,
                    short_tons,
                })
            })
            .collect()
    }

    pub fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM month_steel_production", [], |row| {
            row.get(0)
        })?;
        Ok(n as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;

    fn repo() -> MonthSteelProductionRepository {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        MonthSteelProductionRepository::from_connection(Arc::new(Mutex::new(conn)))
    }

    fn entry(month: u32, grade: &str, tons: i64) -> MonthProductionEntry {
        MonthProductionEntry {
            month: YearMonth::new(2024, month).unwrap(),
            quality_group: QualityGroup::Rebar,
            grade: grade.to_string(),
            short_tons: tons,
        }
    }

    #[test]
    fn test_insert_and_list() {
        let repo = repo();
        let inserted = repo
            .insert_batch(&[entry(7, "B", 300), entry(6, "A", 500)])
            .unwrap();
        assert_eq!(inserted, 2);

        let all = repo.list_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].month, YearMonth::new(2024, 6).unwrap());
        assert_eq!(all[0].grade, "A");
        assert_eq!(all[1].short_tons, 300);
    }

    #[test]
    fn test_duplicate_rolls_back_whole_batch() {
        let repo = repo();
        repo.insert_batch(&[entry(6, "A", 500)]).unwrap();

        let err = repo
            .insert_batch(&[entry(7, "C", 100), entry(6, "A", 500)])
            .unwrap_err();
        assert!(matches!(err, RepositoryError::UniqueConstraintViolation(_)));
        assert_eq!(repo.count().unwrap(), 1);
    }
}

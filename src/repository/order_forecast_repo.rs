// ==========================================
// 炼钢生产计划 - 月度质量组订单预测仓储
// ==========================================

use crate::domain::production::OrderForecastEntry;
use crate::domain::types::YearMonth;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::production_repo::{parse_stored_group, parse_stored_month};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

/// 订单预测仓储
/// 职责: 管理 month_group_order_forecast 表
pub struct OrderForecastRepository {
    conn: Arc<Mutex<Connection>>,
}

impl OrderForecastRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 批量插入（单事务）
    pub fn insert_batch(&self, entries: &[OrderForecastEntry]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let mut count = 0;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO month_group_order_forecast (month, quality_group, heats_orders_forecasted)
                VALUES (?1, ?2, ?3)
                "#,
            )?;
            for entry in entries {
                count += stmt.execute(params![
                    entry.month.first_day().format("%Y-%m-%d").to_string(),
                    entry.quality_group.as_str(),
                    entry.heats_orders_forecasted,
                ])?;
            }
        }

        tx.commit()?;
        Ok(count)
    }

    /// 查询指定月份的订单预测（按年、月匹配）
    pub fn list_by_month(&self, month: YearMonth) -> RepositoryResult<Vec<OrderForecastEntry>> {
        self.query(
            r#"
            SELECT month, quality_group, heats_orders_forecasted
            FROM month_group_order_forecast
            WHERE substr(month, 1, 7) = ?1
            ORDER BY quality_group
            "#,
            Some(month.to_string()),
        )
    }

    pub fn list_all(&self) -> RepositoryResult<Vec<OrderForecastEntry>> {
        self.query(
            r#"
            SELECT month, quality_group, heats_orders_forecasted
            FROM month_group_order_forecast
            ORDER BY month, quality_group
            "#,
            None,
        )
    }

    fn query(&self, sql: &str, month: Option<String>) -> RepositoryResult<Vec<OrderForecastEntry>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(sql)?;

        let map_row = |row: &rusqlite::Row<'_>| -> rusqlite::Result<(String, String, i64)> {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
            ))
        };
        let rows = match month {
            Some(m) => stmt.query_map(params![m], map_row)?.collect::<rusqlite::Result<Vec<_>>>()?,
            None => stmt.query_map([], map_row)?.collect::<rusqlite::Result<Vec<_>>>()?,
        };

        rows.into_iter()
            .map(|(month, group, heats)| {
                Ok(OrderForecastEntry {
                    month: parse_stored_month(&month)?,
                    quality_group: parse_stored_group(&group)?,
                    heats_orders_forecasted: heats,
                })
            })
            .collect()
    }
}

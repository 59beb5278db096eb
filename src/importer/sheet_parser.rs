// ==========================================
// 炼钢生产计划 - 表结构解析器
// ==========================================
// 输入: 原始网格（第 0 行为标题,跳过）
// 输出: 入库实体
// ==========================================

use crate::domain::production::{ChargeScheduleEntry, MonthProductionEntry, OrderForecastEntry};
use crate::domain::types::{QualityGroup, UploadFileType, YearMonth};
use crate::importer::data_cleaner::{DataCleaner, SheetTable};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::RawGrid;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

const HEADER_ROW: usize = 1;
const COLS_PER_DAY: usize = 3;

const COL_QUALITY_GROUP: &str = "Quality group";
const COL_GRADE: &str = "Grade";
const COL_ORDER_GROUP: &str = "Quality:";
const SUB_START_TIME: &str = "Start time";

/// 解析结果（按文件类型区分）
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedFile {
    MonthlySteelGrade(Vec<MonthProductionEntry>),
    OrderForecast(Vec<OrderForecastEntry>),
    ChargeSchedule(Vec<ChargeScheduleEntry>),
}

impl ParsedFile {
    pub fn len(&self) -> usize {
        match self {
            ParsedFile::MonthlySteelGrade(v) => v.len(),
            ParsedFile::OrderForecast(v) => v.len(),
            ParsedFile::ChargeSchedule(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct SheetParser {
    cleaner: DataCleaner,
    max_missing_per_column: usize,
}

impl SheetParser {
    pub fn new(max_missing_per_column: usize) -> Self {
        Self {
            cleaner: DataCleaner,
            max_missing_per_column,
        }
    }

    /// 按文件类型分派
    pub fn parse(&self, file_type: UploadFileType, grid: &RawGrid) -> ImportResult<ParsedFile> {
        match file_type {
            UploadFileType::MonthlySteelGradeProduction => self
                .parse_monthly_steel_grade(grid)
                .map(ParsedFile::MonthlySteelGrade),
            UploadFileType::MonthlyOrderForecast => {
                self.parse_order_forecast(grid).map(ParsedFile::OrderForecast)
            }
            UploadFileType::DailyChargeSchedule => self
                .parse_daily_charge_schedule(grid)
                .map(ParsedFile::ChargeSchedule),
        }
    }

    // ==========================================
    // 月度钢种产量: Quality group | Grade | <month>...
    // ==========================================
    pub fn parse_monthly_steel_grade(&self, grid: &RawGrid) -> ImportResult<Vec<MonthProductionEntry>> {
        let mut table = self.header_table(grid)?;

        let group_col = require_column(&table, COL_QUALITY_GROUP)?;
        self.cleaner.forward_fill(&mut table, group_col);

        let mut table = self
            .cleaner
            .drop_sparse_columns(table, self.max_missing_per_column);
        let group_col = require_column(&table, COL_QUALITY_GROUP)?;
        let grade_col = require_column(&table, COL_GRADE)?;
        let months = month_columns(&table, &[group_col, grade_col])?;
        let month_cols: Vec<usize> = months.iter().map(|(col, _)| *col).collect();
        self.cleaner.impute_numeric_medians(&mut table, &month_cols);

        let mut entries = Vec::with_capacity(table.rows.len() * months.len());
        for (idx, row) in table.rows.iter().enumerate() {
            let row_no = data_row_number(idx);
            let quality_group = parse_group(row_no, row[group_col].as_deref())?;
            let grade = row[grade_col]
                .clone()
                .ok_or_else(|| ImportError::FieldMappingError {
                    row: row_no,
                    message: "钢种为空".to_string(),
                })?;

            for &(col, month) in &months {
                let short_tons = self.parse_cell_integer(row_no, &table.header[col], &row[col])?;
                entries.push(MonthProductionEntry {
                    month,
                    quality_group,
                    grade: grade.clone(),
                    short_tons,
                });
            }
        }

        debug!(rows = entries.len(), months = months.len(), "月度钢种产量解析完成");
        Ok(entries)
    }

    // ==========================================
    // 月度订单预测: Quality: | <month>...
    // ==========================================
    pub fn parse_order_forecast(&self, grid: &RawGrid) -> ImportResult<Vec<OrderForecastEntry>> {
        let table = self.header_table(grid)?;
        let mut table = self
            .cleaner
            .drop_sparse_columns(table, self.max_missing_per_column);
        let group_col = require_column(&table, COL_ORDER_GROUP)?;
        let months = month_columns(&table, &[group_col])?;
        let month_cols: Vec<usize> = months.iter().map(|(col, _)| *col).collect();
        self.cleaner.impute_numeric_medians(&mut table, &month_cols);

        let mut entries = Vec::with_capacity(table.rows.len() * months.len());
        for (idx, row) in table.rows.iter().enumerate() {
            let row_no = data_row_number(idx);
            let quality_group = parse_group(row_no, row[group_col].as_deref())?;

            for &(col, month) in &months {
                let heats = self.parse_cell_integer(row_no, &table.header[col], &row[col])?;
                entries.push(OrderForecastEntry {
                    month,
                    quality_group,
                    heats_orders_forecasted: heats,
                });
            }
        }

        debug!(rows = entries.len(), months = months.len(), "月度订单预测解析完成");
        Ok(entries)
    }

    // ==========================================
    // 日装炉计划: 每 3 列一天
    // 第 1 行: 日期标签（每组首列）
    // 第 2 行: Start time | Grade | Mould size
    // ==========================================
    pub fn parse_daily_charge_schedule(&self, grid: &RawGrid) -> ImportResult<Vec<ChargeScheduleEntry>> {
        let day_row = grid.get(HEADER_ROW).ok_or_else(|| {
            ImportError::SheetStructureError("缺少日期标签行".to_string())
        })?;
        let sub_header = grid.get(HEADER_ROW + 1).ok_or_else(|| {
            ImportError::SheetStructureError("缺少子表头行".to_string())
        })?;

        let days: Vec<(usize, NaiveDate)> = day_row
            .iter()
            .enumerate()
            .filter_map(|(col, label)| self.cleaner.normalize_null(label).map(|l| (col, l)))
            .map(|(col, label)| {
                parse_day(&label)
                    .map(|day| (col, day))
                    .ok_or_else(|| {
                        ImportError::SheetStructureError(format!("日期标签无法解析 (列 {}): {}", col, label))
                    })
            })
            .collect::<ImportResult<_>>()?;

        if days.is_empty() {
            return Err(ImportError::SheetStructureError(
                "未找到日期标签".to_string(),
            ));
        }

        if let Some(&(col, _)) = days.iter().find(|(col, _)| col % COLS_PER_DAY != 0) {
            return Err(ImportError::SheetStructureError(format!(
                "日期标签未按每 {} 列对齐 (列 {})",
                COLS_PER_DAY, col
            )));
        }

        let mut entries = Vec::new();
        for &(col, day) in &days {
            let start_label = sub_header.get(col).map(|s| s.trim()).unwrap_or("");
            if !start_label.eq_ignore_ascii_case(SUB_START_TIME) {
                return Err(ImportError::MissingColumn(format!(
                    "{} (列 {})",
                    SUB_START_TIME, col
                )));
            }

            for (idx, row) in grid.iter().enumerate().skip(HEADER_ROW + 2) {
                let row_no = idx + 1;
                let cell = |offset: usize| {
                    row.get(col + offset)
                        .and_then(|v| self.cleaner.normalize_null(v))
                };
                let (start, grade, mould_size) = (cell(0), cell(1), cell(2));

                if start.is_none() && grade.is_none() && mould_size.is_none() {
                    continue;
                }

                let start_time = start
                    .as_deref()
                    .and_then(parse_time)
                    .ok_or_else(|| ImportError::TypeConversionError {
                        row: row_no,
                        field: SUB_START_TIME.to_string(),
                        message: format!("无法解析开始时间: {}", start.as_deref().unwrap_or("")),
                    })?;

                entries.push(ChargeScheduleEntry {
                    day,
                    start_time,
                    grade,
                    mould_size,
                });
            }
        }

        debug!(rows = entries.len(), days = days.len(), "日装炉计划解析完成");
        Ok(entries)
    }

    fn header_table(&self, grid: &RawGrid) -> ImportResult<SheetTable> {
        self.cleaner
            .to_table(grid, HEADER_ROW)
            .ok_or_else(|| ImportError::SheetStructureError("缺少表头行".to_string()))
    }

    fn parse_cell_integer(
        &self,
        row: usize,
        field: &str,
        value: &Option<String>,
    ) -> ImportResult<i64> {
        let raw = value.as_deref().ok_or_else(|| ImportError::TypeConversionError {
            row,
            field: field.to_string(),
            message: "缺失数值".to_string(),
        })?;
        let value = self
            .cleaner
            .parse_integer(raw)
            .ok_or_else(|| ImportError::TypeConversionError {
                row,
                field: field.to_string(),
                message: format!("无法解析为整数: {}", raw),
            })?;
        if value < 0 {
            return Err(ImportError::TypeConversionError {
                row,
                field: field.to_string(),
                message: format!("数量不能为负: {}", raw),
            });
        }
        Ok(value)
    }
}

impl Default for SheetParser {
    fn default() -> Self {
        Self::new(crate::config::forecast_config::DEFAULT_MAX_MISSING_PER_COLUMN)
    }
}

// ==========================================
// 辅助函数
// ==========================================

/// 数据行在文件中的行号（1-based: 标题 + 表头之后）
fn data_row_number(idx: usize) -> usize {
    idx + HEADER_ROW + 2
}

fn require_column(table: &SheetTable, name: &str) -> ImportResult<usize> {
    table
        .column_index(name)
        .ok_or_else(|| ImportError::MissingColumn(name.to_string()))
}

/// 除 key 列外的所有列均为月份列
fn month_columns(table: &SheetTable, key_columns: &[usize]) -> ImportResult<Vec<(usize, YearMonth)>> {
    table
        .header
        .iter()
        .enumerate()
        .filter(|(col, _)| !key_columns.contains(col))
        .map(|(col, label)| {
            YearMonth::parse_lenient(label)
                .map(|month| (col, month))
                .ok_or_else(|| ImportError::MalformedMonthHeader {
                    column: col,
                    value: label.clone(),
                })
        })
        .collect()
}

fn parse_group(row: usize, value: Option<&str>) -> ImportResult<QualityGroup> {
    let raw = value.unwrap_or("");
    raw.parse::<QualityGroup>()
        .map_err(|_| ImportError::UnknownQualityGroup {
            row,
            value: raw.to_string(),
        })
}

fn parse_day(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(d);
        }
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|dt| dt.date())
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    let trimmed = value.trim();
    for fmt in ["%H:%M:%S", "%H:%M"] {
        if let Ok(t) = NaiveTime::parse_from_str(trimmed, fmt) {
            return Some(t);
        }
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|dt| dt.time())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> RawGrid {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    fn ym(m: u32) -> YearMonth {
        YearMonth::new(2024, m).unwrap()
    }

    #[test]
    fn test_monthly_steel_grade_forward_fills_group() {
        let parser = SheetParser::default();
        let entries = parser
            .parse_monthly_steel_grade(&grid(&[
                &["Steel grade production", "", "", ""],
                &["Quality group", "Grade", "2024-06-01", "2024-07-01"],
                &["Rebar", "A615", "1200", "1300"],
                &["", "B500", "800", "900"],
                &["SBQ", "4140", "500", "550"],
            ]))
            .unwrap();

        assert_eq!(entries.len(), 6);
        assert_eq!(entries[2].quality_group, QualityGroup::Rebar);
        assert_eq!(entries[2].grade, "B500");
        assert_eq!(entries[2].month, ym(6));
        assert_eq!(entries[2].short_tons, 800);
        assert_eq!(entries[5].quality_group, QualityGroup::Sbq);
        assert_eq!(entries[5].month, ym(7));
    }

    #[test]
    fn test_monthly_steel_grade_drops_sparse_and_imputes() {
        let parser = SheetParser::new(2);
        let entries = parser
            .parse_monthly_steel_grade(&grid(&[
                &["title"],
                &["Quality group", "Grade", "June 2024", "July 2024", "August 2024"],
                &["Rebar", "A", "100", "", ""],
                &["", "B", "300", "200", ""],
                &["", "C", "", "400", ""],
                &["", "D", "500", "600", "1"],
            ]))
            .unwrap();

        // August 列缺失 3 个,被剔除
        assert!(entries.iter().all(|e| e.month != ym(8)));
        assert_eq!(entries.len(), 8);
        let c_june = entries
            .iter()
            .find(|e| e.grade == "C" && e.month == ym(6))
            .unwrap();
        assert_eq!(c_june.short_tons, 300);
    }

    #[test]
    fn test_monthly_steel_grade_missing_column() {
        let parser = SheetParser::default();
        let err = parser
            .parse_monthly_steel_grade(&grid(&[
                &["title", ""],
                &["Group", "2024-06-01"],
                &["Rebar", "1"],
            ]))
            .unwrap_err();
        assert!(matches!(err, ImportError::MissingColumn(_)));
    }

    #[test]
    fn test_unknown_quality_group_reports_row() {
        let parser = SheetParser::default();
        let err = parser
            .parse_order_forecast(&grid(&[
                &["title", ""],
                &["Quality:", "2024-06-01"],
                &["Rebar", "10"],
                &["Plate", "3"],
            ]))
            .unwrap_err();
        assert!(matches!(err, ImportError::UnknownQualityGroup { row: 4, .. }));
    }

    #[test]
    fn test_order_forecast() {
        let parser = SheetParser::default();
        let entries = parser
            .parse_order_forecast(&grid(&[
                &["Monthly order forecast", "", ""],
                &["Quality:", "2024-06-01", "2024-07-01"],
                &["Rebar", "10", "12"],
                &["MBQ", "4.0", "5"],
            ]))
            .unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[3].quality_group, QualityGroup::Mbq);
        assert_eq!(entries[3].month, ym(7));
        assert_eq!(entries[2].heats_orders_forecasted, 4);
    }

    #[test]
    fn test_monthly_steel_grade_rejects_negative_tons() {
        let parser = SheetParser::default();
        let err = parser
            .parse_monthly_steel_grade(&grid(&[
                &["title", "", ""],
                &["Quality group", "Grade", "2024-06-01"],
                &["Rebar", "A", "1200"],
                &["", "B", "-500"],
            ]))
            .unwrap_err();
        assert!(matches!(err, ImportError::TypeConversionError { row: 4, .. }));
    }

    #[test]
    fn test_order_forecast_rejects_negative_heats() {
        let parser = SheetParser::default();
        let err = parser
            .parse_order_forecast(&grid(&[
                &["title", ""],
                &["Quality:", "2024-06-01"],
                &["Rebar", "-3"],
            ]))
            .unwrap_err();
        assert!(matches!(err, ImportError::TypeConversionError { row: 3, .. }));
    }

    #[test]
    fn test_malformed_month_header() {
        let parser = SheetParser::default();
        let err = parser
            .parse_order_forecast(&grid(&[
                &["title", ""],
                &["Quality:", "total"],
                &["Rebar", "10"],
            ]))
            .unwrap_err();
        assert!(matches!(err, ImportError::MalformedMonthHeader { column: 1, .. }));
    }

    #[test]
    fn test_daily_charge_schedule() {
        let parser = SheetParser::default();
        let entries = parser
            .parse_daily_charge_schedule(&grid(&[
                &["Daily charge schedule", "", "", "", "", ""],
                &["2024-08-01", "", "", "2024-08-02", "", ""],
                &["Start time", "Grade", "Mould size", "Start time", "Grade", "Mould size"],
                &["06:00:00", "A615", "150", "07:30", "-", "-"],
                &["08:00:00", "B500", "-", "-", "-", "-"],
            ]))
            .unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].day, NaiveDate::from_ymd_opt(2024, 8, 1).unwrap());
        assert_eq!(entries[1].mould_size, None);
        assert_eq!(entries[2].day, NaiveDate::from_ymd_opt(2024, 8, 2).unwrap());
        assert_eq!(entries[2].start_time, NaiveTime::from_hms_opt(7, 30, 0).unwrap());
        assert_eq!(entries[2].grade, None);
    }

    #[test]
    fn test_daily_charge_schedule_bad_sub_header() {
        let parser = SheetParser::default();
        let err = parser
            .parse_daily_charge_schedule(&grid(&[
                &["title", "", ""],
                &["2024-08-01", "", ""],
                &["Grade", "Start time", "Mould size"],
            ]))
            .unwrap_err();
        assert!(matches!(err, ImportError::MissingColumn(_)));
    }

    #[test]
    fn test_daily_charge_schedule_missing_start_time() {
        let parser = SheetParser::default();
        let err = parser
            .parse_daily_charge_schedule(&grid(&[
                &["title", "", ""],
                &["2024-08-01", "", ""],
                &["Start time", "Grade", "Mould size"],
                &["-", "A615", "150"],
            ]))
            .unwrap_err();
        assert!(matches!(err, ImportError::TypeConversionError { row: 4, .. }));
    }
}

// ==========================================
// 炼钢生产计划 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// 输出: 原始网格（标题行保留,由表结构解析器跳过）
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::{FileParser, RawGrid};
use calamine::{open_workbook_auto, Data, ExcelDateTime, Reader};
use chrono::NaiveTime;
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

fn check_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// 补齐行长度,去掉尾部完全空白的行
fn finish_grid(mut grid: RawGrid) -> RawGrid {
    while grid
        .last()
        .map(|row| row.iter().all(|c| c.is_empty()))
        .unwrap_or(false)
    {
        grid.pop();
    }

    let width = grid.iter().map(|r| r.len()).max().unwrap_or(0);
    for row in &mut grid {
        row.resize(width, String::new());
    }
    grid
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_grid(&self, file_path: &Path) -> ImportResult<RawGrid> {
        check_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let mut grid = Vec::new();
        for result in reader.records() {
            let record = result?;
            grid.push(record.iter().map(|v| v.trim().to_string()).collect());
        }

        Ok(finish_grid(grid))
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_to_grid(&self, file_path: &Path) -> ImportResult<RawGrid> {
        check_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(file_path)?;

        // 读取第一个 sheet
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;
        let range = workbook.worksheet_range(&sheet_name)?;

        let grid = range
            .rows()
            .map(|row| row.iter().map(render_cell).collect())
            .collect();

        Ok(finish_grid(grid))
    }
}

/// 单元格 → 字符串
///
/// 日期/时间单元格: 纯时间 → HH:MM:SS, 整日 → YYYY-MM-DD, 其他 → YYYY-MM-DD HH:MM:SS
fn render_cell(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => render_excel_datetime(dt),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
    }
}

/// Excel 日期单元格（序列值 < 1 视为纯时间）
fn render_excel_datetime(dt: &ExcelDateTime) -> String {
    let Some(value) = dt.as_datetime() else {
        return dt.as_f64().to_string();
    };

    if dt.as_f64() < 1.0 {
        value.time().format("%H:%M:%S").to_string()
    } else if value.time() == NaiveTime::MIN {
        value.date().format("%Y-%m-%d").to_string()
    } else {
        value.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl FileParser for UniversalFileParser {
    fn parse_to_grid(&self, file_path: &Path) -> ImportResult<RawGrid> {
        match extension_of(file_path).as_str() {
            "csv" => CsvParser.parse_to_grid(file_path),
            "xlsx" | "xls" => ExcelParser.parse_to_grid(file_path),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}

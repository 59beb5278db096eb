// ==========================================
// 炼钢生产计划 - 数据清洗器实现
// ==========================================
// 职责: TRIM / NULL 标准化 / 前向填充 / 稀疏列剔除 / 中位数插补
// ==========================================

use crate::importer::importer_trait::RawGrid;

/// 带表头的表格（缺失值为 None）
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl SheetTable {
    /// 列名查找（忽略大小写与首尾空白）
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted = name.trim().to_lowercase();
        self.header
            .iter()
            .position(|h| h.trim().to_lowercase() == wanted)
    }

    pub fn width(&self) -> usize {
        self.header.len()
    }
}

pub struct DataCleaner;

impl DataCleaner {
    /// TRIM + NULL 标准化: 空串与 "-" 视为缺失
    pub fn normalize_null(&self, value: &str) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == "-" {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// 以 header_row 行为表头构建表格,其后各行为数据; 完全空白的数据行被跳过
    pub fn to_table(&self, grid: &RawGrid, header_row: usize) -> Option<SheetTable> {
        let header: Vec<String> = grid
            .get(header_row)?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let rows = grid
            .iter()
            .skip(header_row + 1)
            .map(|row| {
                (0..header.len())
                    .map(|i| row.get(i).and_then(|v| self.normalize_null(v)))
                    .collect::<Vec<_>>()
            })
            .filter(|row| row.iter().any(|c| c.is_some()))
            .collect();

        Some(SheetTable { header, rows })
    }

    /// 前向填充（合并单元格导出后只有首行有值）
    pub fn forward_fill(&self, table: &mut SheetTable, column: usize) {
        let mut last: Option<String> = None;
        for row in &mut table.rows {
            match row.get_mut(column) {
                Some(Some(v)) => last = Some(v.clone()),
                Some(cell @ None) => *cell = last.clone(),
                None => {}
            }
        }
    }

    /// 剔除缺失值个数超过 max_missing 的列
    pub fn drop_sparse_columns(&self, table: SheetTable, max_missing: usize) -> SheetTable {
        let keep: Vec<usize> = (0..table.width())
            .filter(|&col| {
                let missing = table
                    .rows
                    .iter()
                    .filter(|row| row.get(col).map(|c| c.is_none()).unwrap_or(true))
                    .count();
                missing <= max_missing
            })
            .collect();

        SheetTable {
            header: keep.iter().map(|&i| table.header[i].clone()).collect(),
            rows: table
                .rows
                .into_iter()
                .map(|row| keep.iter().map(|&i| row[i].clone()).collect())
                .collect(),
        }
    }

    /// 数值列缺失值以列中位数插补
    ///
    /// 数值列: 非缺失值全部可解析为数字且至少一个
    pub fn impute_numeric_medians(&self, table: &mut SheetTable, columns: &[usize]) {
        let width = table.width();
        for &col in columns.iter().filter(|&&c| c < width) {
            let present: Vec<&str> = table
                .rows
                .iter()
                .filter_map(|row| row[col].as_deref())
                .collect();
            if present.is_empty() || present.len() == table.rows.len() {
                continue;
            }

            let mut values: Vec<f64> = match present
                .iter()
                .map(|v| v.parse::<f64>())
                .collect::<Result<Vec<_>, _>>()
            {
                Ok(v) => v,
                Err(_) => continue,
            };

            let Some(median) = median(&mut values) else {
                continue;
            };
            let filled = if median.fract() == 0.0 {
                format!("{}", median as i64)
            } else {
                median.to_string()
            };

            for row in &mut table.rows {
                if row[col].is_none() {
                    row[col] = Some(filled.clone());
                }
            }
        }
    }

    /// 整数解析（兼容 "12" / "12.0"; 带小数部分四舍五入）
    pub fn parse_integer(&self, value: &str) -> Option<i64> {
        let trimmed = value.trim().replace(',', "");
        if let Ok(i) = trimmed.parse::<i64>() {
            return Some(i);
        }
        trimmed
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| f.round() as i64)
    }
}

fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

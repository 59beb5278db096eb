// ==========================================
// 炼钢生产计划 - 导入接口 Trait
// ==========================================
// 职责: 定义文件解析与导入接口（不包含实现）
// ==========================================

use crate::domain::types::UploadFileType;
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// 原始单元格网格（行 × 列,单元格已转为字符串）
pub type RawGrid = Vec<Vec<String>>;

/// 单文件导入结果
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub batch_id: String,
    pub file_type: UploadFileType,
    pub rows: usize,
    pub elapsed_ms: u64,
}

// ==========================================
// ProductionDataImporter Trait
// ==========================================
// 用途: 生产/订单数据导入主接口
// 实现者: ProductionDataImporterImpl
#[async_trait]
pub trait ProductionDataImporter: Send + Sync {
    /// 导入单个文件
    ///
    /// # 导入流程
    /// 1. 文件读取与解析（原始网格）
    /// 2. 表结构解析 + 清洗（前向填充 / 稀疏列剔除 / 中位数插补）
    /// 3. 落库（单事务）
    async fn import_file(
        &self,
        file_type: UploadFileType,
        file_path: &Path,
    ) -> ImportResult<ImportSummary>;

    /// 批量导入多个文件（并发执行,互不影响）
    async fn batch_import(
        &self,
        files: Vec<(UploadFileType, PathBuf)>,
    ) -> Vec<Result<ImportSummary, String>>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口
// 实现者: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始网格（保留标题行,行长度补齐）
    fn parse_to_grid(&self, file_path: &Path) -> ImportResult<RawGrid>;
}

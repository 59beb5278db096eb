// ==========================================
// 炼钢生产计划 - 导入层
// ==========================================
// 职责: 表格文件导入,生成入库实体
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod error;
pub mod file_parser;
pub mod importer_impl;
pub mod importer_trait;
pub mod sheet_parser;

// 重导出核心类型
pub use data_cleaner::{DataCleaner, SheetTable};
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use importer_impl::ProductionDataImporterImpl;
pub use sheet_parser::{ParsedFile, SheetParser};

// 重导出 Trait 接口
pub use importer_trait::{FileParser, ImportSummary, ProductionDataImporter, RawGrid};

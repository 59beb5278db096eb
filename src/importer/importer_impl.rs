// ==========================================
// 炼钢生产计划 - 生产数据导入器实现
// ==========================================
// 职责: 整合导入流程,从文件到数据库
// 流程: 解析 → 表结构解析/清洗 → 落库（单事务）
// ==========================================

use crate::config::ForecastConfigReader;
use crate::domain::types::UploadFileType;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::{FileParser, ImportSummary, ProductionDataImporter};
use crate::importer::sheet_parser::{ParsedFile, SheetParser};
use crate::repository::{
    ChargeScheduleRepository, MonthSteelProductionRepository, OrderForecastRepository,
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

// ==========================================
// ProductionDataImporterImpl
// ==========================================
pub struct ProductionDataImporterImpl<C>
where
    C: ForecastConfigReader,
{
    // 配置读取器（稀疏列阈值）
    config: C,

    // 文件解析器
    file_parser: Box<dyn FileParser>,

    // 数据访问层
    production_repo: Arc<MonthSteelProductionRepository>,
    order_forecast_repo: Arc<OrderForecastRepository>,
    charge_schedule_repo: Arc<ChargeScheduleRepository>,
}

impl<C> ProductionDataImporterImpl<C>
where
    C: ForecastConfigReader,
{
    pub fn new(
        config: C,
        file_parser: Box<dyn FileParser>,
        production_repo: Arc<MonthSteelProductionRepository>,
        order_forecast_repo: Arc<OrderForecastRepository>,
        charge_schedule_repo: Arc<ChargeScheduleRepository>,
    ) -> Self {
        Self {
            config,
            file_parser,
            production_repo,
            order_forecast_repo,
            charge_schedule_repo,
        }
    }

    /// 落库（每个文件一个事务,重复行导致整体回滚）
    fn persist(&self, parsed: &ParsedFile) -> ImportResult<usize> {
        let inserted = match parsed {
            ParsedFile::MonthlySteelGrade(entries) => self.production_repo.insert_batch(entries)?,
            ParsedFile::OrderForecast(entries) => self.order_forecast_repo.insert_batch(entries)?,
            ParsedFile::ChargeSchedule(entries) => self.charge_schedule_repo.insert_batch(entries)?,
        };
        Ok(inserted)
    }
}

#[async_trait]
impl<C> ProductionDataImporter for ProductionDataImporterImpl<C>
where
    C: ForecastConfigReader,
{
    #[instrument(skip(self, file_path))]
    async fn import_file(
        &self,
        file_type: UploadFileType,
        file_path: &Path,
    ) -> ImportResult<ImportSummary> {
        let start_time = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        info!(batch_id = %batch_id, file_path = %file_path.display(), "开始导入文件");

        // === 步骤 1: 解析文件 ===
        let grid = self.file_parser.parse_to_grid(file_path).map_err(|e| {
            error!(batch_id = %batch_id, error = %e, "文件解析失败");
            e
        })?;
        debug!(batch_id = %batch_id, grid_rows = grid.len(), "文件解析完成");

        // === 步骤 2: 表结构解析 + 清洗 ===
        let config = self.config.load_forecast_config()?;
        let parsed = SheetParser::new(config.max_missing_per_column)
            .parse(file_type, &grid)
            .map_err(|e| {
                error!(batch_id = %batch_id, error = %e, "表结构解析失败");
                e
            })?;
        if parsed.is_empty() {
            return Err(ImportError::SheetStructureError("文件无数据行".to_string()));
        }

        // === 步骤 3: 落库 ===
        let rows = self.persist(&parsed).map_err(|e| {
            error!(batch_id = %batch_id, error = %e, "落库失败");
            e
        })?;

        let elapsed_ms = start_time.elapsed().as_millis() as u64;
        info!(batch_id = %batch_id, rows, elapsed_ms, "导入完成");

        Ok(ImportSummary {
            batch_id,
            file_type,
            rows,
            elapsed_ms,
        })
    }

    async fn batch_import(
        &self,
        files: Vec<(UploadFileType, PathBuf)>,
    ) -> Vec<Result<ImportSummary, String>> {
        use futures::future::join_all;

        info!(count = files.len(), "开始批量导入文件");

        let import_tasks = files.into_iter().map(|(file_type, path)| async move {
            match self.import_file(file_type, &path).await {
                Ok(summary) => Ok(summary),
                Err(e) => {
                    error!(file = %path.display(), error = %e, "文件导入失败");
                    Err(format!("文件 {} 导入失败: {}", path.display(), e))
                }
            }
        });

        let results = join_all(import_tasks).await;

        info!(
            total = results.len(),
            success = results.iter().filter(|r| r.is_ok()).count(),
            failed = results.iter().filter(|r| r.is_err()).count(),
            "批量导入完成"
        );

        results
    }
}

// ==========================================
// 炼钢生产计划 - 文件上传 API
// ==========================================
// 职责: 封装导入器,转换导入错误
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::types::UploadFileType;
use crate::importer::{ImportSummary, ProductionDataImporter};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 上传响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadFileResponse {
    pub file_type: UploadFileType,
    pub rows: usize,
}

impl From<ImportSummary> for UploadFileResponse {
    fn from(summary: ImportSummary) -> Self {
        Self {
            file_type: summary.file_type,
            rows: summary.rows,
        }
    }
}

pub struct ImportApi {
    importer: Arc<dyn ProductionDataImporter>,
}

impl ImportApi {
    pub fn new(importer: Arc<dyn ProductionDataImporter>) -> Self {
        Self { importer }
    }

    /// 上传单个文件
    ///
    /// # 返回
    /// - Err(Conflict): 文件数据已存在
    /// - Err(UnprocessableFile): 文件格式或结构无法解析
    pub async fn upload_file(
        &self,
        file_type: UploadFileType,
        file_path: &Path,
    ) -> ApiResult<UploadFileResponse> {
        let summary = self
            .importer
            .import_file(file_type, file_path)
            .await
            .map_err(ApiError::from)?;
        Ok(summary.into())
    }

    /// 批量上传（各文件独立成败）
    pub async fn upload_files(
        &self,
        files: Vec<(UploadFileType, PathBuf)>,
    ) -> Vec<Result<ImportSummary, String>> {
        self.importer.batch_import(files).await
    }
}

// ==========================================
// 炼钢生产计划 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型,转换下层错误为调用方可见的错误消息
// 内部错误只暴露事故编号,详细原因写日志
// ==========================================

use crate::engine::error::ForecastError;
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 调用方错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    UnprocessableFile(String),

    // ==========================================
    // 内部错误（带事故编号）
    // ==========================================
    #[error("Internal error, incident id: {incident_id}")]
    Internal { incident_id: String, message: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 生成内部错误并记录日志
    pub fn internal(message: impl Into<String>) -> Self {
        let incident_id = Uuid::new_v4().to_string();
        let message = message.into();
        error!(incident_id = %incident_id, message = %message, "内部错误");
        ApiError::Internal {
            incident_id,
            message,
        }
    }

    /// 对应的 HTTP 语义状态码
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InvalidInput(_) => 400,
            ApiError::NotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::UnprocessableFile(_) => 422,
            ApiError::Internal { .. } | ApiError::Other(_) => 500,
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::UniqueConstraintViolation(_) => {
                ApiError::Conflict("File already exists".to_string())
            }
            RepositoryError::Other(err) => ApiError::Other(err),
            other => ApiError::internal(other.to_string()),
        }
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        if err.is_duplicate() {
            return ApiError::Conflict("File already exists".to_string());
        }
        match err {
            ImportError::Repository(repo_err) => repo_err.into(),
            ImportError::InternalError(msg) => ApiError::internal(msg),
            ImportError::Other(err) => ApiError::Other(err),
            other => {
                tracing::warn!(error = %other, "文件内容无法解析");
                ApiError::UnprocessableFile("Invalid file format or structure".to_string())
            }
        }
    }
}

// ==========================================
// 从 ForecastError 转换
// ==========================================
impl From<ForecastError> for ApiError {
    fn from(err: ForecastError) -> Self {
        match err {
            // 月份格式错误属调用方输入问题, 不分配事故编号
            ForecastError::MalformedMonth { .. } => ApiError::InvalidInput(err.to_string()),
            other => ApiError::internal(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::QualityGroup;

    #[test]
    fn test_duplicate_import_is_conflict() {
        let err: ApiError =
            ImportError::Repository(RepositoryError::UniqueConstraintViolation("x".into())).into();
        assert!(matches!(err, ApiError::Conflict(ref m) if m == "File already exists"));
        assert_eq!(err.status_code(), 409);
    }

    #[test]
    fn test_parse_failure_is_unprocessable() {
        let err: ApiError = ImportError::MissingColumn("Grade".into()).into();
        assert!(matches!(err, ApiError::UnprocessableFile(_)));
        assert_eq!(err.to_string(), "Invalid file format or structure");
    }

    #[test]
    fn test_malformed_month_is_bad_request() {
        let err: ApiError = ForecastError::MalformedMonth {
            value: "2024/13".into(),
        }
        .into();
        assert!(matches!(err, ApiError::InvalidInput(_)));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_forecast_failure_has_incident_id() {
        let err: ApiError = ForecastError::ApportionmentMismatch {
            group: QualityGroup::Rebar,
            expected: 10,
            actual: 9,
        }
        .into();
        match err {
            ApiError::Internal { incident_id, message } => {
                assert!(Uuid::parse_str(&incident_id).is_ok());
                assert!(message.contains("REBAR"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}

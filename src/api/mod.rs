// ==========================================
// 炼钢生产计划 - API 层
// ==========================================
// 职责: 对外服务接口,错误转换
// ==========================================

pub mod error;
pub mod forecast_api;
pub mod import_api;

pub use error::{ApiError, ApiResult};
pub use forecast_api::{ForecastApi, ForecastResponse, ResponseMeta};
pub use import_api::{ImportApi, UploadFileResponse};

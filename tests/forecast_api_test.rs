// ==========================================
// 预测 API 集成测试
// ==========================================
// 覆盖: 导入 → 预测全链路, 错误映射, 配置覆写
// ==========================================

mod test_helpers;

use std::sync::{Arc, Mutex};
use steel_plans::api::ApiError;
use steel_plans::config::config_keys;
use steel_plans::db::open_sqlite_connection;
use steel_plans::repository::OrderForecastRepository;
use steel_plans::{OrderForecastEntry, QualityGroup, UploadFileType, YearMonth};
use test_helpers::*;

async fn seeded_state() -> (tempfile::TempDir, steel_plans::app::AppState) {
    steel_plans::logging::init_test();
    let (dir, state) = create_test_state().unwrap();

    let production = write_csv(&dir, "production.csv", &production_lines()).unwrap();
    let orders = write_csv(&dir, "orders.csv", &order_forecast_lines()).unwrap();

    state
        .import_api
        .upload_file(UploadFileType::MonthlySteelGradeProduction, &production)
        .await
        .unwrap();
    state
        .import_api
        .upload_file(UploadFileType::MonthlyOrderForecast, &orders)
        .await
        .unwrap();

    (dir, state)
}

#[tokio::test]
async fn test_forecast_full_flow() {
    let (_dir, state) = seeded_state().await;

    let response = state
        .forecast_api
        .forecast_grade_production("2024-07")
        .unwrap();

    assert_eq!(response.month, "2024-07");
    assert_eq!(response.meta.version, steel_plans::VERSION);

    let groups: Vec<QualityGroup> = response.groups.iter().map(|g| g.quality_group).collect();
    assert_eq!(
        groups,
        vec![QualityGroup::Rebar, QualityGroup::Sbq, QualityGroup::Chq]
    );

    // REBAR: 平滑比例 A≈0.579, B≈0.421 → 10 炉分为 6/4
    let rebar = &response.groups[0];
    assert_eq!(rebar.heats, 10);
    assert_eq!(rebar.grades.len(), 2);
    assert_eq!(rebar.grades[0].grade, "A");
    assert_eq!(rebar.grades[0].heats, 6);
    assert_eq!(rebar.grades[1].grade, "B");
    assert_eq!(rebar.grades[1].heats, 4);
    assert!((rebar.grades[0].proportion - 0.6).abs() < 1e-9);

    // SBQ: 4-5 月零产量被排除, 仅 6 月 S1 独占
    let sbq = &response.groups[1];
    assert_eq!(sbq.heats, 5);
    assert_eq!(sbq.grades.len(), 1);
    assert_eq!(sbq.grades[0].heats, 5);

    // CHQ: 无历史 → 空分解
    let chq = &response.groups[2];
    assert_eq!(chq.heats, 4);
    assert!(chq.grades.is_empty());

    for group in &response.groups {
        assert_eq!(group.allocated_heats(), if group.grades.is_empty() { 0 } else { group.heats });
    }
}

#[tokio::test]
async fn test_forecast_serializes_group_key() {
    let (_dir, state) = seeded_state().await;

    let response = state
        .forecast_api
        .forecast_grade_production("2024-06")
        .unwrap();
    let value = serde_json::to_value(&response).unwrap();

    assert_eq!(value["month"], "2024-06");
    assert_eq!(value["groups"][0]["group"], "REBAR");
    assert_eq!(value["groups"][0]["heats"], 10);
    assert!(value["meta"]["timestamp"].is_string());
}

#[tokio::test]
async fn test_forecast_month_without_orders_is_not_found() {
    let (_dir, state) = seeded_state().await;

    let err = state
        .forecast_api
        .forecast_grade_production("2024-09")
        .unwrap_err();

    assert!(matches!(err, ApiError::NotFound(_)));
    assert_eq!(err.to_string(), "No order forecast data for 2024-09");
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn test_forecast_rejects_malformed_month() {
    let (_dir, state) = seeded_state().await;

    for month in ["2024-7", "2024/07", "July 2024", "2024-13", "-999-09", ""] {
        let err = state
            .forecast_api
            .forecast_grade_production(month)
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)), "month={}", month);
    }
}

#[tokio::test]
async fn test_invalid_config_override_falls_back_to_default() {
    let (_dir, state) = seeded_state().await;

    state
        .config_manager
        .set_global_config_value(config_keys::SMOOTHING_ALPHA, "abc")
        .unwrap();
    state
        .config_manager
        .set_global_config_value(config_keys::TONS_PER_HEAT, "0")
        .unwrap();

    let response = state
        .forecast_api
        .forecast_grade_production("2024-07")
        .unwrap();
    assert_eq!(response.groups[0].grades[0].heats, 6);
}

#[tokio::test]
async fn test_tons_per_heat_override_keeps_proportions() {
    let (_dir, state) = seeded_state().await;

    state
        .config_manager
        .set_global_config_value(config_keys::TONS_PER_HEAT, "50")
        .unwrap();

    let response = state
        .forecast_api
        .forecast_grade_production("2024-07")
        .unwrap();
    let rebar = &response.groups[0];
    assert_eq!(rebar.grades[0].heats, 6);
    assert_eq!(rebar.grades[1].heats, 4);
}

#[tokio::test]
async fn test_group_failure_becomes_internal_error() {
    let (_dir, state) = seeded_state().await;

    // 绕过导入校验直接写入负炉数
    let conn = open_sqlite_connection(&state.db_path).unwrap();
    let order_repo = OrderForecastRepository::from_connection(Arc::new(Mutex::new(conn)));
    order_repo
        .insert_batch(&[
            OrderForecastEntry {
                month: YearMonth::new(2024, 8).unwrap(),
                quality_group: QualityGroup::Rebar,
                heats_orders_forecasted: -3,
            },
            OrderForecastEntry {
                month: YearMonth::new(2024, 8).unwrap(),
                quality_group: QualityGroup::Sbq,
                heats_orders_forecasted: 5,
            },
        ])
        .unwrap();

    let result = state.forecast_api.forecast_grade_production("2024-08");

    match result {
        Err(ApiError::Internal { incident_id, message }) => {
            assert!(uuid::Uuid::parse_str(&incident_id).is_ok());
            assert!(message.contains("REBAR"));
        }
        Err(other) => panic!("unexpected error: {:?}", other),
        Ok(response) => panic!("partial forecast returned: {} groups", response.groups.len()),
    }
}

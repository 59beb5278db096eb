// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库、CSV 夹具文件
// ==========================================

#![allow(dead_code)]

use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use steel_plans::app::AppState;
use tempfile::TempDir;

/// 创建临时测试数据库并初始化应用状态
///
/// # 返回
/// - TempDir: 临时目录（需要保持存活）
/// - AppState: 已建表的应用状态
pub fn create_test_state() -> Result<(TempDir, AppState), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let db_path = dir.path().join("steel_plans_test.db");
    let state = AppState::new(db_path.to_string_lossy().to_string())?;
    Ok((dir, state))
}

/// 在目录中写入 CSV 夹具
pub fn write_csv(dir: &TempDir, name: &str, lines: &[&str]) -> Result<PathBuf, Box<dyn Error>> {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path)?;
    for line in lines {
        writeln!(file, "{}", line)?;
    }
    Ok(path)
}

/// 历史产量（短吨,每炉 100 短吨）
///
/// REBAR: A/B 在 2024-04..2024-06 逐月 60/40 → 50/50 → 60/40
/// SBQ:   S1 在 2024-06 独占
pub fn production_lines() -> Vec<&'static str> {
    vec![
        "Monthly steel grade production",
        "Quality group,Grade,2024-04-01,2024-05-01,2024-06-01",
        "Rebar,A,6000,5000,6000",
        ",B,4000,5000,4000",
        "SBQ,S1,0,0,3000",
    ]
}

/// 订单预测（炉数）
pub fn order_forecast_lines() -> Vec<&'static str> {
    vec![
        "Monthly order forecast",
        "Quality:,2024-06-01,2024-07-01",
        "Rebar,10,10",
        "SBQ,3,5",
        "CHQ,2,4",
    ]
}

pub fn charge_schedule_lines() -> Vec<&'static str> {
    vec![
        "Daily charge schedule,,,,,",
        "2024-08-01,,,2024-08-02,,",
        "Start time,Grade,Mould size,Start time,Grade,Mould size",
        "06:00:00,A,150,06:30:00,B,-",
        "08:00:00,-,-,-,-,-",
    ]
}

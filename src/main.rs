// ==========================================
// 炼钢生产计划 - 命令行入口
// ==========================================
// 用法:
//   steel-plans import <file_type> <path> [<file_type> <path>...]
//   steel-plans forecast <YYYY-MM>
//
// file_type: steel_grade_production.xlsx | daily_charge_schedule.xlsx
//            | product_groups_monthly.xlsx
// 数据库路径: STEEL_PLANS_DB_PATH > 用户数据目录 > ./steel_plans.db
// ==========================================

use std::path::PathBuf;
use std::process::ExitCode;

use serde_json::json;
use steel_plans::api::ApiError;
use steel_plans::app::{get_default_db_path, AppState};
use steel_plans::{logging, UploadFileType};

const USAGE: &str = "用法:
  steel-plans import <file_type> <path> [<file_type> <path>...]
  steel-plans forecast <YYYY-MM>";

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        eprintln!("{}", USAGE);
        return ExitCode::from(2);
    };

    let db_path = get_default_db_path();
    tracing::info!(version = steel_plans::VERSION, db_path = %db_path, "启动");

    let state = match AppState::new(db_path) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match command.as_str() {
        "import" => run_import(&state, rest).await,
        "forecast" => run_forecast(&state, rest),
        other => {
            eprintln!("未知命令: {}\n{}", other, USAGE);
            ExitCode::from(2)
        }
    }
}

async fn run_import(state: &AppState, args: &[String]) -> ExitCode {
    if args.is_empty() || args.len() % 2 != 0 {
        eprintln!("{}", USAGE);
        return ExitCode::from(2);
    }

    let mut files = Vec::with_capacity(args.len() / 2);
    for pair in args.chunks(2) {
        match pair[0].parse::<UploadFileType>() {
            Ok(file_type) => files.push((file_type, PathBuf::from(&pair[1]))),
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::from(2);
            }
        }
    }

    // 单文件: 返回 API 语义错误; 多文件: 并发导入,逐个汇报
    if files.len() == 1 {
        let (file_type, path) = &files[0];
        return match state.import_api.upload_file(*file_type, path).await {
            Ok(response) => print_json(&json!(response)),
            Err(e) => print_error(&e),
        };
    }

    let results = state.import_api.upload_files(files).await;
    let failed = results.iter().filter(|r| r.is_err()).count();
    let report: Vec<_> = results
        .into_iter()
        .map(|r| match r {
            Ok(summary) => json!({ "ok": summary }),
            Err(message) => json!({ "error": message }),
        })
        .collect();

    let code = print_json(&json!(report));
    if failed > 0 {
        ExitCode::FAILURE
    } else {
        code
    }
}

fn run_forecast(state: &AppState, args: &[String]) -> ExitCode {
    let [month] = args else {
        eprintln!("{}", USAGE);
        return ExitCode::from(2);
    };

    match state.forecast_api.forecast_grade_production(month) {
        Ok(response) => print_json(&json!(response)),
        Err(e) => print_error(&e),
    }
}

fn print_json(value: &serde_json::Value) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("JSON 序列化失败: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_error(err: &ApiError) -> ExitCode {
    let body = json!({ "status": err.status_code(), "detail": err.to_string() });
    eprintln!("{}", body);
    ExitCode::FAILURE
}

// ==========================================
// 房源导入系统 - 命令行入口
// ==========================================
// 退出码: 0 完成（含被拒绝的行）/ 2 输入为空或不可读 / 1 其他失败
// ==========================================

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use listing_import::app::{get_default_db_path, AppState};
use listing_import::{logging, ImportError, ListingImporter};
use tracing::error;

const EXIT_FAILURE: u8 = 1;
const EXIT_INVALID: u8 = 2;

/// 导入房源 CSV：校验、纠正地址、去重并落库
#[derive(Debug, Parser)]
#[command(name = "listing-import", version, about)]
struct Args {
    /// CSV 文件（分号分隔，首行为表头）
    #[arg(long, default_value = "immo-import/immo_sample.csv")]
    file: PathBuf,

    /// SQLite 数据库路径
    #[arg(long, env = "LISTING_IMPORT_DB_PATH")]
    db: Option<String>,

    /// 覆盖街道目录服务地址
    #[arg(long)]
    directory_url: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init();
    let args = Args::parse();

    match run(args).await {
        Ok(report_text) => {
            print!("{}", report_text);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %format!("{:#}", err), "导入失败");
            eprintln!("Import failed: {:#}", err);
            let invalid = err
                .downcast_ref::<ImportError>()
                .map(ImportError::is_invalid_input)
                .unwrap_or(false);
            ExitCode::from(if invalid { EXIT_INVALID } else { EXIT_FAILURE })
        }
    }
}

async fn run(args: Args) -> anyhow::Result<String> {
    let db_path = args.db.unwrap_or_else(get_default_db_path);
    let state = AppState::new(db_path.as_str())
        .with_context(|| format!("无法打开数据库: {}", db_path))?;

    let mut config = state.load_import_config().await?;
    if let Some(url) = args.directory_url {
        config.address_directory_url = url;
    }

    let importer = state.build_importer(&config)?;
    let report = importer.import_from_csv(&args.file).await?;
    Ok(report.render_text())
}

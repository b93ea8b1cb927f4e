// ==========================================
// 房源导入系统 - 应用状态
// ==========================================
// 职责: 打开数据库、建表，组装共享连接上的配置与仓储
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use tracing::info;

use crate::config::{ConfigManager, ImportConfig};
use crate::db::{ensure_schema, open_sqlite_connection};
use crate::importer::{
    CsvParser, DataCleanerImpl, ImportResult, ListingImporterImpl, OpenPlzDirectory,
};
use crate::repository::ListingImportRepositoryImpl;

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "LISTING_IMPORT_DB_PATH";

/// 应用状态
///
/// 配置管理器与仓储共用一个连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    pub config_manager: ConfigManager,

    conn: Arc<Mutex<Connection>>,
}

impl AppState {
    /// 打开数据库并初始化表结构
    pub fn new(db_path: impl Into<String>) -> ImportResult<Self> {
        let db_path = db_path.into();
        let conn = open_sqlite_connection(&db_path)?;
        ensure_schema(&conn)?;
        info!(db_path = %db_path, "数据库已就绪");

        let conn = Arc::new(Mutex::new(conn));
        Ok(Self {
            db_path,
            config_manager: ConfigManager::from_connection(conn.clone()),
            conn,
        })
    }

    /// 读取本次运行的配置快照
    pub async fn load_import_config(&self) -> ImportResult<ImportConfig> {
        ImportConfig::load(&self.config_manager).await
    }

    /// 按配置组装导入器（HTTP 街道目录 + SQLite 仓储）
    pub fn build_importer(
        &self,
        config: &ImportConfig,
    ) -> ImportResult<ListingImporterImpl<ListingImportRepositoryImpl, OpenPlzDirectory>> {
        let directory = OpenPlzDirectory::new(config).map_err(|e| {
            crate::importer::ImportError::InternalError(format!("HTTP 客户端创建失败: {}", e))
        })?;

        Ok(ListingImporterImpl::new(
            ListingImportRepositoryImpl::from_connection(self.conn.clone()),
            Box::new(CsvParser::new(config.csv_delimiter)),
            Box::new(DataCleanerImpl),
            directory,
        ))
    }
}

/// 默认数据库路径
///
/// 优先级: 环境变量 → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./listings.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("listing-import");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("listings.db");
        }
    }

    path.to_string_lossy().to_string()
}

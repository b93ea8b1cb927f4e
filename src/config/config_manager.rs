// ==========================================
// 房源导入系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// 约束: 缺失键使用默认值；格式错误的值告警后使用默认值
// ==========================================

use crate::config::import_config::DEFAULT_USER_AGENT;
use crate::config::import_config_trait::ImportConfigReader;
use crate::db::open_sqlite_connection;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::DEFAULT_DELIMITER;
use crate::importer::street_directory::OPEN_PLZ_STREETS_URL;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};
use tracing::warn;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ImportResult<Self> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> ImportResult<Option<String>> {
        let conn = self.conn.lock().map_err(|e| ImportError::ConfigReadError {
            key: key.to_string(),
            message: format!("锁获取失败: {}", e),
        })?;

        conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        )
        .optional()
        .map_err(|e| ImportError::ConfigReadError {
            key: key.to_string(),
            message: e.to_string(),
        })
    }

    /// 写入 global scope 配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ImportResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ImportError::InternalError(format!("锁获取失败: {}", e)))?;

        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }

    /// 读取配置值，空白值视为未配置
    fn get_trimmed(&self, key: &str) -> ImportResult<Option<String>> {
        Ok(self
            .get_global_config_value(key)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()))
    }
}

// ==========================================
// ImportConfigReader Trait 实现
// ==========================================
#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_address_directory_url(&self) -> ImportResult<String> {
        Ok(self
            .get_trimmed(config_keys::ADDRESS_DIRECTORY_URL)?
            .unwrap_or_else(|| OPEN_PLZ_STREETS_URL.to_string()))
    }

    async fn get_http_timeout_secs(&self) -> ImportResult<Option<u64>> {
        let Some(value) = self.get_trimmed(config_keys::HTTP_TIMEOUT_SECS)? else {
            return Ok(None);
        };
        match value.parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(Some(secs)),
            _ => {
                warn!(
                    config_key = config_keys::HTTP_TIMEOUT_SECS,
                    raw_value = %value,
                    "超时配置格式错误，使用客户端默认值"
                );
                Ok(None)
            }
        }
    }

    async fn get_user_agent(&self) -> ImportResult<String> {
        Ok(self
            .get_trimmed(config_keys::USER_AGENT)?
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()))
    }

    async fn get_csv_delimiter(&self) -> ImportResult<u8> {
        // 分隔符本身可能是空白（如 TAB），不做 TRIM
        let Some(value) = self.get_global_config_value(config_keys::CSV_DELIMITER)? else {
            return Ok(DEFAULT_DELIMITER);
        };
        match value.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => {
                warn!(
                    config_key = config_keys::CSV_DELIMITER,
                    raw_value = %value,
                    "分隔符配置格式错误，使用默认值"
                );
                Ok(DEFAULT_DELIMITER)
            }
        }
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 街道目录
    pub const ADDRESS_DIRECTORY_URL: &str = "address_directory_url";
    pub const HTTP_TIMEOUT_SECS: &str = "http_timeout_secs";
    pub const USER_AGENT: &str = "user_agent";

    // 文件格式
    pub const CSV_DELIMITER: &str = "csv_delimiter";
}

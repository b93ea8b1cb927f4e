// ==========================================
// 房源导入系统 - 导入配置快照
// ==========================================
// 一次导入运行使用的配置值（运行开始时读取一次）
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::importer::error::ImportResult;
use crate::importer::file_parser::DEFAULT_DELIMITER;
use crate::importer::street_directory::OPEN_PLZ_STREETS_URL;

/// 默认 User-Agent
pub const DEFAULT_USER_AGENT: &str = concat!("listing-import/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    pub address_directory_url: String,
    pub csv_delimiter: u8,
    pub http_timeout_secs: Option<u64>,
    pub user_agent: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            address_directory_url: OPEN_PLZ_STREETS_URL.to_string(),
            csv_delimiter: DEFAULT_DELIMITER,
            http_timeout_secs: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ImportConfig {
    /// 从配置读取器加载
    pub async fn load<C>(reader: &C) -> ImportResult<Self>
    where
        C: ImportConfigReader + ?Sized,
    {
        Ok(Self {
            address_directory_url: reader.get_address_directory_url().await?,
            csv_delimiter: reader.get_csv_delimiter().await?,
            http_timeout_secs: reader.get_http_timeout_secs().await?,
            user_agent: reader.get_user_agent().await?,
        })
    }
}

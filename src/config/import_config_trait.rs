// ==========================================
// 房源导入系统 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::importer::error::ImportResult;
use async_trait::async_trait;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入模块所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    // ===== 地址目录配置 =====

    /// 获取街道目录服务地址
    ///
    /// # 默认值
    /// - https://openplzapi.org/de/Streets
    async fn get_address_directory_url(&self) -> ImportResult<String>;

    /// 获取目录请求超时（秒）
    ///
    /// # 返回
    /// - None: 未配置，使用 HTTP 客户端默认行为
    async fn get_http_timeout_secs(&self) -> ImportResult<Option<u64>>;

    /// 获取目录请求 User-Agent
    ///
    /// # 默认值
    /// - listing-import/<版本号>
    async fn get_user_agent(&self) -> ImportResult<String>;

    // ===== 文件格式配置 =====

    /// 获取 CSV 分隔符（单个 ASCII 字符）
    ///
    /// # 默认值
    /// - ;
    async fn get_csv_delimiter(&self) -> ImportResult<u8>;
}

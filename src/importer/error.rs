// ==========================================
// 房源导入系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分层: ImportError 为运行级错误（终止本次导入）
//       AddressError 为行级错误（仅拒绝当前行）
// ==========================================

use crate::repository::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型（运行级）
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error("输入文件为空: {0}")]
    EmptyFile(String),

    // ===== 数据库错误 =====
    #[error("数据库操作失败: {0}")]
    DatabaseError(String),

    // ===== 配置错误 =====
    #[error("配置读取失败 (key: {key}): {message}")]
    ConfigReadError { key: String, message: String },

    // ===== 报告错误 =====
    #[error("导入报告序列化失败: {0}")]
    ReportSerializationError(String),

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    /// 是否为“空输入”类错误（进程以 INVALID 状态退出）
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            ImportError::EmptyFile(_) | ImportError::FileNotFound(_) | ImportError::FileReadError(_)
        )
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for ImportError {
    fn from(err: rusqlite::Error) -> Self {
        ImportError::DatabaseError(err.to_string())
    }
}

// 实现 From<RepositoryError>
impl From<RepositoryError> for ImportError {
    fn from(err: RepositoryError) -> Self {
        ImportError::DatabaseError(err.to_string())
    }
}

// 实现 From<serde_json::Error>
impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::ReportSerializationError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

/// 地址解析错误（行级）
///
/// Display 文本即写入拒绝原因的错误信息
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// 三级查询均无结果
    #[error("Invalid address.")]
    NotFound,

    /// 第 1 级（街道 + 邮编 + 城市）多条结果
    #[error("Address ambiguous")]
    AmbiguousExact,

    /// 第 2 级（街道 + 邮编）多条结果：城市有误
    #[error("Address city wrong and ambiguous findings for street + postal code")]
    AmbiguousCityMismatch,

    /// 第 3 级（街道 + 城市）多条结果：邮编有误
    #[error("Address postal-code wrong and ambiguous findings for street + city")]
    AmbiguousPostalMismatch,

    #[error("Address lookup failed: {0}")]
    Transport(String),

    #[error("Address lookup returned an unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl From<reqwest::Error> for AddressError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AddressError::UnexpectedResponse(err.to_string())
        } else {
            AddressError::Transport(err.to_string())
        }
    }
}

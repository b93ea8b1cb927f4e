// ==========================================
// 房源导入系统 - 应用层
// ==========================================
// 职责: 组装运行所需的共享资源
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState, DB_PATH_ENV};

// ==========================================
// 房源导入系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化
// ==========================================

pub mod error;
pub mod listing_import_repo;
pub mod listing_import_repo_impl;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use listing_import_repo::ListingImportRepository;
pub use listing_import_repo_impl::ListingImportRepositoryImpl;

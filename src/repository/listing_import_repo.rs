// ==========================================
// 房源导入系统 - 房源导入 Repository Trait
// ==========================================
// 职责: 定义导入相关数据访问接口（不包含业务逻辑）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::{ImportBatch, Listing};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// ListingImportRepository Trait
// ==========================================
// 用途: 房源导入相关数据访问
// 实现者: ListingImportRepositoryImpl（使用 rusqlite）
#[async_trait]
pub trait ListingImportRepository: Send + Sync {
    // ===== 读取 =====

    /// 查询全部已落库房源（用于初始化去重索引）
    async fn find_all_listings(&self) -> RepositoryResult<Vec<Listing>>;

    /// 统计已落库房源数
    async fn count_listings(&self) -> RepositoryResult<usize>;

    // ===== 批量写入（事务化）=====

    /// 批量插入暂存房源
    ///
    /// # 参数
    /// - listings: 本次导入接受的房源（文件顺序）
    ///
    /// # 返回
    /// - Ok(usize): 插入的记录数
    /// - Err: 数据库错误（整个事务回滚，不落库任何房源）
    async fn batch_insert_listings(&self, listings: Vec<Listing>) -> RepositoryResult<usize>;

    // ===== 批次管理 =====

    /// 记录导入批次
    async fn insert_batch(&self, batch: ImportBatch) -> RepositoryResult<()>;

    /// 查询最近的导入批次（按导入时间倒序）
    async fn get_recent_batches(&self, limit: usize) -> RepositoryResult<Vec<ImportBatch>>;
}

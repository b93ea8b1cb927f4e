// ==========================================
// 房源导入系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite + OpenPLZ 街道目录
// 系统定位: 房源 CSV 校验、地址纠正与去重落库
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 应用层 - 运行组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{
    AcceptedRow, AddressCandidate, CorrectedAddress, ImportBatch, ImportReport, Listing, RawRow,
    RejectedRow,
};
pub use importer::{AddressError, ImportError, ImportResult, ListingImporter, ListingImporterImpl};

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "listing-import";

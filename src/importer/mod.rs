// ==========================================
// 房源导入系统 - 导入层
// ==========================================
// 职责: CSV 房源导入，地址纠正，去重，落库
// ==========================================

// 模块声明
pub mod address_resolver;
pub mod conflict_handler;
pub mod data_cleaner;
pub mod error;
pub mod file_parser;
pub mod listing_importer_impl;
pub mod listing_importer_trait;
pub mod row_validator;
pub mod street_directory;

// 重导出核心类型
pub use address_resolver::{AddressResolver, LookupTier, StreetSearch};
pub use conflict_handler::DedupIndex;
pub use data_cleaner::DataCleaner as DataCleanerImpl;
pub use error::{AddressError, ImportError, ImportResult};
pub use file_parser::CsvParser;
pub use listing_importer_impl::ListingImporterImpl;
pub use row_validator::{RowValidator, RowVerdict};
pub use street_directory::{OpenPlzDirectory, StreetQuery, OPEN_PLZ_STREETS_URL};

// 重导出 Trait 接口
pub use listing_importer_trait::{
    AddressDirectory, DataCleaner, FileParser, IntegerParseError, ListingImporter,
};

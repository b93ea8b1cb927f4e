// ==========================================
// 房源导入系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体与值对象
// 红线: 不含数据访问逻辑,不含导入流程逻辑
// ==========================================

pub mod address;
pub mod listing;

// 重导出核心类型
pub use address::{AddressCandidate, CorrectedAddress};
pub use listing::{
    AcceptedRow, DedupKey, ImportBatch, ImportReport, Listing, RawRow, RejectedRow,
};

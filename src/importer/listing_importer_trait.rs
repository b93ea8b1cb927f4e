// ==========================================
// 房源导入系统 - 房源导入 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// 流程: 文件解析 → 字段清洗 → 行校验(含地址纠正) → 去重 → 落库 → 报告
// ==========================================

use crate::domain::{AddressCandidate, ImportReport, RawRow};
use crate::importer::error::{AddressError, ImportResult};
use crate::importer::street_directory::StreetQuery;
use async_trait::async_trait;
use std::path::Path;

// ==========================================
// ListingImporter Trait
// ==========================================
// 用途: 房源导入主接口
// 实现者: ListingImporterImpl
#[async_trait]
pub trait ListingImporter: Send + Sync {
    /// 从 CSV 文件导入房源
    ///
    /// # 参数
    /// - file_path: CSV 文件路径（分号分隔，首行为表头）
    ///
    /// # 返回
    /// - Ok(ImportReport): 接受/拒绝明细 + 批次信息
    /// - Err(ImportError::EmptyFile): 空文件，未处理任何行
    /// - Err: 文件读取错误、数据库错误等
    ///
    /// # 导入流程
    /// 1. 文件读取与解析（丢弃表头）
    /// 2. 以已落库房源初始化去重索引
    /// 3. 逐行校验（含地址纠正）
    /// 4. 去重（重复行静默跳过）
    /// 5. 单事务批量落库
    /// 6. 记录批次 + 生成报告
    async fn import_from_csv<P: AsRef<Path> + Send>(&self, file_path: P)
        -> ImportResult<ImportReport>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 1）
// 实现者: CsvParser
pub trait FileParser: Send + Sync {
    /// 解析文件为数据行（表头已丢弃）
    ///
    /// # 返回
    /// - Ok(Vec<RawRow>): 数据行（保留源文件行号）
    /// - Err(ImportError::EmptyFile): 文件为空或仅有表头
    fn parse_to_raw_rows(&self, file_path: &Path) -> ImportResult<Vec<RawRow>>;
}

// ==========================================
// DataCleaner Trait
// ==========================================
// 用途: 字段清洗与类型转换接口（阶段 3）
// 实现者: DataCleaner
pub trait DataCleaner: Send + Sync {
    /// 清洗文本字段（TRIM）
    fn clean_text(&self, value: &str) -> String;

    /// 解析小数（容忍逗号作小数点）
    ///
    /// # 返回
    /// - Some(f64): 解析成功
    /// - None: 空值或非数字
    fn parse_decimal(&self, value: &str) -> Option<f64>;

    /// 解析整数（仅 ASCII 数字，不允许符号）
    ///
    /// # 返回
    /// - Err(IntegerParseError::NotAnInteger): 空值或含非数字字符
    /// - Err(IntegerParseError::OutOfRange): 全为数字但超出 u32
    fn parse_integer(&self, value: &str) -> Result<u32, IntegerParseError>;

    /// 标准化邮编（去掉 "D-" 前缀，必须为 5 位数字）
    ///
    /// # 返回
    /// - Some(String): 标准化后的 5 位邮编
    /// - None: 格式不合法
    fn normalize_postal_code(&self, value: &str) -> Option<String>;
}

/// 整数解析失败原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegerParseError {
    NotAnInteger,
    OutOfRange,
}

// ==========================================
// AddressDirectory Trait
// ==========================================
// 用途: 外部街道目录查询接口
// 实现者: OpenPlzDirectory（HTTP）/ 测试用内存目录
#[async_trait]
pub trait AddressDirectory: Send + Sync {
    /// 按过滤条件查询街道
    ///
    /// # 返回
    /// - Ok(Vec<AddressCandidate>): 候选列表（空表示无匹配）
    /// - Err(AddressError::Transport): 网络/HTTP 失败
    async fn find_streets(&self, query: &StreetQuery) -> Result<Vec<AddressCandidate>, AddressError>;
}

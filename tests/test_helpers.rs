// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库初始化、CSV 夹具生成
// ==========================================

#![allow(dead_code)]

use listing_import::db::{ensure_schema, open_sqlite_connection};
use rusqlite::Connection;
use std::error::Error;
use std::io::Write;
use tempfile::NamedTempFile;

/// CSV 表头（导入时丢弃）
pub const CSV_HEADER: &str = "street;postalCode;city;coldRent;warmRent;area;rooms";

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_string_lossy().to_string();

    let conn = open_sqlite_connection(&db_path)?;
    ensure_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开测试数据库连接
pub fn open_test_connection(db_path: &str) -> Result<Connection, Box<dyn Error>> {
    Ok(open_sqlite_connection(db_path)?)
}

/// 写入 CSV 夹具（自动加表头）
pub fn write_csv(rows: &[&str]) -> Result<NamedTempFile, Box<dyn Error>> {
    let mut temp_file = NamedTempFile::new()?;
    writeln!(temp_file, "{}", CSV_HEADER)?;
    for row in rows {
        writeln!(temp_file, "{}", row)?;
    }
    temp_file.flush()?;
    Ok(temp_file)
}

/// 写入原始内容（不加表头）
pub fn write_raw(content: &str) -> Result<NamedTempFile, Box<dyn Error>> {
    write_bytes(content.as_bytes())
}

/// 写入原始字节（可含非 UTF-8 内容）
pub fn write_bytes(content: &[u8]) -> Result<NamedTempFile, Box<dyn Error>> {
    let mut temp_file = NamedTempFile::new()?;
    temp_file.write_all(content)?;
    temp_file.flush()?;
    Ok(temp_file)
}

// ==========================================
// 房源导入系统 - 文件解析器实现
// ==========================================
// 阶段 1: 文件读取与解析
// 格式: CSV（默认分号分隔），首行为表头（丢弃，不校验）
// 约束: 空文件 / 仅表头 → ImportError::EmptyFile
// ==========================================

use crate::domain::RawRow;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::listing_importer_trait::FileParser;
use csv::{ByteRecord, ReaderBuilder};
use std::fs;
use std::path::Path;

/// 默认分隔符
pub const DEFAULT_DELIMITER: u8 = b';';

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser {
    delimiter: u8,
}

impl CsvParser {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER)
    }
}

impl FileParser for CsvParser {
    fn parse_to_raw_rows(&self, file_path: &Path) -> ImportResult<Vec<RawRow>> {
        let path = file_path;

        // 检查文件存在
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let bytes = fs::read(path)?;
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_reader(bytes.as_slice());

        // 按字节读取：非 UTF-8 单元格做有损转换，只影响所在行
        let mut records = reader.byte_records();

        // 读取并丢弃表头
        match records.next() {
            Some(header) => {
                header?;
            }
            None => return Err(ImportError::EmptyFile(path.display().to_string())),
        }

        let mut lines = LineCounter::new(&bytes);
        let mut rows = Vec::new();
        for result in records {
            let record = result?;
            let line_number = record
                .position()
                .map(|p| lines.line_at(p.byte() as usize))
                .unwrap_or(rows.len() + 2);
            rows.push(to_raw_row(&record, line_number));
        }

        if rows.is_empty() {
            return Err(ImportError::EmptyFile(path.display().to_string()));
        }

        Ok(rows)
    }
}

/// 字节偏移 → 物理行号（1 起）
///
/// CSV 读取器给出的记录位置在被跳过的空行之前，且其行号不计空行；
/// 这里先越过空行，再按换行符自行计数。偏移须单调递增。
struct LineCounter<'a> {
    bytes: &'a [u8],
    offset: usize,
    line: usize,
}

impl<'a> LineCounter<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            offset: 0,
            line: 1,
        }
    }

    fn line_at(&mut self, byte: usize) -> usize {
        let len = self.bytes.len();
        let mut target = byte.min(len);
        while target < len && matches!(self.bytes[target], b'\r' | b'\n') {
            target += 1;
        }
        if target > self.offset {
            self.line += self.bytes[self.offset..target]
                .iter()
                .filter(|&&b| b == b'\n')
                .count();
            self.offset = target;
        }
        self.line
    }
}

/// 转换为 RawRow（单元格不做 TRIM）
fn to_raw_row(record: &ByteRecord, line_number: usize) -> RawRow {
    RawRow::new(
        line_number,
        record
            .iter()
            .map(|cell| String::from_utf8_lossy(cell).into_owned())
            .collect(),
    )
}

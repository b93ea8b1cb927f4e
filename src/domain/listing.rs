// ==========================================
// 房源导入系统 - 房源领域模型
// ==========================================
// 职责: Listing 实体、原始行、去重键、导入结果
// 红线: Listing 构造前必须完成地址纠正，构造后不可变
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 原始行 / 纠正后文本的连接符
pub const FIELD_JOINER: &str = "; ";

/// 去重键字段分隔符
pub const DEDUP_KEY_SEPARATOR: char = '|';

// ==========================================
// Listing - 房源实体
// ==========================================
// 用途: 校验通过（且已完成地址纠正）的房源，导入层写入
// 对齐: listing 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    street: String,      // 街道 + 门牌号
    postal_code: String, // 5 位邮编
    city: String,        // 城市
    cold_rent: f64,      // 冷租（> 0）
    warm_rent: f64,      // 暖租（> 0）
    area: f64,           // 面积（> 0）
    rooms: u32,          // 房间数（> 0）
}

impl Listing {
    /// 以全部字段构造 Listing
    ///
    /// 调用方（RowValidator / Repository）负责保证字段已通过校验
    pub fn new(
        street: impl Into<String>,
        postal_code: impl Into<String>,
        city: impl Into<String>,
        cold_rent: f64,
        warm_rent: f64,
        area: f64,
        rooms: u32,
    ) -> Self {
        Self {
            street: street.into(),
            postal_code: postal_code.into(),
            city: city.into(),
            cold_rent,
            warm_rent,
            area,
            rooms,
        }
    }

    pub fn street(&self) -> &str {
        &self.street
    }

    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn cold_rent(&self) -> f64 {
        self.cold_rent
    }

    pub fn warm_rent(&self) -> f64 {
        self.warm_rent
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn rooms(&self) -> u32 {
        self.rooms
    }

    /// 计算去重键（纠正后的字段值）
    pub fn dedup_key(&self) -> DedupKey {
        DedupKey::from_listing(self)
    }
}

impl fmt::Display for Listing {
    /// 纠正后文本: street; postalCode; city; coldRent; warmRent; area; rooms
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{street}{j}{postal}{j}{city}{j}{cold}{j}{warm}{j}{area}{j}{rooms}",
            street = self.street,
            postal = self.postal_code,
            city = self.city,
            cold = self.cold_rent,
            warm = self.warm_rent,
            area = self.area,
            rooms = self.rooms,
            j = FIELD_JOINER,
        )
    }
}

// ==========================================
// DedupKey - 去重复合键
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey(String);

impl DedupKey {
    pub fn from_listing(listing: &Listing) -> Self {
        let sep = DEDUP_KEY_SEPARATOR;
        Self(format!(
            "{}{sep}{}{sep}{}{sep}{}{sep}{}{sep}{}{sep}{}",
            listing.street,
            listing.postal_code,
            listing.city,
            listing.cold_rent,
            listing.warm_rent,
            listing.area,
            listing.rooms,
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ==========================================
// RawRow - CSV 原始行
// ==========================================
// 只读：用于错误报告与审计
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    pub line_number: usize, // 源文件行号（1 起，表头为第 1 行）
    pub cells: Vec<String>, // 未经 TRIM 的原始单元格
}

impl RawRow {
    pub fn new(line_number: usize, cells: Vec<String>) -> Self {
        Self { line_number, cells }
    }

    /// 按位置取单元格，缺失时返回空串
    pub fn cell(&self, index: usize) -> &str {
        self.cells.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// 原始文本（单元格以 "; " 连接）
    pub fn joined(&self) -> String {
        self.cells.join(FIELD_JOINER)
    }
}

// ==========================================
// 导入结果
// ==========================================

/// 接受的行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptedRow {
    pub row_number: usize,
    pub raw_data: String,
    pub corrected_data: String,
}

/// 拒绝的行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRow {
    pub row_number: usize,
    pub errors: Vec<String>,
    pub raw_data: String,
}

impl RejectedRow {
    /// 错误原因（以 "; " 连接）
    pub fn reasons(&self) -> String {
        self.errors.join(FIELD_JOINER)
    }
}

/// 导入批次审计记录
///
/// 对齐: import_batch 表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportBatch {
    pub batch_id: String,
    pub file_name: Option<String>,
    pub file_path: Option<String>,
    pub total_rows: i32,     // 数据行数（不含表头）
    pub accepted_rows: i32,
    pub rejected_rows: i32,
    pub duplicate_rows: i32, // 静默跳过的重复行
    pub skipped_rows: i32,   // 静默跳过的空行（≤1 个单元格）
    pub imported_at: Option<DateTime<Utc>>,
    pub elapsed_ms: Option<i32>,
    pub report_json: Option<String>,
}

/// 一次导入的最终报告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub batch: ImportBatch,
    pub accepted: Vec<AcceptedRow>,
    pub rejected: Vec<RejectedRow>,
}

impl ImportReport {
    pub fn accepted_count(&self) -> usize {
        self.accepted.len()
    }

    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }

    /// 渲染为终端文本
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        out.push_str("Import Summary\n");
        out.push_str(&format!("  {:<15}{}\n", "Valid records", self.accepted_count()));
        out.push_str(&format!("  {:<15}{}\n", "Errors", self.rejected_count()));

        if !self.accepted.is_empty() {
            out.push_str("\nValid Records\n");
            for record in &self.accepted {
                out.push_str(&format!(
                    "Row {:<2}\n raw-data: {}\n new-data: {}\n",
                    record.row_number, record.raw_data, record.corrected_data
                ));
            }
        }

        if !self.rejected.is_empty() {
            out.push_str("\nErrors\n");
            for record in &self.rejected {
                out.push_str(&format!(
                    "Row {}: {}\n  → {}\n",
                    record.row_number,
                    record.reasons(),
                    record.raw_data
                ));
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_listing() -> Listing {
        Listing::new("Hauptstr. 5", "10115", "Berlin", 800.0, 950.5, 62.0, 2)
    }

    #[test]
    fn test_display_uses_shortest_decimals() {
        let listing = sample_listing();
        assert_eq!(
            listing.to_string(),
            "Hauptstr. 5; 10115; Berlin; 800; 950.5; 62; 2"
        );
    }

    #[test]
    fn test_dedup_key_equal_for_equal_fields() {
        let a = sample_listing();
        let b = sample_listing();
        assert_eq!(a.dedup_key(), b.dedup_key());
        assert_eq!(a.dedup_key().as_str(), "Hauptstr. 5|10115|Berlin|800|950.5|62|2");
    }

    #[test]
    fn test_dedup_key_differs_on_any_field() {
        let a = sample_listing();
        let b = Listing::new("Hauptstr. 5", "10115", "Berlin", 800.0, 950.5, 62.0, 3);
        assert_ne!(a.dedup_key(), b.dedup_key());
    }

    #[test]
    fn test_raw_row_missing_cell_is_empty() {
        let row = RawRow::new(4, vec!["a".to_string(), " b ".to_string()]);
        assert_eq!(row.cell(1), " b ");
        assert_eq!(row.cell(6), "");
        assert_eq!(row.joined(), "a;  b ");
    }

    #[test]
    fn test_render_text_sections() {
        let report = ImportReport {
            batch: ImportBatch {
                batch_id: "b1".to_string(),
                file_name: None,
                file_path: None,
                total_rows: 2,
                accepted_rows: 1,
                rejected_rows: 1,
                duplicate_rows: 0,
                skipped_rows: 0,
                imported_at: None,
                elapsed_ms: None,
                report_json: None,
            },
            accepted: vec![AcceptedRow {
                row_number: 3,
                raw_data: "raw".to_string(),
                corrected_data: "new".to_string(),
            }],
            rejected: vec![RejectedRow {
                row_number: 2,
                errors: vec!["Street is empty".to_string(), "City is empty".to_string()],
                raw_data: "; 10115; ".to_string(),
            }],
        };

        let text = report.render_text();
        assert!(text.contains("Valid records  1"));
        assert!(text.contains("Errors         1"));
        assert!(text.contains(" new-data: new"));
        assert!(text.contains("Row 2: Street is empty; City is empty"));
    }
}

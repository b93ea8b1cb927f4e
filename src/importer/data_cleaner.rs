// ==========================================
// 房源导入系统 - 数据清洗器实现
// ==========================================
// 职责: TRIM / 小数与整数解析 / 邮编标准化
// 说明: 小数兼容德式逗号小数点（"12,5" → 12.5）
// ==========================================

use crate::importer::listing_importer_trait::{DataCleaner as DataCleanerTrait, IntegerParseError};
use regex::Regex;
use std::sync::OnceLock;

/// 邮编前缀（德国国家代码）
const POSTAL_CODE_COUNTRY_PREFIX: &str = "D-";

fn postal_code_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]{5}$").expect("static postal code regex"))
}

pub struct DataCleaner;

impl DataCleanerTrait for DataCleaner {
    fn clean_text(&self, value: &str) -> String {
        value.trim().to_string()
    }

    fn parse_decimal(&self, value: &str) -> Option<f64> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }

        let normalized = trimmed.replace(',', ".");

        // 只接受数字字面量（排除 inf / NaN 等 f64 可解析但非数字的写法）
        let is_numeric_literal = normalized
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E'));
        if !is_numeric_literal {
            return None;
        }

        normalized.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    fn parse_integer(&self, value: &str) -> Result<u32, IntegerParseError> {
        let trimmed = value.trim();
        if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(IntegerParseError::NotAnInteger);
        }
        // 纯数字串只可能因溢出而失败
        trimmed
            .parse::<u32>()
            .map_err(|_| IntegerParseError::OutOfRange)
    }

    fn normalize_postal_code(&self, value: &str) -> Option<String> {
        let trimmed = value.trim();
        let stripped = trimmed
            .strip_prefix(POSTAL_CODE_COUNTRY_PREFIX)
            .unwrap_or(trimmed);

        if postal_code_pattern().is_match(stripped) {
            Some(stripped.to_string())
        } else {
            None
        }
    }
}

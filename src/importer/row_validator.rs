// ==========================================
// 房源导入系统 - 行校验器
// ==========================================
// 职责: 单行字段级/跨字段校验 + 地址纠正 + Listing 构造
// 规则: 所有检查独立执行，错误全部收集后再拒绝（非 fail-fast）
// 顺序: 街道 → 邮编 → 城市 → 地址 → 冷租 → 暖租 → 面积 → 房间数
// ==========================================

use crate::domain::{Listing, RawRow, RejectedRow};
use crate::importer::address_resolver::AddressResolver;
use crate::importer::listing_importer_trait::{AddressDirectory, DataCleaner, IntegerParseError};
use tracing::debug;

// CSV 列位置
const COL_STREET: usize = 0;
const COL_POSTAL_CODE: usize = 1;
const COL_CITY: usize = 2;
const COL_COLD_RENT: usize = 3;
const COL_WARM_RENT: usize = 4;
const COL_AREA: usize = 5;
const COL_ROOMS: usize = 6;

/// 单行校验结果
#[derive(Debug, Clone, PartialEq)]
pub enum RowVerdict {
    /// 空行 / 单列行，静默跳过（不计入错误）
    Skipped,
    /// 校验失败
    Rejected(RejectedRow),
    /// 校验通过（地址已纠正）
    Valid(Listing),
}

pub struct RowValidator<'a, D>
where
    D: AddressDirectory,
{
    data_cleaner: &'a dyn DataCleaner,
    resolver: &'a AddressResolver<D>,
}

impl<'a, D> RowValidator<'a, D>
where
    D: AddressDirectory,
{
    pub fn new(data_cleaner: &'a dyn DataCleaner, resolver: &'a AddressResolver<D>) -> Self {
        Self {
            data_cleaner,
            resolver,
        }
    }

    /// 校验一行
    pub async fn validate(&self, row: &RawRow) -> RowVerdict {
        if row.cell_count() <= 1 {
            debug!(row_number = row.line_number, "空行，跳过");
            return RowVerdict::Skipped;
        }

        let cleaner = self.data_cleaner;
        let mut errors = Vec::new();

        let mut street = cleaner.clean_text(row.cell(COL_STREET));
        let mut city = cleaner.clean_text(row.cell(COL_CITY));

        // ===== 地址字段 =====
        if street.is_empty() {
            errors.push("Street is empty".to_string());
        }

        let postal_code = cleaner.normalize_postal_code(row.cell(COL_POSTAL_CODE));
        if postal_code.is_none() {
            errors.push(format!(
                "Invalid postal code: '{}'",
                row.cell(COL_POSTAL_CODE)
            ));
        }

        if city.is_empty() {
            errors.push("City is empty".to_string());
        }

        // ===== 地址纠正（仅当三者各自合法时）=====
        let mut postal_code = postal_code.unwrap_or_default();
        if !street.is_empty() && !city.is_empty() && !postal_code.is_empty() {
            match self.resolver.resolve(&street, &city, &postal_code).await {
                Ok(corrected) => {
                    street = corrected.street;
                    city = corrected.city;
                    postal_code = corrected.postal_code;
                }
                Err(e) => errors.push(e.to_string()),
            }
        }

        // ===== 数值字段 =====
        let cold_rent =
            self.check_positive_decimal(row, COL_COLD_RENT, "cold rent", "Cold rent", &mut errors);
        let warm_rent =
            self.check_positive_decimal(row, COL_WARM_RENT, "warm rent", "Warm rent", &mut errors);
        let area = self.check_positive_decimal(row, COL_AREA, "area", "Area", &mut errors);

        let rooms_raw = row.cell(COL_ROOMS);
        let rooms = match cleaner.parse_integer(rooms_raw) {
            Err(IntegerParseError::NotAnInteger) => {
                errors.push(format!("Invalid rooms: '{}'", rooms_raw));
                None
            }
            Err(IntegerParseError::OutOfRange) => {
                errors.push(format!("Rooms out of range: '{}'", rooms_raw));
                None
            }
            Ok(0) => {
                errors.push("Rooms must be positive: 0".to_string());
                None
            }
            Ok(n) => Some(n),
        };

        match (errors.is_empty(), cold_rent, warm_rent, area, rooms) {
            (true, Some(cold_rent), Some(warm_rent), Some(area), Some(rooms)) => RowVerdict::Valid(
                Listing::new(street, postal_code, city, cold_rent, warm_rent, area, rooms),
            ),
            _ => RowVerdict::Rejected(RejectedRow {
                row_number: row.line_number,
                errors,
                raw_data: row.joined(),
            }),
        }
    }

    /// 解析并校验正小数；非法与非正数为不同错误信息
    fn check_positive_decimal(
        &self,
        row: &RawRow,
        column: usize,
        label: &str,
        label_capitalized: &str,
        errors: &mut Vec<String>,
    ) -> Option<f64> {
        let raw = row.cell(column);
        match self.data_cleaner.parse_decimal(raw) {
            None => {
                errors.push(format!("Invalid {}: '{}'", label, raw));
                None
            }
            Some(value) if value <= 0.0 => {
                errors.push(format!("{} must be positive: {}", label_capitalized, value));
                None
            }
            Some(value) => Some(value),
        }
    }
}

// ==========================================
// 房源导入系统 - 地址解析器
// ==========================================
// 职责: 以外部街道目录纠正街道/城市/邮编
// 规则（3 级查询，按序执行，首个有结果的级别生效）:
//   1. 街道 + 邮编 + 城市(^city$)
//   2. 街道 + 邮编（去掉城市）
//   3. 街道 + 城市(^city$)（去掉邮编）
// 结果: 0 条 → 下一级（第 3 级后为 NotFound）
//       1 条 → 纠正成功
//       多条 → 立即返回该级别的歧义错误，不再降级
// ==========================================

use crate::domain::{AddressCandidate, CorrectedAddress};
use crate::importer::error::AddressError;
use crate::importer::listing_importer_trait::AddressDirectory;
use crate::importer::street_directory::StreetQuery;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// 街道名缩写目标
const STREET_ABBREVIATION: &str = "str";

fn street_suffix_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)stra(ß|ss)e").expect("static street suffix regex"))
}

// ==========================================
// LookupTier - 查询级别
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupTier {
    Exact,
    WithoutCity,
    WithoutPostalCode,
}

impl LookupTier {
    pub const ALL: [LookupTier; 3] = [
        LookupTier::Exact,
        LookupTier::WithoutCity,
        LookupTier::WithoutPostalCode,
    ];

    /// 构造本级别的目录查询
    pub fn query(&self, search: &StreetSearch, city: &str, postal_code: &str) -> StreetQuery {
        let locality = format!("^{}$", city);
        match self {
            LookupTier::Exact => StreetQuery {
                name: search.pattern.clone(),
                postal_code: Some(postal_code.to_string()),
                locality: Some(locality),
            },
            LookupTier::WithoutCity => StreetQuery {
                name: search.pattern.clone(),
                postal_code: Some(postal_code.to_string()),
                locality: None,
            },
            LookupTier::WithoutPostalCode => StreetQuery {
                name: search.pattern.clone(),
                postal_code: None,
                locality: Some(locality),
            },
        }
    }

    /// 本级别多条结果时的错误
    pub fn ambiguity_error(&self) -> AddressError {
        match self {
            LookupTier::Exact => AddressError::AmbiguousExact,
            LookupTier::WithoutCity => AddressError::AmbiguousCityMismatch,
            LookupTier::WithoutPostalCode => AddressError::AmbiguousPostalMismatch,
        }
    }
}

// ==========================================
// StreetSearch - 街道预处理结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreetSearch {
    pub pattern: String,           // 目录查询用 name 参数
    pub house_number_part: String, // 最后一个空格起的剩余部分（含空格）
}

impl StreetSearch {
    /// 在最后一个空格处拆分街道名与门牌号，并构造查询模式
    ///
    /// - 含 "straße"/"strasse"（不区分大小写）→ 替换为 "str"，前缀匹配
    /// - 否则 → `^name$` 精确匹配
    pub fn from_street(street: &str) -> Self {
        let (name, house_number_part) = match street.rfind(' ') {
            Some(pos) if pos > 0 => street.split_at(pos),
            _ => (street, ""),
        };

        let pattern = if street_suffix_pattern().is_match(name) {
            format!(
                "^{}",
                street_suffix_pattern().replace_all(name, STREET_ABBREVIATION)
            )
        } else {
            format!("^{}$", name)
        };

        Self {
            pattern,
            house_number_part: house_number_part.to_string(),
        }
    }
}

// ==========================================
// AddressResolver
// ==========================================
pub struct AddressResolver<D>
where
    D: AddressDirectory,
{
    directory: D,
}

impl<D> AddressResolver<D>
where
    D: AddressDirectory,
{
    pub fn new(directory: D) -> Self {
        Self { directory }
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    /// 解析并纠正地址
    ///
    /// # 参数
    /// - street / city / postal_code: 已 TRIM，邮编已标准化为 5 位
    ///
    /// # 返回
    /// - Ok(CorrectedAddress): 目录中唯一匹配
    /// - Err(AddressError): 无匹配 / 歧义 / 网络失败
    pub async fn resolve(
        &self,
        street: &str,
        city: &str,
        postal_code: &str,
    ) -> Result<CorrectedAddress, AddressError> {
        let search = StreetSearch::from_street(street);

        for tier in LookupTier::ALL {
            let query = tier.query(&search, city, postal_code);
            let candidates = self.directory.find_streets(&query).await?;

            match candidates.as_slice() {
                [] => {
                    debug!(tier = ?tier, pattern = %search.pattern, "无匹配，降级查询");
                    continue;
                }
                [candidate] => {
                    debug!(tier = ?tier, name = %candidate.name, "地址纠正成功");
                    return Ok(Self::correct(candidate, &search));
                }
                _ => {
                    debug!(tier = ?tier, count = candidates.len(), "地址歧义");
                    return Err(tier.ambiguity_error());
                }
            }
        }

        Err(AddressError::NotFound)
    }

    fn correct(candidate: &AddressCandidate, search: &StreetSearch) -> CorrectedAddress {
        CorrectedAddress::from_candidate(candidate, &search.house_number_part)
    }
}

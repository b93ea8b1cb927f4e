// ==========================================
// 房源导入系统 - 地址领域模型
// ==========================================
// 职责: 街道目录返回的候选地址 / 纠正后的地址
// 说明: 仅在地址解析期间存在，不落库
// ==========================================

use serde::{Deserialize, Serialize};

/// 街道目录返回的单条候选
///
/// 对齐: OpenPLZ `/de/Streets` 响应对象（多余字段忽略）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressCandidate {
    pub name: String,
    pub locality: String,
    pub postal_code: String,
}

/// 纠正后的地址（Listing 构造前使用）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectedAddress {
    pub street: String,
    pub city: String,
    pub postal_code: String,
}

impl CorrectedAddress {
    /// 以候选地址 + 原始门牌号部分重建地址
    pub fn from_candidate(candidate: &AddressCandidate, house_number_part: &str) -> Self {
        Self {
            street: format!("{}{}", candidate.name, house_number_part),
            city: candidate.locality.clone(),
            postal_code: candidate.postal_code.clone(),
        }
    }
}

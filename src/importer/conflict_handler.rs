// ==========================================
// 房源导入系统 - 去重索引
// ==========================================
// 职责: 以复合自然键（纠正后字段）识别重复房源
// 来源: 已落库房源（运行开始时一次性加载）+ 本次已接受的行
// 策略: 重复行静默跳过（既不算接受也不算拒绝）
// ==========================================

use crate::domain::{DedupKey, Listing};
use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct DedupIndex {
    keys: HashSet<DedupKey>,
}

impl DedupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以已落库房源初始化
    pub fn seed<'a, I>(existing: I) -> Self
    where
        I: IntoIterator<Item = &'a Listing>,
    {
        Self {
            keys: existing.into_iter().map(Listing::dedup_key).collect(),
        }
    }

    pub fn contains(&self, listing: &Listing) -> bool {
        self.keys.contains(&listing.dedup_key())
    }

    /// 检测并登记
    ///
    /// # 返回
    /// - true: 新房源，已登记
    /// - false: 重复房源
    pub fn check_and_insert(&mut self, listing: &Listing) -> bool {
        self.keys.insert(listing.dedup_key())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(street: &str, rooms: u32) -> Listing {
        Listing::new(street, "10115", "Berlin", 800.0, 950.0, 62.5, rooms)
    }

    #[test]
    fn test_seed_from_existing() {
        let existing = vec![listing("Hauptstr. 5", 2), listing("Hauptstr. 5", 2)];
        let index = DedupIndex::seed(&existing);

        assert_eq!(index.len(), 1);
        assert!(index.contains(&listing("Hauptstr. 5", 2)));
        assert!(!index.contains(&listing("Hauptstr. 5", 3)));
    }

    #[test]
    fn test_check_and_insert_within_run() {
        let mut index = DedupIndex::new();
        assert!(index.is_empty());

        assert!(index.check_and_insert(&listing("Ring 1", 2)));
        assert!(!index.check_and_insert(&listing("Ring 1", 2)));
        assert!(index.check_and_insert(&listing("Ring 2", 2)));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_cross_batch_duplicate() {
        let existing = vec![listing("Ring 1", 2)];
        let mut index = DedupIndex::seed(&existing);

        assert!(!index.check_and_insert(&listing("Ring 1", 2)));
    }
}

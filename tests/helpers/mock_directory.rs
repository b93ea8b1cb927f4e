// ==========================================
// Mock 街道目录 - 用于集成测试
// ==========================================

use async_trait::async_trait;
use listing_import::domain::AddressCandidate;
use listing_import::importer::{AddressDirectory, AddressError, StreetQuery};
use std::collections::HashMap;
use std::sync::Mutex;

/// 按查询条件返回预置结果的内存目录
///
/// 未预置的查询返回空列表
#[derive(Default)]
pub struct MockDirectory {
    responses: HashMap<(String, Option<String>, Option<String>), Vec<AddressCandidate>>,
    failure: Option<AddressError>,
    queries: Mutex<Vec<StreetQuery>>,
}

impl MockDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 所有查询均失败
    pub fn failing(err: AddressError) -> Self {
        Self {
            failure: Some(err),
            ..Self::default()
        }
    }

    /// 预置一次查询的结果
    pub fn with(
        mut self,
        name: &str,
        postal_code: Option<&str>,
        locality: Option<&str>,
        candidates: Vec<AddressCandidate>,
    ) -> Self {
        self.responses.insert(
            (
                name.to_string(),
                postal_code.map(str::to_string),
                locality.map(str::to_string),
            ),
            candidates,
        );
        self
    }

    /// 已收到的查询（按顺序）
    pub fn queries(&self) -> Vec<StreetQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl AddressDirectory for MockDirectory {
    async fn find_streets(&self, query: &StreetQuery) -> Result<Vec<AddressCandidate>, AddressError> {
        self.queries.lock().unwrap().push(query.clone());

        if let Some(err) = &self.failure {
            return Err(err.clone());
        }

        let key = (
            query.name.clone(),
            query.postal_code.clone(),
            query.locality.clone(),
        );
        Ok(self.responses.get(&key).cloned().unwrap_or_default())
    }
}

pub fn candidate(name: &str, locality: &str, postal_code: &str) -> AddressCandidate {
    AddressCandidate {
        name: name.to_string(),
        locality: locality.to_string(),
        postal_code: postal_code.to_string(),
    }
}

// ==========================================
// 房源导入系统 - 街道目录客户端
// ==========================================
// 外部服务: OpenPLZ API `GET /de/Streets`
// 参数: name（支持 ^/$ 锚点）/ postalCode（精确）/ locality（支持 ^x$）
// 响应: JSON 数组 [{ name, locality, postalCode, ... }]，空数组/null 表示无匹配
// ==========================================

use crate::config::ImportConfig;
use crate::domain::AddressCandidate;
use crate::importer::error::AddressError;
use crate::importer::listing_importer_trait::AddressDirectory;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// 默认街道目录地址
pub const OPEN_PLZ_STREETS_URL: &str = "https://openplzapi.org/de/Streets";

// ==========================================
// StreetQuery - 一次目录查询的过滤条件
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreetQuery {
    pub name: String,
    pub postal_code: Option<String>,
    pub locality: Option<String>,
}

impl StreetQuery {
    /// 转换为查询参数（按 name / postalCode / locality 顺序）
    pub fn to_query_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = vec![("name", self.name.as_str())];
        if let Some(postal_code) = &self.postal_code {
            pairs.push(("postalCode", postal_code.as_str()));
        }
        if let Some(locality) = &self.locality {
            pairs.push(("locality", locality.as_str()));
        }
        pairs
    }
}

// ==========================================
// OpenPlzDirectory - HTTP 实现
// ==========================================
pub struct OpenPlzDirectory {
    client: Client,
    base_url: String,
}

impl OpenPlzDirectory {
    /// 以配置创建客户端
    ///
    /// 未配置超时时使用 reqwest 默认行为
    pub fn new(config: &ImportConfig) -> Result<Self, AddressError> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.http_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder
            .build()
            .map_err(|e| AddressError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.address_directory_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl AddressDirectory for OpenPlzDirectory {
    async fn find_streets(&self, query: &StreetQuery) -> Result<Vec<AddressCandidate>, AddressError> {
        debug!(
            name = %query.name,
            postal_code = ?query.postal_code,
            locality = ?query.locality,
            "查询街道目录"
        );

        let resp = self
            .client
            .get(&self.base_url)
            .query(&query.to_query_pairs())
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "街道目录请求失败");
                AddressError::from(e)
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = %status, "街道目录返回非成功状态");
            return Err(AddressError::Transport(format!("HTTP {}: {}", status, body)));
        }

        // null 与空数组同义
        let candidates: Option<Vec<AddressCandidate>> = resp.json().await?;
        let candidates = candidates.unwrap_or_default();

        debug!(count = candidates.len(), "街道目录返回");
        Ok(candidates)
    }
}

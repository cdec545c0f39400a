//! OS NGD features API client (OGC API Features).
//!
//! Endpoint: https://api.os.uk/features/ngd/ofa/v1
//! Auth is a `key` header carrying the OS API key.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use streetlens_common::error::{Result, StreetlensError};
use streetlens_common::sandbox::SandboxClient;
use streetlens_common::types::{BoundingBox, FeatureCollection, Usrn, CRS_BNG};

/// Collections queried for the street-info assessment, fetched in parallel.
pub const STREET_INFO_COLLECTIONS: [&str; 4] = [
    "trn-ntwk-street-1",
    "trn-rami-specialdesignationarea-1",
    "trn-rami-specialdesignationline-1",
    "trn-rami-specialdesignationpoint-1",
];

/// Collections queried for the land-use assessment.
pub const LAND_USE_COLLECTIONS: [&str; 1] = ["lus-fts-site-1"];

/// Feature-collection families this service understands. Families decide the
/// query mode (USRN filter vs bbox) and which properties survive filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionFamily {
    /// `trn-ntwk-*` — street/road network links
    Network,
    /// `trn-rami-*` — special designation areas/lines/points
    SpecialDesignation,
    /// `lus-*` — land-use sites
    LandUse,
    /// `bld-*` — building parts
    Building,
}

impl CollectionFamily {
    /// Whether items in this family are filtered by USRN (vs by bbox).
    pub fn queries_by_usrn(&self) -> bool {
        matches!(self, Self::Network | Self::SpecialDesignation)
    }
}

/// Map a collection id onto its family. Unknown prefixes are unsupported.
pub fn collection_family(collection_id: &str) -> Option<CollectionFamily> {
    if collection_id.starts_with("trn-ntwk-") {
        Some(CollectionFamily::Network)
    } else if collection_id.starts_with("trn-rami-") {
        Some(CollectionFamily::SpecialDesignation)
    } else if collection_id.starts_with("lus-") {
        Some(CollectionFamily::LandUse)
    } else if collection_id.starts_with("bld-") {
        Some(CollectionFamily::Building)
    } else {
        None
    }
}

/// How to scope an items request.
#[derive(Debug, Clone)]
pub enum FeatureQuery {
    ByUsrn(Usrn),
    ByBbox(BoundingBox),
}

impl FeatureQuery {
    fn to_pairs(&self) -> Vec<(String, String)> {
        match self {
            Self::ByUsrn(usrn) => {
                vec![("filter".to_string(), format!("usrn={usrn}"))]
            }
            Self::ByBbox(bbox) => vec![
                ("bbox".to_string(), bbox.to_query_param()),
                ("bbox-crs".to_string(), CRS_BNG.to_string()),
                ("crs".to_string(), CRS_BNG.to_string()),
            ],
        }
    }
}

/// `(id, title)` pair from the collections listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionSummary {
    pub id: String,
    pub title: String,
}

/// Anything that can serve collection items. The production implementation is
/// [`NgdClient`]; tests use [`MockFeatureSource`].
#[async_trait]
pub trait FeatureSource: Send + Sync {
    async fn features(
        &self,
        collection_id: &str,
        query: &FeatureQuery,
    ) -> Result<FeatureCollection>;
}

pub struct NgdClient {
    client: SandboxClient,
    base_url: String,
    api_key: SecretString,
}

impl NgdClient {
    pub fn new(base_url: impl Into<String>, api_key: SecretString) -> Result<Self> {
        Ok(Self {
            client: SandboxClient::new()?,
            base_url: base_url.into(),
            api_key,
        })
    }

    async fn get_json(
        &self,
        url: &str,
        query: &[(String, String)],
    ) -> Result<serde_json::Value> {
        let resp = self
            .client
            .get(url)?
            .header("key", self.api_key.expose_secret())
            .header("Content-Type", "application/json")
            .query(query)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(StreetlensError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.json().await?)
    }

    /// List all available collections, reduced to `(id, title)`.
    #[instrument(skip(self))]
    pub async fn collections(&self) -> Result<Vec<CollectionSummary>> {
        let url = format!("{}/collections", self.base_url);
        let resp = self.get_json(&url, &[]).await?;

        let collections = resp["collections"]
            .as_array()
            .cloned()
            .unwrap_or_default();

        debug!(count = collections.len(), "NGD collections listed");

        Ok(collections
            .iter()
            .filter_map(|c| {
                Some(CollectionSummary {
                    id: c["id"].as_str()?.to_string(),
                    title: c["title"].as_str().unwrap_or("").to_string(),
                })
            })
            .collect())
    }

    /// Metadata for a single collection (pass-through).
    pub async fn collection(&self, collection_id: &str) -> Result<serde_json::Value> {
        let url = format!("{}/collections/{}", self.base_url, collection_id);
        self.get_json(&url, &[]).await
    }

    /// Schema of a single collection (pass-through).
    pub async fn collection_schema(&self, collection_id: &str) -> Result<serde_json::Value> {
        let url = format!("{}/collections/{}/schema", self.base_url, collection_id);
        self.get_json(&url, &[]).await
    }

    /// Queryable attributes of a single collection (pass-through). Tells you
    /// what you can filter by — e.g. USRN, OSID, TOID.
    pub async fn collection_queryables(
        &self,
        collection_id: &str,
    ) -> Result<serde_json::Value> {
        let url = format!("{}/collections/{}/queryables", self.base_url, collection_id);
        self.get_json(&url, &[]).await
    }
}

#[async_trait]
impl FeatureSource for NgdClient {
    #[instrument(skip(self, query), fields(collection = collection_id))]
    async fn features(
        &self,
        collection_id: &str,
        query: &FeatureQuery,
    ) -> Result<FeatureCollection> {
        let url = format!("{}/collections/{}/items", self.base_url, collection_id);
        let pairs = query.to_pairs();
        let value = self.get_json(&url, &pairs).await?;
        let fc: FeatureCollection = serde_json::from_value(value)?;
        debug!(returned = fc.number_returned, "NGD items fetched");
        Ok(fc)
    }
}

// ── Mock implementation for testing ────────────────────────────────────────

/// In-memory feature source keyed by collection id. Collections registered
/// with `failing()` return an upstream error, so fan-out partial-failure
/// behaviour can be exercised without a network.
#[derive(Default)]
pub struct MockFeatureSource {
    collections: std::collections::HashMap<String, FeatureCollection>,
    failing: std::collections::HashSet<String>,
}

impl MockFeatureSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, collection_id: &str, fc: FeatureCollection) -> Self {
        self.collections.insert(collection_id.to_string(), fc);
        self
    }

    pub fn failing(mut self, collection_id: &str) -> Self {
        self.failing.insert(collection_id.to_string());
        self
    }
}

#[async_trait]
impl FeatureSource for MockFeatureSource {
    async fn features(
        &self,
        collection_id: &str,
        _query: &FeatureQuery,
    ) -> Result<FeatureCollection> {
        if self.failing.contains(collection_id) {
            return Err(StreetlensError::Upstream {
                status: 503,
                message: format!("mock failure for {collection_id}"),
            });
        }
        self.collections
            .get(collection_id)
            .cloned()
            .ok_or_else(|| StreetlensError::Upstream {
                status: 404,
                message: format!("unknown collection {collection_id}"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_family_routing() {
        assert_eq!(
            collection_family("trn-ntwk-street-1"),
            Some(CollectionFamily::Network)
        );
        assert_eq!(
            collection_family("trn-rami-specialdesignationline-1"),
            Some(CollectionFamily::SpecialDesignation)
        );
        assert_eq!(collection_family("lus-fts-site-1"), Some(CollectionFamily::LandUse));
        assert_eq!(
            collection_family("bld-fts-buildingpart-1"),
            Some(CollectionFamily::Building)
        );
        assert_eq!(collection_family("wtr-ntwk-waterlink-1"), None);
    }

    #[test]
    fn test_usrn_query_builds_cql_filter() {
        let usrn = Usrn::parse("11720125").unwrap();
        let pairs = FeatureQuery::ByUsrn(usrn).to_pairs();
        assert_eq!(pairs, vec![("filter".to_string(), "usrn=11720125".to_string())]);
    }

    #[test]
    fn test_bbox_query_carries_both_crs_params() {
        let bbox = BoundingBox::new(1.0, 2.0, 3.0, 4.0);
        let pairs = FeatureQuery::ByBbox(bbox).to_pairs();
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0], ("bbox".to_string(), "1,2,3,4".to_string()));
        assert!(pairs[1].1.contains("27700"));
        assert!(pairs[2].1.contains("27700"));
    }
}

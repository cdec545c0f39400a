//! NUAR generalised-data metrics API client.
//!
//! Endpoint: {base}/metrics/AssetCount/nuar/{zoom}/?bbox=minx,miny,maxx,maxy
//! Auth is a bearer token.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use streetlens_common::error::{Result, StreetlensError};
use streetlens_common::sandbox::SandboxClient;
use streetlens_common::types::BoundingBox;

/// One hex cell of the asset-count response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridCellCount {
    #[serde(default)]
    pub grid_id: String,
    #[serde(default)]
    pub asset_count: u64,
}

/// The `data` envelope of an AssetCount response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetCountData {
    #[serde(default)]
    pub grid_type: Option<String>,
    #[serde(default)]
    pub zoom_level: Option<u8>,
    #[serde(default)]
    pub collection_items: Vec<GridCellCount>,
}

impl AssetCountData {
    pub fn total_assets(&self) -> u64 {
        self.collection_items.iter().map(|c| c.asset_count).sum()
    }

    pub fn total_grids(&self) -> u64 {
        self.collection_items.len() as u64
    }
}

#[derive(Debug, Deserialize)]
struct AssetCountEnvelope {
    data: AssetCountData,
}

pub struct NuarClient {
    client: SandboxClient,
    base_url: String,
    zoom_level: u8,
    token: SecretString,
}

impl NuarClient {
    pub fn new(
        base_url: impl Into<String>,
        zoom_level: u8,
        token: SecretString,
    ) -> Result<Self> {
        Ok(Self {
            client: SandboxClient::new()?,
            base_url: base_url.into(),
            zoom_level,
            token,
        })
    }

    /// Underground asset counts per hex cell for a bounding box.
    #[instrument(skip(self), fields(bbox = %bbox.to_query_param()))]
    pub async fn asset_count(&self, bbox: &BoundingBox) -> Result<AssetCountData> {
        let url = format!(
            "{}/metrics/AssetCount/nuar/{}/",
            self.base_url, self.zoom_level
        );

        let resp = self
            .client
            .get(&url)?
            .bearer_auth(self.token.expose_secret())
            .header("Accept", "application/json")
            .query(&[("bbox", bbox.to_query_param())])
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

        let envelope: AssetCountEnvelope = resp.json().await?;
        debug!(
            grids = envelope.data.total_grids(),
            assets = envelope.data.total_assets(),
            "NUAR asset count fetched"
        );
        Ok(envelope.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_count_envelope_parses() {
        let json = r#"{
            "data": {
                "gridType": "hex",
                "zoomLevel": 12,
                "collectionItems": [
                    {"gridId": "12-204-130", "assetCount": 18},
                    {"gridId": "12-204-131", "assetCount": 7}
                ]
            }
        }"#;
        let envelope: AssetCountEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.data.total_grids(), 2);
        assert_eq!(envelope.data.total_assets(), 25);
        assert_eq!(envelope.data.grid_type.as_deref(), Some("hex"));
    }

    #[test]
    fn test_missing_items_reads_as_empty() {
        let json = r#"{"data": {"gridType": "hex", "zoomLevel": 12}}"#;
        let envelope: AssetCountEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.data.total_grids(), 0);
        assert_eq!(envelope.data.total_assets(), 0);
    }
}

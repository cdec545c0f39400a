//! Assembly of the assessment payloads served to clients and fed to the LLM.
//!
//! The merged NGD feature collections are verbose; the street payload keeps a
//! compact street header plus simplified designation entries, and the
//! land-use payload keeps per-property essentials plus aggregate statistics.

use serde::{Deserialize, Serialize};
use tracing::warn;

use streetlens_common::types::{BoundingBox, FeatureCollection, WorkSummaryEntry};

use crate::hexgrid::HexGridId;
use crate::nuar::AssetCountData;

/// Description value of the base street feature in `trn-ntwk-street-1`.
const DESIGNATED_STREET_NAME: &str = "Designated Street Name";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Authority {
    pub name: Option<String>,
    pub area: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreetGeometry {
    pub length: Option<f64>,
}

/// Street header extracted from the designated street-name feature.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreetRecord {
    pub usrn: Option<String>,
    pub street_name: Option<String>,
    pub town: Option<String>,
    pub authority: Authority,
    pub geometry: StreetGeometry,
    pub operational_state: Option<String>,
    pub operational_state_date: Option<String>,
}

/// A simplified special-designation entry. Absent values are omitted from the
/// serialized payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DesignationRecord {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// One decoded hex cell with its asset count and map extent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridCellExtent {
    pub grid_id: String,
    pub asset_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
}

/// Reduced NUAR asset statistics. A failed NUAR fetch becomes an error note
/// with zeroed totals rather than a failed request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NuarSummary {
    pub total_hex_grids: u64,
    pub total_asset_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom_level: Option<u8>,
    pub hex_ids: Vec<String>,
    pub cells: Vec<GridCellExtent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NuarSummary {
    pub fn from_data(data: &AssetCountData) -> Self {
        let cells = data
            .collection_items
            .iter()
            .map(|item| {
                let bbox = match item.grid_id.parse::<HexGridId>() {
                    Ok(id) => Some(id.bbox()),
                    Err(e) => {
                        warn!(grid_id = %item.grid_id, error = %e, "undecodable grid id");
                        None
                    }
                };
                GridCellExtent {
                    grid_id: item.grid_id.clone(),
                    asset_count: item.asset_count,
                    bbox,
                }
            })
            .collect();

        Self {
            total_hex_grids: data.total_grids(),
            total_asset_count: data.total_assets(),
            grid_type: data.grid_type.clone(),
            zoom_level: data.zoom_level,
            hex_ids: data
                .collection_items
                .iter()
                .map(|i| i.grid_id.clone())
                .collect(),
            cells,
            error: None,
        }
    }

    pub fn from_error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Mean assets per grid cell, if there is any coverage.
    pub fn asset_density(&self) -> Option<f64> {
        if self.total_hex_grids > 0 && self.total_asset_count > 0 {
            Some(self.total_asset_count as f64 / self.total_hex_grids as f64)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreetStats {
    pub work_summary: Vec<WorkSummaryEntry>,
    pub nuar_summary: NuarSummary,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PayloadMetadata {
    pub timestamp: String,
    pub number_returned: u64,
}

/// The street assessment payload: header, simplified designations, usage
/// statistics, and response metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreetPayload {
    pub street: Option<StreetRecord>,
    pub designations: Vec<DesignationRecord>,
    pub stats: StreetStats,
    pub metadata: PayloadMetadata,
}

/// Build the street payload from the merged feature collection plus the
/// warehouse and NUAR statistics.
pub fn street_payload(
    merged: &FeatureCollection,
    work_summary: Vec<WorkSummaryEntry>,
    nuar_summary: NuarSummary,
) -> StreetPayload {
    let opt = |v: Option<&str>| v.map(str::to_string);

    let street = merged
        .features
        .iter()
        .find(|f| f.prop_str("description") == Some(DESIGNATED_STREET_NAME))
        .map(|f| StreetRecord {
            // usrn arrives as a number in some collections
            usrn: f
                .prop_str("usrn")
                .map(str::to_string)
                .or_else(|| f.properties.get("usrn").and_then(|v| v.as_u64()).map(|n| n.to_string())),
            street_name: opt(f.prop_str("designatedname1_text")),
            town: opt(f.prop_str("townname1_text")),
            authority: Authority {
                name: opt(f.prop_str("responsibleauthority_name")),
                area: opt(f.prop_str("administrativearea1_text")),
            },
            geometry: StreetGeometry {
                length: f.prop_f64("geometry_length"),
            },
            operational_state: opt(f.prop_str("operationalstate")),
            operational_state_date: opt(f.prop_str("operationalstatedate")),
        });

    let designations = merged
        .features
        .iter()
        .filter(|f| f.prop_str("description") != Some(DESIGNATED_STREET_NAME))
        .map(|f| DesignationRecord {
            kind: opt(f.prop_str("description")),
            designation: opt(f.prop_str("designation")),
            timeframe: opt(f.prop_str("timeinterval")),
            location: opt(f.prop_str("locationdescription")),
            details: opt(f.prop_str("designationdescription")),
            effective_date: opt(f.prop_str("effectivestartdate")),
            end_date: opt(f.prop_str("effectiveenddate")),
        })
        .collect();

    StreetPayload {
        street,
        designations,
        stats: StreetStats {
            work_summary,
            nuar_summary,
        },
        metadata: PayloadMetadata {
            timestamp: merged.time_stamp.clone(),
            number_returned: merged.number_returned,
        },
    }
}

// ── Land use ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyInfo {
    pub name: Option<String>,
    pub secondary_name: Option<String>,
    pub description: Option<String>,
    pub area: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Classification {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub subtypes: Vec<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandUseProperty {
    pub property: PropertyInfo,
    pub classification: Classification,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LandUseStats {
    pub total_properties: usize,
    pub total_area: f64,
    pub residential_count: usize,
    pub commercial_count: usize,
    pub average_property_size: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandUsePayload {
    pub features: Vec<LandUseProperty>,
    pub statistics: LandUseStats,
    pub metadata: PayloadMetadata,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Build the land-use payload from a LUS feature collection.
pub fn land_use_payload(fc: &FeatureCollection) -> LandUsePayload {
    let mut features = Vec::with_capacity(fc.features.len());
    let mut total_area = 0.0;
    let mut residential_count = 0;
    let mut commercial_count = 0;

    for feature in &fc.features {
        let kind = feature.prop_str("oslandusetiera").map(str::to_string);
        let subtypes = feature
            .properties
            .get("oslandusetierb")
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|i| i.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        let area = feature.prop_f64("geometry_area");
        if let Some(a) = area {
            total_area += a;
        }
        match kind.as_deref() {
            Some(k) if k.contains("Residential") => residential_count += 1,
            Some(k) if k.contains("Commercial") => commercial_count += 1,
            _ => {}
        }

        features.push(LandUseProperty {
            property: PropertyInfo {
                name: feature.prop_str("name1_text").map(str::to_string),
                secondary_name: feature.prop_str("name2_text").map(str::to_string),
                description: feature.prop_str("description").map(str::to_string),
                area,
            },
            classification: Classification {
                kind,
                subtypes,
                status: feature.prop_str("changetype").map(str::to_string),
            },
        });
    }

    let average = if features.is_empty() {
        0.0
    } else {
        total_area / features.len() as f64
    };

    LandUsePayload {
        statistics: LandUseStats {
            total_properties: features.len(),
            total_area: round2(total_area),
            residential_count,
            commercial_count,
            average_property_size: round2(average),
        },
        features,
        metadata: PayloadMetadata {
            timestamp: fc.time_stamp.clone(),
            number_returned: fc.number_returned,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nuar::GridCellCount;
    use serde_json::json;
    use streetlens_common::types::Feature;

    fn feature(props: serde_json::Value) -> Feature {
        Feature {
            id: json!("f"),
            geometry: None,
            properties: props.as_object().cloned().unwrap(),
        }
    }

    fn street_collection() -> FeatureCollection {
        FeatureCollection {
            kind: "FeatureCollection".to_string(),
            number_returned: 3,
            time_stamp: "2025-03-01T12:00:00Z".to_string(),
            features: vec![
                feature(json!({
                    "description": "Designated Street Name",
                    "usrn": 11720125,
                    "designatedname1_text": "Grey Street",
                    "townname1_text": "Newcastle Upon Tyne",
                    "responsibleauthority_name": "Newcastle City Council",
                    "administrativearea1_text": "Tyne and Wear",
                    "geometry_length": 312.4,
                    "operationalstate": "Open"
                })),
                feature(json!({
                    "description": "Special Designation Line",
                    "designation": "Traffic Sensitive",
                    "timeinterval": "Mon-Fri 07:30-09:30",
                    "designationdescription": "Peak hour restrictions"
                })),
                feature(json!({
                    "description": "Special Designation Area",
                    "designation": "Winter Maintenance Routes"
                })),
            ],
        }
    }

    #[test]
    fn test_street_payload_extracts_header_and_designations() {
        let payload = street_payload(&street_collection(), Vec::new(), NuarSummary::default());

        let street = payload.street.expect("base street feature present");
        assert_eq!(street.usrn.as_deref(), Some("11720125"));
        assert_eq!(street.street_name.as_deref(), Some("Grey Street"));
        assert_eq!(street.authority.name.as_deref(), Some("Newcastle City Council"));
        assert_eq!(street.geometry.length, Some(312.4));

        assert_eq!(payload.designations.len(), 2);
        assert_eq!(
            payload.designations[0].designation.as_deref(),
            Some("Traffic Sensitive")
        );
        assert_eq!(payload.metadata.timestamp, "2025-03-01T12:00:00Z");
    }

    #[test]
    fn test_street_payload_omits_absent_designation_fields() {
        let payload = street_payload(&street_collection(), Vec::new(), NuarSummary::default());
        let serialized = serde_json::to_value(&payload.designations[1]).unwrap();
        let obj = serialized.as_object().unwrap();
        assert!(obj.contains_key("designation"));
        assert!(!obj.contains_key("timeframe"));
        assert!(!obj.contains_key("location"));
    }

    #[test]
    fn test_street_payload_without_features_has_no_header() {
        let payload = street_payload(
            &FeatureCollection::empty(),
            Vec::new(),
            NuarSummary::from_error("NUAR unavailable"),
        );
        assert!(payload.street.is_none());
        assert!(payload.designations.is_empty());
        assert_eq!(
            payload.stats.nuar_summary.error.as_deref(),
            Some("NUAR unavailable")
        );
    }

    #[test]
    fn test_nuar_summary_decodes_cells_and_skips_bad_ids() {
        let data = AssetCountData {
            grid_type: Some("hex".to_string()),
            zoom_level: Some(12),
            collection_items: vec![
                GridCellCount { grid_id: "12-204-130".to_string(), asset_count: 18 },
                GridCellCount { grid_id: "not-a-grid-id-at-all".to_string(), asset_count: 2 },
            ],
        };
        let summary = NuarSummary::from_data(&data);
        assert_eq!(summary.total_hex_grids, 2);
        assert_eq!(summary.total_asset_count, 20);
        assert_eq!(summary.asset_density(), Some(10.0));
        assert!(summary.cells[0].bbox.is_some());
        assert!(summary.cells[1].bbox.is_none());
    }

    #[test]
    fn test_land_use_statistics() {
        let fc = FeatureCollection {
            kind: "FeatureCollection".to_string(),
            number_returned: 3,
            time_stamp: "2025-03-01T12:00:00Z".to_string(),
            features: vec![
                feature(json!({
                    "description": "Terraced housing",
                    "name1_text": "Albion Terrace",
                    "oslandusetiera": "Residential",
                    "oslandusetierb": ["Private Residence"],
                    "geometry_area": 150.0
                })),
                feature(json!({
                    "description": "Retail unit",
                    "oslandusetiera": "Commercial Activity: Retail",
                    "geometry_area": 250.333
                })),
                feature(json!({
                    "description": "University building",
                    "oslandusetiera": "Education"
                })),
            ],
        };
        let payload = land_use_payload(&fc);
        assert_eq!(payload.statistics.total_properties, 3);
        assert_eq!(payload.statistics.residential_count, 1);
        assert_eq!(payload.statistics.commercial_count, 1);
        assert_eq!(payload.statistics.total_area, 400.33);
        assert_eq!(payload.statistics.average_property_size, 133.44);
        assert_eq!(
            payload.features[0].classification.subtypes,
            vec!["Private Residence".to_string()]
        );
    }
}

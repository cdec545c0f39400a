//! Feature property filtering and fan-out merging.
//!
//! Responses are trimmed to the properties the assessment actually uses —
//! geometry is dropped to keep payloads small. The street-info fan-out
//! tolerates individual collection failures: failed collections are logged
//! and skipped, never fatal.

use futures_util::future::join_all;
use tracing::{error, warn};

use streetlens_common::error::Result;
use streetlens_common::types::{Feature, FeatureCollection, Usrn};

use crate::ngd::{CollectionFamily, FeatureQuery, FeatureSource, STREET_INFO_COLLECTIONS};

/// Properties kept for special-designation features.
const SPECIAL_DESIGNATION_PROPS: [&str; 9] = [
    "usrn",
    "designation",
    "designationdescription",
    "effectivestartdate",
    "effectiveenddate",
    "timeinterval",
    "geometry_length",
    "authorityid",
    "contactauthority_authorityname",
];

/// Properties kept for land-use features.
const LAND_USE_PROPS: [&str; 6] = [
    "name1_text",
    "name2_text",
    "oslandusetiera",
    "oslandusetierb",
    "primaryuprn",
    "geometry_area",
];

/// Extract the essential properties of a feature for its collection family.
/// Always keeps `id` and `description`; geometry is dropped.
pub fn filter_feature_properties(feature: &Feature, family: CollectionFamily) -> Feature {
    let mut properties = serde_json::Map::new();
    properties.insert(
        "description".to_string(),
        feature
            .properties
            .get("description")
            .cloned()
            .unwrap_or(serde_json::Value::Null),
    );

    let keep: &[&str] = match family {
        CollectionFamily::SpecialDesignation => &SPECIAL_DESIGNATION_PROPS,
        CollectionFamily::LandUse => &LAND_USE_PROPS,
        CollectionFamily::Network | CollectionFamily::Building => &[],
    };

    for key in keep {
        let value = feature.properties.get(*key).cloned();
        // oslandusetierb is a list upstream; absent reads as empty
        let fallback = if *key == "oslandusetierb" {
            serde_json::Value::Array(Vec::new())
        } else {
            serde_json::Value::Null
        };
        properties.insert((*key).to_string(), value.unwrap_or(fallback));
    }

    Feature {
        id: feature.id.clone(),
        geometry: None,
        properties,
    }
}

/// Filter every feature of a collection, keeping the envelope.
pub fn filter_collection(fc: &FeatureCollection, family: CollectionFamily) -> FeatureCollection {
    FeatureCollection {
        kind: fc.kind.clone(),
        number_returned: fc.features.len() as u64,
        time_stamp: fc.time_stamp.clone(),
        features: fc
            .features
            .iter()
            .map(|f| filter_feature_properties(f, family))
            .collect(),
    }
}

/// Merge per-collection fetch results into one feature collection.
/// Failed collections are logged and skipped; the merged envelope carries the
/// latest upstream timestamp seen (timestamps are ISO-8601, so lexicographic
/// comparison is ordering).
pub fn merge_collections(
    results: Vec<(&str, Result<FeatureCollection>)>,
) -> FeatureCollection {
    let mut merged = FeatureCollection::empty();

    for (collection_id, result) in results {
        let fc = match result {
            Ok(fc) => fc,
            Err(e) => {
                error!(collection = collection_id, error = %e, "failed to fetch collection");
                continue;
            }
        };

        if !fc.time_stamp.is_empty()
            && (merged.time_stamp.is_empty() || fc.time_stamp > merged.time_stamp)
        {
            merged.time_stamp = fc.time_stamp.clone();
        }
        merged.features.extend(fc.features);
    }

    merged.number_returned = merged.features.len() as u64;
    merged
}

/// Fetch the street-info collections for a USRN in parallel and merge them.
pub async fn fetch_street_collections(
    source: &dyn FeatureSource,
    usrn: &Usrn,
) -> FeatureCollection {
    let query = FeatureQuery::ByUsrn(usrn.clone());
    let futures = STREET_INFO_COLLECTIONS
        .iter()
        .map(|id| async { (*id, source.features(id, &query).await) });

    let results = join_all(futures).await;
    let merged = merge_collections(results);

    if merged.features.is_empty() {
        warn!(%usrn, "no features found for USRN");
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ngd::MockFeatureSource;
    use serde_json::json;

    fn feature(props: serde_json::Value) -> Feature {
        Feature {
            id: json!("f1"),
            geometry: Some(json!({"type": "LineString", "coordinates": []})),
            properties: props.as_object().cloned().unwrap(),
        }
    }

    fn collection(time_stamp: &str, features: Vec<Feature>) -> FeatureCollection {
        FeatureCollection {
            kind: "FeatureCollection".to_string(),
            number_returned: features.len() as u64,
            time_stamp: time_stamp.to_string(),
            features,
        }
    }

    #[test]
    fn test_designation_filter_keeps_essentials_drops_geometry() {
        let f = feature(json!({
            "description": "Traffic Sensitive Street",
            "designation": "Traffic Sensitive",
            "usrn": 11720125,
            "operationalstate": "Open",
            "timeinterval": "Mon-Fri 07:00-19:00"
        }));
        let filtered = filter_feature_properties(&f, CollectionFamily::SpecialDesignation);
        assert!(filtered.geometry.is_none());
        assert_eq!(filtered.properties["designation"], json!("Traffic Sensitive"));
        assert_eq!(filtered.properties["timeinterval"], json!("Mon-Fri 07:00-19:00"));
        assert!(filtered.properties.get("operationalstate").is_none());
    }

    #[test]
    fn test_land_use_filter_defaults_tier_b_to_empty_list() {
        let f = feature(json!({
            "description": "Retail",
            "name1_text": "High Street Store",
            "oslandusetiera": "Commercial",
            "geometry_area": 320.5
        }));
        let filtered = filter_feature_properties(&f, CollectionFamily::LandUse);
        assert_eq!(filtered.properties["oslandusetierb"], json!([]));
        assert_eq!(filtered.properties["geometry_area"], json!(320.5));
        assert_eq!(filtered.properties["name2_text"], serde_json::Value::Null);
    }

    #[test]
    fn test_merge_skips_failures_and_takes_latest_timestamp() {
        let ok_a = collection(
            "2025-01-15T10:00:00Z",
            vec![feature(json!({"description": "a"}))],
        );
        let ok_b = collection(
            "2025-02-01T08:30:00Z",
            vec![
                feature(json!({"description": "b1"})),
                feature(json!({"description": "b2"})),
            ],
        );
        let merged = merge_collections(vec![
            ("one", Ok(ok_a)),
            (
                "two",
                Err(streetlens_common::StreetlensError::Upstream {
                    status: 503,
                    message: "down".to_string(),
                }),
            ),
            ("three", Ok(ok_b)),
        ]);
        assert_eq!(merged.number_returned, 3);
        assert_eq!(merged.time_stamp, "2025-02-01T08:30:00Z");
    }

    #[tokio::test]
    async fn test_street_fan_out_merges_partial_results() {
        let usrn = Usrn::parse("11720125").unwrap();
        let source = MockFeatureSource::new()
            .with(
                "trn-ntwk-street-1",
                collection(
                    "2025-01-01T00:00:00Z",
                    vec![feature(json!({"description": "Designated Street Name"}))],
                ),
            )
            .with(
                "trn-rami-specialdesignationline-1",
                collection(
                    "2025-01-02T00:00:00Z",
                    vec![feature(json!({"description": "Winter Maintenance Routes"}))],
                ),
            )
            .failing("trn-rami-specialdesignationarea-1")
            .failing("trn-rami-specialdesignationpoint-1");

        let merged = fetch_street_collections(&source, &usrn).await;
        assert_eq!(merged.number_returned, 2);
        assert_eq!(merged.time_stamp, "2025-01-02T00:00:00Z");
    }
}

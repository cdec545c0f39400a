//! Domain types shared across the workspace: street reference numbers,
//! bounding boxes in British National Grid, and the feature-collection
//! payloads the OS NGD API returns.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StreetlensError};

/// CRS used for every bbox and geometry this service handles.
pub const CRS_BNG: &str = "http://www.opengis.net/def/crs/EPSG/0/27700";

/// A Unique Street Reference Number: 6–12 decimal digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Usrn(String);

impl Usrn {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.len() >= 6
            && trimmed.len() <= 12
            && trimmed.chars().all(|c| c.is_ascii_digit())
        {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(StreetlensError::Validation(format!(
                "invalid USRN '{trimmed}': expected 6-12 digits"
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Usrn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Axis-aligned bounding box in EPSG:27700 metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    /// Expand by `distance` metres on every side. With an axis-aligned
    /// envelope this is exactly the bounds of a square-capped buffer of the
    /// underlying geometry.
    pub fn expanded(&self, distance: f64) -> Self {
        Self {
            min_x: self.min_x - distance,
            min_y: self.min_y - distance,
            max_x: self.max_x + distance,
            max_y: self.max_y + distance,
        }
    }

    /// Round all coordinates to whole metres.
    pub fn rounded(&self) -> Self {
        Self {
            min_x: self.min_x.round(),
            min_y: self.min_y.round(),
            max_x: self.max_x.round(),
            max_y: self.max_y.round(),
        }
    }

    /// `minx,miny,maxx,maxy` as expected by the `bbox` query parameter.
    pub fn to_query_param(&self) -> String {
        format!("{},{},{},{}", self.min_x, self.min_y, self.max_x, self.max_y)
    }

    /// Parse a `minx,miny,maxx,maxy` query parameter.
    pub fn parse_param(raw: &str) -> Result<Self> {
        let parts: Vec<f64> = raw
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|_| {
                StreetlensError::Validation(format!(
                    "invalid bbox '{raw}': expected minx,miny,maxx,maxy"
                ))
            })?;
        match parts.as_slice() {
            [min_x, min_y, max_x, max_y] if min_x <= max_x && min_y <= max_y => {
                Ok(Self::new(*min_x, *min_y, *max_x, *max_y))
            }
            _ => Err(StreetlensError::Validation(format!(
                "invalid bbox '{raw}': expected minx,miny,maxx,maxy"
            ))),
        }
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

/// One row of the street-works permit summary: distinct completed permits per
/// promoter, classified into a utility sector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkSummaryEntry {
    pub promoter_organisation: String,
    pub sector: String,
    pub total_works: i64,
}

/// A single feature as returned by the NGD items endpoint. Properties stay
/// schemaless — the collection schemas are owned upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub id: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<serde_json::Value>,
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl Feature {
    /// String-typed property accessor; absent and non-string both read as None.
    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(|v| v.as_str())
    }

    pub fn prop_f64(&self, key: &str) -> Option<f64> {
        self.properties.get(key).and_then(|v| v.as_f64())
    }
}

/// The feature-collection envelope shared by every NGD items response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default = "feature_collection_kind")]
    pub kind: String,
    #[serde(rename = "numberReturned", default)]
    pub number_returned: u64,
    #[serde(rename = "timeStamp", default)]
    pub time_stamp: String,
    #[serde(default)]
    pub features: Vec<Feature>,
}

fn feature_collection_kind() -> String {
    "FeatureCollection".to_string()
}

impl FeatureCollection {
    pub fn empty() -> Self {
        Self {
            kind: feature_collection_kind(),
            number_returned: 0,
            time_stamp: String::new(),
            features: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usrn_accepts_valid_digits() {
        assert!(Usrn::parse("11720125").is_ok());
        assert!(Usrn::parse("  123456 ").is_ok());
    }

    #[test]
    fn test_usrn_rejects_bad_input() {
        assert!(Usrn::parse("12345").is_err()); // too short
        assert!(Usrn::parse("1234567890123").is_err()); // too long
        assert!(Usrn::parse("12a45678").is_err());
        assert!(Usrn::parse("").is_err());
    }

    #[test]
    fn test_bbox_expand_round_param() {
        let bbox = BoundingBox::new(100.4, 200.6, 300.2, 400.9)
            .expanded(50.0)
            .rounded();
        assert_eq!(bbox.min_x, 50.0);
        assert_eq!(bbox.min_y, 151.0);
        assert_eq!(bbox.max_x, 350.0);
        assert_eq!(bbox.max_y, 451.0);
        assert_eq!(bbox.to_query_param(), "50,151,350,451");
    }

    #[test]
    fn test_bbox_param_round_trip() {
        let bbox = BoundingBox::parse_param("424450,564751,424671,564960").unwrap();
        assert_eq!(bbox.to_query_param(), "424450,564751,424671,564960");
        assert!(BoundingBox::parse_param("1,2,3").is_err());
        assert!(BoundingBox::parse_param("4,2,3,9").is_err()); // minx > maxx
        assert!(BoundingBox::parse_param("a,b,c,d").is_err());
    }

    #[test]
    fn test_feature_collection_deserializes_ngd_shape() {
        let json = r#"{
            "type": "FeatureCollection",
            "numberReturned": 1,
            "timeStamp": "2025-01-15T10:00:00Z",
            "features": [
                {"id": "abc", "geometry": null, "properties": {"usrn": "11720125", "geometry_length": 120.5}}
            ]
        }"#;
        let fc: FeatureCollection = serde_json::from_str(json).unwrap();
        assert_eq!(fc.number_returned, 1);
        assert_eq!(fc.features[0].prop_str("usrn"), Some("11720125"));
        assert_eq!(fc.features[0].prop_f64("geometry_length"), Some(120.5));
    }
}

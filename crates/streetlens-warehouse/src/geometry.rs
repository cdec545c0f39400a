//! USRN centre-line geometry to buffered bounding box.

use geo::BoundingRect;
use tracing::{debug, warn};
use wkt::TryFromWkt;

use streetlens_common::error::{Result, StreetlensError};
use streetlens_common::types::{BoundingBox, Usrn};

use crate::pool::Warehouse;

/// Envelope of a WKT geometry expanded by `buffer_distance` metres on every
/// side and rounded to whole metres. The square-capped buffer the assessment
/// needs reduces to exactly this once only the bounds are kept.
pub fn buffered_bbox_from_wkt(wkt_str: &str, buffer_distance: f64) -> Result<BoundingBox> {
    let geometry: geo::Geometry<f64> = geo::Geometry::try_from_wkt_str(wkt_str)
        .map_err(|e| StreetlensError::Warehouse(format!("invalid WKT geometry: {e}")))?;

    let rect = geometry
        .bounding_rect()
        .ok_or_else(|| StreetlensError::Warehouse("empty geometry".to_string()))?;

    Ok(
        BoundingBox::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y)
            .expanded(buffer_distance)
            .rounded(),
    )
}

impl Warehouse {
    /// Bounding box for a USRN's centre-line, buffered for the features APIs.
    /// A USRN with no geometry row is a validation error, not a server fault.
    pub async fn bbox_for_usrn(
        &self,
        usrn: &Usrn,
        buffer_distance: f64,
    ) -> Result<BoundingBox> {
        let client = self.client().await?;
        let sql = format!(
            "SELECT geometry FROM {} WHERE usrn = $1",
            self.config.street_table
        );

        let rows = client
            .query(&sql, &[&usrn.as_str()])
            .await
            .map_err(|e| StreetlensError::Warehouse(format!("geometry query: {e}")))?;

        let Some(row) = rows.first() else {
            warn!(%usrn, "no geometry found for USRN");
            return Err(StreetlensError::Validation(format!(
                "no geometry found for USRN: {usrn}"
            )));
        };

        let wkt_str: String = row.get(0);
        let bbox = buffered_bbox_from_wkt(&wkt_str, buffer_distance)?;
        debug!(%usrn, bbox = %bbox.to_query_param(), "USRN geometry resolved");
        Ok(bbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linestring_envelope_buffered_and_rounded() {
        let bbox =
            buffered_bbox_from_wkt("LINESTRING (424500.2 564800.7, 424620.9 564910.1)", 50.0)
                .unwrap();
        assert_eq!(bbox.min_x, 424450.0);
        assert_eq!(bbox.min_y, 564751.0);
        assert_eq!(bbox.max_x, 424671.0);
        assert_eq!(bbox.max_y, 564960.0);
    }

    #[test]
    fn test_point_buffers_to_square() {
        let bbox = buffered_bbox_from_wkt("POINT (100 200)", 25.0).unwrap();
        assert_eq!(bbox, BoundingBox::new(75.0, 175.0, 125.0, 225.0));
    }

    #[test]
    fn test_invalid_wkt_is_warehouse_error() {
        let err = buffered_bbox_from_wkt("LINESTRING banana", 50.0).unwrap_err();
        assert!(matches!(err, StreetlensError::Warehouse(_)));
    }
}

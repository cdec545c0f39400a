//! Hex-grid id decoding for NUAR asset-metric cells.
//!
//! Grid ids take the form `"{zoom}-{col}-{row}"` over a flat-topped hexagonal
//! tiling of the EPSG:27700 plane, columns in odd-q offset layout. Cell size
//! halves per zoom level: zoom 10 cells have a 1024 m circumradius, so the
//! default zoom 12 gives 256 m cells.

use serde::Serialize;
use std::str::FromStr;

use streetlens_common::error::StreetlensError;
use streetlens_common::types::BoundingBox;

/// Circumradius of a zoom-10 cell in metres.
const BASE_RADIUS_M: f64 = 1024.0;
const BASE_ZOOM: i32 = 10;

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// A parsed NUAR grid cell id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct HexGridId {
    pub zoom: u8,
    pub col: i32,
    pub row: i32,
}

impl FromStr for HexGridId {
    type Err = StreetlensError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('-');
        let (zoom, col, row) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(z), Some(c), Some(r), None) => (z, c, r),
            _ => {
                return Err(StreetlensError::Validation(format!(
                    "invalid grid id '{s}': expected zoom-col-row"
                )))
            }
        };

        fn parse_part<T: FromStr>(part: &str, id: &str, what: &str) -> Result<T, StreetlensError> {
            part.parse().map_err(|_| {
                StreetlensError::Validation(format!("invalid grid id '{id}': bad {what}"))
            })
        }

        Ok(Self {
            zoom: parse_part(zoom, s, "zoom")?,
            col: parse_part(col, s, "col")?,
            row: parse_part(row, s, "row")?,
        })
    }
}

impl std::fmt::Display for HexGridId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.zoom, self.col, self.row)
    }
}

impl HexGridId {
    /// Cell circumradius (centre to vertex) in metres at this zoom.
    pub fn circumradius(&self) -> f64 {
        BASE_RADIUS_M * 2f64.powi(BASE_ZOOM - i32::from(self.zoom))
    }

    /// Cell centre in EPSG:27700 metres. Flat-topped layout: columns advance
    /// by 1.5r, rows by sqrt(3)r, odd columns shifted down half a row.
    pub fn centre(&self) -> (f64, f64) {
        let r = self.circumradius();
        let x = f64::from(self.col) * 1.5 * r;
        let mut y = f64::from(self.row) * SQRT_3 * r;
        if self.col.rem_euclid(2) == 1 {
            y += SQRT_3 * r / 2.0;
        }
        (x, y)
    }

    /// The six vertices of the cell, counter-clockwise from due east.
    pub fn polygon(&self) -> Vec<(f64, f64)> {
        let (cx, cy) = self.centre();
        let r = self.circumradius();
        (0..6)
            .map(|i| {
                let theta = f64::from(i) * std::f64::consts::FRAC_PI_3;
                (cx + r * theta.cos(), cy + r * theta.sin())
            })
            .collect()
    }

    /// Axis-aligned bounding box of the cell.
    pub fn bbox(&self) -> BoundingBox {
        let (cx, cy) = self.centre();
        let r = self.circumradius();
        let half_height = SQRT_3 * r / 2.0;
        BoundingBox::new(cx - r, cy - half_height, cx + r, cy + half_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips() {
        let id: HexGridId = "12-204-130".parse().unwrap();
        assert_eq!(id, HexGridId { zoom: 12, col: 204, row: 130 });
        assert_eq!(id.to_string(), "12-204-130");
    }

    #[test]
    fn test_parse_rejects_malformed_ids() {
        assert!("12-204".parse::<HexGridId>().is_err());
        assert!("12-204-130-7".parse::<HexGridId>().is_err());
        assert!("a-204-130".parse::<HexGridId>().is_err());
        assert!("".parse::<HexGridId>().is_err());
    }

    #[test]
    fn test_zoom_halves_cell_size() {
        let z10: HexGridId = "10-0-0".parse().unwrap();
        let z12: HexGridId = "12-0-0".parse().unwrap();
        assert_eq!(z10.circumradius(), 1024.0);
        assert_eq!(z12.circumradius(), 256.0);
    }

    #[test]
    fn test_odd_column_offset() {
        let even: HexGridId = "12-2-5".parse().unwrap();
        let odd: HexGridId = "12-3-5".parse().unwrap();
        let (_, even_y) = even.centre();
        let (_, odd_y) = odd.centre();
        let half_row = SQRT_3 * even.circumradius() / 2.0;
        assert!((odd_y - even_y - half_row).abs() < 1e-9);
    }

    #[test]
    fn test_bbox_is_centred_on_cell() {
        let id: HexGridId = "12-204-130".parse().unwrap();
        let (cx, cy) = id.centre();
        let bbox = id.bbox();
        assert!((bbox.min_x + bbox.max_x - 2.0 * cx).abs() < 1e-9);
        assert!((bbox.min_y + bbox.max_y - 2.0 * cy).abs() < 1e-9);
        assert!((bbox.max_x - bbox.min_x - 512.0).abs() < 1e-9);
    }

    #[test]
    fn test_polygon_vertices_lie_on_circumcircle() {
        let id: HexGridId = "12-10-20".parse().unwrap();
        let (cx, cy) = id.centre();
        let r = id.circumradius();
        for (x, y) in id.polygon() {
            let dist = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
            assert!((dist - r).abs() < 1e-6);
        }
    }
}

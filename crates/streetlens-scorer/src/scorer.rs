//! Enhanced collaboration-index computation.
//!
//! Total = base work-parameter factors + underground-asset factors +
//! special-designation bonuses. Every contribution is reported in the
//! breakdown so the score can be audited.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::factors::{InstallationMethod, LocationType, SectorType, TtroRequired};

/// Designation bonuses, awarded once per kind regardless of how many
/// matching designations a street carries.
const WINTER_MAINTENANCE_BONUS: u32 = 10;
const TRAFFIC_SENSITIVE_BONUS: u32 = 15;
const ENVIRONMENTALLY_SENSITIVE_BONUS: u32 = 10;

/// The four work parameters submitted with an assessment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WorkParameters {
    pub location_type: LocationType,
    pub sector_type: SectorType,
    pub ttro_required: TtroRequired,
    pub installation_method: InstallationMethod,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseFactors {
    pub location: u32,
    pub sector: u32,
    pub ttro: u32,
    pub installation: u32,
    pub subtotal: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetFactors {
    pub asset_density: u32,
    pub coverage: u32,
    pub subtotal: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DesignationFactors {
    pub winter_maintenance: u32,
    pub traffic_sensitive: u32,
    pub environmentally_sensitive: u32,
    pub subtotal: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetMetrics {
    pub total_assets: u64,
    pub hex_grids: u64,
    /// Mean assets per grid, rounded to one decimal place.
    pub asset_density: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub base_factors: BaseFactors,
    pub asset_factors: AssetFactors,
    pub designation_factors: DesignationFactors,
    pub asset_metrics: AssetMetrics,
    /// Matching designation label -> occurrence count.
    pub designation_details: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollaborationScore {
    pub total_score: u32,
    pub breakdown: ScoreBreakdown,
}

/// Higher density means more underground plant to coordinate around.
fn asset_density_score(density: f64) -> u32 {
    if density >= 20.0 {
        5
    } else if density >= 15.0 {
        3
    } else if density >= 10.0 {
        2
    } else {
        1
    }
}

/// More grids means a larger area and more parties to coordinate.
fn coverage_score(total_grids: u64) -> u32 {
    if total_grids >= 15 {
        3
    } else if total_grids >= 10 {
        2
    } else {
        1
    }
}

/// Compute the enhanced collaboration index.
///
/// `asset_stats` is `(total_assets, total_grids)` from the NUAR summary,
/// absent when the NUAR fetch failed or returned nothing. `designations` are
/// the designation names attached to the street.
pub fn compute_collaboration_index(
    params: &WorkParameters,
    asset_stats: Option<(u64, u64)>,
    designations: &[String],
) -> CollaborationScore {
    let base_factors = BaseFactors {
        location: params.location_type.score(),
        sector: params.sector_type.score(),
        ttro: params.ttro_required.score(),
        installation: params.installation_method.score(),
        subtotal: params.location_type.score()
            + params.sector_type.score()
            + params.ttro_required.score()
            + params.installation_method.score(),
    };

    let mut asset_factors = AssetFactors::default();
    let mut asset_metrics = AssetMetrics::default();
    if let Some((total_assets, total_grids)) = asset_stats {
        if total_assets > 0 && total_grids > 0 {
            let density = total_assets as f64 / total_grids as f64;
            asset_factors.asset_density = asset_density_score(density);
            asset_factors.coverage = coverage_score(total_grids);
            asset_factors.subtotal = asset_factors.asset_density + asset_factors.coverage;
            asset_metrics = AssetMetrics {
                total_assets,
                hex_grids: total_grids,
                asset_density: (density * 10.0).round() / 10.0,
            };
        }
    }

    let mut designation_factors = DesignationFactors::default();
    let mut designation_details: BTreeMap<String, u32> = BTreeMap::new();
    for designation in designations {
        let lowered = designation.to_lowercase();
        if lowered.contains("winter maintenance") {
            *designation_details
                .entry("Winter Maintenance Routes".to_string())
                .or_insert(0) += 1;
            designation_factors.winter_maintenance = WINTER_MAINTENANCE_BONUS;
        } else if lowered.contains("traffic sensitive") {
            *designation_details
                .entry("Traffic Sensitive Street".to_string())
                .or_insert(0) += 1;
            designation_factors.traffic_sensitive = TRAFFIC_SENSITIVE_BONUS;
        } else if lowered.contains("environmentally sensitive") {
            *designation_details
                .entry("Environmentally Sensitive Areas".to_string())
                .or_insert(0) += 1;
            designation_factors.environmentally_sensitive = ENVIRONMENTALLY_SENSITIVE_BONUS;
        }
    }
    designation_factors.subtotal = designation_factors.winter_maintenance
        + designation_factors.traffic_sensitive
        + designation_factors.environmentally_sensitive;

    let total_score =
        base_factors.subtotal + asset_factors.subtotal + designation_factors.subtotal;

    CollaborationScore {
        total_score,
        breakdown: ScoreBreakdown {
            base_factors,
            asset_factors,
            designation_factors,
            asset_metrics,
            designation_details,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> WorkParameters {
        WorkParameters {
            location_type: LocationType::Carriageway,
            sector_type: SectorType::Water,
            ttro_required: TtroRequired::Yes,
            installation_method: InstallationMethod::OpenCut,
        }
    }

    #[test]
    fn test_base_factors_sum() {
        let score = compute_collaboration_index(&params(), None, &[]);
        assert_eq!(score.breakdown.base_factors.subtotal, 40);
        assert_eq!(score.total_score, 40);
        assert_eq!(score.breakdown.asset_factors.subtotal, 0);
    }

    #[test]
    fn test_density_banding() {
        assert_eq!(asset_density_score(25.0), 5);
        assert_eq!(asset_density_score(20.0), 5);
        assert_eq!(asset_density_score(19.9), 3);
        assert_eq!(asset_density_score(15.0), 3);
        assert_eq!(asset_density_score(10.0), 2);
        assert_eq!(asset_density_score(9.9), 1);
    }

    #[test]
    fn test_coverage_banding() {
        assert_eq!(coverage_score(20), 3);
        assert_eq!(coverage_score(15), 3);
        assert_eq!(coverage_score(10), 2);
        assert_eq!(coverage_score(3), 1);
    }

    #[test]
    fn test_asset_factors_need_both_assets_and_grids() {
        let none = compute_collaboration_index(&params(), Some((0, 10)), &[]);
        assert_eq!(none.breakdown.asset_factors.subtotal, 0);

        let some = compute_collaboration_index(&params(), Some((180, 12)), &[]);
        assert_eq!(some.breakdown.asset_factors.asset_density, 3); // 15.0/grid
        assert_eq!(some.breakdown.asset_factors.coverage, 2);
        assert_eq!(some.breakdown.asset_metrics.asset_density, 15.0);
        assert_eq!(some.total_score, 40 + 5);
    }

    #[test]
    fn test_designation_bonus_awarded_once_but_counted() {
        let designations = vec![
            "Traffic Sensitive".to_string(),
            "Traffic Sensitive".to_string(),
            "Winter Maintenance Routes".to_string(),
            "Structures Not Designated Special Engineering Difficulty".to_string(),
        ];
        let score = compute_collaboration_index(&params(), None, &designations);
        let d = &score.breakdown.designation_factors;
        assert_eq!(d.traffic_sensitive, 15);
        assert_eq!(d.winter_maintenance, 10);
        assert_eq!(d.environmentally_sensitive, 0);
        assert_eq!(d.subtotal, 25);
        assert_eq!(
            score.breakdown.designation_details["Traffic Sensitive Street"],
            2
        );
        assert_eq!(score.total_score, 65);
    }

    #[test]
    fn test_designation_match_is_case_insensitive() {
        let score = compute_collaboration_index(
            &params(),
            None,
            &["ENVIRONMENTALLY SENSITIVE AREAS".to_string()],
        );
        assert_eq!(score.breakdown.designation_factors.environmentally_sensitive, 10);
    }
}

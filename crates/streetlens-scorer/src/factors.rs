//! Work-parameter factors and their fixed point values.
//!
//! The points encode how disruptive (and therefore how collaboration-worthy)
//! each choice is: a full-width open-cut dig in a carriageway scores far
//! higher than thrust boring under a verge.

use serde::{Deserialize, Serialize};

/// Where in the highway the works take place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    Footway,
    Carriageway,
    Verge,
    Mix,
}

impl LocationType {
    pub fn score(&self) -> u32 {
        match self {
            Self::Footway => 3,
            Self::Carriageway => 10,
            Self::Verge => 6,
            Self::Mix => 15,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Footway => "Footway",
            Self::Carriageway => "Carriageway",
            Self::Verge => "Verge",
            Self::Mix => "Mix",
        }
    }
}

/// Utility sector of the promoter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectorType {
    Water,
    Telco,
    Gas,
    Electricity,
    Highway,
}

impl SectorType {
    /// Typical dig depth in the sector, reused as the factor score.
    pub fn score(&self) -> u32 {
        match self {
            Self::Water => 10,
            Self::Telco => 2,
            Self::Gas => 8,
            Self::Electricity => 5,
            Self::Highway => 5,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Water => "Water",
            Self::Telco => "Telecommunications",
            Self::Gas => "Gas",
            Self::Electricity => "Electricity",
            Self::Highway => "Highway",
        }
    }
}

/// Whether a Temporary Traffic Regulation Order is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TtroRequired {
    Yes,
    No,
}

impl TtroRequired {
    pub fn score(&self) -> u32 {
        match self {
            Self::Yes => 10,
            Self::No => 5,
        }
    }
}

/// Installation technique for the works.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallationMethod {
    OpenCut,
    DirectionalDrilling,
    Moling,
    Tunnelling,
    ThrustBoring,
    PipeJacking,
    SlipLining,
    PipeBursting,
    Trenching,
    Other,
}

impl InstallationMethod {
    pub fn score(&self) -> u32 {
        match self {
            Self::OpenCut => 10,
            Self::DirectionalDrilling => 5,
            Self::Moling => 4,
            Self::Tunnelling => 4,
            Self::ThrustBoring => 2,
            Self::PipeJacking => 2,
            Self::SlipLining => 2,
            Self::PipeBursting => 5,
            Self::Trenching => 6,
            Self::Other => 5,
        }
    }
}

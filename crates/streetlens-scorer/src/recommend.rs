//! Recommendation tiers for a collaboration score.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationLevel {
    HighPriority,
    ModeratePriority,
    Consider,
    LowPriority,
}

impl RecommendationLevel {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::HighPriority => "HIGH PRIORITY",
            Self::ModeratePriority => "MODERATE PRIORITY",
            Self::Consider => "CONSIDER",
            Self::LowPriority => "LOW PRIORITY",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub level: RecommendationLevel,
    pub recommendation: String,
    pub score_range: String,
}

/// Map a collaboration score onto its recommendation tier.
pub fn recommendation_for(score: u32) -> Recommendation {
    if score >= 35 {
        Recommendation {
            level: RecommendationLevel::HighPriority,
            recommendation: "Strong recommendation for collaborative working due to high \
                underground asset density and complex work requirements."
                .to_string(),
            score_range: "35+".to_string(),
        }
    } else if score >= 30 {
        Recommendation {
            level: RecommendationLevel::ModeratePriority,
            recommendation: "Good opportunity for collaboration with moderate asset density \
                and work complexity."
                .to_string(),
            score_range: "30-34".to_string(),
        }
    } else if score >= 25 {
        Recommendation {
            level: RecommendationLevel::Consider,
            recommendation: "Some collaboration potential but may depend on timing and \
                resource availability."
                .to_string(),
            score_range: "25-29".to_string(),
        }
    } else {
        Recommendation {
            level: RecommendationLevel::LowPriority,
            recommendation: "Limited collaboration benefits expected based on current metrics."
                .to_string(),
            score_range: "< 25".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(recommendation_for(35).level, RecommendationLevel::HighPriority);
        assert_eq!(recommendation_for(34).level, RecommendationLevel::ModeratePriority);
        assert_eq!(recommendation_for(30).level, RecommendationLevel::ModeratePriority);
        assert_eq!(recommendation_for(29).level, RecommendationLevel::Consider);
        assert_eq!(recommendation_for(25).level, RecommendationLevel::Consider);
        assert_eq!(recommendation_for(24).level, RecommendationLevel::LowPriority);
        assert_eq!(recommendation_for(0).level, RecommendationLevel::LowPriority);
    }
}

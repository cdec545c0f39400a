//! Batch assessment helpers: free-text USRN parsing and cross-street
//! summary accumulation.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::warn;

use streetlens_common::types::Usrn;

use crate::recommend::RecommendationLevel;

fn separator() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[,;\s]+").expect("static separator pattern"))
}

/// Parse USRNs out of free text. Newlines, commas, semicolons, spaces, and
/// any mix of them separate entries; entries that are not 6-12 digit numbers
/// are returned separately so callers can report them.
pub fn parse_usrns(text: &str) -> (Vec<Usrn>, Vec<String>) {
    let mut valid = Vec::new();
    let mut invalid = Vec::new();

    for raw in separator().split(text) {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        match Usrn::parse(trimmed) {
            Ok(usrn) => valid.push(usrn),
            Err(_) => {
                warn!(entry = trimmed, "skipping invalid USRN format");
                invalid.push(trimmed.to_string());
            }
        }
    }

    (valid, invalid)
}

/// Summary statistics accumulated over a batch assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total_usrns: usize,
    pub processed_usrns: usize,
    pub failed_usrns: usize,
    pub average_score: f64,
    pub max_score: u32,
    pub min_score: u32,
    pub high_priority_count: usize,
    pub moderate_priority_count: usize,
    pub consider_count: usize,
    pub low_priority_count: usize,
}

impl BatchSummary {
    pub fn new(total_usrns: usize) -> Self {
        Self {
            total_usrns,
            processed_usrns: 0,
            failed_usrns: 0,
            average_score: 0.0,
            max_score: 0,
            min_score: 0,
            high_priority_count: 0,
            moderate_priority_count: 0,
            consider_count: 0,
            low_priority_count: 0,
        }
    }

    /// Record one successfully assessed street.
    pub fn record(&mut self, score: u32, level: RecommendationLevel) {
        if self.processed_usrns == 0 {
            self.max_score = score;
            self.min_score = score;
        } else {
            self.max_score = self.max_score.max(score);
            self.min_score = self.min_score.min(score);
        }

        let running_total = self.average_score * self.processed_usrns as f64 + f64::from(score);
        self.processed_usrns += 1;
        self.average_score = running_total / self.processed_usrns as f64;

        match level {
            RecommendationLevel::HighPriority => self.high_priority_count += 1,
            RecommendationLevel::ModeratePriority => self.moderate_priority_count += 1,
            RecommendationLevel::Consider => self.consider_count += 1,
            RecommendationLevel::LowPriority => self.low_priority_count += 1,
        }
    }

    /// Record one street that could not be assessed.
    pub fn record_failure(&mut self) {
        self.failed_usrns += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_usrns_mixed_separators() {
        let (valid, invalid) = parse_usrns("12345678, 87654321\n11223344 99887766;55443322");
        assert_eq!(valid.len(), 5);
        assert!(invalid.is_empty());
        assert_eq!(valid[0].as_str(), "12345678");
        assert_eq!(valid[4].as_str(), "55443322");
    }

    #[test]
    fn test_parse_usrns_reports_invalid_entries() {
        let (valid, invalid) = parse_usrns("12345678\nabc123\n42\n");
        assert_eq!(valid.len(), 1);
        assert_eq!(invalid, vec!["abc123".to_string(), "42".to_string()]);
    }

    #[test]
    fn test_parse_usrns_empty_input() {
        let (valid, invalid) = parse_usrns("  \n ");
        assert!(valid.is_empty());
        assert!(invalid.is_empty());
    }

    #[test]
    fn test_batch_summary_accumulates() {
        let mut summary = BatchSummary::new(4);
        summary.record(40, RecommendationLevel::HighPriority);
        summary.record(28, RecommendationLevel::Consider);
        summary.record(22, RecommendationLevel::LowPriority);
        summary.record_failure();

        assert_eq!(summary.processed_usrns, 3);
        assert_eq!(summary.failed_usrns, 1);
        assert_eq!(summary.max_score, 40);
        assert_eq!(summary.min_score, 22);
        assert!((summary.average_score - 30.0).abs() < 1e-9);
        assert_eq!(summary.high_priority_count, 1);
        assert_eq!(summary.consider_count, 1);
        assert_eq!(summary.low_priority_count, 1);
    }
}

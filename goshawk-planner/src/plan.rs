//! Per-track plan assembly and summary rendering

use crate::decision::{Decision, Strategy};
use goshawk_common::TrackKey;

/// One planned track with its decision
#[derive(Debug, Clone)]
pub struct PlanEntry {
    pub key: TrackKey,
    pub decision: Decision,
}

/// Aggregate strategy counts across a plan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanSummary {
    pub crop_only: usize,
    pub process_only: usize,
    pub full: usize,
}

impl PlanSummary {
    pub fn total(&self) -> usize {
        self.crop_only + self.process_only + self.full
    }
}

/// Count plan entries per strategy
pub fn summarize(entries: &[PlanEntry]) -> PlanSummary {
    let mut summary = PlanSummary::default();
    for entry in entries {
        match entry.decision.strategy {
            Strategy::CropOnly => summary.crop_only += 1,
            Strategy::ProcessOnly => summary.process_only += 1,
            Strategy::Full => summary.full += 1,
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use goshawk_common::{OrbitDirection, Subswath};

    fn entry(track: u16, strategy: Strategy) -> PlanEntry {
        PlanEntry {
            key: TrackKey::new(OrbitDirection::Descending, Subswath::Iw1, track).unwrap(),
            decision: Decision {
                strategy,
                reason: String::new(),
            },
        }
    }

    #[test]
    fn summary_counts_each_strategy() {
        let entries = vec![
            entry(88, Strategy::CropOnly),
            entry(110, Strategy::Full),
            entry(15, Strategy::ProcessOnly),
            entry(37, Strategy::Full),
        ];
        let summary = summarize(&entries);
        assert_eq!(summary.crop_only, 1);
        assert_eq!(summary.process_only, 1);
        assert_eq!(summary.full, 2);
        assert_eq!(summary.total(), 4);
    }
}

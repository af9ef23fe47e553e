//! Aggregated result of one handle check.

use handlescan_core::{Handle, ProbeStatus, Timestamp};
use handlescan_scanner::ProbeOutcome;
use serde::{Deserialize, Serialize};

/// Outcomes for one handle plus per-status counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    pub handle: Handle,
    pub results: Vec<ProbeOutcome>,
    /// When the report was assembled
    pub timestamp: Timestamp,
    pub total_targets: usize,
    pub available: usize,
    pub taken: usize,
    pub unknown: usize,
}

impl CheckReport {
    pub fn new(handle: Handle, results: Vec<ProbeOutcome>) -> Self {
        let count = |status: ProbeStatus| results.iter().filter(|r| r.status == status).count();
        let (available, taken, unknown) = (
            count(ProbeStatus::Available),
            count(ProbeStatus::Taken),
            count(ProbeStatus::Unknown),
        );

        Self {
            handle,
            total_targets: results.len(),
            results,
            timestamp: Timestamp::now(),
            available,
            taken,
            unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use handlescan_catalog::TargetDefinition;

    fn outcome(name: &str, status: ProbeStatus) -> ProbeOutcome {
        let target = TargetDefinition::new(name, "https://example.com/{handle}");
        let mut outcome = ProbeOutcome::failed(&target, format!("https://example.com/{name}"), "x", 0);
        outcome.status = status;
        outcome
    }

    #[test]
    fn test_counts() {
        let report = CheckReport::new(
            Handle::new("alice123").unwrap(),
            vec![
                outcome("A", ProbeStatus::Available),
                outcome("B", ProbeStatus::Taken),
                outcome("C", ProbeStatus::Taken),
                outcome("D", ProbeStatus::Unknown),
            ],
        );

        assert_eq!(report.total_targets, 4);
        assert_eq!(report.available, 1);
        assert_eq!(report.taken, 2);
        assert_eq!(report.unknown, 1);
    }

    #[test]
    fn test_json_shape() {
        let report = CheckReport::new(Handle::new("alice123").unwrap(), vec![outcome("A", ProbeStatus::Taken)]);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["handle"], "alice123");
        assert_eq!(json["total_targets"], 1);
        assert_eq!(json["results"][0]["status"], "taken");
        let timestamp = json["timestamp"].as_str().unwrap();
        assert!(Timestamp::from_rfc3339(timestamp).is_ok());
    }
}

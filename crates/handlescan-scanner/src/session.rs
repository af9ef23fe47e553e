use crate::probe::ProbeOutcome;
use crate::url_builder::build_probe_url;
use handlescan_catalog::TargetDefinition;
use handlescan_core::{Handle, Timestamp};
use std::sync::Arc;
use uuid::Uuid;

/// One check of one handle, alive for a single orchestration call.
///
/// Outcomes are placed into slots by target index as probes settle, so the
/// final list is in catalog order whatever the completion order was.
#[derive(Debug)]
pub struct CheckSession {
    id: Uuid,
    started_at: Timestamp,
    handle: Handle,
    slots: Vec<Option<ProbeOutcome>>,
}

impl CheckSession {
    pub fn new(handle: Handle, total: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Timestamp::now(),
            handle,
            slots: vec![None; total],
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    pub fn total(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots filled so far.
    pub fn completed(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Store the outcome for the target at `index`. Out-of-range indexes are ignored.
    pub fn place(&mut self, index: usize, outcome: ProbeOutcome) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = Some(outcome);
        }
    }

    /// Collect outcomes in target order.
    ///
    /// A slot left empty gets a synthesized `unknown` outcome, so the result
    /// always has one entry per target.
    pub fn finish(self, targets: &[Arc<TargetDefinition>]) -> Vec<ProbeOutcome> {
        let handle = self.handle;
        self.slots
            .into_iter()
            .zip(targets)
            .map(|(slot, target)| {
                slot.unwrap_or_else(|| {
                    ProbeOutcome::failed(
                        target,
                        build_probe_url(target, &handle),
                        "probe did not report an outcome",
                        0,
                    )
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use handlescan_core::ProbeStatus;

    fn targets() -> Vec<Arc<TargetDefinition>> {
        ["One", "Two", "Three"]
            .iter()
            .map(|n| Arc::new(TargetDefinition::new(*n, format!("https://{}.example/{{handle}}", n.to_lowercase()))))
            .collect()
    }

    #[test]
    fn test_out_of_order_placement_keeps_target_order() {
        let targets = targets();
        let handle = Handle::new("alice123").expect("valid handle");
        let mut session = CheckSession::new(handle, targets.len());

        session.place(2, ProbeOutcome::failed(&targets[2], "c".into(), "x", 1));
        session.place(0, ProbeOutcome::failed(&targets[0], "a".into(), "x", 1));
        assert_eq!(session.completed(), 2);

        let outcomes = session.finish(&targets);
        let names: Vec<_> = outcomes.iter().map(|o| o.target_name.as_str()).collect();
        assert_eq!(names, vec!["One", "Two", "Three"]);

        assert_eq!(outcomes[1].status, ProbeStatus::Unknown);
        assert_eq!(outcomes[1].elapsed_ms, 0);
        assert_eq!(outcomes[1].resolved_url, "https://two.example/alice123");
        assert!(outcomes[1].error.is_some());
    }

    #[test]
    fn test_session_ids_are_unique() {
        let handle = Handle::new("alice123").expect("valid handle");
        let a = CheckSession::new(handle.clone(), 1);
        let b = CheckSession::new(handle, 1);
        assert_ne!(a.id(), b.id());
        assert!(a.started_at() <= b.started_at());
    }
}

use handlescan_catalog::{TargetDefinition, HANDLE_PLACEHOLDER};
use handlescan_core::Handle;

/// Substitute the handle into the target's URL template.
///
/// Handles are restricted to `[A-Za-z0-9_-]`, so no escaping is needed.
pub fn build_probe_url(target: &TargetDefinition, handle: &Handle) -> String {
    target.url_template.replacen(HANDLE_PLACEHOLDER, handle.as_str(), 1)
}

//! Execution bridge: invoke a chosen target.
//!
//! The session is torn down (marks cleared, overlay removed) strictly before
//! the target is focused and activated, so the invoked action never observes
//! overlay state and cannot re-enter overlay logic mid-teardown.

use tracing::{debug, info};

use crate::controller::OverlayController;
use crate::host::HostSurface;

impl<H: HostSurface> OverlayController<H> {
    /// Execute the target at `index` of the open session. Returns whether a
    /// target was invoked; out-of-range indices and a closed overlay are no-ops.
    pub fn execute(&mut self, index: usize) -> bool {
        let Some(target) = self.session().and_then(|s| s.target(index)).cloned() else {
            debug!(index, "Execute ignored: no such target");
            return false;
        };

        self.close();

        let host = self.host_mut();
        host.focus(target.element);
        host.activate(target.element);

        info!(
            event_type = "overlay",
            action = "executed",
            index,
            element = target.element.0,
            label = %target.label,
            "Target executed"
        );
        true
    }
}

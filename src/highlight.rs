//! Highlight state machine.
//!
//! Tracks which targets carry the base mark and which single target carries
//! the active mark. Base and active marks are independent classes; changing
//! the active target always removes the previous active mark before adding the
//! new one. `clear` is the only way marks are removed from a whole session.

use tracing::trace;

use crate::discovery::Target;
use crate::host::HostSurface;
use crate::overlay::{TARGET_ACTIVE_CLASS, TARGET_MARK_CLASS};

/// Observable state of the overlay as a whole.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HighlightPhase {
    Closed,
    Open { active: Option<usize> },
}

/// Marks owned by one open session.
#[derive(Debug)]
pub struct Highlighter {
    targets: Vec<Target>,
    active: Option<usize>,
}

impl Highlighter {
    /// Take ownership of the targets and put the base mark on each.
    pub fn mark_all<H: HostSurface + ?Sized>(host: &mut H, mut targets: Vec<Target>) -> Self {
        for target in &mut targets {
            host.add_class(target.element, TARGET_MARK_CLASS);
            target.marked = true;
        }
        trace!(marked = targets.len(), "Marked targets");
        Self {
            targets,
            active: None,
        }
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn target(&self, index: usize) -> Option<&Target> {
        self.targets.get(index)
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Move the active mark. Out-of-range indices clear it.
    pub fn set_active<H: HostSurface + ?Sized>(&mut self, host: &mut H, index: Option<usize>) {
        if let Some(previous) = self.active.take() {
            if let Some(target) = self.targets.get(previous) {
                host.remove_class(target.element, TARGET_ACTIVE_CLASS);
            }
        }

        if let Some(target) = index.and_then(|i| self.targets.get(i)) {
            host.add_class(target.element, TARGET_ACTIVE_CLASS);
            self.active = index;
        }
    }

    /// Remove every mark unconditionally and release the targets.
    pub fn clear<H: HostSurface + ?Sized>(&mut self, host: &mut H) -> Vec<Target> {
        for target in &mut self.targets {
            host.remove_class(target.element, TARGET_MARK_CLASS);
            host.remove_class(target.element, TARGET_ACTIVE_CLASS);
            target.marked = false;
        }
        self.active = None;
        std::mem::take(&mut self.targets)
    }
}

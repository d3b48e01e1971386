//! State of one open overlay instance.

use crate::discovery::Target;
use crate::highlight::Highlighter;
use crate::host::HostSurface;
use crate::overlay::{apply_filter, render, OverlayView};

/// Monotonic id distinguishing sessions, so deferred work can tell whether
/// the session it was scheduled for still exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

/// Lives from discovery to teardown. Owns its targets and overlay view.
#[derive(Debug)]
pub struct OverlaySession {
    id: SessionId,
    highlights: Highlighter,
    view: OverlayView,
}

impl OverlaySession {
    /// Mark the targets, build the overlay tree and mount it.
    pub fn start<H: HostSurface + ?Sized>(host: &mut H, id: SessionId, targets: Vec<Target>) -> Self {
        let view = render(&targets);
        let highlights = Highlighter::mark_all(host, targets);
        host.mount_overlay(&view);
        Self {
            id,
            highlights,
            view,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn view(&self) -> &OverlayView {
        &self.view
    }

    pub fn targets(&self) -> &[Target] {
        self.highlights.targets()
    }

    pub fn target(&self, index: usize) -> Option<&Target> {
        self.highlights.target(index)
    }

    pub fn active(&self) -> Option<usize> {
        self.highlights.active()
    }

    pub fn set_active<H: HostSurface + ?Sized>(&mut self, host: &mut H, index: Option<usize>) {
        self.highlights.set_active(host, index);
    }

    /// Update the search query and push visibility changes to the host.
    pub fn filter<H: HostSurface + ?Sized>(&mut self, host: &mut H, query: &str) {
        self.view.query = query.to_string();
        for index in apply_filter(&mut self.view.entries, query) {
            let visible = self.view.entries[index].visible;
            host.set_entry_visible(index, visible);
        }
    }

    /// Clear every mark and remove the overlay from the document.
    pub fn teardown<H: HostSurface + ?Sized>(mut self, host: &mut H) -> Vec<Target> {
        let released = self.highlights.clear(host);
        host.unmount_overlay();
        released
    }
}

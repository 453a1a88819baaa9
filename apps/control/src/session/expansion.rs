//! Expansion coordinator: at most one application row is expanded.

use parking_lot::Mutex;

use crate::models::ApplicationId;

/// Outcome of a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// The row is now expanded; `previous` was collapsed to make room.
    Expanded { previous: Option<ApplicationId> },
    Collapsed,
}

#[derive(Default)]
pub struct ExpansionCoordinator {
    expanded: Mutex<Option<ApplicationId>>,
}

impl ExpansionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expanded(&self) -> Option<ApplicationId> {
        *self.expanded.lock()
    }

    pub fn is_expanded(&self, id: ApplicationId) -> bool {
        self.expanded() == Some(id)
    }

    /// Collapses `id` if it is the expanded row, otherwise expands it.
    pub fn toggle(&self, id: ApplicationId) -> Toggle {
        let mut expanded = self.expanded.lock();
        if *expanded == Some(id) {
            *expanded = None;
            Toggle::Collapsed
        } else {
            let previous = expanded.replace(id);
            Toggle::Expanded { previous }
        }
    }

    pub fn reset(&self) {
        *self.expanded.lock() = None;
    }
}

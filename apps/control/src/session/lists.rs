//! List pages: the last successfully fetched list plus a page-level banner.
//!
//! A reload claims a ticket before fetching. Reset bumps the epoch, so a
//! fetch that was in flight at teardown lands nowhere.

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::pipeline_client::PipelineError;

#[derive(Debug, Clone, Serialize)]
pub struct ListView<T> {
    pub items: Vec<T>,
    /// False until the first load attempt finishes.
    pub loaded: bool,
    pub banner: Option<String>,
}

/// Taken by `ListPage::begin` before the fetch starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListTicket {
    epoch: u64,
}

struct ListInner<T> {
    items: Vec<T>,
    loaded: bool,
    banner: Option<String>,
    epoch: u64,
}

pub struct ListPage<T> {
    name: &'static str,
    inner: Mutex<ListInner<T>>,
}

impl<T: Clone> ListPage<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: Mutex::new(ListInner {
                items: Vec::new(),
                loaded: false,
                banner: None,
                epoch: 0,
            }),
        }
    }

    pub fn banner_text(&self) -> String {
        format!("Failed to load {}. Please try again.", self.name)
    }

    pub fn begin(&self) -> ListTicket {
        ListTicket {
            epoch: self.inner.lock().epoch,
        }
    }

    /// Applies a fetch result. A failure keeps the previous items. Returns
    /// `None` when the page was reset after the ticket was taken.
    pub fn apply(
        &self,
        ticket: ListTicket,
        result: Result<Vec<T>, PipelineError>,
    ) -> Option<ListView<T>> {
        let banner = self.banner_text();
        let mut inner = self.inner.lock();
        if inner.epoch != ticket.epoch {
            debug!("Dropping {} fetched before reset", self.name);
            return None;
        }
        inner.loaded = true;
        match result {
            Ok(items) => {
                info!("Loaded {} {}", items.len(), self.name);
                inner.items = items;
                inner.banner = None;
            }
            Err(e) => {
                warn!("Failed to load {}: {e}", self.name);
                inner.banner = Some(banner);
            }
        }
        Some(Self::view_of(&inner))
    }

    pub fn view(&self) -> ListView<T> {
        Self::view_of(&self.inner.lock())
    }

    pub fn is_loaded(&self) -> bool {
        self.inner.lock().loaded
    }

    pub fn items(&self) -> Vec<T> {
        self.inner.lock().items.clone()
    }

    pub fn find(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
        self.inner.lock().items.iter().find(|item| pred(item)).cloned()
    }

    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        inner.items.clear();
        inner.loaded = false;
        inner.banner = None;
        inner.epoch += 1;
    }

    fn view_of(inner: &ListInner<T>) -> ListView<T> {
        ListView {
            items: inner.items.clone(),
            loaded: inner.loaded,
            banner: inner.banner.clone(),
        }
    }
}

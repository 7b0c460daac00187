//! Filter and search layer
//!
//! Free-text matching is case-insensitive substring: sites on name or group,
//! metrics on name or category, users on name or email. Filtering always
//! recomputes from the full entity list; the debounced `SearchFeed` only
//! delays when downstream consumers are notified of a term change.

use std::time::Duration;
use tokio::sync::watch;

use crate::debounce::Debouncer;
use crate::model::{Metric, Site, User};
use crate::store::Entity;

/// Sites matching a free-text term on name or group
///
/// An empty term returns the full list.
pub fn filter_sites<'a>(sites: &'a [Site], term: &str) -> Vec<&'a Site> {
    if term.is_empty() {
        return sites.iter().collect();
    }
    let term = term.to_lowercase();
    sites
        .iter()
        .filter(|s| {
            s.name.to_lowercase().contains(&term) || s.group.to_lowercase().contains(&term)
        })
        .collect()
}

/// Metrics matching a free-text term on name or category
pub fn filter_metrics<'a>(metrics: &'a [Metric], term: &str) -> Vec<&'a Metric> {
    if term.is_empty() {
        return metrics.iter().collect();
    }
    let term = term.to_lowercase();
    metrics
        .iter()
        .filter(|m| {
            m.name.to_lowercase().contains(&term) || m.category.to_lowercase().contains(&term)
        })
        .collect()
}

/// Users matching a free-text term on name or email
pub fn filter_users<'a>(users: &'a [User], term: &str) -> Vec<&'a User> {
    if term.is_empty() {
        return users.iter().collect();
    }
    let term = term.to_lowercase();
    users
        .iter()
        .filter(|u| {
            u.name.to_lowercase().contains(&term) || u.email.to_lowercase().contains(&term)
        })
        .collect()
}

/// A named one-click predicate over sites (quick-filter chip)
#[derive(Debug, Clone, Copy)]
pub struct SiteQuickFilter {
    pub id: &'static str,
    pub label: &'static str,
    matches: fn(&Site) -> bool,
}

impl SiteQuickFilter {
    /// Member sites of this quick filter, input order preserved
    pub fn members<'a>(&self, sites: &'a [Site]) -> Vec<&'a Site> {
        sites.iter().filter(|s| (self.matches)(s)).collect()
    }
}

/// The quick-filter chips offered for sites
pub fn site_quick_filters() -> Vec<SiteQuickFilter> {
    vec![
        SiteQuickFilter {
            id: "north-region",
            label: "North Region",
            matches: |site| site.group == "North Region",
        },
        SiteQuickFilter {
            id: "south-region",
            label: "South Region",
            matches: |site| site.group == "South Region",
        },
        SiteQuickFilter {
            id: "offices",
            label: "Office Sites",
            matches: |site| site.name.contains("Office"),
        },
        SiteQuickFilter {
            id: "warehouses",
            label: "Warehouses",
            matches: |site| site.name.contains("Warehouse"),
        },
    ]
}

/// An ordered multi-selection with identity by id
#[derive(Debug, Clone)]
pub struct Selection<T: Entity + Clone> {
    items: Vec<T>,
}

impl<T: Entity + Clone> Default for Selection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity + Clone> Selection<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|i| i.id() == id)
    }

    /// Toggle a single item in or out of the selection
    pub fn toggle(&mut self, item: &T) {
        if self.contains(item.id()) {
            self.items.retain(|i| i.id() != item.id());
        } else {
            self.items.push(item.clone());
        }
    }

    /// Idempotent group toggle
    ///
    /// If every member is already selected, remove exactly the members;
    /// otherwise add the full member set, skipping ids already present.
    pub fn toggle_group(&mut self, members: &[&T]) {
        if self.is_group_selected(members) {
            self.items
                .retain(|i| !members.iter().any(|m| m.id() == i.id()));
        } else {
            for member in members {
                if !self.contains(member.id()) {
                    self.items.push((*member).clone());
                }
            }
        }
    }

    /// True when the member set is non-empty and fully contained in the
    /// selection
    pub fn is_group_selected(&self, members: &[&T]) -> bool {
        !members.is_empty() && members.iter().all(|m| self.contains(m.id()))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Debounced search-term publisher
///
/// Term changes settle for the debounce window before being published on the
/// watch channel; a later change inside the window supersedes the pending
/// one (last-write-wins).
pub struct SearchFeed {
    debouncer: Debouncer,
    tx: watch::Sender<String>,
}

impl SearchFeed {
    pub fn new(window: Duration) -> (Self, watch::Receiver<String>) {
        let (tx, rx) = watch::channel(String::new());
        (
            Self {
                debouncer: Debouncer::new(window),
                tx,
            },
            rx,
        )
    }

    /// Record a term change; subscribers see it once the window settles
    pub fn set_term(&mut self, term: impl Into<String>) {
        let term = term.into();
        let tx = self.tx.clone();
        self.debouncer.call(move || {
            let _ = tx.send(term);
        });
    }
}

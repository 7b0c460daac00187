//! In-memory entity store
//!
//! Each collection sits behind a small repository type so the storage
//! mechanism stays swappable without touching the assignment logic. Lookups
//! are linear scans that return `None` on a miss, never an error.

use crate::model::{Assignment, Metric, Site, User};

/// A record with a string identity
pub trait Entity {
    fn id(&self) -> &str;
}

impl Entity for Site {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for User {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Metric {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Assignment {
    fn id(&self) -> &str {
        &self.id
    }
}

/// In-memory record collection preserving insertion order
#[derive(Debug, Clone)]
pub struct MemoryRepository<T: Entity> {
    records: Vec<T>,
}

impl<T: Entity> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> MemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub fn with_records(records: Vec<T>) -> Self {
        Self { records }
    }

    /// Append a record
    pub fn insert(&mut self, record: T) {
        self.records.push(record);
    }

    /// Find a record by id; `None` when absent
    pub fn find(&self, id: &str) -> Option<&T> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// Remove the record with the given id
    ///
    /// Returns `false` when no matching id existed (not-found is a signal,
    /// not an error).
    pub fn remove(&mut self, id: &str) -> bool {
        match self.records.iter().position(|r| r.id() == id) {
            Some(index) => {
                self.records.remove(index);
                true
            }
            None => false,
        }
    }

    /// All records in insertion order
    pub fn all(&self) -> &[T] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

/// The four entity collections backing the console
///
/// Sites, users and metrics are immutable after generation; the assignment
/// collection is the only mutable one. All mutation happens on the single
/// task that owns the store, so no locking is needed.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    pub sites: MemoryRepository<Site>,
    pub users: MemoryRepository<User>,
    pub metrics: MemoryRepository<Metric>,
    pub assignments: MemoryRepository<Assignment>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn site_by_id(&self, site_id: &str) -> Option<&Site> {
        self.sites.find(site_id)
    }

    pub fn user_by_id(&self, user_id: &str) -> Option<&User> {
        self.users.find(user_id)
    }

    pub fn metric_by_id(&self, metric_id: &str) -> Option<&Metric> {
        self.metrics.find(metric_id)
    }

    /// Distinct metric categories in first-occurrence order
    pub fn metric_categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = Vec::new();
        for metric in self.metrics.all() {
            if !categories.iter().any(|c| c == &metric.category) {
                categories.push(metric.category.clone());
            }
        }
        categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(id: &str, name: &str) -> Site {
        Site {
            id: id.to_string(),
            name: name.to_string(),
            group: "North Region".to_string(),
            region: "North Region".to_string(),
        }
    }

    #[test]
    fn test_find_returns_none_on_miss() {
        let repo = MemoryRepository::with_records(vec![site("site-001", "Warehouse 1")]);
        assert!(repo.find("site-001").is_some());
        assert!(repo.find("site-999").is_none());
    }

    #[test]
    fn test_remove_by_id() {
        let mut repo = MemoryRepository::with_records(vec![
            site("site-001", "Warehouse 1"),
            site("site-002", "Office 2"),
        ]);
        assert!(repo.remove("site-001"));
        assert_eq!(repo.len(), 1);
        assert!(repo.find("site-001").is_none());
        // Second removal of the same id signals not-found
        assert!(!repo.remove("site-001"));
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut repo = MemoryRepository::new();
        repo.insert(site("site-002", "Office 2"));
        repo.insert(site("site-001", "Warehouse 1"));
        let ids: Vec<&str> = repo.all().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["site-002", "site-001"]);
    }

    #[test]
    fn test_metric_categories_first_occurrence_order() {
        let mut store = EntityStore::new();
        for (id, category) in [
            ("metric-001", "Water"),
            ("metric-002", "Energy"),
            ("metric-003", "Water"),
            ("metric-004", "Governance"),
        ] {
            store.metrics.insert(Metric {
                id: id.to_string(),
                name: id.to_string(),
                category: category.to_string(),
            });
        }
        assert_eq!(
            store.metric_categories(),
            vec!["Water", "Energy", "Governance"]
        );
    }
}

//! Assignment index operations
//!
//! All queries are linear scans over the assignment collection and return
//! matches in collection order. Duplicate creation and not-found removal are
//! benign signals (`None` / `false`), not errors. Audit events go to the
//! `audit` tracing target; they are log-only, never stored.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::model::Assignment;
use crate::store::EntityStore;

impl EntityStore {
    /// Assignments for a (site, metric) pair, collection order preserved
    pub fn assignments_for_site_metric(&self, site_id: &str, metric_id: &str) -> Vec<&Assignment> {
        self.assignments
            .all()
            .iter()
            .filter(|a| a.site_id == site_id && a.metric_id == metric_id)
            .collect()
    }

    /// All assignments held by a user
    pub fn assignments_for_user(&self, user_id: &str) -> Vec<&Assignment> {
        self.assignments
            .all()
            .iter()
            .filter(|a| a.user_id == user_id)
            .collect()
    }

    /// All assignments at a site
    pub fn assignments_for_site(&self, site_id: &str) -> Vec<&Assignment> {
        self.assignments
            .all()
            .iter()
            .filter(|a| a.site_id == site_id)
            .collect()
    }

    /// All assignments of a metric
    pub fn assignments_for_metric(&self, metric_id: &str) -> Vec<&Assignment> {
        self.assignments
            .all()
            .iter()
            .filter(|a| a.metric_id == metric_id)
            .collect()
    }

    /// Linear existence check for a (user, site, metric) triple
    pub fn assignment_exists(&self, user_id: &str, site_id: &str, metric_id: &str) -> bool {
        self.assignments
            .all()
            .iter()
            .any(|a| a.user_id == user_id && a.site_id == site_id && a.metric_id == metric_id)
    }

    /// Number of users assigned to a (site, metric) pair
    pub fn user_count_for_site_metric(&self, site_id: &str, metric_id: &str) -> usize {
        self.assignments_for_site_metric(site_id, metric_id).len()
    }

    /// Create an assignment unless the triple already exists
    ///
    /// Returns `None` on a duplicate triple (benign no-op). Otherwise appends
    /// a record with a fresh id and the current timestamp and returns a copy.
    pub fn create_assignment(
        &mut self,
        user_id: &str,
        site_id: &str,
        metric_id: &str,
    ) -> Option<Assignment> {
        if self.assignment_exists(user_id, site_id, metric_id) {
            return None;
        }

        let assignment = Assignment {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            site_id: site_id.to_string(),
            metric_id: metric_id.to_string(),
            created_at: Utc::now(),
        };

        info!(
            target: "audit",
            user_id, site_id, metric_id,
            "assignment created"
        );

        self.assignments.insert(assignment.clone());
        Some(assignment)
    }

    /// Remove an assignment by id
    ///
    /// Returns `false` when no matching id existed.
    pub fn remove_assignment(&mut self, assignment_id: &str) -> bool {
        let removed = self.assignments.remove(assignment_id);
        if removed {
            info!(target: "audit", assignment_id, "assignment removed");
        }
        removed
    }

    /// Assign every user to every (site, metric) pair in the product
    ///
    /// Existing triples are skipped. Returns the number of assignments
    /// actually created.
    pub fn bulk_assign(
        &mut self,
        user_ids: &[String],
        site_ids: &[String],
        metric_ids: &[String],
    ) -> usize {
        let mut created = 0;
        for site_id in site_ids {
            for metric_id in metric_ids {
                for user_id in user_ids {
                    if self.create_assignment(user_id, site_id, metric_id).is_some() {
                        created += 1;
                    }
                }
            }
        }
        created
    }

    /// Remove every assignment matching any (site, metric) pair in the product,
    /// regardless of which user holds it
    ///
    /// Destructive and irreversible; callers must confirm before invoking.
    /// Returns the number of assignments removed.
    pub fn bulk_remove(&mut self, site_ids: &[String], metric_ids: &[String]) -> usize {
        let mut removed = 0;
        for site_id in site_ids {
            for metric_id in metric_ids {
                let ids: Vec<String> = self
                    .assignments_for_site_metric(site_id, metric_id)
                    .iter()
                    .map(|a| a.id.clone())
                    .collect();
                for id in ids {
                    if self.remove_assignment(&id) {
                        removed += 1;
                    }
                }
            }
        }
        removed
    }

    /// Replace a user's full set of (site, metric) responsibilities
    ///
    /// Computes an explicit diff against the user's current assignments and
    /// applies additions and removals, rather than deleting everything and
    /// recreating. Pairs present on both sides are left untouched. Returns
    /// `(added, removed)` counts.
    pub fn replace_user_assignments(
        &mut self,
        user_id: &str,
        pairs: &[(String, String)],
    ) -> (usize, usize) {
        let current: Vec<(String, String, String)> = self
            .assignments_for_user(user_id)
            .iter()
            .map(|a| (a.site_id.clone(), a.metric_id.clone(), a.id.clone()))
            .collect();

        let to_remove: Vec<String> = current
            .iter()
            .filter(|(site_id, metric_id, _)| {
                !pairs.iter().any(|(s, m)| s == site_id && m == metric_id)
            })
            .map(|(_, _, id)| id.clone())
            .collect();

        let to_add: Vec<&(String, String)> = pairs
            .iter()
            .filter(|(s, m)| !current.iter().any(|(site, metric, _)| site == s && metric == m))
            .collect();

        let mut added = 0;
        for (site_id, metric_id) in to_add {
            if self.create_assignment(user_id, site_id, metric_id).is_some() {
                added += 1;
            }
        }

        let mut removed = 0;
        for id in to_remove {
            if self.remove_assignment(&id) {
                removed += 1;
            }
        }

        info!(
            target: "audit",
            user_id, added, removed,
            "user assignment set replaced"
        );

        (added, removed)
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{Metric, Site, User};
    use crate::store::EntityStore;

    fn fixture_store() -> EntityStore {
        let mut store = EntityStore::new();
        for i in 1..=3 {
            store.sites.insert(Site {
                id: format!("site-00{i}"),
                name: format!("Warehouse {i}"),
                group: "North Region".to_string(),
                region: "North Region".to_string(),
            });
        }
        for i in 1..=2 {
            store.users.insert(User {
                id: format!("user-00{i}"),
                name: format!("User {i}"),
                email: format!("user{i}@company.com"),
            });
        }
        for i in 1..=2 {
            store.metrics.insert(Metric {
                id: format!("metric-00{i}"),
                name: format!("Metric {i}"),
                category: "Energy".to_string(),
            });
        }
        store
    }

    #[test]
    fn test_create_is_idempotent_by_triple() {
        let mut store = fixture_store();
        let first = store.create_assignment("user-001", "site-001", "metric-001");
        assert!(first.is_some());

        // Second creation of the same triple is a benign no-op
        let second = store.create_assignment("user-001", "site-001", "metric-001");
        assert!(second.is_none());
        assert_eq!(store.assignments.len(), 1);
    }

    #[test]
    fn test_remove_then_lookups_never_return_it() {
        let mut store = fixture_store();
        let a = store
            .create_assignment("user-001", "site-001", "metric-001")
            .unwrap();

        assert!(store.remove_assignment(&a.id));
        assert!(store
            .assignments_for_site_metric("site-001", "metric-001")
            .is_empty());
        assert!(store.assignments_for_user("user-001").is_empty());
        assert!(store.assignments_for_site("site-001").is_empty());
        assert!(store.assignments_for_metric("metric-001").is_empty());

        // Second removal with the same id returns false
        assert!(!store.remove_assignment(&a.id));
    }

    #[test]
    fn test_queries_preserve_collection_order() {
        let mut store = fixture_store();
        store.create_assignment("user-002", "site-001", "metric-001");
        store.create_assignment("user-001", "site-001", "metric-001");

        let matches = store.assignments_for_site_metric("site-001", "metric-001");
        let users: Vec<&str> = matches.iter().map(|a| a.user_id.as_str()).collect();
        assert_eq!(users, vec!["user-002", "user-001"]);
    }

    #[test]
    fn test_bulk_assign_full_product() {
        // 3 sites × 2 metrics × 2 users = 12 new assignments
        let mut store = fixture_store();
        let site_ids: Vec<String> = store.sites.all().iter().map(|s| s.id.clone()).collect();
        let metric_ids: Vec<String> = store.metrics.all().iter().map(|m| m.id.clone()).collect();
        let user_ids: Vec<String> = store.users.all().iter().map(|u| u.id.clone()).collect();

        let created = store.bulk_assign(&user_ids, &site_ids, &metric_ids);
        assert_eq!(created, 12);
        assert_eq!(store.assignments.len(), 12);

        // Repeating the bulk assignment creates nothing new
        assert_eq!(store.bulk_assign(&user_ids, &site_ids, &metric_ids), 0);
    }

    #[test]
    fn test_bulk_remove_exact_product() {
        let mut store = fixture_store();
        store.create_assignment("user-001", "site-001", "metric-001");
        store.create_assignment("user-002", "site-001", "metric-001");
        store.create_assignment("user-001", "site-002", "metric-002");
        store.create_assignment("user-001", "site-003", "metric-001");

        // Product {site-001} × {metric-001} matches the first two only
        let removed = store.bulk_remove(
            &["site-001".to_string()],
            &["metric-001".to_string()],
        );
        assert_eq!(removed, 2);
        assert_eq!(store.assignments.len(), 2);
        assert!(store.assignment_exists("user-001", "site-002", "metric-002"));
        assert!(store.assignment_exists("user-001", "site-003", "metric-001"));
    }

    #[test]
    fn test_replace_user_assignments_applies_diff() {
        let mut store = fixture_store();
        store.create_assignment("user-001", "site-001", "metric-001");
        store.create_assignment("user-001", "site-002", "metric-001");
        let kept_id = store
            .assignments_for_site_metric("site-001", "metric-001")[0]
            .id
            .clone();

        // Keep (site-001, metric-001), drop (site-002, metric-001),
        // add (site-003, metric-002)
        let pairs = vec![
            ("site-001".to_string(), "metric-001".to_string()),
            ("site-003".to_string(), "metric-002".to_string()),
        ];
        let (added, removed) = store.replace_user_assignments("user-001", &pairs);
        assert_eq!(added, 1);
        assert_eq!(removed, 1);

        // Untouched pair keeps its original record
        let survivors = store.assignments_for_user("user-001");
        assert_eq!(survivors.len(), 2);
        assert!(survivors.iter().any(|a| a.id == kept_id));
        assert!(store.assignment_exists("user-001", "site-003", "metric-002"));
        assert!(!store.assignment_exists("user-001", "site-002", "metric-001"));
    }

    #[test]
    fn test_replace_does_not_touch_other_users() {
        let mut store = fixture_store();
        store.create_assignment("user-002", "site-001", "metric-001");
        store.replace_user_assignments("user-001", &[]);
        assert!(store.assignment_exists("user-002", "site-001", "metric-001"));
    }
}

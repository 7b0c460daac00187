//! Matrix projection
//!
//! Derives the grid view from selected sites and metrics: rows are metrics
//! grouped by category (first-occurrence order), columns are sites, each
//! cell carrying the assignment count and resolved user list for its
//! (site, metric) pair. Row/column selection state is independent
//! bookkeeping layered on top of the projection.

use std::collections::HashSet;

use serde::Serialize;

use crate::model::{Metric, Site, User};
use crate::store::EntityStore;

/// One (metric, site) cell of the grid
#[derive(Debug, Clone, Serialize)]
pub struct MatrixCell {
    pub site_id: String,
    pub metric_id: String,
    pub user_count: usize,
    /// Assigned users in assignment order; dangling user ids are dropped
    pub users: Vec<User>,
}

/// One metric row with a cell per selected site
#[derive(Debug, Clone, Serialize)]
pub struct MatrixRow {
    pub metric: Metric,
    pub cells: Vec<MatrixCell>,
}

/// Metrics of one category, in input order
#[derive(Debug, Clone, Serialize)]
pub struct CategoryGroup {
    pub category: String,
    pub rows: Vec<MatrixRow>,
}

/// The projected grid
#[derive(Debug, Clone, Serialize)]
pub struct Matrix {
    pub sites: Vec<Site>,
    pub groups: Vec<CategoryGroup>,
}

/// Project the assignment grid for the given site and metric selections
pub fn project_matrix(
    store: &EntityStore,
    selected_sites: &[Site],
    selected_metrics: &[Metric],
) -> Matrix {
    let mut groups: Vec<CategoryGroup> = Vec::new();

    for metric in selected_metrics {
        let cells = selected_sites
            .iter()
            .map(|site| {
                let assignments = store.assignments_for_site_metric(&site.id, &metric.id);
                let users: Vec<User> = assignments
                    .iter()
                    .filter_map(|a| store.user_by_id(&a.user_id).cloned())
                    .collect();
                MatrixCell {
                    site_id: site.id.clone(),
                    metric_id: metric.id.clone(),
                    user_count: assignments.len(),
                    users,
                }
            })
            .collect();

        let row = MatrixRow {
            metric: metric.clone(),
            cells,
        };

        match groups.iter_mut().find(|g| g.category == metric.category) {
            Some(group) => group.rows.push(row),
            None => groups.push(CategoryGroup {
                category: metric.category.clone(),
                rows: vec![row],
            }),
        }
    }

    Matrix {
        sites: selected_sites.to_vec(),
        groups,
    }
}

/// Row/column selection over the projected grid
///
/// Two independent id sets. Bulk actions operate on their Cartesian product.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    site_ids: HashSet<String>,
    metric_ids: HashSet<String>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_site(&mut self, site_id: &str) {
        if !self.site_ids.remove(site_id) {
            self.site_ids.insert(site_id.to_string());
        }
    }

    pub fn toggle_metric(&mut self, metric_id: &str) {
        if !self.metric_ids.remove(metric_id) {
            self.metric_ids.insert(metric_id.to_string());
        }
    }

    /// Master toggle: if all sites AND all metrics are individually
    /// selected, clear both sets; otherwise select both full id sets
    pub fn toggle_all(&mut self, sites: &[Site], metrics: &[Metric]) {
        if self.all_selected(sites, metrics) {
            self.clear();
        } else {
            self.site_ids = sites.iter().map(|s| s.id.clone()).collect();
            self.metric_ids = metrics.iter().map(|m| m.id.clone()).collect();
        }
    }

    pub fn all_selected(&self, sites: &[Site], metrics: &[Metric]) -> bool {
        !sites.is_empty()
            && !metrics.is_empty()
            && self.site_ids.len() == sites.len()
            && self.metric_ids.len() == metrics.len()
    }

    pub fn site_selected(&self, site_id: &str) -> bool {
        self.site_ids.contains(site_id)
    }

    pub fn metric_selected(&self, metric_id: &str) -> bool {
        self.metric_ids.contains(metric_id)
    }

    pub fn site_ids(&self) -> Vec<String> {
        self.site_ids.iter().cloned().collect()
    }

    pub fn metric_ids(&self) -> Vec<String> {
        self.metric_ids.iter().cloned().collect()
    }

    pub fn has_selection(&self) -> bool {
        !self.site_ids.is_empty() || !self.metric_ids.is_empty()
    }

    /// Size of the Cartesian product the bulk actions would operate on
    pub fn combination_count(&self) -> usize {
        self.site_ids.len() * self.metric_ids.len()
    }

    pub fn clear(&mut self) {
        self.site_ids.clear();
        self.metric_ids.clear();
    }
}

//! Console command implementations
//!
//! Each command is a plain function over the entity store returning a
//! structured outcome; the binary decides how to render it (text or JSON)
//! and the integration tests call these directly.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use esg_core::csv::{self, ImportReport};
use esg_core::filter;
use esg_core::matrix::{project_matrix, Matrix};
use esg_core::{Assignment, EntityStore, Error, Metric, Result, Site, User};

use crate::pagination::calculate_pagination;

/// Resolve site selection specs to sites
///
/// Each spec is tried as an exact id, then as a quick-filter name, then as a
/// free-text search term. Results are deduplicated by id, input order
/// preserved.
pub fn resolve_sites(store: &EntityStore, specs: &[String]) -> Vec<Site> {
    let quick_filters = filter::site_quick_filters();
    let mut selected: Vec<Site> = Vec::new();

    for spec in specs {
        let matches: Vec<&Site> = if let Some(site) = store.site_by_id(spec) {
            vec![site]
        } else if let Some(qf) = quick_filters
            .iter()
            .find(|f| f.id.eq_ignore_ascii_case(spec) || f.label.eq_ignore_ascii_case(spec))
        {
            qf.members(store.sites.all())
        } else {
            filter::filter_sites(store.sites.all(), spec)
        };

        for site in matches {
            if !selected.iter().any(|s| s.id == site.id) {
                selected.push(site.clone());
            }
        }
    }
    selected
}

/// Resolve metric selection specs to metrics
///
/// Each spec is tried as an exact id, then as a category name (the category
/// chips), then as a free-text search term.
pub fn resolve_metrics(store: &EntityStore, specs: &[String]) -> Vec<Metric> {
    let categories = store.metric_categories();
    let mut selected: Vec<Metric> = Vec::new();

    for spec in specs {
        let matches: Vec<&Metric> = if let Some(metric) = store.metric_by_id(spec) {
            vec![metric]
        } else if let Some(category) = categories.iter().find(|c| c.eq_ignore_ascii_case(spec)) {
            store
                .metrics
                .all()
                .iter()
                .filter(|m| &m.category == category)
                .collect()
        } else {
            filter::filter_metrics(store.metrics.all(), spec)
        };

        for metric in matches {
            if !selected.iter().any(|m| m.id == metric.id) {
                selected.push(metric.clone());
            }
        }
    }
    selected
}

/// Resolve user specs (exact id or free-text search term)
pub fn resolve_users(store: &EntityStore, specs: &[String]) -> Vec<User> {
    let mut selected: Vec<User> = Vec::new();
    for spec in specs {
        let matches: Vec<&User> = if let Some(user) = store.user_by_id(spec) {
            vec![user]
        } else {
            filter::filter_users(store.users.all(), spec)
        };
        for user in matches {
            if !selected.iter().any(|u| u.id == user.id) {
                selected.push(user.clone());
            }
        }
    }
    selected
}

/// Outcome of `export`
#[derive(Debug, Serialize)]
pub struct ExportOutcome {
    pub path: PathBuf,
    pub rows: usize,
}

/// Write the assignment CSV to the given path, or to the data folder under
/// the default dated filename
pub fn cmd_export(
    store: &EntityStore,
    output: Option<PathBuf>,
    data_dir: &Path,
) -> Result<ExportOutcome> {
    let path = match output {
        Some(path) => path,
        None => {
            std::fs::create_dir_all(data_dir)?;
            data_dir.join(csv::export_filename(Utc::now().date_naive()))
        }
    };

    let content = csv::export_assignments(store);
    std::fs::write(&path, content)?;

    let rows = store.assignments.len();
    info!(path = %path.display(), rows, "exported assignments to CSV");
    Ok(ExportOutcome { path, rows })
}

/// Read a CSV file and import its rows
///
/// The file read is the only asynchronous boundary; parsing then runs
/// synchronously to completion with no cancellation.
pub async fn cmd_import(store: &mut EntityStore, path: &Path) -> Result<ImportReport> {
    let text = tokio::fs::read_to_string(path).await?;
    csv::import_assignments(store, &text)
}

/// Project the matrix for the given selection specs
pub fn cmd_matrix(
    store: &EntityStore,
    site_specs: &[String],
    metric_specs: &[String],
) -> Matrix {
    let sites = resolve_sites(store, site_specs);
    let metrics = resolve_metrics(store, metric_specs);
    project_matrix(store, &sites, &metrics)
}

/// Results of a `search` command
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchResults {
    Sites(Vec<Site>),
    Metrics(Vec<Metric>),
    Users(Vec<User>),
}

impl SearchResults {
    pub fn len(&self) -> usize {
        match self {
            SearchResults::Sites(v) => v.len(),
            SearchResults::Metrics(v) => v.len(),
            SearchResults::Users(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Push a search term through the debounced feed and wait for it to settle
///
/// Matches are recomputed only after the configured window elapses with no
/// newer term; the console funnels its one-shot term through the same path.
pub async fn settle_search_term(term: impl Into<String>, window: Duration) -> String {
    let (mut feed, mut terms) = filter::SearchFeed::new(window);
    feed.set_term(term);
    let _ = terms.changed().await;
    let settled = terms.borrow().clone();
    settled
}

pub fn cmd_search_sites(store: &EntityStore, term: &str) -> SearchResults {
    SearchResults::Sites(
        filter::filter_sites(store.sites.all(), term)
            .into_iter()
            .cloned()
            .collect(),
    )
}

pub fn cmd_search_metrics(store: &EntityStore, term: &str) -> SearchResults {
    SearchResults::Metrics(
        filter::filter_metrics(store.metrics.all(), term)
            .into_iter()
            .cloned()
            .collect(),
    )
}

pub fn cmd_search_users(store: &EntityStore, term: &str) -> SearchResults {
    SearchResults::Users(
        filter::filter_users(store.users.all(), term)
            .into_iter()
            .cloned()
            .collect(),
    )
}

/// Filters for the assignment review listing
#[derive(Debug, Clone, Default)]
pub struct ListFilters {
    /// Free-text term matched against the assigned user's name or email
    pub user_search: Option<String>,
    pub site_ids: Vec<String>,
    pub metric_ids: Vec<String>,
}

/// One row of the review listing with display fields resolved
#[derive(Debug, Serialize)]
pub struct ListRow {
    pub assignment_id: String,
    pub user_name: String,
    pub site_name: String,
    pub metric_name: String,
    pub created_at: DateTime<Utc>,
}

/// One page of the review listing
#[derive(Debug, Serialize)]
pub struct ListPage {
    pub rows: Vec<ListRow>,
    pub page: i64,
    pub total_pages: i64,
    pub total_rows: i64,
    pub page_size: i64,
}

/// Paginated assignment review listing
///
/// A user-search term drops assignments whose user id fails lookup; without
/// one, dangling references render blank display fields.
pub fn cmd_list(
    store: &EntityStore,
    filters: &ListFilters,
    page: i64,
    page_size: i64,
) -> ListPage {
    let assignments: Vec<&Assignment> = store
        .assignments
        .all()
        .iter()
        .filter(|a| {
            if let Some(term) = &filters.user_search {
                let term = term.to_lowercase();
                match store.user_by_id(&a.user_id) {
                    Some(user) => {
                        user.name.to_lowercase().contains(&term)
                            || user.email.to_lowercase().contains(&term)
                    }
                    None => false,
                }
            } else {
                true
            }
        })
        .filter(|a| filters.site_ids.is_empty() || filters.site_ids.contains(&a.site_id))
        .filter(|a| filters.metric_ids.is_empty() || filters.metric_ids.contains(&a.metric_id))
        .collect();

    let total_rows = assignments.len() as i64;
    let p = calculate_pagination(total_rows, page, page_size);

    let rows = assignments
        .iter()
        .skip(p.offset as usize)
        .take(page_size as usize)
        .map(|a| ListRow {
            assignment_id: a.id.clone(),
            user_name: store
                .user_by_id(&a.user_id)
                .map(|u| u.name.clone())
                .unwrap_or_default(),
            site_name: store
                .site_by_id(&a.site_id)
                .map(|s| s.name.clone())
                .unwrap_or_default(),
            metric_name: store
                .metric_by_id(&a.metric_id)
                .map(|m| m.name.clone())
                .unwrap_or_default(),
            created_at: a.created_at,
        })
        .collect();

    ListPage {
        rows,
        page: p.page,
        total_pages: p.total_pages,
        total_rows,
        page_size,
    }
}

/// Outcome of a single `assign`
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignOutcome {
    Created(Assignment),
    /// The triple already existed; a benign no-op
    Duplicate,
}

/// Create one assignment after validating all three ids resolve
pub fn cmd_assign(
    store: &mut EntityStore,
    user_id: &str,
    site_id: &str,
    metric_id: &str,
) -> Result<AssignOutcome> {
    if store.user_by_id(user_id).is_none() {
        return Err(Error::NotFound(format!("User ID \"{user_id}\"")));
    }
    if store.site_by_id(site_id).is_none() {
        return Err(Error::NotFound(format!("Site ID \"{site_id}\"")));
    }
    if store.metric_by_id(metric_id).is_none() {
        return Err(Error::NotFound(format!("Metric ID \"{metric_id}\"")));
    }

    match store.create_assignment(user_id, site_id, metric_id) {
        Some(assignment) => Ok(AssignOutcome::Created(assignment)),
        None => Ok(AssignOutcome::Duplicate),
    }
}

/// Remove one assignment; `false` signals not-found
pub fn cmd_unassign(store: &mut EntityStore, assignment_id: &str) -> bool {
    store.remove_assignment(assignment_id)
}

/// Outcome of `bulk-assign`
#[derive(Debug, Serialize)]
pub struct BulkAssignOutcome {
    pub users: usize,
    pub sites: usize,
    pub metrics: usize,
    pub combinations: usize,
    pub created: usize,
}

pub fn cmd_bulk_assign(
    store: &mut EntityStore,
    user_specs: &[String],
    site_specs: &[String],
    metric_specs: &[String],
) -> Result<BulkAssignOutcome> {
    let users = resolve_users(store, user_specs);
    let sites = resolve_sites(store, site_specs);
    let metrics = resolve_metrics(store, metric_specs);

    if users.is_empty() || sites.is_empty() || metrics.is_empty() {
        return Err(Error::InvalidInput(
            "bulk-assign requires at least one matching user, site, and metric".to_string(),
        ));
    }

    let user_ids: Vec<String> = users.iter().map(|u| u.id.clone()).collect();
    let site_ids: Vec<String> = sites.iter().map(|s| s.id.clone()).collect();
    let metric_ids: Vec<String> = metrics.iter().map(|m| m.id.clone()).collect();

    let created = store.bulk_assign(&user_ids, &site_ids, &metric_ids);
    Ok(BulkAssignOutcome {
        users: users.len(),
        sites: sites.len(),
        metrics: metrics.len(),
        combinations: sites.len() * metrics.len(),
        created,
    })
}

/// What a `bulk-remove` would delete, shown before confirmation
#[derive(Debug, Serialize)]
pub struct BulkRemovePreview {
    pub sites: usize,
    pub metrics: usize,
    pub combinations: usize,
    pub assignments: usize,
}

pub fn cmd_bulk_remove_preview(
    store: &EntityStore,
    sites: &[Site],
    metrics: &[Metric],
) -> BulkRemovePreview {
    let assignments = sites
        .iter()
        .flat_map(|s| {
            metrics
                .iter()
                .map(|m| store.user_count_for_site_metric(&s.id, &m.id))
        })
        .sum();

    BulkRemovePreview {
        sites: sites.len(),
        metrics: metrics.len(),
        combinations: sites.len() * metrics.len(),
        assignments,
    }
}

/// Execute a confirmed bulk removal; returns the number removed
pub fn cmd_bulk_remove(store: &mut EntityStore, sites: &[Site], metrics: &[Metric]) -> usize {
    let site_ids: Vec<String> = sites.iter().map(|s| s.id.clone()).collect();
    let metric_ids: Vec<String> = metrics.iter().map(|m| m.id.clone()).collect();
    store.bulk_remove(&site_ids, &metric_ids)
}

/// Dashboard-style summary
#[derive(Debug, Serialize)]
pub struct StatsSummary {
    pub sites: usize,
    pub users: usize,
    pub metrics: usize,
    pub assignments: usize,
    /// Assignment counts per metric category, catalog order
    pub assignments_per_category: Vec<CategoryCount>,
    pub sites_without_assignments: usize,
    pub users_without_assignments: usize,
}

#[derive(Debug, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

pub fn cmd_stats(store: &EntityStore) -> StatsSummary {
    let assignments_per_category = store
        .metric_categories()
        .into_iter()
        .map(|category| {
            let count = store
                .assignments
                .all()
                .iter()
                .filter(|a| {
                    store
                        .metric_by_id(&a.metric_id)
                        .map(|m| m.category == category)
                        .unwrap_or(false)
                })
                .count();
            CategoryCount { category, count }
        })
        .collect();

    let sites_without_assignments = store
        .sites
        .all()
        .iter()
        .filter(|s| store.assignments_for_site(&s.id).is_empty())
        .count();

    let users_without_assignments = store
        .users
        .all()
        .iter()
        .filter(|u| store.assignments_for_user(&u.id).is_empty())
        .count();

    StatsSummary {
        sites: store.sites.len(),
        users: store.users.len(),
        metrics: store.metrics.len(),
        assignments: store.assignments.len(),
        assignments_per_category,
        sites_without_assignments,
        users_without_assignments,
    }
}

//! Text rendering for console output

use esg_core::csv::ImportReport;
use esg_core::matrix::Matrix;

use crate::commands::{ListPage, SearchResults, StatsSummary};

/// Render the assignment matrix as a text grid
///
/// Rows are metrics grouped by category, columns are sites, cells show the
/// assigned user count for the pair.
pub fn render_matrix(matrix: &Matrix) -> String {
    if matrix.sites.is_empty() || matrix.groups.is_empty() {
        return "No sites and metrics selected. Select sites and metrics to begin.".to_string();
    }

    let metric_width = matrix
        .groups
        .iter()
        .flat_map(|g| g.rows.iter())
        .map(|r| r.metric.name.len())
        .max()
        .unwrap_or(0)
        .max("Metric".len());

    let site_widths: Vec<usize> = matrix.sites.iter().map(|s| s.name.len().max(3)).collect();

    let mut out = String::new();

    out.push_str(&format!("{:<metric_width$}", "Metric"));
    for (site, width) in matrix.sites.iter().zip(site_widths.iter().copied()) {
        out.push_str(&format!(" | {:>width$}", site.name));
    }
    out.push('\n');

    let total_width =
        metric_width + site_widths.iter().map(|w| w + 3).sum::<usize>();
    out.push_str(&"-".repeat(total_width));
    out.push('\n');

    for group in &matrix.groups {
        out.push_str(&format!("[{}]\n", group.category));
        for row in &group.rows {
            out.push_str(&format!("{:<metric_width$}", row.metric.name));
            for (cell, width) in row.cells.iter().zip(site_widths.iter().copied()) {
                out.push_str(&format!(" | {:>width$}", cell.user_count));
            }
            out.push('\n');
        }
    }

    out
}

pub fn render_search(results: &SearchResults) -> String {
    if results.is_empty() {
        return "No matches found.".to_string();
    }

    let mut out = String::new();
    match results {
        SearchResults::Sites(sites) => {
            for site in sites {
                out.push_str(&format!("{}  {} ({})\n", site.id, site.name, site.group));
            }
        }
        SearchResults::Metrics(metrics) => {
            for metric in metrics {
                out.push_str(&format!(
                    "{}  {} [{}]\n",
                    metric.id, metric.name, metric.category
                ));
            }
        }
        SearchResults::Users(users) => {
            for user in users {
                out.push_str(&format!("{}  {} <{}>\n", user.id, user.name, user.email));
            }
        }
    }
    out.push_str(&format!("{} match(es)", results.len()));
    out
}

pub fn render_list(page: &ListPage) -> String {
    let mut out = String::new();
    for row in &page.rows {
        out.push_str(&format!(
            "{}  {:<24} {:<24} {:<40} {}\n",
            row.assignment_id,
            row.user_name,
            row.site_name,
            row.metric_name,
            row.created_at.format("%Y-%m-%d %H:%M"),
        ));
    }
    out.push_str(&format!(
        "Page {} of {} ({} assignment(s))",
        page.page,
        page.total_pages.max(1),
        page.total_rows
    ));
    out
}

pub fn render_stats(stats: &StatsSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Sites: {}  Users: {}  Metrics: {}  Assignments: {}\n",
        stats.sites, stats.users, stats.metrics, stats.assignments
    ));
    out.push_str("Assignments per category:\n");
    for entry in &stats.assignments_per_category {
        out.push_str(&format!("  {:<12} {}\n", entry.category, entry.count));
    }
    out.push_str(&format!(
        "Sites without assignments: {}\nUsers without assignments: {}",
        stats.sites_without_assignments, stats.users_without_assignments
    ));
    out
}

/// Summarize an import the way the console surfaces it: aggregate counts
/// only, individual row errors go to the log
pub fn render_import_report(report: &ImportReport) -> String {
    if report.failed > 0 {
        format!(
            "Import completed with errors: {} successful, {} failed. Check the log for details.",
            report.succeeded, report.failed
        )
    } else if report.succeeded > 0 {
        format!(
            "Successfully imported {} assignment{}",
            report.succeeded,
            if report.succeeded != 1 { "s" } else { "" }
        )
    } else {
        "No assignments were imported".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_import_report_variants() {
        let ok = ImportReport {
            succeeded: 2,
            failed: 0,
            errors: vec![],
        };
        assert_eq!(render_import_report(&ok), "Successfully imported 2 assignments");

        let one = ImportReport {
            succeeded: 1,
            failed: 0,
            errors: vec![],
        };
        assert_eq!(render_import_report(&one), "Successfully imported 1 assignment");

        let mixed = ImportReport {
            succeeded: 1,
            failed: 2,
            errors: vec!["Row 2: bad".to_string(), "Row 3: bad".to_string()],
        };
        assert!(render_import_report(&mixed).contains("1 successful, 2 failed"));

        let empty = ImportReport::default();
        assert_eq!(render_import_report(&empty), "No assignments were imported");
    }
}

//! CSV import and export for assignments
//!
//! Export writes a fixed 9-column blob with every field double-quoted, one
//! row per assignment in collection order, display names resolved at write
//! time. Import locates the three required id columns by case-insensitive
//! header substring, validates each data row independently, and treats
//! duplicate creations as success. Embedded double quotes are escaped as
//! `""` on export and collapsed on import so a round-trip preserves every
//! field; embedded newlines are not supported.

use chrono::{NaiveDate, SecondsFormat};
use serde::Serialize;
use tracing::warn;

use crate::error::{Error, Result};
use crate::store::EntityStore;

/// Fixed export header, exact column order
pub const EXPORT_HEADER: [&str; 9] = [
    "User ID",
    "User Name",
    "User Email",
    "Site ID",
    "Site Name",
    "Metric ID",
    "Metric Name",
    "Metric Category",
    "Created At",
];

/// Quote a field, escaping embedded double quotes
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Serialize every assignment to CSV text
///
/// Unresolvable user/site/metric ids render their display fields empty; the
/// raw ids are still emitted.
pub fn export_assignments(store: &EntityStore) -> String {
    let mut lines = Vec::with_capacity(store.assignments.len() + 1);
    lines.push(EXPORT_HEADER.join(","));

    for assignment in store.assignments.all() {
        let user = store.user_by_id(&assignment.user_id);
        let site = store.site_by_id(&assignment.site_id);
        let metric = store.metric_by_id(&assignment.metric_id);

        let fields = [
            assignment.user_id.clone(),
            user.map(|u| u.name.clone()).unwrap_or_default(),
            user.map(|u| u.email.clone()).unwrap_or_default(),
            assignment.site_id.clone(),
            site.map(|s| s.name.clone()).unwrap_or_default(),
            assignment.metric_id.clone(),
            metric.map(|m| m.name.clone()).unwrap_or_default(),
            metric.map(|m| m.category.clone()).unwrap_or_default(),
            assignment
                .created_at
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        ];

        let row: Vec<String> = fields.iter().map(|f| quote(f)).collect();
        lines.push(row.join(","));
    }

    lines.join("\n")
}

/// Default export filename for a given date: `esg-assignments-<ISO-date>.csv`
pub fn export_filename(date: NaiveDate) -> String {
    format!("esg-assignments-{}.csv", date.format("%Y-%m-%d"))
}

/// Tokenize one CSV line
///
/// Quote-aware for embedded commas; a doubled quote inside a quoted field
/// yields a literal quote. Fields are trimmed.
pub fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

/// Aggregate outcome of an import
///
/// Duplicate triples count as successes. Row errors are recorded here and
/// logged; callers surface only the aggregate counts.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    pub succeeded: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

/// Locate a header column whose lowercase name contains one of the needles
///
/// First match wins.
fn find_column(headers: &[String], needles: &[&str]) -> Option<usize> {
    headers.iter().position(|h| {
        let h = h.to_lowercase();
        needles.iter().any(|n| h.contains(n))
    })
}

/// Parse CSV text and create an assignment per valid row
///
/// The whole import is rejected (and nothing processed) when the text has no
/// data rows or any of the three required id columns is missing. Otherwise
/// each row is validated independently: an unresolvable id records a row
/// error and the batch continues. Each row's effect is atomic.
pub fn import_assignments(store: &mut EntityStore, text: &str) -> Result<ImportReport> {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();

    if lines.len() < 2 {
        return Err(Error::CsvImport("CSV file is empty or invalid".to_string()));
    }

    let headers = parse_line(lines[0]);
    let user_col = find_column(&headers, &["user id", "user_id"]);
    let site_col = find_column(&headers, &["site id", "site_id"]);
    let metric_col = find_column(&headers, &["metric id", "metric_id"]);

    let (Some(user_col), Some(site_col), Some(metric_col)) = (user_col, site_col, metric_col)
    else {
        return Err(Error::CsvImport(
            "CSV must contain columns: User ID, Site ID, and Metric ID".to_string(),
        ));
    };

    let mut report = ImportReport::default();

    for (index, line) in lines[1..].iter().enumerate() {
        let row_number = index + 2;
        let values = parse_line(line);
        let user_id = values.get(user_col).map(String::as_str).unwrap_or("");
        let site_id = values.get(site_col).map(String::as_str).unwrap_or("");
        let metric_id = values.get(metric_col).map(String::as_str).unwrap_or("");

        let error = if store.user_by_id(user_id).is_none() {
            Some(format!("Row {row_number}: User ID \"{user_id}\" not found"))
        } else if store.site_by_id(site_id).is_none() {
            Some(format!("Row {row_number}: Site ID \"{site_id}\" not found"))
        } else if store.metric_by_id(metric_id).is_none() {
            Some(format!(
                "Row {row_number}: Metric ID \"{metric_id}\" not found"
            ))
        } else {
            None
        };

        if let Some(message) = error {
            warn!(target: "csv_import", "{message}");
            report.errors.push(message);
            report.failed += 1;
            continue;
        }

        // Duplicate (None) counts as success
        store.create_assignment(user_id, site_id, metric_id);
        report.succeeded += 1;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Metric, Site, User};

    fn fixture_store() -> EntityStore {
        let mut store = EntityStore::new();
        store.sites.insert(Site {
            id: "site-001".to_string(),
            name: "Warehouse 12".to_string(),
            group: "North Region".to_string(),
            region: "North Region".to_string(),
        });
        store.sites.insert(Site {
            id: "site-002".to_string(),
            name: "Office 3, Annex".to_string(),
            group: "South Region".to_string(),
            region: "South Region".to_string(),
        });
        store.users.insert(User {
            id: "user-001".to_string(),
            name: "Jane \"JJ\" Smith".to_string(),
            email: "jane.smith@company.com".to_string(),
        });
        store.metrics.insert(Metric {
            id: "metric-001".to_string(),
            name: "Electricity Consumption (kWh)".to_string(),
            category: "Energy".to_string(),
        });
        store
    }

    #[test]
    fn test_parse_line_quoted_commas() {
        let fields = parse_line("\"site-002\",\"Office 3, Annex\",\"South Region\"");
        assert_eq!(fields, vec!["site-002", "Office 3, Annex", "South Region"]);
    }

    #[test]
    fn test_parse_line_doubled_quotes() {
        let fields = parse_line("\"Jane \"\"JJ\"\" Smith\",\"x\"");
        assert_eq!(fields, vec!["Jane \"JJ\" Smith", "x"]);
    }

    #[test]
    fn test_export_header_and_row_shape() {
        let mut store = fixture_store();
        store.create_assignment("user-001", "site-001", "metric-001");

        let csv = export_assignments(&store);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], EXPORT_HEADER.join(","));

        let fields = parse_line(lines[1]);
        assert_eq!(fields.len(), 9);
        assert_eq!(fields[0], "user-001");
        assert_eq!(fields[1], "Jane \"JJ\" Smith");
        assert_eq!(fields[3], "site-001");
        assert_eq!(fields[4], "Warehouse 12");
        assert_eq!(fields[7], "Energy");
    }

    #[test]
    fn test_export_dangling_ids_render_blank_names() {
        let mut store = fixture_store();
        store.create_assignment("user-001", "site-001", "metric-001");
        store.users.clear();

        let csv = export_assignments(&store);
        let fields = parse_line(csv.lines().nth(1).unwrap());
        assert_eq!(fields[0], "user-001");
        assert_eq!(fields[1], "");
        assert_eq!(fields[2], "");
    }

    #[test]
    fn test_export_filename_pattern() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        assert_eq!(export_filename(date), "esg-assignments-2026-08-24.csv");
    }

    #[test]
    fn test_import_missing_required_column_rejects_everything() {
        let mut store = fixture_store();
        let text = "User ID,Metric ID\n\"user-001\",\"metric-001\"";

        let result = import_assignments(&mut store, text);
        assert!(matches!(result, Err(Error::CsvImport(_))));
        assert!(store.assignments.is_empty());
    }

    #[test]
    fn test_import_empty_file_rejected() {
        let mut store = fixture_store();
        assert!(import_assignments(&mut store, "\n\n").is_err());
        assert!(import_assignments(&mut store, "User ID,Site ID,Metric ID\n").is_err());
    }

    #[test]
    fn test_import_partial_failure_continues() {
        let mut store = fixture_store();
        let text = "User ID,Site ID,Metric ID\n\
                    \"user-404\",\"site-001\",\"metric-001\"\n\
                    \"user-001\",\"site-001\",\"metric-001\"";

        let report = import_assignments(&mut store, text).unwrap();
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("user-404"));
        assert!(store.assignment_exists("user-001", "site-001", "metric-001"));
    }

    #[test]
    fn test_import_accepts_underscore_headers_and_extra_columns() {
        let mut store = fixture_store();
        let text = "note,user_id,site_id,metric_id\n\
                    \"x\",\"user-001\",\"site-001\",\"metric-001\"";

        let report = import_assignments(&mut store, text).unwrap();
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, 0);
    }

    #[test]
    fn test_import_duplicate_counts_as_success() {
        let mut store = fixture_store();
        store.create_assignment("user-001", "site-001", "metric-001");
        let text = "User ID,Site ID,Metric ID\n\"user-001\",\"site-001\",\"metric-001\"";

        let report = import_assignments(&mut store, text).unwrap();
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, 0);
        assert_eq!(store.assignments.len(), 1);
    }

    #[test]
    fn test_roundtrip_reproduces_triples() {
        let mut store = fixture_store();
        store.create_assignment("user-001", "site-001", "metric-001");
        store.create_assignment("user-001", "site-002", "metric-001");

        let mut triples: Vec<(String, String, String)> = store
            .assignments
            .all()
            .iter()
            .map(|a| (a.user_id.clone(), a.site_id.clone(), a.metric_id.clone()))
            .collect();
        triples.sort();

        let csv = export_assignments(&store);
        store.assignments.clear();

        let report = import_assignments(&mut store, &csv).unwrap();
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 0);

        let mut reimported: Vec<(String, String, String)> = store
            .assignments
            .all()
            .iter()
            .map(|a| (a.user_id.clone(), a.site_id.clone(), a.metric_id.clone()))
            .collect();
        reimported.sort();
        assert_eq!(triples, reimported);
    }

    #[test]
    fn test_reimport_of_existing_set_is_harmless() {
        let mut store = fixture_store();
        store.create_assignment("user-001", "site-001", "metric-001");

        let csv = export_assignments(&store);
        let report = import_assignments(&mut store, &csv).unwrap();
        assert_eq!(report.succeeded, 1);
        assert_eq!(store.assignments.len(), 1);
    }
}

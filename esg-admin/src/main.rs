//! esg-admin - ESG assignment administration console
//!
//! Command-line console for managing "site × metric" data-entry
//! responsibilities: matrix projection, search, paginated review, single and
//! bulk assignment changes, and CSV import/export. All data is an in-memory
//! sample set generated per invocation.

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use esg_admin::cli::{Cli, Command, SearchKind};
use esg_admin::commands::{self, AssignOutcome, ListFilters};
use esg_admin::{render, seed_store};
use esg_core::config::{load_config, resolve_data_dir, ConsoleConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting ESG Admin Console (esg-admin) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let cli = Cli::parse();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            warn!("Failed to load config file, using defaults: {e}");
            ConsoleConfig::default()
        }
    };
    let data_dir = resolve_data_dir(cli.data_dir.as_deref());

    let mut store = seed_store(cli.seed);
    info!(
        sites = store.sites.len(),
        users = store.users.len(),
        metrics = store.metrics.len(),
        assignments = store.assignments.len(),
        "sample data generated"
    );

    match cli.command {
        Command::Export { output } => {
            let outcome = commands::cmd_export(&store, output, &data_dir)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                println!(
                    "Exported {} assignments to {}",
                    outcome.rows,
                    outcome.path.display()
                );
            }
        }

        Command::Import { file } => {
            let report = commands::cmd_import(&mut store, &file).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", render::render_import_report(&report));
            }
        }

        Command::Matrix { sites, metrics } => {
            let matrix = commands::cmd_matrix(&store, &sites, &metrics);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&matrix)?);
            } else {
                println!("{}", render::render_matrix(&matrix));
            }
        }

        Command::Search { kind, term } => {
            let window = std::time::Duration::from_millis(config.debounce_ms);
            let term = commands::settle_search_term(term, window).await;
            let results = match kind {
                SearchKind::Sites => commands::cmd_search_sites(&store, &term),
                SearchKind::Metrics => commands::cmd_search_metrics(&store, &term),
                SearchKind::Users => commands::cmd_search_users(&store, &term),
            };
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                println!("{}", render::render_search(&results));
            }
        }

        Command::List {
            page,
            user,
            sites,
            metrics,
        } => {
            let filters = ListFilters {
                user_search: user,
                site_ids: sites,
                metric_ids: metrics,
            };
            let listing = commands::cmd_list(&store, &filters, page, config.page_size);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&listing)?);
            } else {
                println!("{}", render::render_list(&listing));
            }
        }

        Command::Assign { user, site, metric } => {
            match commands::cmd_assign(&mut store, &user, &site, &metric)? {
                AssignOutcome::Created(assignment) => {
                    println!("Assignment created: {}", assignment.id);
                }
                AssignOutcome::Duplicate => {
                    println!("Assignment already exists; nothing to do");
                }
            }
        }

        Command::Unassign { assignment_id } => {
            if commands::cmd_unassign(&mut store, &assignment_id) {
                println!("Assignment removed");
            } else {
                anyhow::bail!("Failed to remove assignment: id \"{assignment_id}\" not found");
            }
        }

        Command::BulkAssign {
            users,
            sites,
            metrics,
        } => {
            let outcome = commands::cmd_bulk_assign(&mut store, &users, &sites, &metrics)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                println!(
                    "Created {} assignment(s) across {} combination(s) ({} site(s) × {} metric(s) × {} user(s))",
                    outcome.created,
                    outcome.combinations,
                    outcome.sites,
                    outcome.metrics,
                    outcome.users
                );
            }
        }

        Command::BulkRemove { sites, metrics, yes } => {
            let site_list = commands::resolve_sites(&store, &sites);
            let metric_list = commands::resolve_metrics(&store, &metrics);
            let preview = commands::cmd_bulk_remove_preview(&store, &site_list, &metric_list);

            if preview.assignments == 0 {
                println!("No assignments match the selected site × metric product");
                return Ok(());
            }

            // Destructive and irreversible; demand explicit confirmation
            if !yes {
                let prompt = format!(
                    "This will permanently remove {} assignment(s) across {} site × metric combination(s). This cannot be undone.",
                    preview.assignments, preview.combinations
                );
                if !confirm(&prompt)? {
                    println!("Aborted.");
                    return Ok(());
                }
            }

            let removed = commands::cmd_bulk_remove(&mut store, &site_list, &metric_list);
            println!("Removed {removed} assignment(s)");
        }

        Command::Stats => {
            let stats = commands::cmd_stats(&store);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("{}", render::render_stats(&stats));
            }
        }
    }

    Ok(())
}

/// Interactive yes/no confirmation on stdin
fn confirm(prompt: &str) -> Result<bool> {
    use std::io::Write;

    print!("{prompt}\nType \"yes\" to confirm: ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().eq_ignore_ascii_case("yes"))
}

//! Sample-data generation
//!
//! Builds a populated store in the shape of the original console's seed
//! data: 105 sites across five region groups, 55 users, a fixed metric
//! catalog, and roughly 650 random assignments deduplicated by triple. The
//! generator takes the RNG as an argument so callers control determinism;
//! tests seed it, the console binary seeds from entropy unless told
//! otherwise.

use chrono::{Duration, Utc};
use rand::Rng;
use uuid::Uuid;

use crate::model::{Assignment, Metric, Site, User};
use crate::store::EntityStore;

const SITE_GROUPS: [&str; 5] = [
    "North Region",
    "South Region",
    "East Region",
    "West Region",
    "Central Region",
];

const SITE_TYPES: [&str; 6] = [
    "Warehouse",
    "Office",
    "Factory",
    "Retail Store",
    "Distribution Center",
    "Headquarters",
];

const FIRST_NAMES: [&str; 20] = [
    "John", "Jane", "Michael", "Sarah", "David", "Emily", "Robert", "Jessica", "William",
    "Ashley", "James", "Amanda", "Christopher", "Melissa", "Daniel", "Michelle", "Matthew",
    "Kimberly", "Anthony", "Nicole",
];

const LAST_NAMES: [&str; 20] = [
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis",
    "Rodriguez", "Martinez", "Hernandez", "Lopez", "Wilson", "Anderson", "Thomas", "Taylor",
    "Moore", "Jackson", "Martin", "Lee",
];

/// Metric catalog: (category, names) in fixed order
const METRIC_CATALOG: [(&str, &[&str]); 4] = [
    (
        "Energy",
        &[
            "Electricity Consumption (kWh)",
            "Natural Gas Consumption (m³)",
            "Renewable Energy Generation (kWh)",
            "Energy Efficiency Score",
            "Carbon Emissions from Energy (tCO2e)",
            "Solar Panel Capacity (kW)",
            "Wind Energy Generation (kWh)",
            "Energy Cost (USD)",
        ],
    ),
    (
        "Water",
        &[
            "Water Consumption (Liters)",
            "Water Recycling Rate (%)",
            "Wastewater Treatment Volume (Liters)",
            "Water Quality Score",
            "Water Cost (USD)",
            "Rainwater Harvesting (Liters)",
        ],
    ),
    (
        "Waste",
        &[
            "Total Waste Generated (kg)",
            "Waste Recycling Rate (%)",
            "Hazardous Waste (kg)",
            "Organic Waste Composted (kg)",
            "Plastic Waste Reduction (%)",
            "E-Waste Disposed (kg)",
            "Waste-to-Energy Conversion (kWh)",
        ],
    ),
    (
        "Governance",
        &[
            "ESG Compliance Score",
            "Employee Training Hours",
            "Safety Incidents Count",
            "Diversity & Inclusion Index",
            "Ethics Violations Count",
            "Board Diversity (%)",
            "Stakeholder Engagement Score",
            "Transparency Index",
            "Regulatory Compliance Rate (%)",
        ],
    ),
];

const SITE_COUNT: usize = 105;
const USER_COUNT: usize = 55;
const TARGET_ASSIGNMENTS: usize = 650;

fn generate_sites<R: Rng>(rng: &mut R) -> Vec<Site> {
    (1..=SITE_COUNT)
        .map(|i| {
            let group = SITE_GROUPS[rng.gen_range(0..SITE_GROUPS.len())];
            let site_type = SITE_TYPES[rng.gen_range(0..SITE_TYPES.len())];
            Site {
                id: format!("site-{i:03}"),
                name: format!("{site_type} {i}"),
                group: group.to_string(),
                region: group.to_string(),
            }
        })
        .collect()
}

fn generate_users<R: Rng>(rng: &mut R) -> Vec<User> {
    (1..=USER_COUNT)
        .map(|i| {
            let first = FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())];
            let last = LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())];
            User {
                id: format!("user-{i:03}"),
                name: format!("{first} {last}"),
                email: format!(
                    "{}.{}@company.com",
                    first.to_lowercase(),
                    last.to_lowercase()
                ),
            }
        })
        .collect()
}

fn generate_metrics() -> Vec<Metric> {
    let mut metrics = Vec::new();
    let mut counter = 1;
    for (category, names) in METRIC_CATALOG {
        for name in names {
            metrics.push(Metric {
                id: format!("metric-{counter:03}"),
                name: name.to_string(),
                category: category.to_string(),
            });
            counter += 1;
        }
    }
    metrics
}

fn generate_assignments<R: Rng>(
    rng: &mut R,
    sites: &[Site],
    users: &[User],
    metrics: &[Metric],
) -> Vec<Assignment> {
    let mut assignments: Vec<Assignment> = Vec::new();
    for _ in 0..TARGET_ASSIGNMENTS {
        let site = &sites[rng.gen_range(0..sites.len())];
        let user = &users[rng.gen_range(0..users.len())];
        let metric = &metrics[rng.gen_range(0..metrics.len())];

        let duplicate = assignments.iter().any(|a| {
            a.user_id == user.id && a.site_id == site.id && a.metric_id == metric.id
        });
        if duplicate {
            continue;
        }

        // Random creation date within the last 90 days
        let age = Duration::seconds(rng.gen_range(0..90 * 24 * 60 * 60));
        assignments.push(Assignment {
            id: Uuid::new_v4().to_string(),
            user_id: user.id.clone(),
            site_id: site.id.clone(),
            metric_id: metric.id.clone(),
            created_at: Utc::now() - age,
        });
    }
    assignments
}

/// Generate a fully populated store
pub fn generate_store<R: Rng>(rng: &mut R) -> EntityStore {
    let sites = generate_sites(rng);
    let users = generate_users(rng);
    let metrics = generate_metrics();
    let assignments = generate_assignments(rng, &sites, &users, &metrics);

    let mut store = EntityStore::new();
    for site in sites {
        store.sites.insert(site);
    }
    for user in users {
        store.users.insert(user);
    }
    for metric in metrics {
        store.metrics.insert(metric);
    }
    for assignment in assignments {
        store.assignments.insert(assignment);
    }
    store
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_generated_store_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let store = generate_store(&mut rng);

        assert_eq!(store.sites.len(), SITE_COUNT);
        assert_eq!(store.users.len(), USER_COUNT);
        assert_eq!(store.metrics.len(), 30);
        assert!(store.assignments.len() > 0);
        assert!(store.assignments.len() <= TARGET_ASSIGNMENTS);
        assert_eq!(
            store.metric_categories(),
            vec!["Energy", "Water", "Waste", "Governance"]
        );
    }

    #[test]
    fn test_generated_assignments_unique_by_triple_and_resolvable() {
        let mut rng = StdRng::seed_from_u64(42);
        let store = generate_store(&mut rng);

        let mut triples = HashSet::new();
        for a in store.assignments.all() {
            assert!(triples.insert((a.user_id.clone(), a.site_id.clone(), a.metric_id.clone())));
            assert!(store.user_by_id(&a.user_id).is_some());
            assert!(store.site_by_id(&a.site_id).is_some());
            assert!(store.metric_by_id(&a.metric_id).is_some());
        }
    }

    #[test]
    fn test_same_seed_is_reproducible() {
        let store_a = generate_store(&mut StdRng::seed_from_u64(123));
        let store_b = generate_store(&mut StdRng::seed_from_u64(123));
        assert_eq!(store_a.sites.all(), store_b.sites.all());
        assert_eq!(store_a.users.all(), store_b.users.all());
        assert_eq!(store_a.assignments.len(), store_b.assignments.len());
    }
}

//! Entity records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A physical location that reports ESG data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub id: String,
    pub name: String,
    pub group: String,
    pub region: String,
}

/// A person who can be made responsible for data entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// A reportable ESG metric
///
/// Category is an open string domain (Energy, Water, Waste, Governance in
/// the sample data) rather than a closed enum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub id: String,
    pub name: String,
    pub category: String,
}

/// "This user is responsible for entering this metric's data at this site"
///
/// The three foreign ids are free-standing strings resolved by lookup at
/// render time; a dangling reference fails lookup and is treated as absent
/// by consuming code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: String,
    pub user_id: String,
    pub site_id: String,
    pub metric_id: String,
    pub created_at: DateTime<Utc>,
}

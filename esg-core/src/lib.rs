//! # ESG Core Library
//!
//! Data layer for the ESG assignment console:
//! - Entity records (sites, users, metrics, assignments)
//! - In-memory repositories with a swappable storage seam
//! - Assignment index operations (create / remove / bulk / replace)
//! - Filter and search layer with debounced change notification
//! - Matrix projection (metrics grouped by category × sites)
//! - CSV import/export
//! - Sample-data generation and configuration loading

pub mod assignment;
pub mod config;
pub mod csv;
pub mod debounce;
pub mod error;
pub mod filter;
pub mod matrix;
pub mod model;
pub mod sample;
pub mod store;

pub use error::{Error, Result};
pub use model::{Assignment, Metric, Site, User};
pub use store::EntityStore;

//! esg-admin library - command-line ESG assignment console
//!
//! Command functions are separated from the binary so integration tests can
//! drive them against seeded fixture stores.

use rand::rngs::StdRng;
use rand::SeedableRng;

use esg_core::{sample, EntityStore};

pub mod cli;
pub mod commands;
pub mod pagination;
pub mod render;

/// Build the in-memory store the console operates on
///
/// Sample data lives only for the lifetime of the invocation (no durable
/// storage). A seed makes the run reproducible; without one the generator
/// seeds from entropy.
pub fn seed_store(seed: Option<u64>) -> EntityStore {
    match seed {
        Some(seed) => sample::generate_store(&mut StdRng::seed_from_u64(seed)),
        None => sample::generate_store(&mut StdRng::from_entropy()),
    }
}

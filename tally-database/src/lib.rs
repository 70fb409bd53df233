mod database;

pub use database::{Database, MIGRATOR};

/// Row counts for the persistent stores.
pub mod counts;

use std::sync::Arc;

use tally_database::Database;
use twilight_cache_inmemory::DefaultInMemoryCache;
use twilight_http::Client;

/// Shared application context passed into command handlers.
///
/// Cheap to clone because it only stores reference-counted shared state.
#[derive(Clone)]
pub struct Context {
    pub http: Arc<Client>,
    pub cache: Arc<DefaultInMemoryCache>,
    pub db: Database,
}

impl Context {
    /// Create a new application context.
    pub fn new(http: Arc<Client>, cache: Arc<DefaultInMemoryCache>, db: Database) -> Self {
        Self { http, cache, db }
    }
}

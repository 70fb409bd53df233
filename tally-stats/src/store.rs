use std::future::Future;

use tally_database::{Database, counts};

/// The four persistent counters reported alongside the cache totals.
///
/// Queries are independent of each other and may run concurrently.
pub trait StatCounts {
    fn count_systems(&self) -> impl Future<Output = anyhow::Result<u64>> + Send;
    fn count_members(&self) -> impl Future<Output = anyhow::Result<u64>> + Send;
    fn count_switches(&self) -> impl Future<Output = anyhow::Result<u64>> + Send;
    fn count_messages(&self) -> impl Future<Output = anyhow::Result<u64>> + Send;
}

impl StatCounts for Database {
    async fn count_systems(&self) -> anyhow::Result<u64> {
        counts::count_systems(self).await
    }

    async fn count_members(&self) -> anyhow::Result<u64> {
        counts::count_members(self).await
    }

    async fn count_switches(&self) -> anyhow::Result<u64> {
        counts::count_switches(self).await
    }

    async fn count_messages(&self) -> anyhow::Result<u64> {
        counts::count_messages(self).await
    }
}

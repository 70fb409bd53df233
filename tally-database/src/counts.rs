use sqlx::PgPool;

use crate::Database;

/// Tables whose row counts are reported as store gauges.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CountedTable {
    Systems,
    Members,
    Switches,
    Messages,
}

impl CountedTable {
    fn count_query(self) -> &'static str {
        match self {
            Self::Systems => "SELECT COUNT(*) FROM systems",
            Self::Members => "SELECT COUNT(*) FROM members",
            Self::Switches => "SELECT COUNT(*) FROM switches",
            Self::Messages => "SELECT COUNT(*) FROM messages",
        }
    }
}

async fn count_rows(pool: &PgPool, table: CountedTable) -> anyhow::Result<u64> {
    let count = sqlx::query_scalar::<_, i64>(table.count_query())
        .fetch_one(pool)
        .await?;

    Ok(u64::try_from(count)?)
}

/// Number of registered systems.
pub async fn count_systems(db: &Database) -> anyhow::Result<u64> {
    count_rows(db.pool(), CountedTable::Systems).await
}

/// Number of members across all systems.
pub async fn count_members(db: &Database) -> anyhow::Result<u64> {
    count_rows(db.pool(), CountedTable::Members).await
}

/// Number of logged switches.
pub async fn count_switches(db: &Database) -> anyhow::Result<u64> {
    count_rows(db.pool(), CountedTable::Switches).await
}

/// Number of proxied messages.
pub async fn count_messages(db: &Database) -> anyhow::Result<u64> {
    count_rows(db.pool(), CountedTable::Messages).await
}

//! Periodic bot statistics: cache scan, store counts, gauge publishing.

/// Read-only views over the gateway guild/member cache.
pub mod cache;
/// Sample collection and publishing.
pub mod collector;
/// Gauge names and metrics sink adapters.
pub mod sink;
/// Persistent counter queries.
pub mod store;

pub use cache::{GuildCache, GuildSnapshot, MemberPresence};
pub use collector::{CollectionReport, MetricSample, StatCollector, take_sample};
pub use sink::{MetricsSink, OtelMetricsSink, StatGauge};
pub use store::StatCounts;

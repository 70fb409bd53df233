use std::collections::HashSet;
use std::time::Duration;

use tokio::time::Instant;
use tracing::info;
use twilight_model::gateway::presence::Status;

use crate::cache::{GuildCache, GuildSnapshot};
use crate::sink::{MetricsSink, StatGauge};
use crate::store::StatCounts;

/// Totals gathered by one collection pass.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MetricSample {
    pub guilds: u64,
    pub channels: u64,
    pub users_known: u64,
    pub users_online: u64,
    pub systems: u64,
    pub members: u64,
    pub switches: u64,
    pub messages: u64,
}

impl MetricSample {
    /// Gauge/value pairs in publishing order.
    pub fn gauges(&self) -> [(StatGauge, u64); 8] {
        [
            (StatGauge::Guilds, self.guilds),
            (StatGauge::Channels, self.channels),
            (StatGauge::MembersTotal, self.users_known),
            (StatGauge::MembersOnline, self.users_online),
            (StatGauge::SystemCount, self.systems),
            (StatGauge::MemberCount, self.members),
            (StatGauge::SwitchCount, self.switches),
            (StatGauge::MessageCount, self.messages),
        ]
    }
}

/// Outcome of a published collection pass.
#[derive(Clone, Copy, Debug)]
pub struct CollectionReport {
    pub sample: MetricSample,
    pub elapsed: Duration,
}

#[derive(Debug, Default, Eq, PartialEq)]
struct CacheTotals {
    guilds: u64,
    channels: u64,
    users_known: u64,
    users_online: u64,
}

fn scan_guilds(guilds: &[GuildSnapshot]) -> CacheTotals {
    let mut known = HashSet::new();
    let mut online = HashSet::new();
    let mut channels = 0_u64;

    for guild in guilds {
        channels = channels.saturating_add(guild.text_channels as u64);

        for member in &guild.members {
            known.insert(member.user_id);
            if member.status == Status::Online {
                online.insert(member.user_id);
            }
        }
    }

    CacheTotals {
        guilds: guilds.len() as u64,
        channels,
        users_known: known.len() as u64,
        users_online: online.len() as u64,
    }
}

/// Build a sample from one cache snapshot and the four store counts.
///
/// Fails as soon as any store query fails.
pub async fn take_sample<C, S>(cache: &C, store: &S) -> anyhow::Result<MetricSample>
where
    C: GuildCache + ?Sized,
    S: StatCounts,
{
    let totals = scan_guilds(&cache.guild_snapshots());

    let (systems, members, switches, messages) = tokio::try_join!(
        store.count_systems(),
        store.count_members(),
        store.count_switches(),
        store.count_messages(),
    )?;

    Ok(MetricSample {
        guilds: totals.guilds,
        channels: totals.channels,
        users_known: totals.users_known,
        users_online: totals.users_online,
        systems,
        members,
        switches,
        messages,
    })
}

/// Samples the gateway cache and stores, then publishes the result as gauges.
pub struct StatCollector<C, S, M> {
    cache: C,
    store: S,
    sink: M,
}

impl<C, S, M> StatCollector<C, S, M>
where
    C: GuildCache,
    S: StatCounts,
    M: MetricsSink,
{
    pub fn new(cache: C, store: S, sink: M) -> Self {
        Self { cache, store, sink }
    }

    /// Take a sample without publishing it.
    pub async fn sample(&self) -> anyhow::Result<MetricSample> {
        take_sample(&self.cache, &self.store).await
    }

    /// Run one full pass and publish every gauge.
    ///
    /// Gauges are written only after all store counts succeed, so a failed
    /// pass leaves the sink untouched.
    pub async fn collect_stats(&self) -> anyhow::Result<CollectionReport> {
        let started = Instant::now();

        let sample = self.sample().await?;
        for (gauge, value) in sample.gauges() {
            self.sink.set_gauge(gauge, value);
        }

        let elapsed = started.elapsed();
        info!(
            elapsed_ms = elapsed.as_millis() as u64,
            guilds = sample.guilds,
            "updated metrics"
        );

        Ok(CollectionReport { sample, elapsed })
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use anyhow::anyhow;
    use tokio::time::sleep;
    use twilight_model::id::Id;

    use super::*;
    use crate::cache::MemberPresence;

    struct FakeCache(Vec<GuildSnapshot>);

    impl GuildCache for FakeCache {
        fn guild_snapshots(&self) -> Vec<GuildSnapshot> {
            self.0.clone()
        }
    }

    #[derive(Clone, Copy, Default)]
    struct FakeStore {
        systems: u64,
        members: u64,
        switches: u64,
        messages: u64,
        delay: Duration,
        fail_switches: bool,
    }

    impl FakeStore {
        async fn answer(&self, value: u64) -> anyhow::Result<u64> {
            sleep(self.delay).await;
            Ok(value)
        }
    }

    impl StatCounts for FakeStore {
        async fn count_systems(&self) -> anyhow::Result<u64> {
            self.answer(self.systems).await
        }

        async fn count_members(&self) -> anyhow::Result<u64> {
            self.answer(self.members).await
        }

        async fn count_switches(&self) -> anyhow::Result<u64> {
            if self.fail_switches {
                return Err(anyhow!("switch store unavailable"));
            }
            self.answer(self.switches).await
        }

        async fn count_messages(&self) -> anyhow::Result<u64> {
            self.answer(self.messages).await
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        writes: Mutex<Vec<(StatGauge, u64)>>,
    }

    impl RecordingSink {
        fn value(&self, gauge: StatGauge) -> Option<u64> {
            self.writes
                .lock()
                .unwrap()
                .iter()
                .rev()
                .find(|(written, _)| *written == gauge)
                .map(|(_, value)| *value)
        }

        fn write_count(&self) -> usize {
            self.writes.lock().unwrap().len()
        }
    }

    impl MetricsSink for &RecordingSink {
        fn set_gauge(&self, gauge: StatGauge, value: u64) {
            self.writes.lock().unwrap().push((gauge, value));
        }
    }

    fn member(id: u64, status: Status) -> MemberPresence {
        MemberPresence {
            user_id: Id::new(id),
            status,
        }
    }

    fn guild(id: u64, text_channels: usize, members: Vec<MemberPresence>) -> GuildSnapshot {
        GuildSnapshot {
            guild_id: Id::new(id),
            text_channels,
            members,
        }
    }

    fn two_guild_cache() -> FakeCache {
        FakeCache(vec![
            guild(
                1,
                3,
                vec![member(10, Status::Online), member(11, Status::Offline)],
            ),
            guild(
                2,
                1,
                vec![member(11, Status::Online), member(12, Status::Offline)],
            ),
        ])
    }

    #[tokio::test]
    async fn counts_guilds_channels_and_distinct_users() {
        let sample = take_sample(&two_guild_cache(), &FakeStore::default())
            .await
            .unwrap();

        assert_eq!(sample.guilds, 2);
        assert_eq!(sample.channels, 4);
        assert_eq!(sample.users_known, 3);
        assert_eq!(sample.users_online, 2);
    }

    #[tokio::test]
    async fn gateway_cache_reports_distinct_totals() {
        let cache = crate::cache::fixtures::two_guild_cache();

        let sample = take_sample(&cache, &FakeStore::default()).await.unwrap();

        assert_eq!(sample.guilds, 2);
        assert_eq!(sample.channels, 4);
        assert_eq!(sample.users_known, 3);
        assert_eq!(sample.users_online, 2);
    }

    #[tokio::test]
    async fn shared_users_count_once() {
        let members = || {
            vec![
                member(1, Status::Online),
                member(2, Status::Online),
                member(3, Status::Idle),
            ]
        };
        let cache = FakeCache(vec![
            guild(1, 0, members()),
            guild(2, 0, members()),
            guild(3, 0, members()),
        ]);

        let sample = take_sample(&cache, &FakeStore::default()).await.unwrap();

        assert_eq!(sample.users_known, 3);
        assert_eq!(sample.users_online, 2);
    }

    #[tokio::test]
    async fn only_exact_online_status_counts_as_online() {
        let cache = FakeCache(vec![guild(
            1,
            0,
            vec![
                member(1, Status::Idle),
                member(2, Status::DoNotDisturb),
                member(3, Status::Invisible),
                member(4, Status::Offline),
            ],
        )]);

        let sample = take_sample(&cache, &FakeStore::default()).await.unwrap();

        assert_eq!(sample.users_known, 4);
        assert_eq!(sample.users_online, 0);
    }

    #[tokio::test]
    async fn empty_cache_reports_zero_totals() {
        let sample = take_sample(&FakeCache(Vec::new()), &FakeStore::default())
            .await
            .unwrap();

        assert_eq!(sample, MetricSample::default());
    }

    #[tokio::test]
    async fn publishes_store_counts_unchanged() {
        let sink = RecordingSink::default();
        let store = FakeStore {
            systems: 10,
            members: 25,
            switches: 100,
            messages: 5000,
            ..FakeStore::default()
        };
        let collector = StatCollector::new(two_guild_cache(), store, &sink);

        collector.collect_stats().await.unwrap();

        assert_eq!(sink.write_count(), StatGauge::ALL.len());
        assert_eq!(sink.value(StatGauge::SystemCount), Some(10));
        assert_eq!(sink.value(StatGauge::MemberCount), Some(25));
        assert_eq!(sink.value(StatGauge::SwitchCount), Some(100));
        assert_eq!(sink.value(StatGauge::MessageCount), Some(5000));
        assert_eq!(sink.value(StatGauge::Guilds), Some(2));
        assert_eq!(sink.value(StatGauge::Channels), Some(4));
        assert_eq!(sink.value(StatGauge::MembersTotal), Some(3));
        assert_eq!(sink.value(StatGauge::MembersOnline), Some(2));
    }

    #[tokio::test]
    async fn failed_store_query_publishes_nothing() {
        let sink = RecordingSink::default();
        let store = FakeStore {
            fail_switches: true,
            ..FakeStore::default()
        };
        let collector = StatCollector::new(two_guild_cache(), store, &sink);

        let err = collector.collect_stats().await.unwrap_err();

        assert!(err.to_string().contains("switch store unavailable"));
        assert_eq!(sink.write_count(), 0);
    }

    #[tokio::test]
    async fn sample_does_not_publish() {
        let sink = RecordingSink::default();
        let collector = StatCollector::new(two_guild_cache(), FakeStore::default(), &sink);

        let sample = collector.sample().await.unwrap();

        assert_eq!(sample.guilds, 2);
        assert_eq!(sink.write_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn elapsed_covers_store_queries() {
        let sink = RecordingSink::default();
        let store = FakeStore {
            delay: Duration::from_secs(2),
            ..FakeStore::default()
        };
        let collector = StatCollector::new(two_guild_cache(), store, &sink);

        let report = collector.collect_stats().await.unwrap();

        assert!(report.elapsed >= Duration::from_secs(2));
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn logs_pass_duration_in_milliseconds() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let sink = RecordingSink::default();
        let store = FakeStore {
            delay: Duration::from_secs(2),
            ..FakeStore::default()
        };
        let collector = StatCollector::new(two_guild_cache(), store, &sink);
        collector.collect_stats().await.unwrap();

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("updated metrics"));

        let elapsed_ms: u64 = output
            .split("elapsed_ms=")
            .nth(1)
            .and_then(|rest| rest.split_whitespace().next())
            .and_then(|value| value.parse().ok())
            .unwrap();
        assert!(elapsed_ms >= 2000);
    }

    #[tokio::test(start_paused = true)]
    async fn store_queries_run_concurrently() {
        let sink = RecordingSink::default();
        let store = FakeStore {
            delay: Duration::from_secs(1),
            ..FakeStore::default()
        };
        let collector = StatCollector::new(FakeCache(Vec::new()), store, &sink);

        let report = collector.collect_stats().await.unwrap();

        assert!(report.elapsed >= Duration::from_secs(1));
        assert!(report.elapsed < Duration::from_secs(4));
    }
}

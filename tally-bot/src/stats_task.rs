use std::time::Duration;

use tokio::{
    task::JoinHandle,
    time::{MissedTickBehavior, interval, timeout},
};
use tracing::{error, warn};

use tally_stats::{GuildCache, MetricsSink, StatCollector, StatCounts};

/// Run a collection pass every `period`, giving each pass at most `pass_timeout`.
///
/// Failed or timed-out passes are logged and the next tick proceeds as usual.
pub fn spawn_stats_task<C, S, M>(
    collector: StatCollector<C, S, M>,
    period: Duration,
    pass_timeout: Duration,
) -> JoinHandle<()>
where
    C: GuildCache + Send + Sync + 'static,
    S: StatCounts + Send + Sync + 'static,
    M: MetricsSink + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            match timeout(pass_timeout, collector.collect_stats()).await {
                Ok(Ok(_report)) => {}
                Ok(Err(source)) => error!(?source, "stats collection failed"),
                Err(_) => warn!(
                    timeout_secs = pass_timeout.as_secs(),
                    "stats collection timed out"
                ),
            }
        }
    })
}

/// Wait for the stats task to end and describe why.
///
/// The task loops forever, so any exit is a panic or an abort.
pub async fn stats_task_stopped(handle: &mut JoinHandle<()>) -> anyhow::Error {
    let error = match handle.await {
        Ok(()) => anyhow::anyhow!("stats task stopped"),
        Err(source) => anyhow::Error::new(source).context("stats task stopped"),
    };
    error!(?error, "stats task stopped");

    error
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn panicking_stats_task_is_reported() {
        let mut handle = tokio::spawn(async {
            panic!("gauge exploded");
        });

        let error = stats_task_stopped(&mut handle).await;

        let rendered = format!("{error:#}");
        assert!(rendered.contains("stats task stopped"));
        assert!(rendered.contains("panic"));
    }

    #[tokio::test]
    async fn aborted_stats_task_is_reported() {
        let mut handle = tokio::spawn(std::future::pending::<()>());
        handle.abort();

        let error = stats_task_stopped(&mut handle).await;

        assert!(format!("{error:#}").contains("cancelled"));
    }
}

mod config;
mod stats_task;
mod telemetry;

use std::sync::Arc;

use tracing::{error, info};
use twilight_cache_inmemory::{DefaultInMemoryCache, ResourceType};
use twilight_gateway::{EventTypeFlags, Intents, Shard, ShardId, StreamExt as _};
use twilight_http::Client;
use twilight_model::gateway::event::Event;

use rustls::crypto::ring::default_provider;
use sqlx::postgres::PgPoolOptions;

use tally_commands::handle_message;
use tally_core::Context;
use tally_database::Database;
use tally_stats::{OtelMetricsSink, StatCollector};

use crate::config::BotConfig;
use crate::stats_task::{spawn_stats_task, stats_task_stopped};
use crate::telemetry::{init_metrics, shutdown_metrics};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    // Load the .env file
    dotenvy::dotenv().ok();
    let config = BotConfig::from_env()?;
    let meter_provider = init_metrics(config.metrics_exporter)?;

    // Create a single shared HTTP Client
    let http = Arc::new(Client::new(config.discord_token.clone()));
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;
    let db = Database::new(db_pool);
    db.migrate().await?;
    info!("PostgreSQL connection established.");

    // Guilds, channels, members and presences feed the stats; roles and the
    // current user feed permission checks.
    let cache = Arc::new(
        DefaultInMemoryCache::builder()
            .resource_types(
                ResourceType::GUILD
                    | ResourceType::CHANNEL
                    | ResourceType::MEMBER
                    | ResourceType::PRESENCE
                    | ResourceType::ROLE
                    | ResourceType::USER
                    | ResourceType::USER_CURRENT,
            )
            .build(),
    );

    let ctx = Context::new(Arc::clone(&http), Arc::clone(&cache), db.clone());

    let meter = opentelemetry::global::meter("tally-bot");
    let collector = StatCollector::new(Arc::clone(&cache), db, OtelMetricsSink::new(&meter));
    let mut stats = spawn_stats_task(collector, config.stats_interval, config.stats_timeout);

    // Members and presences are privileged intents and must be enabled for the app.
    let intents = Intents::GUILDS
        | Intents::GUILD_MEMBERS
        | Intents::GUILD_PRESENCES
        | Intents::GUILD_MESSAGES
        | Intents::DIRECT_MESSAGES
        | Intents::MESSAGE_CONTENT;

    // A shard is one Gateway WebSocket connection to Discord
    let mut shard = Shard::new(ShardId::new(0, 1), config.discord_token, intents);

    info!("Tally is connecting...");

    let result = loop {
        let item = tokio::select! {
            item = shard.next_event(EventTypeFlags::all()) => item,
            source = stats_task_stopped(&mut stats) => break Err(source),
        };
        let Some(item) = item else {
            break Ok(());
        };

        let event = match item {
            Ok(event) => event,
            Err(source) => {
                error!(?source, "gateway event stream error");
                continue;
            }
        };

        cache.update(&event);

        match event {
            Event::Ready(_) => {
                info!("Tally is ready.");
            }
            Event::MessageCreate(msg) => {
                if let Err(source) = handle_message(ctx.clone(), msg).await {
                    error!(?source, "message command failed");
                }
            }
            _ => {} // Ignore unused events
        }
    };

    stats.abort();
    shutdown_metrics(meter_provider);

    result
}

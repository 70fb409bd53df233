use twilight_model::{gateway::payload::incoming::MessageCreate, guild::Permissions};

use crate::CommandMeta;
use tally_core::Context;
use tally_stats::{MetricSample, take_sample};
use tally_utils::embed::build_line_embed;
use tally_utils::message::send_message_fixed;
use tally_utils::permissions::{bot_has_all_permissions, bot_permissions, permission_names};

pub const META: CommandMeta = CommandMeta {
    name: "stats",
    desc: "Show live bot and store statistics.",
    category: "info",
    usage: "!stats",
};

pub fn stat_lines(sample: &MetricSample) -> Vec<String> {
    vec![
        format!("**Servers:** {}", sample.guilds),
        format!("**Text channels:** {}", sample.channels),
        format!("**Users seen:** {}", sample.users_known),
        format!("**Users online:** {}", sample.users_online),
        format!("**Systems:** {}", sample.systems),
        format!("**Members:** {}", sample.members),
        format!("**Switches:** {}", sample.switches),
        format!("**Messages proxied:** {}", sample.messages),
    ]
}

/// Take a fresh sample and show it, as an embed when the channel allows it.
pub async fn run(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    let sample = take_sample(ctx.cache.as_ref(), &ctx.db).await?;
    let lines = stat_lines(&sample);

    if bot_has_all_permissions(
        &ctx.cache,
        msg.guild_id,
        msg.channel_id,
        Permissions::EMBED_LINKS,
    ) {
        let embed = build_line_embed("Bot statistics", &lines)?;
        send_message_fixed(&ctx.http, msg.channel_id, None, Some(&embed)).await?;
        return Ok(());
    }

    let granted = bot_permissions(&ctx.cache, msg.guild_id, msg.channel_id);
    let missing = Permissions::EMBED_LINKS - granted;
    let content = format!(
        "{}\n\n_Missing permissions for embeds: {}_",
        lines.join("\n"),
        permission_names(missing).join(", ")
    );
    send_message_fixed(&ctx.http, msg.channel_id, Some(&content), None).await?;

    Ok(())
}

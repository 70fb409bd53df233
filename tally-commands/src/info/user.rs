use twilight_model::{gateway::payload::incoming::MessageCreate, user::User};

use crate::CommandMeta;
use tally_core::Context;
use tally_utils::markdown::escape_markdown;
use tally_utils::mention::{name_and_mention, try_parse_mention};
use tally_utils::message::{cached_user, send_message_fixed};
use tally_utils::rest::get_user;
use tally_utils::snowflake::id_timestamp;

pub const META: CommandMeta = CommandMeta {
    name: "user",
    desc: "Look up a Discord account by mention or ID.",
    category: "info",
    usage: "!user <@user|id>",
};

/// Describe an account, preferring the gateway cache over the API.
pub async fn run(ctx: Context, msg: Box<MessageCreate>, arg1: Option<&str>) -> anyhow::Result<()> {
    let http = &ctx.http;
    let Some(user_id) = arg1.and_then(try_parse_mention) else {
        let usage = format!("Usage: `{}`", META.usage);
        send_message_fixed(http, msg.channel_id, Some(&usage), None).await?;
        return Ok(());
    };

    let user = match cached_user(&ctx.cache, user_id) {
        Some(user) => Some(user),
        None => get_user(http, user_id).await?,
    };

    let Some(user) = user else {
        let out = format!("No account found with ID `{}`.", user_id);
        send_message_fixed(http, msg.channel_id, Some(&out), None).await?;
        return Ok(());
    };

    let created = id_timestamp(user.id);
    let shown = User {
        name: escape_markdown(&user.name),
        ..user.clone()
    };
    let out = format!(
        "{}\nAccount created <t:{}:F>{}",
        name_and_mention(&shown),
        created.timestamp(),
        if user.bot { " (bot)" } else { "" }
    );
    send_message_fixed(http, msg.channel_id, Some(&out), None).await?;

    Ok(())
}

use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::CommandMeta;
use tally_core::Context;
use tally_utils::message::send_message_fixed;

pub const META: CommandMeta = CommandMeta {
    name: "ping",
    desc: "Replies with Pong!",
    category: "utility",
    usage: "!ping",
};

/// Send a simple connectivity response.
pub async fn run(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    send_message_fixed(&ctx.http, msg.channel_id, Some("Pong!"), None).await?;

    Ok(())
}

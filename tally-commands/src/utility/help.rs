use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::{COMMANDS, CommandMeta};
use tally_core::Context;
use tally_utils::embed::build_line_embed;
use tally_utils::message::send_message_fixed;

pub const META: CommandMeta = CommandMeta {
    name: "help",
    desc: "Lists out all available commands.",
    category: "utility",
    usage: "!help",
};

/// One line per command, grouped by category.
pub fn help_lines(commands: &[CommandMeta]) -> Vec<String> {
    let mut sorted: Vec<&CommandMeta> = commands.iter().collect();
    sorted.sort_by_key(|command| (command.category, command.name));

    let mut lines = Vec::with_capacity(sorted.len() * 2);
    let mut current_category = None;

    for command in sorted {
        if current_category != Some(command.category) {
            current_category = Some(command.category);
            lines.push(format!("**{}**", command.category));
        }
        lines.push(format!("`{}`: {}", command.usage, command.desc));
    }

    lines
}

/// Render the command catalog.
pub async fn run(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    let embed = build_line_embed("Commands", help_lines(COMMANDS))?;
    send_message_fixed(&ctx.http, msg.channel_id, None, Some(&embed)).await?;

    Ok(())
}

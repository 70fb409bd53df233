pub mod info;
pub mod utility;

use twilight_model::{
    gateway::payload::incoming::MessageCreate,
    id::{Id, marker::UserMarker},
};

use tally_core::Context;
use tally_utils::COMMAND_PREFIX;
use tally_utils::mention::has_mention_prefix;

// Global command meta data
pub struct CommandMeta {
    pub name: &'static str,
    pub desc: &'static str,
    pub category: &'static str,
    pub usage: &'static str,
}

pub const COMMANDS: &[CommandMeta] = &[
    utility::ping::META,
    utility::help::META,
    info::stats::META,
    info::user::META,
    // Add new commands here
];

/// A message split into a lowercase command name and its arguments.
#[derive(Debug, Eq, PartialEq)]
pub struct ParsedCommand<'a> {
    pub name: String,
    pub arg1: Option<&'a str>,
    pub arg_tail: Option<&'a str>,
}

/// Strip the `!` prefix or a leading mention of the bot itself.
fn strip_command_prefix(content: &str, bot_id: Option<Id<UserMarker>>) -> Option<&str> {
    if let Some(rest) = content.strip_prefix(COMMAND_PREFIX) {
        return Some(rest);
    }

    let (mentioned, offset) = has_mention_prefix(content)?;
    (Some(mentioned) == bot_id).then(|| &content[offset..])
}

pub fn parse_command(content: &str, bot_id: Option<Id<UserMarker>>) -> Option<ParsedCommand<'_>> {
    let content = strip_command_prefix(content.trim(), bot_id)?.trim();

    let mut command_and_rest = content.splitn(2, char::is_whitespace);
    let name = command_and_rest.next().unwrap_or("").to_ascii_lowercase();
    if name.is_empty() {
        return None;
    }

    let rest = command_and_rest
        .next()
        .map(str::trim)
        .filter(|value| !value.is_empty());

    let (arg1, arg_tail) = match rest {
        Some(value) => {
            let mut args = value.splitn(2, char::is_whitespace);
            let first = args.next().filter(|arg| !arg.is_empty());
            let tail = args
                .next()
                .map(str::trim)
                .filter(|remaining| !remaining.is_empty());

            (first, tail)
        }
        None => (None, None),
    };

    Some(ParsedCommand {
        name,
        arg1,
        arg_tail,
    })
}

pub async fn handle_message(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    if msg.author.bot {
        return Ok(());
    }

    let bot_id = ctx.cache.current_user().map(|user| user.id);
    let content_owned = msg.content.clone();
    let Some(command) = parse_command(&content_owned, bot_id) else {
        return Ok(());
    };

    match command.name.as_str() {
        "ping" => utility::ping::run(ctx, msg).await?,
        "help" => utility::help::run(ctx, msg).await?,
        "stats" => info::stats::run(ctx, msg).await?,
        "user" => info::user::run(ctx, msg, command.arg1).await?,
        // Add new commands here
        _ => {}
    }

    Ok(())
}

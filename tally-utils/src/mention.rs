use std::sync::LazyLock;

use regex::Regex;
use twilight_model::{
    channel::message::{AllowedMentions, MentionType},
    id::{
        Id,
        marker::{RoleMarker, UserMarker},
    },
    user::User,
};

static USER_MENTION: LazyLock<Regex> = LazyLock::new(|| compile(r"<@!?(\d{17,19})>"));
static ROLE_MENTION: LazyLock<Regex> = LazyLock::new(|| compile(r"<@&(\d{17,19})>"));
static EVERYONE_HERE_MENTION: LazyLock<Regex> = LazyLock::new(|| compile(r"@(everyone|here)"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("mention patterns are valid")
}

fn parse_snowflake<T>(raw: &str) -> Option<Id<T>> {
    raw.parse::<u64>().ok().and_then(Id::new_checked)
}

/// Parse a target user from a raw argument (`<@id>`, `<@!id>`, or raw ID).
///
/// Mentions must span the whole argument; text around them is rejected.
pub fn try_parse_mention(raw: &str) -> Option<Id<UserMarker>> {
    let trimmed = raw.trim();

    if let Some(id) = parse_snowflake(trimmed) {
        return Some(id);
    }

    let captures = USER_MENTION.captures(trimmed)?;
    let whole = captures.get(0)?;
    if whole.start() != 0 || whole.end() != trimmed.len() {
        return None;
    }

    parse_snowflake(captures.get(1)?.as_str())
}

/// Detect a leading `<@id> ` mention used as a command prefix.
///
/// Returns the mentioned user and the byte offset where the arguments begin.
pub fn has_mention_prefix(content: &str) -> Option<(Id<UserMarker>, usize)> {
    if content.len() <= 3 || !content.starts_with("<@") {
        return None;
    }

    let close = content.find('>')?;
    if content.as_bytes().get(close + 1) != Some(&b' ') {
        return None;
    }

    let user_id = try_parse_mention(&content[..=close])?;
    Some((user_id, close + 2))
}

/// Build an allow-list that pings exactly what `input` mentions.
///
/// `@everyone`/`@here` only pass through when `allow_everyone` is set.
pub fn parse_all_mentions(input: &str, allow_everyone: bool) -> AllowedMentions {
    let mut users: Vec<Id<UserMarker>> = Vec::new();
    for captures in USER_MENTION.captures_iter(input) {
        if let Some(id) = captures.get(1).and_then(|id| parse_snowflake(id.as_str()))
            && !users.contains(&id)
        {
            users.push(id);
        }
    }

    let mut roles: Vec<Id<RoleMarker>> = Vec::new();
    for captures in ROLE_MENTION.captures_iter(input) {
        if let Some(id) = captures.get(1).and_then(|id| parse_snowflake(id.as_str()))
            && !roles.contains(&id)
        {
            roles.push(id);
        }
    }

    let parse = if allow_everyone && EVERYONE_HERE_MENTION.is_match(input) {
        vec![MentionType::Everyone]
    } else {
        Vec::new()
    };

    AllowedMentions {
        parse,
        replied_user: false,
        roles,
        users,
    }
}

/// `name#1234 (<@id>)`, or `name (<@id>)` for accounts without a discriminator.
pub fn name_and_mention(user: &User) -> String {
    if user.discriminator == 0 {
        format!("{} (<@{}>)", user.name, user.id)
    } else {
        format!("{}#{:04} (<@{}>)", user.name, user.discriminator, user.id)
    }
}

/// Embed colors and line pagination.
pub mod embed;
/// Markdown escaping for user-supplied text.
pub mod markdown;
/// Mention parsing and allow-list construction.
pub mod mention;
/// Message sending helpers.
pub mod message;
/// Permission helper utilities.
pub mod permissions;
/// REST calls that treat missing resources as absent.
pub mod rest;
/// Snowflake timestamp conversion.
pub mod snowflake;

/// Single source of truth for the message-command prefix.
pub const COMMAND_PREFIX: char = '!';

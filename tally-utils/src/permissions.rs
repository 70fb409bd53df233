use tracing::debug;
use twilight_cache_inmemory::DefaultInMemoryCache;
use twilight_model::{
    guild::Permissions,
    id::{
        Id,
        marker::{ChannelMarker, GuildMarker, UserMarker},
    },
};

/// What anyone can do in a direct message channel.
pub const DM_PERMISSIONS: Permissions = Permissions::VIEW_CHANNEL
    .union(Permissions::SEND_MESSAGES)
    .union(Permissions::EMBED_LINKS)
    .union(Permissions::ATTACH_FILES)
    .union(Permissions::READ_MESSAGE_HISTORY)
    .union(Permissions::USE_EXTERNAL_EMOJIS)
    .union(Permissions::CONNECT)
    .union(Permissions::SPEAK)
    .union(Permissions::USE_VAD);

/// Convert a permission bitset into a sorted display list.
///
/// If `ADMINISTRATOR` is present, only `ADMINISTRATOR` is returned because
/// it implicitly grants all permissions.
pub fn permission_names(perms: Permissions) -> Vec<String> {
    if perms.contains(Permissions::ADMINISTRATOR) {
        return vec!["ADMINISTRATOR".to_owned()];
    }

    let mut names: Vec<String> = perms
        .iter_names()
        .map(|(name, _flag)| name.to_owned())
        .collect();
    names.sort_unstable();
    names
}

/// A channel that cannot be seen grants nothing, whatever the overwrites say.
pub fn require_view_channel(perms: Permissions) -> Permissions {
    if perms.contains(Permissions::VIEW_CHANNEL) {
        perms
    } else {
        Permissions::empty()
    }
}

/// Resolve a user's effective permissions in a channel.
///
/// Messages without a guild come from direct messages, which the gateway never
/// caches as channels; they grant [`DM_PERMISSIONS`]. Guild channels go through
/// the cache calculator, and anything it cannot resolve grants nothing.
pub fn permissions_in(
    cache: &DefaultInMemoryCache,
    guild_id: Option<Id<GuildMarker>>,
    channel_id: Id<ChannelMarker>,
    user_id: Id<UserMarker>,
) -> Permissions {
    let Some(guild_id) = guild_id else {
        return DM_PERMISSIONS;
    };

    match cache.permissions().in_channel(user_id, channel_id) {
        Ok(perms) => require_view_channel(perms),
        Err(source) => {
            debug!(
                ?source,
                guild_id = guild_id.get(),
                channel_id = channel_id.get(),
                user_id = user_id.get(),
                "permission calculation failed"
            );
            Permissions::empty()
        }
    }
}

/// The bot's own permissions in a channel.
pub fn bot_permissions(
    cache: &DefaultInMemoryCache,
    guild_id: Option<Id<GuildMarker>>,
    channel_id: Id<ChannelMarker>,
) -> Permissions {
    if guild_id.is_none() {
        return DM_PERMISSIONS;
    }

    let Some(bot_id) = cache.current_user().map(|user| user.id) else {
        return Permissions::empty();
    };

    permissions_in(cache, guild_id, channel_id, bot_id)
}

/// Whether the bot holds every permission in `required`.
pub fn bot_has_all_permissions(
    cache: &DefaultInMemoryCache,
    guild_id: Option<Id<GuildMarker>>,
    channel_id: Id<ChannelMarker>,
    required: Permissions,
) -> bool {
    bot_permissions(cache, guild_id, channel_id).contains(required)
}

use std::sync::Arc;

use twilight_cache_inmemory::DefaultInMemoryCache;
use twilight_model::{
    channel::ChannelType,
    gateway::presence::Status,
    id::{
        Id,
        marker::{ChannelMarker, GuildMarker, UserMarker},
    },
};

/// A member's identity and presence as seen in one guild.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MemberPresence {
    pub user_id: Id<UserMarker>,
    pub status: Status,
}

/// Point-in-time view of one cached guild.
#[derive(Clone, Debug)]
pub struct GuildSnapshot {
    pub guild_id: Id<GuildMarker>,
    pub text_channels: usize,
    pub members: Vec<MemberPresence>,
}

/// Read-only access to the guilds a gateway connection currently knows about.
pub trait GuildCache {
    /// Take one snapshot of every cached guild.
    ///
    /// Each call re-reads the cache; callers that need consistent totals must
    /// derive all of them from a single returned list.
    fn guild_snapshots(&self) -> Vec<GuildSnapshot>;
}

impl<T: GuildCache + ?Sized> GuildCache for Arc<T> {
    fn guild_snapshots(&self) -> Vec<GuildSnapshot> {
        (**self).guild_snapshots()
    }
}

/// Announcement channels are text channels with a publish button.
pub fn is_text_channel(kind: ChannelType) -> bool {
    matches!(kind, ChannelType::GuildText | ChannelType::GuildAnnouncement)
}

impl GuildCache for DefaultInMemoryCache {
    fn guild_snapshots(&self) -> Vec<GuildSnapshot> {
        let guild_ids: Vec<Id<GuildMarker>> =
            self.iter().guilds().map(|guild| *guild.key()).collect();

        guild_ids
            .into_iter()
            .map(|guild_id| snapshot_guild(self, guild_id))
            .collect()
    }
}

fn snapshot_guild(cache: &DefaultInMemoryCache, guild_id: Id<GuildMarker>) -> GuildSnapshot {
    let channel_ids: Vec<Id<ChannelMarker>> = cache
        .guild_channels(guild_id)
        .map(|ids| ids.iter().copied().collect())
        .unwrap_or_default();

    let text_channels = channel_ids
        .into_iter()
        .filter(|channel_id| {
            cache
                .channel(*channel_id)
                .is_some_and(|channel| is_text_channel(channel.kind))
        })
        .count();

    let user_ids: Vec<Id<UserMarker>> = cache
        .guild_members(guild_id)
        .map(|ids| ids.iter().copied().collect())
        .unwrap_or_default();

    // Members without a cached presence have not been seen online.
    let members = user_ids
        .into_iter()
        .map(|user_id| MemberPresence {
            user_id,
            status: cache
                .presence(guild_id, user_id)
                .map_or(Status::Offline, |presence| presence.status()),
        })
        .collect();

    GuildSnapshot {
        guild_id,
        text_channels,
        members,
    }
}

use twilight_cache_inmemory::DefaultInMemoryCache;
use twilight_http::{Client, request::channel::reaction::RequestReactionType};
use twilight_model::{
    channel::{
        Message,
        message::{AllowedMentions, embed::Embed},
    },
    id::{
        Id,
        marker::{ChannelMarker, MessageMarker, UserMarker},
    },
    user::User,
};

/// Send a message that pings nobody, whatever its content mentions.
pub async fn send_message_fixed(
    http: &Client,
    channel_id: Id<ChannelMarker>,
    content: Option<&str>,
    embed: Option<&Embed>,
) -> anyhow::Result<Message> {
    let no_pings = AllowedMentions::default();
    let embeds = embed.map(std::slice::from_ref).unwrap_or_default();

    let request = http
        .create_message(channel_id)
        .allowed_mentions(Some(&no_pings))
        .embeds(embeds);

    let response = match content {
        Some(content) => request.content(content).await?,
        None => request.await?,
    };

    Ok(response.model().await?)
}

/// React with each unicode emoji in order, stopping at the first failure.
pub async fn create_reactions_bulk(
    http: &Client,
    channel_id: Id<ChannelMarker>,
    message_id: Id<MessageMarker>,
    reactions: &[&str],
) -> anyhow::Result<()> {
    for &name in reactions {
        http.create_reaction(
            channel_id,
            message_id,
            &RequestReactionType::Unicode { name },
        )
        .await?;
    }

    Ok(())
}

/// Look a user up in the gateway cache without touching the API.
pub fn cached_user(cache: &DefaultInMemoryCache, user_id: Id<UserMarker>) -> Option<User> {
    cache.user(user_id).map(|user| user.value().clone())
}

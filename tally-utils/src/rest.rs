use std::future::IntoFuture;

use serde::de::DeserializeOwned;
use twilight_http::{Client, Error as HttpError, Response, error::ErrorType};
use twilight_model::{
    channel::{Channel, Message},
    guild::{Guild, Member},
    id::{
        Id,
        marker::{ChannelMarker, GuildMarker, MessageMarker, UserMarker},
    },
    user::User,
};

/// Statuses meaning "this resource is gone or hidden from us".
pub fn is_absent_status(status: u16) -> bool {
    matches!(status, 401 | 403 | 404)
}

/// Whether an HTTP error only says the resource can't be seen.
pub fn is_absent_error(error: &HttpError) -> bool {
    matches!(
        error.kind(),
        ErrorType::Response { status, .. } if is_absent_status(status.get())
    )
}

/// Await a request, mapping not-found and unauthorized responses to `None`.
///
/// Every other failure, including body deserialization, is returned as an error.
pub async fn optional_model<R, T>(request: R) -> anyhow::Result<Option<T>>
where
    R: IntoFuture<Output = Result<Response<T>, HttpError>>,
    T: DeserializeOwned + Unpin,
{
    match request.await {
        Ok(response) => Ok(Some(response.model().await?)),
        Err(source) if is_absent_error(&source) => Ok(None),
        Err(source) => Err(source.into()),
    }
}

pub async fn get_user(http: &Client, user_id: Id<UserMarker>) -> anyhow::Result<Option<User>> {
    optional_model(http.user(user_id)).await
}

pub async fn get_channel(
    http: &Client,
    channel_id: Id<ChannelMarker>,
) -> anyhow::Result<Option<Channel>> {
    optional_model(http.channel(channel_id)).await
}

pub async fn get_guild(http: &Client, guild_id: Id<GuildMarker>) -> anyhow::Result<Option<Guild>> {
    optional_model(http.guild(guild_id)).await
}

pub async fn get_member(
    http: &Client,
    guild_id: Id<GuildMarker>,
    user_id: Id<UserMarker>,
) -> anyhow::Result<Option<Member>> {
    optional_model(http.guild_member(guild_id, user_id)).await
}

pub async fn get_message(
    http: &Client,
    channel_id: Id<ChannelMarker>,
    message_id: Id<MessageMarker>,
) -> anyhow::Result<Option<Message>> {
    optional_model(http.message(channel_id, message_id)).await
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    const USER: u64 = 80351110224678912;

    /// Serve a single canned response over plain HTTP and return its address.
    async fn respond_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();

            let mut request = Vec::new();
            let mut buf = [0_u8; 1024];
            while !request.windows(4).any(|window| window == b"\r\n\r\n") {
                let read = socket.read(&mut buf).await.unwrap();
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..read]);
            }

            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
        });

        addr.to_string()
    }

    fn local_client(addr: String) -> Client {
        Client::builder()
            .token("test-token".to_owned())
            .proxy(addr, true)
            .ratelimiter(None)
            .build()
    }

    #[test]
    fn absent_statuses() {
        assert!(is_absent_status(401));
        assert!(is_absent_status(403));
        assert!(is_absent_status(404));
    }

    #[test]
    fn other_statuses_are_real_failures() {
        for status in [400, 429, 500, 502] {
            assert!(!is_absent_status(status), "{status} should not be absent");
        }
    }

    #[tokio::test]
    async fn found_resource_is_returned() {
        let addr = respond_once(
            "200 OK",
            r#"{"id":"80351110224678912","username":"nelly","discriminator":"0","avatar":null}"#,
        )
        .await;

        let user = get_user(&local_client(addr), Id::new(USER))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(user.id, Id::new(USER));
        assert_eq!(user.name, "nelly");
    }

    #[tokio::test]
    async fn not_found_maps_to_none() {
        let addr = respond_once(
            "404 Not Found",
            r#"{"code":10013,"message":"Unknown User"}"#,
        )
        .await;

        let user = get_user(&local_client(addr), Id::new(USER)).await.unwrap();

        assert!(user.is_none());
    }

    #[tokio::test]
    async fn forbidden_maps_to_none() {
        let addr = respond_once(
            "403 Forbidden",
            r#"{"code":50001,"message":"Missing Access"}"#,
        )
        .await;

        let channel = get_channel(&local_client(addr), Id::new(1)).await.unwrap();

        assert!(channel.is_none());
    }

    #[tokio::test]
    async fn server_errors_propagate() {
        let addr = respond_once(
            "500 Internal Server Error",
            r#"{"code":0,"message":"500: Internal Server Error"}"#,
        )
        .await;

        let result = get_user(&local_client(addr), Id::new(USER)).await;

        assert!(result.is_err());
    }
}

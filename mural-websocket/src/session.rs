use async_trait::async_trait;
use futures_util::{stream::SplitSink, SinkExt};
use meio::{ActionHandler, Actor, Address, Consumer, Context, StartedBy, StreamAcceptor, System};
use mural_shared::websocket::WebSocketMessage;
use tokio::net::TcpStream;
use tokio_tungstenite::{
    tungstenite::{Error as WsError, Message},
    WebSocketStream,
};
use uuid::Uuid;

use crate::{
    messages::{CloseSession, WebSocketSessionMessage},
    BroadcastServer,
};

///
/// A single subscriber connection.
///
/// Owns the outgoing half of the websocket stream; the incoming half is
/// attached as a consumed stream when the session is spawned.
///
pub struct BroadcastSession {
    pub session_id: Uuid,
    pub connection: SplitSink<WebSocketStream<TcpStream>, Message>,
    pub server: Address<BroadcastServer>,
}

impl BroadcastSession {
    async fn send(&mut self, message: &WebSocketMessage) -> Result<(), WsError> {
        let serialized = serde_json::to_string(message).expect("Failed to serialize message");

        self.connection.send(Message::Text(serialized)).await
    }

    async fn close(&mut self, ctx: &mut Context<Self>) {
        if let Err(error) = self
            .server
            .act(CloseSession {
                session_id: self.session_id,
            })
            .await
        {
            tracing::warn!("Failed to deregister websocket session: {:?}", error);
        }

        ctx.shutdown();
    }
}

impl Actor for BroadcastSession {
    type GroupBy = ();
}

impl StreamAcceptor<Result<Message, WsError>> for BroadcastSession {
    fn stream_group(&self) -> Self::GroupBy {}
}

#[async_trait]
impl StartedBy<System> for BroadcastSession {
    async fn handle(&mut self, _ctx: &mut Context<Self>) -> Result<(), anyhow::Error> {
        self.send(&WebSocketMessage::Ready).await?;

        Ok(())
    }
}

#[async_trait]
impl ActionHandler<WebSocketSessionMessage> for BroadcastSession {
    async fn handle(
        &mut self,
        msg: WebSocketSessionMessage,
        ctx: &mut Context<Self>,
    ) -> Result<(), anyhow::Error> {
        let message = match msg {
            WebSocketSessionMessage::NewMessage(message) => {
                WebSocketMessage::NewMessage { message }
            }
        };

        if let Err(error) = self.send(&message).await {
            tracing::warn!("Failed to deliver message to session: {:?}", error);
            self.close(ctx).await;
        }

        Ok(())
    }
}

#[async_trait]
impl Consumer<Result<Message, WsError>> for BroadcastSession {
    async fn handle(
        &mut self,
        item: Result<Message, WsError>,
        ctx: &mut Context<Self>,
    ) -> Result<(), anyhow::Error> {
        match item {
            Ok(Message::Text(text)) => {
                // Malformed frames are ignored, the session stays open.
                let message = match serde_json::from_str::<WebSocketMessage>(&text) {
                    Ok(value) => value,
                    Err(_) => return Ok(()),
                };

                if let WebSocketMessage::Ping = message {
                    if let Err(error) = self.send(&WebSocketMessage::Pong).await {
                        tracing::warn!("Failed to answer ping: {:?}", error);
                        self.close(ctx).await;
                    }
                }
            }
            Ok(Message::Close(_)) => {
                self.close(ctx).await;
            }
            Err(error) => {
                tracing::warn!("Websocket session failed: {:?}", error);
                self.close(ctx).await;
            }
            _ => (),
        }

        Ok(())
    }
}

use serde::{Deserialize, Serialize};

use crate::messages::MessageResponse;

///
/// These messages are sent and received via the websocket fan-out service.
///
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum WebSocketMessage {
    /// Sent periodically from the client, the server has to respond with a [`WebSocketMessage::Pong`].
    Ping,
    /// Sent as a response to a [`WebSocketMessage::Ping`] message.
    Pong,
    /// Sent to the client once its subscription is registered.
    Ready,
    /// Sent to the client to inform it about a newly created message.
    NewMessage { message: MessageResponse },
}

use meio::{Action, Address};
use mural_shared::messages::MessageResponse;
use uuid::Uuid;

use crate::BroadcastSession;

///
/// These messages are sent from the [`crate::BroadcastServer`] to a
/// [`crate::BroadcastSession`].
///
#[derive(Debug, Clone)]
pub enum WebSocketSessionMessage {
    /// Tells the session to notify its client about a new message.
    NewMessage(MessageResponse),
}

impl Action for WebSocketSessionMessage {}

///
/// Registers a freshly connected session with the fan-out server.
///
pub struct ConnectSession {
    pub session_id: Uuid,
    pub addr: Address<BroadcastSession>,
}

impl Action for ConnectSession {}

///
/// Removes a closed or unreachable session from the fan-out server.
///
#[derive(Debug)]
pub struct CloseSession {
    pub session_id: Uuid,
}

impl Action for CloseSession {}

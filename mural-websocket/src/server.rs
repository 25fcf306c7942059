use std::collections::HashMap;

use async_trait::async_trait;
use meio::{ActionHandler, Actor, Address, Context, StartedBy, System};
use mural_shared::{broker::BrokerEvent, messages::MessageResponse};
use uuid::Uuid;

use crate::{
    messages::{CloseSession, ConnectSession, WebSocketSessionMessage},
    BroadcastSession,
};

///
/// Tracks all connected [`crate::BroadcastSession`]s and fans broker events
/// out to every one of them.
///
/// Delivery is best-effort: a session that cannot be reached is dropped from
/// the table, nothing is buffered or retried.
///
pub struct BroadcastServer {
    sessions: HashMap<Uuid, Address<BroadcastSession>>,
}

impl BroadcastServer {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
        }
    }

    fn connect_session(&mut self, session_id: Uuid, addr: Address<BroadcastSession>) {
        self.sessions.insert(session_id, addr);
    }

    fn close_session(&mut self, session_id: Uuid) {
        self.sessions.remove(&session_id);
    }

    async fn new_message(&mut self, message: MessageResponse) {
        let mut stale = Vec::new();

        for (session_id, recipient) in self.sessions.iter_mut() {
            let result = recipient
                .act(WebSocketSessionMessage::NewMessage(message.clone()))
                .await;

            if let Err(error) = result {
                tracing::warn!(
                    "Failed to reach websocket session {}: {:?}",
                    session_id,
                    error
                );
                stale.push(*session_id);
            }
        }

        for session_id in stale {
            self.sessions.remove(&session_id);
        }
    }
}

impl Default for BroadcastServer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StartedBy<System> for BroadcastServer {
    async fn handle(&mut self, _ctx: &mut Context<Self>) -> Result<(), anyhow::Error> {
        Ok(())
    }
}

impl Actor for BroadcastServer {
    type GroupBy = ();
}

#[async_trait]
impl ActionHandler<ConnectSession> for BroadcastServer {
    async fn handle(
        &mut self,
        msg: ConnectSession,
        _ctx: &mut Context<Self>,
    ) -> Result<(), anyhow::Error> {
        self.connect_session(msg.session_id, msg.addr);

        Ok(())
    }
}

#[async_trait]
impl ActionHandler<CloseSession> for BroadcastServer {
    async fn handle(
        &mut self,
        msg: CloseSession,
        _ctx: &mut Context<Self>,
    ) -> Result<(), anyhow::Error> {
        self.close_session(msg.session_id);

        Ok(())
    }
}

#[async_trait]
impl ActionHandler<BrokerEvent> for BroadcastServer {
    async fn handle(
        &mut self,
        msg: BrokerEvent,
        _ctx: &mut Context<Self>,
    ) -> Result<(), anyhow::Error> {
        match msg {
            BrokerEvent::NewMessage { message } => self.new_message(message).await,
        }

        Ok(())
    }
}

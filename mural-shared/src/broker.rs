use meio::Action;
use serde::{Deserialize, Serialize};

use crate::messages::MessageResponse;

///
/// Events published by the HTTP API to the broker queue and consumed by the
/// websocket fan-out service.
///
/// The payload carries the full stored record, so consumers never have to
/// read the database to deliver it.
///
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BrokerEvent {
    NewMessage { message: MessageResponse },
}

impl Action for BrokerEvent {}

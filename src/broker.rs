use actix::{Actor, Context, ContextFutureSpawner, Handler, WrapFuture};
use lapin::{options::BasicPublishOptions, BasicProperties, Channel, Connection};
use mural_shared::broker::BrokerEvent;

///
/// Publishes [`BrokerEvent`]s to the well-known queue.
///
/// Publishing is fire-and-forget: callers use [`actix::Addr::do_send`] and a
/// failed publish is logged, never reported back. Durability of the stored
/// message is the correctness guarantee, the broadcast is only a hint for
/// live subscribers.
///
pub struct Broker {
    pub queue: String,
    pub channel: Channel,
    // Owns the connection the channel was created on, keeping it open for
    // the lifetime of the actor.
    pub connection: Connection,
}

impl Actor for Broker {
    type Context = Context<Self>;
}

#[derive(Debug, Clone, actix::prelude::Message)]
#[rtype(result = "()")]
pub struct PublishBrokerEvent {
    pub broker_event: BrokerEvent,
}

impl Handler<PublishBrokerEvent> for Broker {
    type Result = ();

    fn handle(&mut self, msg: PublishBrokerEvent, ctx: &mut Self::Context) -> Self::Result {
        let payload = match serde_json::to_vec(&msg.broker_event) {
            Ok(payload) => payload,
            Err(error) => {
                tracing::error!("Failed to serialize broker event: {:?}", error);
                return;
            }
        };

        let channel = self.channel.clone();
        let queue = self.queue.clone();

        async move {
            let confirmation = async {
                channel
                    .basic_publish(
                        "",
                        &queue,
                        BasicPublishOptions::default(),
                        &payload,
                        BasicProperties::default(),
                    )
                    .await?
                    .await
            }
            .await;

            if let Err(error) = confirmation {
                tracing::error!("Failed to publish broker event: {:?}", error);
            }
        }
        .into_actor(self)
        .wait(ctx)
    }
}

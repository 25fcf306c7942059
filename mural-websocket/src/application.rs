use futures_util::StreamExt;
use lapin::{
    options::{BasicAckOptions, BasicConsumeOptions, QueueDeclareOptions},
    types::FieldTable,
    Connection, ConnectionProperties,
};
use meio::{Address, System};
use mural_shared::{broker::BrokerEvent, settings::Settings};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::accept_async;
use uuid::Uuid;

use crate::{messages::ConnectSession, BroadcastServer, BroadcastSession};

pub struct Application {
    listener: TcpListener,
    amqp_connection: Connection,
    port: u16,
    broker_queue: String,
    broadcast_server: Address<BroadcastServer>,
}

impl Application {
    pub async fn build(settings: Settings) -> Result<Self, std::io::Error> {
        let address = format!("{}:{}", settings.websocket.host, settings.websocket.port);

        let broadcast_server = System::spawn(BroadcastServer::new());

        let amqp_connection = Connection::connect(
            &settings.broker.get_connection_string(),
            ConnectionProperties::default(),
        )
        .await
        .expect("Could not connect to broker.");

        let listener = TcpListener::bind(&address).await?;
        let port = listener.local_addr()?.port();

        Ok(Self {
            listener,
            amqp_connection,
            port,
            broker_queue: settings.broker.queue,
            broadcast_server,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) {
        let amqp_connection = self.amqp_connection;
        let broker_queue = self.broker_queue;
        let address = self.broadcast_server.clone();

        tokio::spawn(async move {
            let channel = amqp_connection
                .create_channel()
                .await
                .expect("Could not create broker channel.");

            channel
                .queue_declare(
                    &broker_queue,
                    QueueDeclareOptions::default(),
                    FieldTable::default(),
                )
                .await
                .expect("Could not declare broker queue.");

            let mut consumer = channel
                .basic_consume(
                    &broker_queue,
                    "mural_websocket",
                    BasicConsumeOptions::default(),
                    FieldTable::default(),
                )
                .await
                .expect("Could not start broker consumer.");

            while let Some(delivery) = consumer.next().await {
                let delivery = match delivery {
                    Ok(delivery) => delivery,
                    Err(error) => {
                        tracing::error!("Broker consumer failed: {:?}", error);
                        continue;
                    }
                };

                if let Err(error) = delivery.ack(BasicAckOptions::default()).await {
                    tracing::error!("Failed to ack broker delivery: {:?}", error);
                }

                let broker_event: BrokerEvent = match serde_json::from_slice(&delivery.data) {
                    Ok(event) => event,
                    Err(error) => {
                        tracing::error!("Discarding malformed broker event: {:?}", error);
                        continue;
                    }
                };

                if let Err(error) = address.clone().act(broker_event).await {
                    tracing::error!("Failed to forward broker event: {:?}", error);
                }
            }
        });

        while let Ok((stream, _)) = self.listener.accept().await {
            tokio::spawn(handle_connection(stream, self.broadcast_server.clone()));
        }
    }
}

async fn handle_connection(
    stream: TcpStream,
    mut server: Address<BroadcastServer>,
) -> tokio_tungstenite::tungstenite::Result<()> {
    let websocket_stream = accept_async(stream).await?;

    let (outgoing, incoming) = websocket_stream.split();
    let session_id = Uuid::new_v4();

    let mut session = System::spawn(BroadcastSession {
        session_id,
        connection: outgoing,
        server: server.clone(),
    });

    let registration = server
        .act(ConnectSession {
            session_id,
            addr: session.clone(),
        })
        .await;

    if let Err(error) = registration {
        tracing::warn!("Failed to register websocket session: {:?}", error);
        return Ok(());
    }

    if let Err(error) = session.attach(incoming, ()) {
        tracing::warn!("Failed to attach websocket stream to session: {:?}", error);
    }

    Ok(())
}

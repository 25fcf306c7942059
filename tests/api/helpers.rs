use std::time::Duration;

use actix_codec::Framed;
use actix_http::ws;
use awc::{ws::Codec, BoxedSocket};
use fake::{
    faker::{lorem::en::Sentence, name::en::Name},
    Fake,
};
use futures::{SinkExt, StreamExt};
use lapin::{options::BasicPublishOptions, BasicProperties};
use mural::application::Application;
use mural_shared::{
    broker::BrokerEvent,
    settings::{get_db_pool, get_settings, DatabaseSettings, Settings},
    telemetry::{get_subscriber, init_subscriber},
    websocket::WebSocketMessage,
};
use once_cell::sync::Lazy;
use sqlx::{types::Uuid, Connection, Executor, PgConnection, PgPool};

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber)
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber)
    };
});

pub enum BootstrapType {
    Default,
    Seeded,
}

pub type WebSocketConnection = Framed<BoxedSocket, Codec>;

pub struct TestApplication {
    pub address: String,
    pub port: u16,
    pub websocket_address: String,
    pub db_pool: PgPool,
    pub settings: Settings,
    seeded_messages: Vec<TestMessage>,
}

impl TestApplication {
    ///
    /// The messages stored by the `Seeded` bootstrap, oldest first.
    ///
    pub fn seeded_messages(&self) -> &[TestMessage] {
        &self.seeded_messages
    }

    pub async fn get_messages(&self) -> reqwest::Response {
        reqwest::Client::new()
            .get(&format!("{}/api/messages", &self.address))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_create_message(&self, body: serde_json::Value) -> reqwest::Response {
        reqwest::Client::new()
            .post(&format!("{}/api/messages", &self.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn websocket(&self) -> (awc::ClientResponse, WebSocketConnection) {
        awc::Client::new()
            .ws(self.websocket_address.as_str())
            .connect()
            .await
            .expect("Failed to connect to websocket server.")
    }

    ///
    /// Open a websocket connection and consume the initial `Ready` message.
    ///
    pub async fn get_ready_websocket_connection(&self) -> WebSocketConnection {
        let (_response, mut connection) = self.websocket().await;

        match get_next_websocket_message(&mut connection).await {
            Some(WebSocketMessage::Ready) => (),
            fallback => panic!("Did not receive a ready message: {:?}", fallback),
        }

        connection
    }
}

pub async fn get_next_websocket_message(
    connection: &mut WebSocketConnection,
) -> Option<WebSocketMessage> {
    let frame = tokio::time::timeout(Duration::from_secs(5), connection.next()).await;

    match frame {
        Ok(Some(Ok(ws::Frame::Text(text)))) => serde_json::from_slice(&text).ok(),
        _ => None,
    }
}

pub async fn send_websocket_message(connection: &mut WebSocketConnection, message: WebSocketMessage) {
    connection
        .send(ws::Message::Text(
            serde_json::to_string(&message).unwrap().into(),
        ))
        .await
        .expect("Failed to send websocket message.");
}

///
/// Publish an event the way the HTTP API does, straight to the queue.
///
pub async fn publish_broker_event(app: &TestApplication, broker_event: BrokerEvent) {
    let connection = lapin::Connection::connect(
        &app.settings.broker.get_connection_string(),
        lapin::ConnectionProperties::default(),
    )
    .await
    .expect("Failed to connect to broker.");

    let channel = connection
        .create_channel()
        .await
        .expect("Failed to create broker channel.");

    channel
        .basic_publish(
            "",
            &app.settings.broker.queue,
            BasicPublishOptions::default(),
            &serde_json::to_vec(&broker_event).unwrap(),
            BasicProperties::default(),
        )
        .await
        .expect("Failed to publish broker event.")
        .await
        .expect("Failed to confirm broker event.");
}

pub async fn spawn_app(bootstrap_type: BootstrapType) -> TestApplication {
    Lazy::force(&TRACING);

    let settings = {
        let mut settings = get_settings().expect("Failed to read settings");

        settings.database.database_name = Uuid::new_v4().to_string();
        settings.application.port = 0;
        settings.websocket.port = 0;
        settings.broker.queue = Uuid::new_v4().to_string();

        settings
    };

    configure_database(&settings.database).await;

    let application = Application::build(settings.clone())
        .await
        .expect("Failed to build application");

    let application_port = application.port();

    let _ = tokio::spawn(application.run_until_stopped());

    let websocket_application = mural_websocket::application::Application::build(settings.clone())
        .await
        .expect("Failed to build websocket application");

    let websocket_port = websocket_application.port();

    let _ = tokio::spawn(websocket_application.run_until_stopped());

    let mut test_application = TestApplication {
        address: format!("http://localhost:{}", application_port),
        port: application_port,
        websocket_address: format!("ws://localhost:{}", websocket_port),
        db_pool: get_db_pool(&settings.database)
            .await
            .expect("Failed to connect to database"),
        settings,
        seeded_messages: vec![],
    };

    match bootstrap_type {
        BootstrapType::Default => (),
        BootstrapType::Seeded => {
            // Oldest first, so the last stored message is the newest one.
            for minutes_ago in [2i32, 1, 0] {
                let test_message = TestMessage::generate();
                test_message
                    .store(&test_application.db_pool, minutes_ago)
                    .await;

                test_application.seeded_messages.push(test_message);
            }
        }
    }

    test_application
}

async fn configure_database(settings: &DatabaseSettings) -> PgPool {
    let mut connection = PgConnection::connect_with(&settings.without_db())
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(&*format!(
            r#"CREATE DATABASE "{}";"#,
            settings.database_name
        ))
        .await
        .expect("Failed to create database.");

    let connection_pool = PgPool::connect_with(settings.with_db())
        .await
        .expect("Failed to connect to Postgres.");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database");

    connection_pool
}

pub async fn teardown(settings: &DatabaseSettings) {
    let mut connection = PgConnection::connect_with(&settings.without_db())
        .await
        .expect("Failed to connect to Postgres");

    connection
        .execute(&*format!(
            r#"DROP DATABASE "{}" WITH (FORCE);"#,
            settings.database_name
        ))
        .await
        .expect("Failed to drop test database.");
}

#[derive(Debug, Clone)]
pub struct TestMessage {
    pub id: Uuid,
    pub author: String,
    pub body: String,
}

impl TestMessage {
    pub fn generate() -> Self {
        Self {
            id: Uuid::new_v4(),
            author: Name().fake(),
            body: Sentence(3..8).fake(),
        }
    }

    pub async fn store(&self, pool: &PgPool, minutes_ago: i32) {
        sqlx::query(
            "INSERT INTO messages (id, author, body, created_at)
             VALUES ($1, $2, $3, now() - make_interval(mins => $4))",
        )
        .bind(self.id)
        .bind(&self.author)
        .bind(&self.body)
        .bind(minutes_ago)
        .execute(pool)
        .await
        .expect("Failed to store test message.");
    }
}

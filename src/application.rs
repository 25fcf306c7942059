use std::net::TcpListener;

use actix::{Actor, Addr};
use actix_cors::Cors;
use actix_web::{dev::Server, web, web::Data, App, HttpServer};
use lapin::{options::QueueDeclareOptions, types::FieldTable, Connection, ConnectionProperties};
use mural_shared::settings::{get_db_pool, Settings};
use sqlx::PgPool;
use tracing_actix_web::TracingLogger;

use crate::{
    broker::Broker,
    routes::{health_check, messages},
};

pub struct Application {
    server: Server,
    port: u16,
}

impl Application {
    pub async fn build(settings: Settings) -> Result<Self, std::io::Error> {
        let db_pool = get_db_pool(&settings.database)
            .await
            .expect("Could not connect to database.");

        let broker = get_broker(&settings).await;

        let address = format!(
            "{}:{}",
            settings.application.host, settings.application.port
        );

        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr().unwrap().port();

        let server = run(listener, db_pool, broker)?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

///
/// Connect to the AMQP broker and make sure the well-known queue exists.
///
async fn get_broker(settings: &Settings) -> Broker {
    let connection = Connection::connect(
        &settings.broker.get_connection_string(),
        ConnectionProperties::default(),
    )
    .await
    .expect("Could not connect to broker.");

    let channel = connection
        .create_channel()
        .await
        .expect("Could not create broker channel.");

    channel
        .queue_declare(
            &settings.broker.queue,
            QueueDeclareOptions::default(),
            FieldTable::default(),
        )
        .await
        .expect("Could not declare broker queue.");

    Broker {
        queue: settings.broker.queue.clone(),
        channel,
        connection,
    }
}

fn run(listener: TcpListener, db_pool: PgPool, broker: Broker) -> Result<Server, std::io::Error> {
    let db_pool = Data::new(db_pool);
    let broker: Data<Addr<Broker>> = Data::new(broker.start());

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(
                Cors::default()
                    .allow_any_header()
                    .allow_any_method()
                    .allow_any_origin(),
            )
            .app_data(db_pool.clone())
            .app_data(broker.clone())
            .route("/health_check", web::get().to(health_check))
            .route("/api/messages", web::get().to(messages::get_messages))
            .route("/api/messages", web::post().to(messages::create_message))
    })
    .listen(listener)?
    .run();

    Ok(server)
}

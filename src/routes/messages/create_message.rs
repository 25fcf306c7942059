use std::convert::{TryFrom, TryInto};

use actix::Addr;
use actix_http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use anyhow::Context;
use mural_db::messages::{
    models::{AuthorName, MessageBody, NewMessage},
    queries::insert_message,
};
use mural_shared::{broker::BrokerEvent, error_chain_fmt, messages::MessageResponse};
use sqlx::PgPool;

use crate::broker::{Broker, PublishBrokerEvent};

#[derive(serde::Deserialize)]
pub struct BodyData {
    author: Option<String>,
    body: Option<String>,
}

impl TryFrom<BodyData> for NewMessage {
    type Error = String;

    fn try_from(value: BodyData) -> Result<Self, Self::Error> {
        let author = AuthorName::parse(value.author.unwrap_or_default())?;
        let body = MessageBody::parse(value.body.unwrap_or_default())?;

        Ok(Self { author, body })
    }
}

#[derive(thiserror::Error)]
pub enum CreateMessageError {
    #[error("{0}")]
    ValidationError(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for CreateMessageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for CreateMessageError {
    fn status_code(&self) -> StatusCode {
        match *self {
            CreateMessageError::ValidationError(_) => StatusCode::BAD_REQUEST,
            CreateMessageError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "error": self.to_string() }))
    }
}

///
/// Stores a new message and announces it to live subscribers.
///
/// The announcement happens after the transaction commits and is
/// fire-and-forget; a broker failure never fails the request.
///
#[tracing::instrument(name = "Create a new message", skip(body, pool, broker))]
pub async fn create_message(
    body: web::Json<BodyData>,
    pool: web::Data<PgPool>,
    broker: web::Data<Addr<Broker>>,
) -> Result<HttpResponse, CreateMessageError> {
    let new_message: NewMessage = body
        .0
        .try_into()
        .map_err(CreateMessageError::ValidationError)?;

    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a postgres connection from pool.")?;

    let message = insert_message(&mut transaction, &new_message)
        .await
        .context("Failed to insert a new message to the database.")?;

    transaction
        .commit()
        .await
        .context("Failed to commit SQL transaction to store a new message.")?;

    let response: MessageResponse = message.into();

    broker.do_send(PublishBrokerEvent {
        broker_event: BrokerEvent::NewMessage {
            message: response.clone(),
        },
    });

    Ok(HttpResponse::Ok().json(response))
}

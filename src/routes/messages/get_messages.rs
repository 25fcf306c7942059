use actix_web::{web, HttpResponse, ResponseError};
use anyhow::Context;
use mural_db::messages::queries::get_all_messages;
use mural_shared::{error_chain_fmt, messages::MessageResponse};
use sqlx::PgPool;

#[derive(thiserror::Error)]
pub enum GetMessagesError {
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for GetMessagesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for GetMessagesError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "error": self.to_string() }))
    }
}

#[tracing::instrument(name = "Get all messages", skip(pool))]
pub async fn get_messages(pool: web::Data<PgPool>) -> Result<HttpResponse, GetMessagesError> {
    let messages = get_all_messages(&pool)
        .await
        .context("Failed to retrieve messages.")?;

    let response: Vec<MessageResponse> = messages.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(response))
}

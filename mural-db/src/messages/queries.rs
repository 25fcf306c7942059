use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::models::*;

///
/// Fetch all guestbook messages, newest first.
///
/// `created_at` is the sole ordering key, backed by a descending index.
///
#[tracing::instrument(name = "Get all messages", skip(pool))]
pub async fn get_all_messages(pool: &PgPool) -> Result<Vec<MessageModel>, sqlx::Error> {
    sqlx::query_as::<_, MessageModel>(
        r#"
        SELECT id, author, body, created_at
        FROM messages
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await
}

///
/// Insert a new guestbook message.
///
/// The database assigns `created_at`, the returned model carries the fully
/// stored record.
///
#[tracing::instrument(name = "Saving a new message to the database", skip(transaction, new_message))]
pub async fn insert_message(
    transaction: &mut Transaction<'_, Postgres>,
    new_message: &NewMessage,
) -> Result<MessageModel, sqlx::Error> {
    sqlx::query_as::<_, MessageModel>(
        r#"
        INSERT INTO messages (id, author, body)
        VALUES ($1, $2, $3)
        RETURNING id, author, body, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new_message.author.as_ref())
    .bind(new_message.body.as_ref())
    .fetch_one(transaction)
    .await
}

use chrono::{DateTime, Utc};
use mural_shared::messages::MessageResponse;
use uuid::Uuid;

///
/// Contains validated data to create a new guestbook message.
///
pub struct NewMessage {
    pub author: AuthorName,
    pub body: MessageBody,
}

///
/// Model to fetch a guestbook message from the database with.
///
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize, serde::Deserialize)]
pub struct MessageModel {
    pub id: Uuid,
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl From<MessageModel> for MessageResponse {
    fn from(val: MessageModel) -> Self {
        MessageResponse {
            id: val.id,
            author: val.author,
            body: val.body,
            created_at: val.created_at,
        }
    }
}

///
/// Provides a validated author display name.
///
#[derive(Debug)]
pub struct AuthorName(String);

impl AuthorName {
    ///
    /// Parse an [`AuthorName`] from a [`String`].
    ///
    /// Surrounding whitespace is trimmed before validation, so a name
    /// consisting only of whitespace is rejected.
    ///
    pub fn parse(value: String) -> Result<AuthorName, String> {
        let trimmed = value.trim();

        if validator::validate_length(trimmed, Some(1), Some(64), None) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(format!("{} is not a valid author name!", value))
        }
    }
}

impl AsRef<str> for AuthorName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AuthorName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

///
/// Provides a validated message body.
///
#[derive(Debug)]
pub struct MessageBody(String);

impl MessageBody {
    ///
    /// Parse a [`MessageBody`] from a [`String`].
    ///
    /// Surrounding whitespace is trimmed before validation.
    ///
    pub fn parse(value: String) -> Result<MessageBody, String> {
        let trimmed = value.trim();

        if validator::validate_length(trimmed, Some(1), Some(1000), None) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(format!("{} is not a valid message body!", value))
        }
    }
}

impl AsRef<str> for MessageBody {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MessageBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

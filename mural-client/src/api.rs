use mural_shared::messages::MessageResponse;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("server error: {0}")]
    Server(String),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

///
/// Thin client for the guestbook HTTP API.
///
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    ///
    /// Fetch all messages, newest first.
    ///
    pub async fn list_messages(&self) -> Result<Vec<MessageResponse>, ApiError> {
        let response = self
            .client
            .get(format!("{}/api/messages", self.base_url))
            .send()
            .await?;

        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(Self::error_from(response).await)
        }
    }

    ///
    /// Submit a new message and return the stored record.
    ///
    pub async fn create_message(
        &self,
        author: &str,
        body: &str,
    ) -> Result<MessageResponse, ApiError> {
        let response = self
            .client
            .post(format!("{}/api/messages", self.base_url))
            .json(&serde_json::json!({ "author": author, "body": body }))
            .send()
            .await?;

        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(Self::error_from(response).await)
        }
    }

    async fn error_from(response: reqwest::Response) -> ApiError {
        let status = response.status();

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => status.to_string(),
        };

        if status == reqwest::StatusCode::BAD_REQUEST {
            ApiError::InvalidInput(message)
        } else {
            ApiError::Server(message)
        }
    }
}

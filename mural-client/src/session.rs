use mural_shared::{messages::MessageResponse, websocket::WebSocketMessage};

use crate::{
    api::{ApiClient, ApiError},
    view::MessageView,
};

///
/// Why a submission did not start.
///
#[derive(Debug, PartialEq, Eq)]
pub enum SubmitBlocked {
    /// A previous submission is still in flight.
    InFlight,
    /// Author or body was blank after trimming.
    BlankInput,
}

///
/// Result of driving one submission to completion.
///
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The message was stored; carries the server-assigned record.
    Accepted(MessageResponse),
    /// Nothing was sent because the input was blank.
    Ignored,
    /// Nothing was sent because a submission was already in flight.
    Busy,
    /// The request failed; the view is left untouched.
    Failed,
}

///
/// The submit half of the form: field values plus the in-flight guard.
///
/// The guard moves `Idle -> Submitting -> Idle` on success and failure
/// alike; the field values only clear on success.
///
#[derive(Debug, Default)]
pub struct SubmitForm {
    pub author: String,
    pub body: String,
    submitting: bool,
}

impl SubmitForm {
    pub fn new() -> Self {
        Self::default()
    }

    ///
    /// Begin a submission.
    ///
    /// Rejects re-entry while one is in flight and blank-after-trim input;
    /// otherwise sets the guard and hands back the field values for the
    /// request.
    ///
    pub fn begin_submit(&mut self) -> Result<(String, String), SubmitBlocked> {
        if self.submitting {
            return Err(SubmitBlocked::InFlight);
        }

        if self.author.trim().is_empty() || self.body.trim().is_empty() {
            return Err(SubmitBlocked::BlankInput);
        }

        self.submitting = true;

        Ok((self.author.clone(), self.body.clone()))
    }

    ///
    /// Finish the in-flight submission, clearing the fields when it
    /// succeeded.
    ///
    pub fn finish_submit(&mut self, success: bool) {
        self.submitting = false;

        if success {
            self.author.clear();
            self.body.clear();
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }
}

///
/// One viewer session: the live view plus the submit flow, reconciling the
/// baseline load with broadcast events.
///
/// All network failures are logged and degrade the view instead of ending
/// the session.
///
pub struct Session {
    api: ApiClient,
    pub view: MessageView,
    pub form: SubmitForm,
}

impl Session {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            view: MessageView::new(),
            form: SubmitForm::new(),
        }
    }

    ///
    /// Fetch the full current list and replace the view with it.
    ///
    /// On failure the view keeps its previous (possibly empty) content.
    ///
    pub async fn load_baseline(&mut self) -> bool {
        match self.api.list_messages().await {
            Ok(baseline) => {
                self.view.replace(baseline);
                true
            }
            Err(error) => {
                tracing::warn!("Failed to load message baseline: {}", error);
                false
            }
        }
    }

    ///
    /// Merge a live broadcast event into the view.
    ///
    /// Returns the message when the view changed, [`None`] when the event
    /// was a duplicate or not a message event.
    ///
    pub fn apply_event(&mut self, event: WebSocketMessage) -> Option<MessageResponse> {
        match event {
            WebSocketMessage::NewMessage { message } => {
                if self.view.insert(message.clone()) {
                    Some(message)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    ///
    /// Drive one submission through the guarded form.
    ///
    /// On success the returned record is inserted into the view right away;
    /// the broadcast echo of the same id then deduplicates.
    ///
    pub async fn submit(&mut self, author: &str, body: &str) -> SubmitOutcome {
        self.form.author = author.to_string();
        self.form.body = body.to_string();

        let (author, body) = match self.form.begin_submit() {
            Ok(fields) => fields,
            Err(SubmitBlocked::InFlight) => return SubmitOutcome::Busy,
            Err(SubmitBlocked::BlankInput) => return SubmitOutcome::Ignored,
        };

        match self.api.create_message(&author, &body).await {
            Ok(message) => {
                self.form.finish_submit(true);
                self.view.insert(message.clone());

                SubmitOutcome::Accepted(message)
            }
            Err(error) => {
                tracing::error!("Failed to submit message: {}", error);
                self.form.finish_submit(false);

                SubmitOutcome::Failed
            }
        }
    }
}

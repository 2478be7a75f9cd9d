//! Debounced, keyboard-navigable incremental search field
//!
//! [`SearchField`] owns a [`FieldState`] and turns the [`Command`]s returned by
//! `FieldState::update` into real side effects: a single trailing-edge
//! debounce deadline, a blur-close deadline, and lookups spawned on the tokio
//! runtime whose answers come back tagged with their generation.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::Instant;
use tracing::{debug, info};

pub mod application;
pub mod constants;
pub mod domain;
pub mod error;
pub mod terminal;
pub mod ui;

#[cfg(test)]
mod tests;

pub use self::application::lookup_service::{DirectoryLookup, LookupProvider, sample_directory};
pub use self::domain::models::{Candidate, FieldConfig, LookupRequest, LookupResponse, NavKey};
pub use self::error::{LookupError, LookupResult};
pub use self::ui::app_state::{FieldState, LabelFormatter};
pub use self::ui::commands::Command;
pub use self::ui::events::Message;

/// Called once per committed selection
pub type CommitCallback = Box<dyn FnMut(&Candidate) + Send>;

pub struct SearchField {
    state: FieldState,
    provider: Arc<dyn LookupProvider>,
    on_commit: CommitCallback,
    response_tx: UnboundedSender<LookupResponse>,
    response_rx: UnboundedReceiver<LookupResponse>,
    debounce_deadline: Option<Instant>,
    close_deadline: Option<Instant>,
}

enum Wake {
    Lookup(LookupResponse),
    Debounce,
    Close,
}

impl SearchField {
    pub fn new(config: FieldConfig, provider: Arc<dyn LookupProvider>) -> Self {
        let (response_tx, response_rx) = mpsc::unbounded_channel();
        Self {
            state: FieldState::new(config),
            provider,
            on_commit: Box::new(|_| {}),
            response_tx,
            response_rx,
            debounce_deadline: None,
            close_deadline: None,
        }
    }

    pub fn with_label_formatter(mut self, format_label: LabelFormatter) -> Self {
        self.state = self.state.with_label_formatter(format_label);
        self
    }

    pub fn on_commit<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&Candidate) + Send + 'static,
    {
        self.on_commit = Box::new(callback);
        self
    }

    pub fn state(&self) -> &FieldState {
        &self.state
    }

    pub fn text_input(&mut self, text: impl Into<String>) {
        self.handle_message(Message::TextInput(text.into()));
    }

    pub fn key_down(&mut self, key: NavKey) {
        self.handle_message(Message::KeyDown(key));
    }

    pub fn candidate_pressed(&mut self, candidate: Candidate) {
        self.handle_message(Message::CandidatePressed(candidate));
    }

    pub fn candidate_activated(&mut self, candidate: Candidate) {
        self.handle_message(Message::CandidateActivated(candidate));
    }

    pub fn press_cancelled(&mut self) {
        self.handle_message(Message::PressCancelled);
    }

    pub fn focus(&mut self) {
        self.handle_message(Message::Focus);
    }

    pub fn blur(&mut self) {
        self.handle_message(Message::Blur);
    }

    /// A debounce or blur-close deadline is still armed
    pub fn has_pending_timer(&self) -> bool {
        self.debounce_deadline.is_some() || self.close_deadline.is_some()
    }

    pub fn handle_message(&mut self, message: Message) {
        let command = self.state.update(message);
        self.execute_command(command);
    }

    /// Wait for the next timer or lookup completion and apply it.
    ///
    /// Cancel-safe: dropping the future before it resolves loses nothing, so
    /// it can sit in a `select!` next to an input source.
    pub async fn tick(&mut self) {
        let wake = tokio::select! {
            biased;
            Some(response) = self.response_rx.recv() => Wake::Lookup(response),
            () = wait_until(self.debounce_deadline) => Wake::Debounce,
            () = wait_until(self.close_deadline) => Wake::Close,
        };

        let message = match wake {
            Wake::Lookup(response) => Message::LookupCompleted(response),
            Wake::Debounce => {
                self.debounce_deadline = None;
                Message::DebounceElapsed
            }
            Wake::Close => {
                self.close_deadline = None;
                Message::BlurGraceElapsed
            }
        };
        self.handle_message(message);
    }

    fn execute_command(&mut self, command: Command) {
        match command {
            Command::None => {}
            Command::ScheduleLookup(delay) => {
                // Restarting the deadline is what makes the debounce trailing-edge.
                self.debounce_deadline = Some(Instant::now() + Duration::from_millis(delay));
            }
            Command::ExecuteLookup(request) => {
                self.execute_lookup(request);
            }
            Command::ScheduleClose(delay) => {
                self.close_deadline = Some(Instant::now() + Duration::from_millis(delay));
            }
            Command::CancelClose => {
                self.close_deadline = None;
            }
            Command::Commit(candidate) => {
                self.debounce_deadline = None;
                info!(id = %candidate.id, "candidate committed");
                (self.on_commit)(&candidate);
            }
        }
    }

    fn execute_lookup(&self, request: LookupRequest) {
        debug!(
            generation = request.generation,
            query = %request.query,
            limit = request.limit,
            "issuing lookup"
        );

        let lookup = self.provider.lookup(&request.query, request.limit);
        let response_tx = self.response_tx.clone();
        let generation = request.generation;

        tokio::spawn(async move {
            // Run the provider in its own task so a panic still yields a response.
            let outcome = match tokio::spawn(lookup).await {
                Ok(outcome) => outcome,
                Err(e) => Err(e.into()),
            };
            let _ = response_tx.send(LookupResponse {
                generation,
                outcome,
            });
        });
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

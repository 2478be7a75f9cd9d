use crate::search_field::domain::models::{
    Candidate, FieldConfig, LookupRequest, LookupResponse, NavKey,
};
use crate::search_field::ui::commands::Command;
use crate::search_field::ui::events::Message;
use std::sync::Arc;
use tracing::debug;

/// Turns a committed candidate into the text shown in the input
pub type LabelFormatter = Arc<dyn Fn(&Candidate) -> String + Send + Sync>;

/// All state owned by one search field instance
///
/// `update` is synchronous and never touches timers or the provider; it
/// returns a [`Command`] describing the side effect the driver must perform.
pub struct FieldState {
    pub query: String,
    pub candidates: Vec<Candidate>,
    pub highlighted: Option<usize>,
    pub is_open: bool,
    pub is_loading: bool,
    pub is_resolved: bool,
    pub generation: u64,
    pub has_focus: bool,
    pub pending_activation: Option<Candidate>,
    config: FieldConfig,
    format_label: LabelFormatter,
}

impl Default for FieldState {
    fn default() -> Self {
        Self::new(FieldConfig::default())
    }
}

impl FieldState {
    pub fn new(config: FieldConfig) -> Self {
        Self {
            query: String::new(),
            candidates: Vec::new(),
            highlighted: None,
            is_open: false,
            is_loading: false,
            is_resolved: false,
            generation: 0,
            has_focus: true,
            pending_activation: None,
            config,
            format_label: Arc::new(Candidate::display_label),
        }
    }

    pub fn with_label_formatter(mut self, format_label: LabelFormatter) -> Self {
        self.format_label = format_label;
        self
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn update(&mut self, msg: Message) -> Command {
        let command = match msg {
            Message::TextInput(text) => {
                self.query = text;
                self.is_resolved = false;
                self.pending_activation = None;
                Command::ScheduleLookup(self.config.debounce_ms)
            }
            Message::DebounceElapsed => self.start_lookup(),
            Message::LookupCompleted(response) => {
                self.apply_lookup(response);
                Command::None
            }
            Message::KeyDown(key) => self.handle_key(key),
            Message::CandidatePressed(candidate) => {
                if self.is_open {
                    self.pending_activation = Some(candidate);
                }
                Command::None
            }
            Message::CandidateActivated(candidate) => self.commit(candidate),
            Message::PressCancelled => {
                self.pending_activation = None;
                Command::None
            }
            Message::Focus => {
                self.has_focus = true;
                self.pending_activation = None;
                if !self.candidates.is_empty() && !self.is_resolved {
                    self.is_open = true;
                }
                Command::CancelClose
            }
            Message::Blur => {
                self.has_focus = false;
                Command::ScheduleClose(self.config.blur_grace_ms)
            }
            Message::BlurGraceElapsed => {
                // A row pressed before focus left wins over the close.
                if let Some(candidate) = self.pending_activation.take() {
                    self.commit(candidate)
                } else {
                    self.is_open = false;
                    self.highlighted = None;
                    Command::None
                }
            }
        };
        self.close_if_idle();
        command
    }

    fn start_lookup(&mut self) -> Command {
        if self.is_resolved {
            return Command::None;
        }

        if self.query_below_minimum() {
            self.candidates.clear();
            self.highlighted = None;
            self.is_open = false;
            if self.is_loading {
                // Orphan the in-flight lookup so it cannot reopen the list.
                self.generation += 1;
                self.is_loading = false;
            }
            return Command::None;
        }

        self.generation += 1;
        self.is_loading = true;
        Command::ExecuteLookup(LookupRequest {
            generation: self.generation,
            query: self.query.trim().to_string(),
            limit: self.config.max_results,
        })
    }

    fn apply_lookup(&mut self, response: LookupResponse) {
        if response.generation != self.generation || !self.is_loading {
            debug!(
                generation = response.generation,
                current = self.generation,
                "discarding stale lookup result"
            );
            return;
        }

        self.is_loading = false;
        self.highlighted = None;
        // The pressed row may not be in the new list.
        self.pending_activation = None;
        match response.outcome {
            Ok(mut candidates) => {
                candidates.truncate(self.config.max_results);
                self.candidates = candidates;
                self.is_open = true;
            }
            Err(e) => {
                debug!(generation = response.generation, error = %e, "lookup failed");
                self.candidates.clear();
            }
        }
    }

    fn handle_key(&mut self, key: NavKey) -> Command {
        if key == NavKey::Escape {
            self.pending_activation = None;
        }
        if !self.is_open || self.candidates.is_empty() {
            return Command::None;
        }

        let len = self.candidates.len();
        match key {
            NavKey::ArrowDown => {
                self.highlighted = Some(match self.highlighted {
                    Some(i) if i + 1 < len => i + 1,
                    _ => 0,
                });
                Command::None
            }
            NavKey::ArrowUp => {
                self.highlighted = Some(match self.highlighted {
                    Some(i) if i > 0 => i - 1,
                    _ => len - 1,
                });
                Command::None
            }
            NavKey::Enter => match self.highlighted_candidate().cloned() {
                Some(candidate) => self.commit(candidate),
                None => Command::None,
            },
            NavKey::Escape => {
                self.is_open = false;
                self.highlighted = None;
                Command::None
            }
        }
    }

    fn commit(&mut self, candidate: Candidate) -> Command {
        self.query = (self.format_label)(&candidate);
        self.candidates.clear();
        self.is_open = false;
        self.highlighted = None;
        self.is_resolved = true;
        self.pending_activation = None;
        if self.is_loading {
            self.generation += 1;
            self.is_loading = false;
        }
        Command::Commit(candidate)
    }

    // Nothing to show and nothing coming: the list stays shut.
    fn close_if_idle(&mut self) {
        if self.candidates.is_empty() && !self.is_loading && self.query_below_minimum() {
            self.is_open = false;
        }
        if self.highlighted.is_some_and(|i| i >= self.candidates.len()) {
            self.highlighted = None;
        }
    }

    fn query_below_minimum(&self) -> bool {
        self.query.trim().chars().count() < self.config.minimum_query_length
    }

    pub fn highlighted_candidate(&self) -> Option<&Candidate> {
        self.highlighted.and_then(|i| self.candidates.get(i))
    }

    /// Whether the "no results" indicator should be rendered
    pub fn shows_no_results(&self) -> bool {
        self.is_open
            && self.candidates.is_empty()
            && !self.query_below_minimum()
            && !self.is_loading
            && !self.is_resolved
    }

    /// Hint shown under the input while the raw text is too short to search
    pub fn search_hint(&self) -> Option<String> {
        (self.query.chars().count() < self.config.minimum_query_length).then(|| {
            format!(
                "Enter at least {} characters",
                self.config.minimum_query_length
            )
        })
    }
}

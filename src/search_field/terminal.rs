use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::constants::EVENT_POLL_INTERVAL_MS;
use super::ui::{components::Component, renderer::Renderer};
use super::{Candidate, FieldConfig, LabelFormatter, LookupProvider, Message, SearchField};

#[derive(Default)]
struct Selection {
    commits: u64,
    last: Option<Candidate>,
}

enum Step {
    Input(Event),
    Field,
    Closed,
}

/// Full-screen terminal host for a single [`SearchField`]
pub struct InteractiveField {
    field: SearchField,
    renderer: Renderer,
    selection: Arc<Mutex<Selection>>,
    announced: u64,
    exit_on_select: bool,
}

impl InteractiveField {
    pub fn new(config: FieldConfig, provider: Arc<dyn LookupProvider>, label: &str) -> Self {
        let selection = Arc::new(Mutex::new(Selection::default()));
        let sink = Arc::clone(&selection);
        let field = SearchField::new(config, provider).on_commit(move |candidate| {
            if let Ok(mut selection) = sink.lock() {
                selection.commits += 1;
                selection.last = Some(candidate.clone());
            }
        });

        Self {
            field,
            renderer: Renderer::new(label),
            selection,
            announced: 0,
            exit_on_select: false,
        }
    }

    pub fn with_label_formatter(mut self, format_label: LabelFormatter) -> Self {
        self.field = self.field.with_label_formatter(format_label);
        self
    }

    /// Leave the screen as soon as a candidate is committed
    pub fn exit_on_select(mut self, exit_on_select: bool) -> Self {
        self.exit_on_select = exit_on_select;
        self
    }

    /// Most recently committed candidate
    pub fn selection(&self) -> Option<Candidate> {
        self.selection
            .lock()
            .ok()
            .and_then(|selection| selection.last.clone())
    }

    pub async fn run(&mut self) -> Result<Option<Candidate>> {
        let mut terminal = self.setup_terminal()?;

        let (event_tx, event_rx) = mpsc::channel::<Event>(256);
        spawn_input_reader(event_tx);

        let result = self.run_app(&mut terminal, event_rx).await;

        self.cleanup_terminal(&mut terminal)?;
        result?;
        Ok(self.selection())
    }

    fn setup_terminal(&self) -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(terminal)
    }

    fn cleanup_terminal(&self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
        Ok(())
    }

    async fn run_app(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
        mut events: mpsc::Receiver<Event>,
    ) -> Result<()> {
        loop {
            terminal.draw(|f| {
                self.renderer.render(f, self.field.state());
            })?;

            let step = tokio::select! {
                event = events.recv() => match event {
                    Some(event) => Step::Input(event),
                    None => Step::Closed,
                },
                () = self.field.tick() => Step::Field,
            };

            match step {
                Step::Input(event) => {
                    if self.handle_event(event) {
                        break;
                    }
                }
                Step::Field => {}
                Step::Closed => {
                    debug!("input reader stopped");
                    break;
                }
            }

            if self.announce_commit() && self.exit_on_select {
                break;
            }
        }
        Ok(())
    }

    /// Returns true when the user asked to quit
    fn handle_event(&mut self, event: Event) -> bool {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => return self.handle_input(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => {}
        }
        false
    }

    fn handle_input(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        if key.code == KeyCode::Tab {
            if self.field.state().has_focus {
                self.field.blur();
            } else {
                self.field.focus();
            }
            return false;
        }

        // Keystrokes only reach the field while it has focus.
        if !self.field.state().has_focus {
            return false;
        }

        let message = match key.code {
            KeyCode::Up | KeyCode::Down | KeyCode::Enter | KeyCode::Esc => {
                self.renderer.get_candidate_list_mut().handle_key(key)
            }
            KeyCode::Char('p') | KeyCode::Char('n')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                self.renderer.get_candidate_list_mut().handle_key(key)
            }
            _ => self.renderer.get_search_input_mut().handle_key(key),
        };

        if let Some(msg) = message {
            self.field.handle_message(msg);
        }
        false
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let (column, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(candidate) = self.renderer.candidate_at(column, row).cloned() {
                    self.field.handle_message(Message::CandidatePressed(candidate));
                } else if self.renderer.is_over_input(column, row) {
                    self.field.focus();
                } else if self.field.state().has_focus {
                    self.field.blur();
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let Some(pressed) = self.field.state().pending_activation.clone() else {
                    return;
                };
                // A click only counts when released over the row it started on.
                match self.renderer.candidate_at(column, row) {
                    Some(candidate) if *candidate == pressed => {
                        self.field.handle_message(Message::CandidateActivated(pressed));
                    }
                    _ => self.field.press_cancelled(),
                }
            }
            _ => {}
        }
    }

    /// Put the latest commit on the status line; true if there was a new one
    fn announce_commit(&mut self) -> bool {
        let commits = self
            .selection
            .lock()
            .map(|selection| selection.commits)
            .unwrap_or(self.announced);
        if commits == self.announced {
            return false;
        }

        self.announced = commits;
        let label = self.field.state().query.clone();
        info!(label = %label, "selection announced");
        self.renderer.set_status(Some(format!("Selected: {label}")));
        true
    }
}

fn spawn_input_reader(sender: mpsc::Sender<Event>) {
    thread::spawn(move || {
        loop {
            if sender.is_closed() {
                break;
            }
            if let Ok(true) = event::poll(Duration::from_millis(EVENT_POLL_INTERVAL_MS)) {
                match event::read() {
                    Ok(evt @ (Event::Key(_) | Event::Mouse(_) | Event::Resize(_, _))) => {
                        if sender.blocking_send(evt).is_err() {
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(_) => break,
                }
            }
        }
    });
}

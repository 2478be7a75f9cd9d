use crate::search_field::constants::{SEARCH_INPUT_HEIGHT, STATUS_BAR_HEIGHT};
use crate::search_field::domain::models::Candidate;
use crate::search_field::ui::app_state::FieldState;
use crate::search_field::ui::components::{
    Component, candidate_list::CandidateList, search_input::SearchInput,
};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

const SHORTCUTS: &str = "↑/↓: Navigate | Enter: Select | Esc: Close | Tab: Focus | Ctrl+C: Quit";

pub struct Renderer {
    search_input: SearchInput,
    candidate_list: CandidateList,
    input_area: Rect,
    status: Option<String>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new("Select Patient")
    }
}

impl Renderer {
    pub fn new(label: &str) -> Self {
        Self {
            search_input: SearchInput::new(label),
            candidate_list: CandidateList::new(),
            input_area: Rect::default(),
            status: None,
        }
    }

    pub fn render(&mut self, f: &mut Frame, state: &FieldState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(SEARCH_INPUT_HEIGHT), // Search input
                Constraint::Min(0),                      // Candidates
                Constraint::Length(STATUS_BAR_HEIGHT),   // Status
            ])
            .split(f.area());

        // Update input state
        self.search_input.set_query(&state.query);
        self.search_input.set_loading(state.is_loading);
        self.search_input.set_focus(state.has_focus);
        self.search_input.set_hint(state.search_hint());

        // Update list state
        self.candidate_list.set_candidates(&state.candidates);
        self.candidate_list.set_highlighted(state.highlighted);
        self.candidate_list.set_open(state.is_open);
        self.candidate_list.set_loading(state.is_loading);
        self.candidate_list.set_show_no_results(state.shows_no_results());

        // Render components
        self.input_area = chunks[0];
        self.search_input.render(f, chunks[0]);
        self.candidate_list.render(f, chunks[1]);
        self.render_status(f, chunks[2]);
    }

    fn render_status(&self, f: &mut Frame, area: Rect) {
        let line = match &self.status {
            Some(status) => Line::from(vec![
                Span::styled(status.clone(), Style::default().fg(Color::Green)),
                Span::raw("  "),
                Span::styled(SHORTCUTS, Style::default().add_modifier(Modifier::DIM)),
            ]),
            None => Line::from(Span::styled(
                SHORTCUTS,
                Style::default().add_modifier(Modifier::DIM),
            )),
        };
        f.render_widget(Paragraph::new(line), area);
    }

    pub fn set_status(&mut self, status: Option<String>) {
        self.status = status;
    }

    pub fn is_over_input(&self, column: u16, row: u16) -> bool {
        let area = self.input_area;
        column >= area.x && column < area.x + area.width && row >= area.y && row < area.y + area.height
    }

    pub fn candidate_at(&self, column: u16, row: u16) -> Option<&Candidate> {
        self.candidate_list.candidate_at(column, row)
    }

    pub fn get_search_input_mut(&mut self) -> &mut SearchInput {
        &mut self.search_input
    }

    pub fn get_candidate_list_mut(&mut self) -> &mut CandidateList {
        &mut self.candidate_list
    }
}

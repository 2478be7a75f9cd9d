use crate::search_field::constants::{CANDIDATE_ROW_HEIGHT, LOADING_TEXT, NO_RESULTS_TEXT};
use crate::search_field::domain::models::{Candidate, NavKey};
use crate::search_field::ui::components::Component;
use crate::search_field::ui::events::Message;
use chrono::{Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Drop-down list of candidates under the search input
pub struct CandidateList {
    candidates: Vec<Candidate>,
    highlighted: Option<usize>,
    is_open: bool,
    is_loading: bool,
    show_no_results: bool,
    today: NaiveDate,
    scroll_offset: usize,
    rows_area: Rect,
}

impl Default for CandidateList {
    fn default() -> Self {
        Self::new()
    }
}

impl CandidateList {
    pub fn new() -> Self {
        Self {
            candidates: Vec::new(),
            highlighted: None,
            is_open: false,
            is_loading: false,
            show_no_results: false,
            today: Local::now().date_naive(),
            scroll_offset: 0,
            rows_area: Rect::default(),
        }
    }

    pub fn set_candidates(&mut self, candidates: &[Candidate]) {
        if self.candidates != candidates {
            self.candidates = candidates.to_vec();
            self.scroll_offset = 0;
        }
    }

    pub fn set_highlighted(&mut self, highlighted: Option<usize>) {
        self.highlighted = highlighted;
    }

    pub fn set_open(&mut self, is_open: bool) {
        self.is_open = is_open;
    }

    pub fn set_loading(&mut self, is_loading: bool) {
        self.is_loading = is_loading;
    }

    pub fn set_show_no_results(&mut self, show_no_results: bool) {
        self.show_no_results = show_no_results;
    }

    /// Pin "today" for the age column (tests use a fixed date)
    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = today;
    }

    pub fn is_visible(&self) -> bool {
        self.is_open && !self.candidates.is_empty()
    }

    /// Candidate under a terminal cell, if the list is showing one there
    pub fn candidate_at(&self, column: u16, row: u16) -> Option<&Candidate> {
        if !self.is_visible() {
            return None;
        }
        let area = self.rows_area;
        if column < area.x
            || column >= area.x + area.width
            || row < area.y
            || row >= area.y + area.height
        {
            return None;
        }
        let index = self.scroll_offset + ((row - area.y) / CANDIDATE_ROW_HEIGHT) as usize;
        self.candidates.get(index)
    }

    fn visible_rows(&self) -> usize {
        (self.rows_area.height / CANDIDATE_ROW_HEIGHT).max(1) as usize
    }

    fn adjust_scroll(&mut self) {
        let visible = self.visible_rows();
        if let Some(index) = self.highlighted {
            if index < self.scroll_offset {
                self.scroll_offset = index;
            } else if index >= self.scroll_offset + visible {
                self.scroll_offset = index + 1 - visible;
            }
        }
        let max_offset = self.candidates.len().saturating_sub(visible);
        self.scroll_offset = self.scroll_offset.min(max_offset);
    }

    fn candidate_lines(&self, index: usize, candidate: &Candidate) -> [Line<'static>; 2] {
        let selected = self.highlighted == Some(index);
        let row_style = if selected {
            Style::default().bg(Color::Blue).fg(Color::White)
        } else {
            Style::default()
        };

        let mut name = vec![Span::styled(
            candidate.full_name(),
            row_style.add_modifier(Modifier::BOLD),
        )];
        if let Some(age) = candidate.age_on(self.today) {
            name.push(Span::styled(
                format!("  {age} yrs"),
                row_style.add_modifier(Modifier::DIM),
            ));
        }

        let mut detail = format!(
            "ID: {}",
            candidate.national_id.as_deref().unwrap_or_default()
        );
        if let Some(phone) = &candidate.phone {
            detail.push_str(&format!("    {phone}"));
        }

        [
            Line::from(name).style(row_style),
            Line::from(Span::styled(detail, row_style.fg(Color::Gray))).style(row_style),
        ]
    }

    fn render_message(&self, f: &mut Frame, area: Rect, text: &str) {
        let height = area.height.min(3);
        let message = Paragraph::new(text.to_string())
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(message, Rect { height, ..area });
    }
}

impl Component for CandidateList {
    fn render(&mut self, f: &mut Frame, area: Rect) {
        if !self.is_visible() {
            self.rows_area = Rect::default();
            if self.show_no_results {
                self.render_message(f, area, NO_RESULTS_TEXT);
            } else if self.is_loading && self.is_open {
                self.render_message(f, area, LOADING_TEXT);
            }
            return;
        }

        let wanted = u16::try_from(self.candidates.len())
            .unwrap_or(u16::MAX)
            .saturating_mul(CANDIDATE_ROW_HEIGHT)
            .saturating_add(2);
        let list_area = Rect {
            height: area.height.min(wanted),
            ..area
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("{} match(es)", self.candidates.len()));
        self.rows_area = block.inner(list_area);
        self.adjust_scroll();

        let lines: Vec<Line> = self
            .candidates
            .iter()
            .enumerate()
            .skip(self.scroll_offset)
            .take(self.visible_rows())
            .flat_map(|(index, candidate)| self.candidate_lines(index, candidate))
            .collect();

        f.render_widget(Paragraph::new(lines).block(block), list_area);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Message> {
        match key.code {
            KeyCode::Up => Some(Message::KeyDown(NavKey::ArrowUp)),
            KeyCode::Down => Some(Message::KeyDown(NavKey::ArrowDown)),
            KeyCode::Char('p') if key.modifiers == KeyModifiers::CONTROL => {
                Some(Message::KeyDown(NavKey::ArrowUp))
            }
            KeyCode::Char('n') if key.modifiers == KeyModifiers::CONTROL => {
                Some(Message::KeyDown(NavKey::ArrowDown))
            }
            KeyCode::Enter => Some(Message::KeyDown(NavKey::Enter)),
            KeyCode::Esc => Some(Message::KeyDown(NavKey::Escape)),
            _ => None,
        }
    }
}

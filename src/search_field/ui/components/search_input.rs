use crate::search_field::ui::components::Component;
use crate::search_field::ui::events::Message;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Single-line text input for the search field
#[derive(Default)]
pub struct SearchInput {
    query: String,
    cursor_position: usize,
    is_loading: bool,
    has_focus: bool,
    hint: Option<String>,
    label: String,
}

impl SearchInput {
    pub fn new(label: &str) -> Self {
        Self {
            query: String::new(),
            cursor_position: 0,
            is_loading: false,
            has_focus: true,
            hint: None,
            label: label.to_string(),
        }
    }

    /// Replace the text, keeping the cursor where it was if the text is unchanged
    pub fn set_query(&mut self, query: &str) {
        if self.query != query {
            self.query = query.to_string();
            self.cursor_position = self.query.chars().count();
        }
    }

    pub fn set_loading(&mut self, is_loading: bool) {
        self.is_loading = is_loading;
    }

    pub fn set_focus(&mut self, has_focus: bool) {
        self.has_focus = has_focus;
    }

    pub fn set_hint(&mut self, hint: Option<String>) {
        self.hint = hint;
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    fn byte_offset(&self, char_pos: usize) -> usize {
        self.query
            .char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.query.len())
    }

    /// Find the previous word boundary from the given position
    fn find_prev_word_boundary(&self, from: usize) -> usize {
        let chars: Vec<char> = self.query.chars().collect();
        let mut pos = from;

        while pos > 0 && chars.get(pos - 1).is_some_and(|c| c.is_whitespace()) {
            pos -= 1;
        }
        while pos > 0 && chars.get(pos - 1).is_some_and(|c| !c.is_whitespace()) {
            pos -= 1;
        }

        pos
    }

    /// Delete chars in `start..end` and report whether the text changed
    fn delete_range(&mut self, start: usize, end: usize) -> bool {
        if start >= end || end > self.query.chars().count() {
            return false;
        }

        let byte_start = self.byte_offset(start);
        let byte_end = self.byte_offset(end);
        self.query.drain(byte_start..byte_end);
        self.cursor_position = start;
        true
    }

    fn changed(&self) -> Option<Message> {
        Some(Message::TextInput(self.query.clone()))
    }
}

impl Component for SearchInput {
    fn render(&mut self, f: &mut Frame, area: Rect) {
        let before: String = self.query.chars().take(self.cursor_position).collect();
        let at_cursor = self.query.chars().nth(self.cursor_position).unwrap_or(' ');
        let after: String = self.query.chars().skip(self.cursor_position + 1).collect();

        let cursor_style = if self.has_focus {
            Style::default().bg(Color::White).fg(Color::Black)
        } else {
            Style::default()
        };
        let input_text = vec![
            Span::raw(before),
            Span::styled(at_cursor.to_string(), cursor_style),
            Span::raw(after),
        ];

        let mut title = self.label.clone();
        if self.is_loading {
            title.push_str(" - [searching...]");
        }

        let mut block = Block::default().title(title).borders(Borders::ALL);
        if let Some(hint) = &self.hint {
            block = block.title_bottom(Line::from(Span::styled(
                hint.clone(),
                Style::default().add_modifier(Modifier::DIM),
            )));
        }

        let border_color = if self.has_focus {
            Color::Yellow
        } else {
            Color::DarkGray
        };
        let input = Paragraph::new(Line::from(input_text))
            .block(block)
            .style(Style::default().fg(border_color));

        f.render_widget(input, area);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Message> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                // Ctrl+A / Ctrl+E - line start / end
                KeyCode::Char('a') => {
                    self.cursor_position = 0;
                    None
                }
                KeyCode::Char('e') => {
                    self.cursor_position = self.query.chars().count();
                    None
                }
                // Ctrl+W - delete word before cursor
                KeyCode::Char('w') => {
                    let start = self.find_prev_word_boundary(self.cursor_position);
                    if self.delete_range(start, self.cursor_position) {
                        self.changed()
                    } else {
                        None
                    }
                }
                // Ctrl+U - delete to line start
                KeyCode::Char('u') => {
                    if self.delete_range(0, self.cursor_position) {
                        self.changed()
                    } else {
                        None
                    }
                }
                _ => None,
            };
        }

        match key.code {
            KeyCode::Char(c) => {
                let byte_pos = self.byte_offset(self.cursor_position);
                self.query.insert(byte_pos, c);
                self.cursor_position += 1;
                self.changed()
            }
            KeyCode::Backspace => {
                if self.cursor_position > 0
                    && self.delete_range(self.cursor_position - 1, self.cursor_position)
                {
                    self.changed()
                } else {
                    None
                }
            }
            KeyCode::Delete => {
                if self.delete_range(self.cursor_position, self.cursor_position + 1) {
                    self.changed()
                } else {
                    None
                }
            }
            KeyCode::Left => {
                self.cursor_position = self.cursor_position.saturating_sub(1);
                None
            }
            KeyCode::Right => {
                if self.cursor_position < self.query.chars().count() {
                    self.cursor_position += 1;
                }
                None
            }
            KeyCode::Home => {
                self.cursor_position = 0;
                None
            }
            KeyCode::End => {
                self.cursor_position = self.query.chars().count();
                None
            }
            _ => None,
        }
    }
}

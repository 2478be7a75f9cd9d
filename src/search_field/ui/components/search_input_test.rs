#[cfg(test)]
mod tests {
    use super::super::Component;
    use super::super::search_input::*;
    use crate::search_field::ui::events::Message;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};

    fn create_key_event(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::empty(),
            kind: crossterm::event::KeyEventKind::Press,
            state: crossterm::event::KeyEventState::empty(),
        }
    }

    fn create_ctrl_event(c: char) -> KeyEvent {
        KeyEvent {
            code: KeyCode::Char(c),
            modifiers: KeyModifiers::CONTROL,
            kind: crossterm::event::KeyEventKind::Press,
            state: crossterm::event::KeyEventState::empty(),
        }
    }

    fn buffer_to_string(buffer: &Buffer) -> String {
        let mut result = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                result.push_str(buffer.cell((x, y)).unwrap().symbol());
            }
            result.push('\n');
        }
        result
    }

    #[test]
    fn test_character_input() {
        let mut input = SearchInput::new("Patient");

        let msg = input.handle_key(create_key_event(KeyCode::Char('A')));
        assert!(matches!(msg, Some(Message::TextInput(q)) if q == "A"));

        let msg = input.handle_key(create_key_event(KeyCode::Char('l')));
        assert!(matches!(msg, Some(Message::TextInput(q)) if q == "Al"));

        assert_eq!(input.query(), "Al");
        assert_eq!(input.cursor_position(), 2);
    }

    #[test]
    fn test_backspace() {
        let mut input = SearchInput::new("Patient");
        input.set_query("Smith");

        let msg = input.handle_key(create_key_event(KeyCode::Backspace));
        assert!(matches!(msg, Some(Message::TextInput(q)) if q == "Smit"));

        input.set_query("");
        let msg = input.handle_key(create_key_event(KeyCode::Backspace));
        assert!(msg.is_none());
    }

    #[test]
    fn test_insert_in_middle_with_multibyte() {
        let mut input = SearchInput::new("Patient");
        input.set_query("Ayşe");

        input.handle_key(create_key_event(KeyCode::Left));
        input.handle_key(create_key_event(KeyCode::Left));
        let msg = input.handle_key(create_key_event(KeyCode::Char('X')));

        assert!(matches!(msg, Some(Message::TextInput(q)) if q == "AyXşe"));
    }

    #[test]
    fn test_delete_under_cursor() {
        let mut input = SearchInput::new("Patient");
        input.set_query("abc");
        input.handle_key(create_key_event(KeyCode::Home));

        let msg = input.handle_key(create_key_event(KeyCode::Delete));
        assert!(matches!(msg, Some(Message::TextInput(q)) if q == "bc"));

        input.handle_key(create_key_event(KeyCode::End));
        let msg = input.handle_key(create_key_event(KeyCode::Delete));
        assert!(msg.is_none());
    }

    #[test]
    fn test_ctrl_w_and_ctrl_u() {
        let mut input = SearchInput::new("Patient");
        input.set_query("John Smith");

        let msg = input.handle_key(create_ctrl_event('w'));
        assert!(matches!(msg, Some(Message::TextInput(q)) if q == "John "));

        let msg = input.handle_key(create_ctrl_event('u'));
        assert!(matches!(msg, Some(Message::TextInput(q)) if q.is_empty()));

        let msg = input.handle_key(create_ctrl_event('u'));
        assert!(msg.is_none());
    }

    #[test]
    fn test_navigation_keys_are_not_text() {
        let mut input = SearchInput::new("Patient");

        for code in [KeyCode::Up, KeyCode::Down, KeyCode::Enter, KeyCode::Esc] {
            assert!(input.handle_key(create_key_event(code)).is_none());
        }
        assert_eq!(input.query(), "");
    }

    #[test]
    fn test_set_query_keeps_cursor_when_unchanged() {
        let mut input = SearchInput::new("Patient");
        input.set_query("Smith");
        input.handle_key(create_key_event(KeyCode::Home));

        input.set_query("Smith");
        assert_eq!(input.cursor_position(), 0);

        input.set_query("John Smith (ID: 1)");
        assert_eq!(input.cursor_position(), 18);
    }

    #[test]
    fn test_render_shows_label_hint_and_loading() {
        let mut input = SearchInput::new("Select Patient");
        input.set_query("Al");
        input.set_loading(true);
        input.set_hint(Some("Enter at least 2 characters".to_string()));

        let mut terminal = Terminal::new(TestBackend::new(60, 3)).unwrap();
        terminal.draw(|f| input.render(f, f.area())).unwrap();
        let content = buffer_to_string(terminal.backend().buffer());

        assert!(content.contains("Select Patient"));
        assert!(content.contains("[searching...]"));
        assert!(content.contains("Al"));
        assert!(content.contains("Enter at least 2 characters"));
    }
}

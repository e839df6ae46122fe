use command_menu::MenuKey;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Meaning of a key press before it reaches the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Menu(MenuKey),
    Type(char),
    Backspace,
    /// Clear the search, or quit when it is already empty
    Escape,
    ToggleDebugConsole,
    Quit,
    None,
}

pub fn map_key(key: &KeyEvent) -> Input {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let meta = key
        .modifiers
        .intersects(KeyModifiers::SUPER | KeyModifiers::META);

    match key.code {
        KeyCode::Char('c') if ctrl => Input::Quit,
        KeyCode::Char(c) if ctrl => Input::Menu(MenuKey::Ctrl(c)),
        KeyCode::Char('`') => Input::ToggleDebugConsole,
        KeyCode::Char(c) => Input::Type(c),
        KeyCode::Backspace => Input::Backspace,
        KeyCode::Esc => Input::Escape,
        KeyCode::Enter => Input::Menu(MenuKey::Enter),
        KeyCode::Up if alt => Input::Menu(MenuKey::AltUp),
        KeyCode::Down if alt => Input::Menu(MenuKey::AltDown),
        KeyCode::Up if meta => Input::Menu(MenuKey::MetaUp),
        KeyCode::Down if meta => Input::Menu(MenuKey::MetaDown),
        KeyCode::Up => Input::Menu(MenuKey::Up),
        KeyCode::Down => Input::Menu(MenuKey::Down),
        KeyCode::Home => Input::Menu(MenuKey::Home),
        KeyCode::End => Input::Menu(MenuKey::End),
        KeyCode::PageUp => Input::Menu(MenuKey::AltUp),
        KeyCode::PageDown => Input::Menu(MenuKey::AltDown),
        _ => Input::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_typing() {
        assert_eq!(
            map_key(&key(KeyCode::Char('a'), KeyModifiers::NONE)),
            Input::Type('a')
        );
        assert_eq!(
            map_key(&key(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            Input::Type('A')
        );
    }

    #[test]
    fn test_ctrl_keys() {
        assert_eq!(
            map_key(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Input::Quit
        );
        assert_eq!(
            map_key(&key(KeyCode::Char('n'), KeyModifiers::CONTROL)),
            Input::Menu(MenuKey::Ctrl('n'))
        );
    }

    #[test]
    fn test_group_navigation() {
        assert_eq!(
            map_key(&key(KeyCode::Down, KeyModifiers::ALT)),
            Input::Menu(MenuKey::AltDown)
        );
        assert_eq!(
            map_key(&key(KeyCode::Up, KeyModifiers::NONE)),
            Input::Menu(MenuKey::Up)
        );
        assert_eq!(
            map_key(&key(KeyCode::F(1), KeyModifiers::NONE)),
            Input::None
        );
    }
}

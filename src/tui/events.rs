use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Which widget receives plain keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Tree,
    Input,
}

/// User actions from keyboard events
#[derive(Debug, PartialEq)]
pub enum Action {
    Quit,
    Back,
    ToggleFocus,
    FocusInput,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    Home,
    End,
    Activate,
    ToggleCategory,
    Collapse,
    Expand,
    Submit,
    HistoryPrev,
    HistoryNext,
    UpdateInput(char),
    DeleteChar,
    Refresh,
    CycleSort,
    ClearHistory,
    CopyUrl,
    None,
}

/// Poll for keyboard events and convert to actions
pub fn poll_event(timeout: Duration, focus: Focus) -> anyhow::Result<Action> {
    if event::poll(timeout)?
        && let Event::Key(key) = event::read()?
        && key.kind != KeyEventKind::Release
    {
        return Ok(key_to_action(key, focus));
    }
    Ok(Action::None)
}

pub(crate) fn key_to_action(key: KeyEvent, focus: Focus) -> Action {
    // Bindings that work regardless of focus
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => return Action::Quit,
        (KeyCode::Char('r'), KeyModifiers::CONTROL) => return Action::Refresh,
        (KeyCode::Char('s'), KeyModifiers::CONTROL) => return Action::CycleSort,
        (KeyCode::Char('l'), KeyModifiers::CONTROL) => return Action::ClearHistory,
        (KeyCode::Char('y'), KeyModifiers::CONTROL) => return Action::CopyUrl,
        (KeyCode::Tab, _) => return Action::ToggleFocus,
        (KeyCode::Esc, _) => return Action::Back,
        _ => {}
    }

    match focus {
        Focus::Tree => tree_key(key),
        Focus::Input => input_key(key),
    }
}

fn tree_key(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Char('/'), KeyModifiers::NONE) => Action::FocusInput,

        // Navigation (arrows and vim keys)
        (KeyCode::Up, _) | (KeyCode::Char('k'), KeyModifiers::NONE) => Action::MoveUp,
        (KeyCode::Down, _) | (KeyCode::Char('j'), KeyModifiers::NONE) => Action::MoveDown,
        (KeyCode::PageUp, _) => Action::PageUp,
        (KeyCode::PageDown, _) => Action::PageDown,
        (KeyCode::Home, _) | (KeyCode::Char('g'), KeyModifiers::NONE) => Action::Home,
        (KeyCode::End, _) | (KeyCode::Char('G'), KeyModifiers::SHIFT) => Action::End,

        // Tree manipulation
        (KeyCode::Enter, _) => Action::Activate,
        (KeyCode::Char(' '), _) => Action::ToggleCategory,
        (KeyCode::Left, _) | (KeyCode::Char('h'), KeyModifiers::NONE) => Action::Collapse,
        (KeyCode::Right, _) | (KeyCode::Char('l'), KeyModifiers::NONE) => Action::Expand,

        _ => Action::None,
    }
}

fn input_key(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Enter, _) => Action::Submit,
        (KeyCode::Up, _) => Action::HistoryPrev,
        (KeyCode::Down, _) => Action::HistoryNext,
        (KeyCode::Backspace, _) => Action::DeleteChar,
        (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
            Action::UpdateInput(c)
        }
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_global_bindings_in_both_focuses() {
        for focus in [Focus::Tree, Focus::Input] {
            assert_eq!(key_to_action(ctrl('c'), focus), Action::Quit);
            assert_eq!(key_to_action(ctrl('r'), focus), Action::Refresh);
            assert_eq!(key_to_action(ctrl('s'), focus), Action::CycleSort);
            assert_eq!(key_to_action(ctrl('l'), focus), Action::ClearHistory);
            assert_eq!(key_to_action(ctrl('y'), focus), Action::CopyUrl);
            assert_eq!(key_to_action(key(KeyCode::Tab), focus), Action::ToggleFocus);
            assert_eq!(key_to_action(key(KeyCode::Esc), focus), Action::Back);
        }
    }

    #[test]
    fn test_enter_depends_on_focus() {
        assert_eq!(key_to_action(key(KeyCode::Enter), Focus::Tree), Action::Activate);
        assert_eq!(key_to_action(key(KeyCode::Enter), Focus::Input), Action::Submit);
    }

    #[test]
    fn test_arrows_depend_on_focus() {
        assert_eq!(key_to_action(key(KeyCode::Up), Focus::Tree), Action::MoveUp);
        assert_eq!(key_to_action(key(KeyCode::Down), Focus::Tree), Action::MoveDown);
        assert_eq!(key_to_action(key(KeyCode::Up), Focus::Input), Action::HistoryPrev);
        assert_eq!(key_to_action(key(KeyCode::Down), Focus::Input), Action::HistoryNext);
    }

    #[test]
    fn test_tree_keys() {
        assert_eq!(key_to_action(key(KeyCode::Char('q')), Focus::Tree), Action::Quit);
        assert_eq!(key_to_action(key(KeyCode::Char('/')), Focus::Tree), Action::FocusInput);
        assert_eq!(key_to_action(key(KeyCode::Char(' ')), Focus::Tree), Action::ToggleCategory);
        assert_eq!(key_to_action(key(KeyCode::Left), Focus::Tree), Action::Collapse);
        assert_eq!(key_to_action(key(KeyCode::Right), Focus::Tree), Action::Expand);
        assert_eq!(key_to_action(key(KeyCode::Char('j')), Focus::Tree), Action::MoveDown);
        assert_eq!(key_to_action(key(KeyCode::PageDown), Focus::Tree), Action::PageDown);
        assert_eq!(key_to_action(key(KeyCode::Home), Focus::Tree), Action::Home);
        assert_eq!(key_to_action(key(KeyCode::Char('x')), Focus::Tree), Action::None);
    }

    #[test]
    fn test_typing_in_input() {
        assert_eq!(key_to_action(key(KeyCode::Char('q')), Focus::Input), Action::UpdateInput('q'));
        assert_eq!(key_to_action(key(KeyCode::Char('@')), Focus::Input), Action::UpdateInput('@'));
        let shifted = KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(key_to_action(shifted, Focus::Input), Action::UpdateInput('A'));
        assert_eq!(key_to_action(key(KeyCode::Backspace), Focus::Input), Action::DeleteChar);
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(key_to_action(key(KeyCode::F(1)), Focus::Input), Action::None);
    }
}

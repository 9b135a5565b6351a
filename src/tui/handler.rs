use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::Screen;
use crate::models::Mood;

#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    Quit,
    MoveUp,
    MoveDown,
    Next,
    Back,
    CheckRoutine,
    SkipRoutine,
    SelectMood(Mood),
    ToggleFavorite,
    ShowFavorites,
    ShowHistory,
    ShowManage,
    ShowHelp,
    HideHelp,
    DismissCelebration,
    // Routine management
    AddRoutine,
    DeleteRoutine,
    MoveRoutineUp,
    MoveRoutineDown,
    ToggleRoutineActive,
    // Routine title input
    RoutineInputChar(char),
    RoutineInputBackspace,
    RoutineInputConfirm,
    RoutineInputCancel,
}

pub fn handle_key_event(
    key: KeyEvent,
    screen: Screen,
    routine_input_active: bool,
    show_help: bool,
    celebrating: bool,
) -> Option<AppAction> {
    // If help is showing, any key closes it
    if show_help {
        return Some(AppAction::HideHelp);
    }

    if celebrating {
        return Some(AppAction::DismissCelebration);
    }

    // Routine title input mode
    if routine_input_active {
        return match key.code {
            KeyCode::Enter => Some(AppAction::RoutineInputConfirm),
            KeyCode::Esc => Some(AppAction::RoutineInputCancel),
            KeyCode::Backspace => Some(AppAction::RoutineInputBackspace),
            KeyCode::Char(c) => Some(AppAction::RoutineInputChar(c)),
            _ => None,
        };
    }

    // Keys that mean something on one screen only
    let screen_action = match (screen, key.code) {
        (Screen::Routine, KeyCode::Char(' ')) => Some(AppAction::CheckRoutine),
        (Screen::Routine, KeyCode::Char('s')) => Some(AppAction::SkipRoutine),
        (Screen::Mood, KeyCode::Char(c @ '1'..='5')) => {
            let idx = c as usize - '1' as usize;
            Mood::ALL.get(idx).copied().map(AppAction::SelectMood)
        }
        (Screen::Manage, KeyCode::Char('a')) => Some(AppAction::AddRoutine),
        (Screen::Manage, KeyCode::Char('d')) => Some(AppAction::DeleteRoutine),
        (Screen::Manage, KeyCode::Char('K')) => Some(AppAction::MoveRoutineUp),
        (Screen::Manage, KeyCode::Char('J')) => Some(AppAction::MoveRoutineDown),
        (Screen::Manage, KeyCode::Char(' ')) => Some(AppAction::ToggleRoutineActive),
        _ => None,
    };
    if screen_action.is_some() {
        return screen_action;
    }

    // Normal mode
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) => Some(AppAction::Quit),
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(AppAction::Quit),

        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(AppAction::MoveDown),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(AppAction::MoveUp),

        (KeyCode::Enter, _) | (KeyCode::Right, _) => Some(AppAction::Next),
        (KeyCode::Esc, _) | (KeyCode::Left, _) => Some(AppAction::Back),

        (KeyCode::Char('f'), _) => Some(AppAction::ToggleFavorite),
        (KeyCode::Char('F'), _) => Some(AppAction::ShowFavorites),
        (KeyCode::Char('h'), _) => Some(AppAction::ShowHistory),
        (KeyCode::Char('e'), _) => Some(AppAction::ShowManage),

        (KeyCode::Char('?'), _) => Some(AppAction::ShowHelp),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_overlays_swallow_keys() {
        assert_eq!(
            handle_key_event(key(KeyCode::Char('q')), Screen::Quote, false, true, false),
            Some(AppAction::HideHelp)
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char('q')), Screen::Complete, false, false, true),
            Some(AppAction::DismissCelebration)
        );
    }

    #[test]
    fn test_input_mode_captures_characters() {
        assert_eq!(
            handle_key_event(key(KeyCode::Char('q')), Screen::Manage, true, false, false),
            Some(AppAction::RoutineInputChar('q'))
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Esc), Screen::Manage, true, false, false),
            Some(AppAction::RoutineInputCancel)
        );
    }

    #[test]
    fn test_space_depends_on_screen() {
        assert_eq!(
            handle_key_event(key(KeyCode::Char(' ')), Screen::Routine, false, false, false),
            Some(AppAction::CheckRoutine)
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char(' ')), Screen::Manage, false, false, false),
            Some(AppAction::ToggleRoutineActive)
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char(' ')), Screen::Quote, false, false, false),
            None
        );
    }

    #[test]
    fn test_number_keys_pick_mood() {
        assert_eq!(
            handle_key_event(key(KeyCode::Char('1')), Screen::Mood, false, false, false),
            Some(AppAction::SelectMood(Mood::Great))
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char('5')), Screen::Mood, false, false, false),
            Some(AppAction::SelectMood(Mood::Bad))
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char('1')), Screen::Quote, false, false, false),
            None
        );
    }
}

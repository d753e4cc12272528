//! Key mapping from terminal events to player intents.

use crate::types::{GameAction, GridState};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key press asks the front-end to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyIntent {
    /// Forward to the grid
    Action(GameAction),
    /// Leave the game
    Quit,
}

/// Map a key press, given the state the grid is in.
///
/// Release and repeat-less terminals both work: only `Press` and `Repeat` events count.
pub fn map_key(key: KeyEvent, state: GridState) -> Option<KeyIntent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if should_quit(key) {
        return Some(KeyIntent::Quit);
    }

    let action = match key.code {
        KeyCode::Char('r') | KeyCode::Char('R') => GameAction::Restart,
        // Game over screen: r or q, nothing else.
        _ if state == GridState::GameOver => return None,

        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('a') => GameAction::MoveLeft,
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('d') => GameAction::MoveRight,
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('s') => GameAction::SoftDrop,
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('w') | KeyCode::Char('x') => {
            GameAction::RotateCw
        }
        KeyCode::Char('z') | KeyCode::Char('y') => GameAction::RotateCcw,
        KeyCode::Char(' ') | KeyCode::Enter => GameAction::HardDrop,
        KeyCode::Char('c') | KeyCode::Char('C') => GameAction::Hold,
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Esc => GameAction::Pause,
        _ => return None,
    };
    Some(KeyIntent::Action(action))
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn press(code: KeyCode) -> Option<KeyIntent> {
        map_key(KeyEvent::from(code), GridState::Running)
    }

    fn action(action: GameAction) -> Option<KeyIntent> {
        Some(KeyIntent::Action(action))
    }

    #[test]
    fn test_movement_keys() {
        assert_eq!(press(KeyCode::Left), action(GameAction::MoveLeft));
        assert_eq!(press(KeyCode::Right), action(GameAction::MoveRight));
        assert_eq!(press(KeyCode::Down), action(GameAction::SoftDrop));
        assert_eq!(press(KeyCode::Char('h')), action(GameAction::MoveLeft));
        assert_eq!(press(KeyCode::Char('d')), action(GameAction::MoveRight));
    }

    #[test]
    fn test_rotation_and_drop_keys() {
        assert_eq!(press(KeyCode::Up), action(GameAction::RotateCw));
        assert_eq!(press(KeyCode::Char('z')), action(GameAction::RotateCcw));
        assert_eq!(press(KeyCode::Char(' ')), action(GameAction::HardDrop));
        assert_eq!(press(KeyCode::Char('c')), action(GameAction::Hold));
        assert_eq!(press(KeyCode::Char('p')), action(GameAction::Pause));
        assert_eq!(press(KeyCode::Char('v')), None);
    }

    #[test]
    fn test_game_over_accepts_only_reset_and_quit() {
        let over = GridState::GameOver;
        assert_eq!(map_key(KeyEvent::from(KeyCode::Left), over), None);
        assert_eq!(map_key(KeyEvent::from(KeyCode::Char(' ')), over), None);
        assert_eq!(
            map_key(KeyEvent::from(KeyCode::Char('r')), over),
            action(GameAction::Restart)
        );
        assert_eq!(
            map_key(KeyEvent::from(KeyCode::Char('q')), over),
            Some(KeyIntent::Quit)
        );
    }

    #[test]
    fn test_release_events_are_ignored() {
        let release = KeyEvent {
            code: KeyCode::Left,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(map_key(release, GridState::Running), None);
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('c'))));
    }
}

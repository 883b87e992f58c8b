//! Raw terminal events to abstract commands. Nothing in here knows about
//! the game state.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::{Direction, SpeedSetting};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    /// Start from the title screen, or restart after a game over.
    Start,
    TogglePause,
    SetSpeed(SpeedSetting),
    ResetHighScore,
    FocusLost,
    FocusGained,
    Quit,
}

pub fn translate(event: &Event) -> Option<Command> {
    match event {
        Event::Key(key) => translate_key(key),
        Event::FocusLost => Some(Command::FocusLost),
        Event::FocusGained => Some(Command::FocusGained),
        _ => None,
    }
}

pub fn translate_key(key: &KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if is_ctrl_c(key) {
        return Some(Command::Quit);
    }

    let command = match key.code {
        KeyCode::Char('w') | KeyCode::Up => Command::Turn(Direction::Up),
        KeyCode::Char('a') | KeyCode::Left => Command::Turn(Direction::Left),
        KeyCode::Char('s') | KeyCode::Down => Command::Turn(Direction::Down),
        KeyCode::Char('d') | KeyCode::Right => Command::Turn(Direction::Right),
        KeyCode::Char(' ') | KeyCode::Enter => Command::Start,
        KeyCode::Esc | KeyCode::Char('p') => Command::TogglePause,
        KeyCode::Char('1') => Command::SetSpeed(SpeedSetting::Slow),
        KeyCode::Char('2') => Command::SetSpeed(SpeedSetting::Medium),
        KeyCode::Char('3') => Command::SetSpeed(SpeedSetting::Fast),
        KeyCode::Char('r') => Command::ResetHighScore,
        KeyCode::Char('q') => Command::Quit,
        _ => return None,
    };

    Some(command)
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn arrows_and_wasd() {
        assert_eq!(translate(&press(KeyCode::Up)), Some(Command::Turn(Direction::Up)));
        assert_eq!(translate(&press(KeyCode::Char('a'))), Some(Command::Turn(Direction::Left)));
        assert_eq!(translate(&press(KeyCode::Char('s'))), Some(Command::Turn(Direction::Down)));
        assert_eq!(translate(&press(KeyCode::Right)), Some(Command::Turn(Direction::Right)));
    }

    #[test]
    fn session_keys() {
        assert_eq!(translate(&press(KeyCode::Char(' '))), Some(Command::Start));
        assert_eq!(translate(&press(KeyCode::Esc)), Some(Command::TogglePause));
        assert_eq!(translate(&press(KeyCode::Char('3'))), Some(Command::SetSpeed(SpeedSetting::Fast)));
        assert_eq!(translate(&press(KeyCode::Char('r'))), Some(Command::ResetHighScore));
        assert_eq!(translate(&press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn ctrl_c_quits() {
        let ev = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(translate(&ev), Some(Command::Quit));
        // Plain 'c' is not bound.
        assert_eq!(translate(&press(KeyCode::Char('c'))), None);
    }

    #[test]
    fn releases_are_ignored() {
        let mut key = KeyEvent::new(KeyCode::Up, KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert_eq!(translate_key(&key), None);
    }

    #[test]
    fn focus_changes() {
        assert_eq!(translate(&Event::FocusLost), Some(Command::FocusLost));
        assert_eq!(translate(&Event::FocusGained), Some(Command::FocusGained));
        assert_eq!(translate(&Event::Resize(80, 24)), None);
    }
}

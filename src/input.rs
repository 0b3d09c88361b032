use crossterm::event::{KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};

use crate::game::GameState;
use crate::runtime::GameEvent;

/// What an input means for the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Start,
    Click,
    Reset,
    OpenSignup,
    Quit,
}

/// Map a terminal event to an action for the current state.
///
/// Space and a left mouse press act as the click region: they start the game
/// from the start prompt and count as the reaction once it is running.
pub fn action_for(event: &GameEvent, state: GameState) -> Option<Action> {
    match event {
        GameEvent::Key(key, _) => {
            if key.kind != KeyEventKind::Press {
                return None;
            }

            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                return Some(Action::Quit);
            }

            match key.code {
                KeyCode::Esc | KeyCode::Char('q') => Some(Action::Quit),
                KeyCode::Char(' ') => press(state),
                KeyCode::Enter => match state {
                    GameState::Results => Some(Action::Reset),
                    _ => press(state),
                },
                KeyCode::Char('r') if state == GameState::Results => Some(Action::Reset),
                KeyCode::Char('d') if state == GameState::Results => Some(Action::OpenSignup),
                _ => None,
            }
        }
        GameEvent::Mouse(mouse, _) => match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => press(state),
            _ => None,
        },
        GameEvent::Resize(..) | GameEvent::Tick => None,
    }
}

fn press(state: GameState) -> Option<Action> {
    match state {
        GameState::Idle => Some(Action::Start),
        GameState::Waiting | GameState::Ready => Some(Action::Click),
        GameState::Results => None,
    }
}

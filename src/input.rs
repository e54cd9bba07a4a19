//! Terminal events to the two pointer signals the simulation understands.
//!
//! A reader thread polls crossterm and forwards [`HostEvent`]s over a
//! channel; the frame driver drains it once per frame.

use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use rand::Rng;

use crate::error::Result;
use crate::sim::Game;

const POLL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Down,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    Pointer(PointerEvent),
    Resize(u16, u16),
    Quit,
}

/// Pointer down makes the bird ascend. Pointer up makes it descend and is
/// the only way to start a run.
pub fn apply(game: &mut Game<impl Rng>, pointer: PointerEvent) {
    match pointer {
        PointerEvent::Down => game.press(),
        PointerEvent::Up => game.release(),
    }
}

/// Map one terminal event. Without key release reporting a flap key press
/// becomes a full tap (down then up).
pub fn translate(event: &Event, key_releases: bool) -> Vec<HostEvent> {
    match event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            ..
        }) => vec![HostEvent::Pointer(PointerEvent::Down)],
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Up(MouseButton::Left),
            ..
        }) => vec![HostEvent::Pointer(PointerEvent::Up)],
        Event::Key(key) => translate_key(key, key_releases),
        Event::Resize(cols, rows) => vec![HostEvent::Resize(*cols, *rows)],
        _ => Vec::new(),
    }
}

fn translate_key(key: &KeyEvent, key_releases: bool) -> Vec<HostEvent> {
    let pressed = key.kind == KeyEventKind::Press;
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) && pressed => {
            vec![HostEvent::Quit]
        }
        KeyCode::Char('q') | KeyCode::Esc if pressed => vec![HostEvent::Quit],
        KeyCode::Char(' ') | KeyCode::Up | KeyCode::Enter => match (key.kind, key_releases) {
            (KeyEventKind::Press, true) => vec![HostEvent::Pointer(PointerEvent::Down)],
            (KeyEventKind::Release, true) => vec![HostEvent::Pointer(PointerEvent::Up)],
            (KeyEventKind::Press, false) => vec![
                HostEvent::Pointer(PointerEvent::Down),
                HostEvent::Pointer(PointerEvent::Up),
            ],
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

fn next_event() -> std::io::Result<Option<Event>> {
    if event::poll(POLL)? {
        event::read().map(Some)
    } else {
        Ok(None)
    }
}

/// Spawn the reader thread. It stops after a failed send, i.e. once the
/// receiving driver is gone.
pub fn spawn_reader(tx: Sender<HostEvent>, key_releases: bool) -> Result<JoinHandle<()>> {
    let handle = thread::Builder::new()
        .name("input".into())
        .spawn(move || {
            loop {
                let event = match next_event() {
                    Ok(Some(event)) => event,
                    Ok(None) => continue,
                    Err(e) => {
                        log::error!("reading terminal input: {e}");
                        let _ = tx.send(HostEvent::Quit);
                        return;
                    }
                };
                for host_event in translate(&event, key_releases) {
                    if tx.send(host_event).is_err() {
                        return;
                    }
                }
            }
        })?;
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Geometry;
    use crate::sim::{Direction, State};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn mouse(kind: MouseEventKind) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column: 3,
            row: 4,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent::new_with_kind(code, KeyModifiers::NONE, kind))
    }

    const DOWN: HostEvent = HostEvent::Pointer(PointerEvent::Down);
    const UP: HostEvent = HostEvent::Pointer(PointerEvent::Up);

    #[test]
    fn left_button_maps_to_pointer() {
        let down = mouse(MouseEventKind::Down(MouseButton::Left));
        let up = mouse(MouseEventKind::Up(MouseButton::Left));
        assert_eq!(translate(&down, false), vec![DOWN]);
        assert_eq!(translate(&up, false), vec![UP]);
    }

    #[test]
    fn other_mouse_activity_is_ignored() {
        assert!(translate(&mouse(MouseEventKind::Down(MouseButton::Right)), true).is_empty());
        assert!(translate(&mouse(MouseEventKind::Moved), true).is_empty());
        assert!(translate(&mouse(MouseEventKind::ScrollUp), true).is_empty());
    }

    #[test]
    fn flap_keys_follow_press_and_release() {
        for code in [KeyCode::Char(' '), KeyCode::Up, KeyCode::Enter] {
            assert_eq!(translate(&key(code, KeyEventKind::Press), true), vec![DOWN]);
            assert_eq!(translate(&key(code, KeyEventKind::Release), true), vec![UP]);
            assert!(translate(&key(code, KeyEventKind::Repeat), true).is_empty());
        }
    }

    #[test]
    fn flap_key_is_a_tap_without_release_reporting() {
        let press = key(KeyCode::Char(' '), KeyEventKind::Press);
        assert_eq!(translate(&press, false), vec![DOWN, UP]);
    }

    #[test]
    fn quit_keys() {
        assert_eq!(
            translate(&key(KeyCode::Char('q'), KeyEventKind::Press), true),
            vec![HostEvent::Quit]
        );
        assert_eq!(
            translate(&key(KeyCode::Esc, KeyEventKind::Press), false),
            vec![HostEvent::Quit]
        );
        assert!(translate(&key(KeyCode::Esc, KeyEventKind::Release), true).is_empty());

        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(translate(&ctrl_c, false), vec![HostEvent::Quit]);
        assert!(translate(&key(KeyCode::Char('c'), KeyEventKind::Press), false).is_empty());
    }

    #[test]
    fn resize_is_forwarded() {
        assert_eq!(
            translate(&Event::Resize(120, 40), false),
            vec![HostEvent::Resize(120, 40)]
        );
        assert!(translate(&Event::FocusGained, false).is_empty());
    }

    #[test]
    fn pointer_signals_drive_the_game() {
        let mut game = Game::new(Geometry::default(), StdRng::seed_from_u64(1));
        apply(&mut game, PointerEvent::Down);
        assert_eq!(game.bird().direction, Direction::Ascend);
        assert_eq!(game.state(), State::Ready);

        apply(&mut game, PointerEvent::Up);
        assert_eq!(game.bird().direction, Direction::Descend);
        assert_eq!(game.state(), State::Playing);
    }
}

//! Keyboard input from the terminal.
//!
//! A dedicated thread performs the blocking `event::read` calls and forwards
//! events through a channel, so polling never blocks the game loop.
//!
//! Held keys: instead of acting on each key event individually, we record
//! the frame of the last press/repeat event for every key.  A key counts as
//! held while that frame is within `HOLD_WINDOW` frames of the current one.
//! Terminals with keyboard enhancement send proper releases and drop the key
//! at once; classic terminals only send presses (OS key repeat shows up as
//! more presses), and the key expires after the window of silence.

use std::collections::HashMap;
use std::sync::mpsc;
use std::thread;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use car_dodge::platform::{FrameInput, InputSource};
use car_dodge::rules::Ruleset;

/// A key is considered held if its last press/repeat arrived within this
/// many frames.  OS key repeat runs at 15 Hz or more, about one repeat every
/// 4 frames at 60 FPS.
const HOLD_WINDOW: u64 = 4;

pub struct TerminalInput {
    rx: mpsc::Receiver<Event>,
    key_frame: HashMap<KeyCode, u64>,
    frame: u64,
}

impl TerminalInput {
    /// Spawn the reader thread.  It exits when the receiver is dropped or the
    /// terminal read fails.
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel::<Event>();
        thread::spawn(move || loop {
            match event::read() {
                Ok(ev) => {
                    if tx.send(ev).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    log::warn!("Keyboard reader stopped: {e}");
                    break;
                }
            }
        });
        Self::from_receiver(rx)
    }

    pub fn from_receiver(rx: mpsc::Receiver<Event>) -> Self {
        Self {
            rx,
            key_frame: HashMap::new(),
            frame: 0,
        }
    }

    fn is_held(&self, key: KeyCode) -> bool {
        self.key_frame
            .get(&key)
            .map(|&last| self.frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    fn any_held(&self, keys: &[KeyCode]) -> bool {
        keys.iter().any(|&k| self.is_held(k))
    }
}

impl InputSource for TerminalInput {
    fn poll(&mut self) -> FrameInput {
        self.frame += 1;
        let mut input = FrameInput::default();

        // Drain all pending events without blocking.
        while let Ok(ev) = self.rx.try_recv() {
            let Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = ev
            else {
                continue;
            };

            match kind {
                KeyEventKind::Press => {
                    self.key_frame.insert(code, self.frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            input.quit = true;
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            input.quit = true;
                        }
                        KeyCode::Char(' ') | KeyCode::Enter => input.start = true,
                        KeyCode::Char('p') | KeyCode::Char('P') => input.pause = true,
                        KeyCode::Char('r') | KeyCode::Char('R') => input.restart = true,
                        KeyCode::Char(c @ '1'..='3') => {
                            input.select = c.to_string().parse::<Ruleset>().ok();
                        }
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    self.key_frame.insert(code, self.frame);
                }
                KeyEventKind::Release => {
                    self.key_frame.remove(&code);
                }
            }
        }

        input.left = self.any_held(&[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')]);
        input.right = self.any_held(&[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')]);
        input.up = self.any_held(&[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')]);
        input.down = self.any_held(&[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')]);
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn press_is_held_until_window_expires() {
        let (tx, rx) = mpsc::channel();
        let mut input = TerminalInput::from_receiver(rx);
        tx.send(key(KeyCode::Left, KeyEventKind::Press)).unwrap();

        assert!(input.poll().left);
        for _ in 0..HOLD_WINDOW {
            assert!(input.poll().left);
        }
        assert!(!input.poll().left);
    }

    #[test]
    fn release_drops_key_immediately() {
        let (tx, rx) = mpsc::channel();
        let mut input = TerminalInput::from_receiver(rx);
        tx.send(key(KeyCode::Char('d'), KeyEventKind::Press)).unwrap();
        assert!(input.poll().right);
        tx.send(key(KeyCode::Char('d'), KeyEventKind::Release)).unwrap();
        assert!(!input.poll().right);
    }

    #[test]
    fn one_shot_keys_fire_once() {
        let (tx, rx) = mpsc::channel();
        let mut input = TerminalInput::from_receiver(rx);
        tx.send(key(KeyCode::Char('p'), KeyEventKind::Press)).unwrap();
        tx.send(key(KeyCode::Char('2'), KeyEventKind::Press)).unwrap();
        let first = input.poll();
        assert!(first.pause);
        assert_eq!(first.select, Some(Ruleset::Lanes));
        let second = input.poll();
        assert!(!second.pause);
        assert_eq!(second.select, None);
    }

    #[test]
    fn ctrl_c_quits() {
        let (tx, rx) = mpsc::channel();
        let mut input = TerminalInput::from_receiver(rx);
        tx.send(Event::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )))
        .unwrap();
        assert!(input.poll().quit);
    }
}

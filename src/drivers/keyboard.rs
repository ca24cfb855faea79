use crossterm::event::{KeyCode, KeyEventKind, KeyModifiers};

use crate::event::{KeyAction, KeyEvent, Modifiers, RawEvent, keys};

pub fn modifiers_from(mods: KeyModifiers) -> Modifiers {
    let mut out = Modifiers::empty();
    if mods.contains(KeyModifiers::SHIFT) {
        out |= Modifiers::SHIFT;
    }
    if mods.contains(KeyModifiers::CONTROL) {
        out |= Modifiers::CONTROL;
    }
    if mods.contains(KeyModifiers::ALT) {
        out |= Modifiers::ALT;
    }
    if mods.contains(KeyModifiers::SUPER) {
        out |= Modifiers::SUPER;
    }
    out
}

/// Backend-neutral key code for a terminal key, if it has one.
pub fn key_code(code: KeyCode) -> Option<i32> {
    let key = match code {
        KeyCode::Esc => keys::ESCAPE,
        KeyCode::Enter => keys::ENTER,
        KeyCode::Tab | KeyCode::BackTab => keys::TAB,
        KeyCode::Backspace => keys::BACKSPACE,
        KeyCode::Insert => keys::INSERT,
        KeyCode::Delete => keys::DELETE,
        KeyCode::Right => keys::RIGHT,
        KeyCode::Left => keys::LEFT,
        KeyCode::Down => keys::DOWN,
        KeyCode::Up => keys::UP,
        KeyCode::PageUp => keys::PAGE_UP,
        KeyCode::PageDown => keys::PAGE_DOWN,
        KeyCode::Home => keys::HOME,
        KeyCode::End => keys::END,
        KeyCode::F(n) => keys::F_BASE + i32::from(n),
        KeyCode::Char(c) => c as i32,
        _ => return None,
    };
    Some(key)
}

/// Turns terminal key reports into key and text events.
///
/// Terminals disagree on release/repeat reporting: releases are dropped
/// everywhere, and on Windows repeats and the duplicate Esc press are dropped
/// too. A printable press without Control/Alt also produces a text event.
#[derive(Debug, Default)]
pub struct KeyboardNormalizer {
    esc_down: bool,
}

impl KeyboardNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn normalize(&mut self, key: crossterm::event::KeyEvent) -> Vec<RawEvent> {
        if cfg!(windows) {
            match key.kind {
                KeyEventKind::Release => {
                    if key.code == KeyCode::Esc {
                        self.esc_down = false;
                    }
                    return Vec::new();
                }
                KeyEventKind::Repeat => return Vec::new(),
                KeyEventKind::Press => {}
            }
            if key.code == KeyCode::Esc {
                if self.esc_down {
                    return Vec::new();
                }
                self.esc_down = true;
            } else {
                self.esc_down = false;
            }
        } else if key.kind == KeyEventKind::Release {
            return Vec::new();
        }

        let Some(code) = key_code(key.code) else {
            return Vec::new();
        };
        let mut modifiers = modifiers_from(key.modifiers);
        if key.code == KeyCode::BackTab {
            modifiers |= Modifiers::SHIFT;
        }
        let action = match key.kind {
            KeyEventKind::Repeat => KeyAction::Repeat,
            _ => KeyAction::Press,
        };

        let mut out = vec![RawEvent::Key(KeyEvent::new(code, action, modifiers))];
        if let KeyCode::Char(c) = key.code
            && !modifiers.intersects(Modifiers::CONTROL | Modifiers::ALT)
        {
            out.push(RawEvent::Text(c.to_string()));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent as TermKey;

    #[test]
    fn backtab_becomes_shift_tab() {
        let mut norm = KeyboardNormalizer::new();
        let out = norm.normalize(TermKey::new(KeyCode::BackTab, KeyModifiers::NONE));
        assert_eq!(
            out,
            vec![RawEvent::Key(KeyEvent::new(
                keys::TAB,
                KeyAction::Press,
                Modifiers::SHIFT
            ))]
        );
    }

    #[test]
    fn release_key_is_ignored() {
        let mut norm = KeyboardNormalizer::new();
        let mut key = TermKey::new(KeyCode::Char('a'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert!(norm.normalize(key).is_empty());
    }

    #[test]
    fn printable_press_also_yields_text() {
        let mut norm = KeyboardNormalizer::new();
        let out = norm.normalize(TermKey::new(KeyCode::Char('x'), KeyModifiers::NONE));
        assert_eq!(out.len(), 2);
        assert_eq!(out[1], RawEvent::Text("x".to_string()));
    }

    #[test]
    fn control_chords_yield_no_text() {
        let mut norm = KeyboardNormalizer::new();
        let out = norm.normalize(TermKey::new(KeyCode::Char('q'), KeyModifiers::CONTROL));
        assert_eq!(
            out,
            vec![RawEvent::Key(KeyEvent::new(
                'q' as i32,
                KeyAction::Press,
                Modifiers::CONTROL
            ))]
        );
    }

    #[test]
    fn function_keys_map_above_unicode() {
        assert_eq!(key_code(KeyCode::F(3)), Some(keys::F_BASE + 3));
        assert_eq!(key_code(KeyCode::CapsLock), None);
    }
}

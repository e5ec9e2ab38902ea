//! Key Mapping
//!
//! Turns terminal key presses into what the app should do with them. The
//! mapping only depends on the current [`Session`], so it is testable
//! without a terminal.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use doomsday_core::{FlowEvent, Session, Stage};

/// What a key press means
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// Forward to the flow controller
    Flow(FlowEvent),
    /// Reveal the current animation at once
    Skip,
    /// Nothing to do
    Ignore,
}

/// Map a key press for the current session
pub fn map_key(session: &Session, key: KeyEvent) -> KeyAction {
    // Quit works everywhere
    match key.code {
        KeyCode::Esc => return KeyAction::Flow(FlowEvent::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return KeyAction::Flow(FlowEvent::Quit)
        }
        _ => {}
    }

    match session.stage {
        Stage::Intro => match key.code {
            KeyCode::Enter | KeyCode::Char(' ') if session.start_visible => {
                KeyAction::Flow(FlowEvent::StartPressed)
            }
            KeyCode::Enter | KeyCode::Char(' ') => KeyAction::Skip,
            _ => KeyAction::Ignore,
        },

        Stage::Config | Stage::Confirmation => match key.code {
            KeyCode::Enter => KeyAction::Flow(FlowEvent::Submit),
            KeyCode::Backspace => KeyAction::Flow(FlowEvent::Backspace),
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                KeyAction::Flow(FlowEvent::Input(c))
            }
            _ => KeyAction::Ignore,
        },

        Stage::Poem if session.restart_armed => KeyAction::Flow(FlowEvent::AnyKey),
        Stage::Poem => KeyAction::Skip,
    }
}

/// Map pasted text for the current session
pub fn map_paste(session: &Session, text: String) -> KeyAction {
    if session.stage.accepts_input() {
        KeyAction::Flow(FlowEvent::Paste(text))
    } else {
        KeyAction::Ignore
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn at(stage: Stage) -> Session {
        Session {
            stage,
            ..Session::default()
        }
    }

    #[test]
    fn test_quit_keys() {
        for stage in [Stage::Intro, Stage::Config, Stage::Confirmation, Stage::Poem] {
            assert_eq!(
                map_key(&at(stage), key(KeyCode::Esc)),
                KeyAction::Flow(FlowEvent::Quit)
            );
            assert_eq!(
                map_key(
                    &at(stage),
                    KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)
                ),
                KeyAction::Flow(FlowEvent::Quit)
            );
        }
    }

    #[test]
    fn test_intro_start() {
        let mut session = at(Stage::Intro);
        assert_eq!(map_key(&session, key(KeyCode::Enter)), KeyAction::Skip);
        assert_eq!(map_key(&session, key(KeyCode::Char('x'))), KeyAction::Ignore);

        session.start_visible = true;
        assert_eq!(
            map_key(&session, key(KeyCode::Enter)),
            KeyAction::Flow(FlowEvent::StartPressed)
        );
    }

    #[test]
    fn test_input_stages_edit_line() {
        for stage in [Stage::Config, Stage::Confirmation] {
            let session = at(stage);
            assert_eq!(
                map_key(&session, key(KeyCode::Char('N'))),
                KeyAction::Flow(FlowEvent::Input('N'))
            );
            assert_eq!(
                map_key(&session, key(KeyCode::Backspace)),
                KeyAction::Flow(FlowEvent::Backspace)
            );
            assert_eq!(
                map_key(&session, key(KeyCode::Enter)),
                KeyAction::Flow(FlowEvent::Submit)
            );
            assert_eq!(map_key(&session, key(KeyCode::Left)), KeyAction::Ignore);
        }
    }

    #[test]
    fn test_poem_any_key_after_closing() {
        let mut session = at(Stage::Poem);
        assert_eq!(map_key(&session, key(KeyCode::Char('q'))), KeyAction::Skip);

        session.restart_armed = true;
        assert_eq!(
            map_key(&session, key(KeyCode::Char('q'))),
            KeyAction::Flow(FlowEvent::AnyKey)
        );
        assert_eq!(
            map_key(&session, key(KeyCode::Tab)),
            KeyAction::Flow(FlowEvent::AnyKey)
        );
    }

    #[test]
    fn test_paste_only_in_input_stages() {
        assert_eq!(
            map_paste(&at(Stage::Config), "Nova".into()),
            KeyAction::Flow(FlowEvent::Paste("Nova".into()))
        );
        assert_eq!(map_paste(&at(Stage::Poem), "Nova".into()), KeyAction::Ignore);
    }
}

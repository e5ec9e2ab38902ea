//! Pure stage transitions: (Session, FlowEvent) → Transition.
//!
//! This is the terminal's state machine. It never performs I/O: side effects
//! come back as [`Effect`]s for the controller to carry out, so every rule
//! here is testable without a runtime or a terminal.
//!
//! ```text
//! Intro ──Start──► Config ──name──► Confirmation ──y/yes──► Poem
//!                    ▲  ▲                │                    │
//!                    │  └─────n/no───────┘                    │
//!                    └──────────any key (closing revealed)────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::events::FlowEvent;
use crate::poem::Poem;
use crate::script::INVALID_CONFIRMATION;

/// Volume used before the user changes it
pub const DEFAULT_VOLUME: u8 = 45;

/// Highest accepted volume
pub const MAX_VOLUME: u8 = 100;

/// Screens of the terminal
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    /// Boot banner and Start control
    #[default]
    Intro,
    /// Volume commands and name entry
    Config,
    /// Y/N confirmation of the name
    Confirmation,
    /// Prophecy display
    Poem,
}

impl Stage {
    /// Whether this stage shows an input line
    #[must_use]
    pub fn accepts_input(self) -> bool {
        matches!(self, Self::Config | Self::Confirmation)
    }
}

/// The whole terminal session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Current screen
    pub stage: Stage,
    /// Candidate name (empty when none)
    pub name: String,
    /// Background music volume, 0-100
    pub volume: u8,
    /// Contents of the input line
    pub pending_input: String,
    /// Inline error shown on the confirmation screen
    pub error_message: Option<String>,
    /// A poem request is in flight
    pub is_generating: bool,
    /// The prophecy, once settled
    pub poem: Option<Poem>,
    /// Intro banner finished, Start control shown
    pub start_visible: bool,
    /// Closing message finished, any key restarts
    pub restart_armed: bool,
    /// Ticket of the latest poem request
    pub generation: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::with_volume(DEFAULT_VOLUME)
    }
}

impl Session {
    /// Fresh session starting at the given volume
    #[must_use]
    pub fn with_volume(volume: u8) -> Self {
        Self {
            stage: Stage::Intro,
            name: String::new(),
            volume: volume.min(MAX_VOLUME),
            pending_input: String::new(),
            error_message: None,
            is_generating: false,
            poem: None,
            start_visible: false,
            restart_armed: false,
            generation: 0,
        }
    }
}

/// Side effects requested by a transition
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Begin background music at the given volume
    StartPlayback {
        /// Volume to start at
        volume: u8,
    },
    /// Change background music volume
    SetVolume(u8),
    /// Request a poem for `name`, tagged with `generation`
    RequestPoem {
        /// Ticket for this request
        generation: u64,
        /// Name to weave into the poem
        name: String,
    },
    /// Leave the terminal
    Quit,
}

/// Result of applying one event
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    /// The session after the event
    pub session: Session,
    /// Effects to carry out, in order
    pub effects: Vec<Effect>,
}

impl Transition {
    fn unchanged(session: &Session) -> Self {
        Self::to(session.clone())
    }

    fn to(session: Session) -> Self {
        Self {
            session,
            effects: Vec::new(),
        }
    }

    fn with(session: Session, effect: Effect) -> Self {
        Self {
            session,
            effects: vec![effect],
        }
    }
}

/// Parsed form of a config-stage `volume` command
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VolumeCommand {
    /// Valid command with a value in range
    Set(u8),
    /// Missing, non-numeric or out-of-range value
    Invalid,
}

/// Recognize `volume N` (case-insensitive).
///
/// Returns `None` when the input is not a volume command at all. Any input
/// starting with "volume" is a volume command, valid or not, and never a name.
#[must_use]
pub fn parse_volume_command(input: &str) -> Option<VolumeCommand> {
    let head = input.get(..6)?;
    if !head.eq_ignore_ascii_case("volume") {
        return None;
    }

    let value = input
        .split_whitespace()
        .nth(1)
        .and_then(|raw| raw.parse::<i64>().ok())
        .and_then(|v| u8::try_from(v).ok())
        .filter(|v| *v <= MAX_VOLUME);

    Some(value.map_or(VolumeCommand::Invalid, VolumeCommand::Set))
}

/// Pure state transition function
pub fn update(session: &Session, event: &FlowEvent) -> Transition {
    if matches!(event, FlowEvent::Quit) {
        return Transition::with(session.clone(), Effect::Quit);
    }

    match session.stage {
        Stage::Intro => update_intro(session, event),
        Stage::Config | Stage::Confirmation => update_input_stage(session, event),
        Stage::Poem => update_poem(session, event),
    }
}

// ============================================================================
// PER-STAGE HANDLERS
// ============================================================================

/// Intro: Start only works once the banner has finished.
fn update_intro(session: &Session, event: &FlowEvent) -> Transition {
    match event {
        FlowEvent::IntroRevealed if !session.start_visible => {
            let mut next = session.clone();
            next.start_visible = true;
            Transition::to(next)
        }
        FlowEvent::StartPressed if session.start_visible => {
            let mut next = session.clone();
            next.stage = Stage::Config;
            let volume = next.volume;
            Transition::with(next, Effect::StartPlayback { volume })
        }
        _ => Transition::unchanged(session),
    }
}

/// Config and Confirmation share the input line.
fn update_input_stage(session: &Session, event: &FlowEvent) -> Transition {
    match event {
        FlowEvent::Input(c) if !c.is_control() => {
            let mut next = session.clone();
            next.pending_input.push(*c);
            Transition::to(next)
        }
        FlowEvent::Paste(text) => {
            let mut next = session.clone();
            next.pending_input
                .extend(text.chars().filter(|c| !c.is_control()));
            Transition::to(next)
        }
        FlowEvent::Backspace => {
            let mut next = session.clone();
            next.pending_input.pop();
            Transition::to(next)
        }
        FlowEvent::Submit => {
            let submitted = session.pending_input.trim();
            if submitted.is_empty() {
                return Transition::unchanged(session);
            }

            let mut next = session.clone();
            next.pending_input.clear();
            if session.stage == Stage::Config {
                submit_config(next, submitted)
            } else {
                submit_confirmation(next, submitted)
            }
        }
        _ => Transition::unchanged(session),
    }
}

fn submit_config(mut next: Session, submitted: &str) -> Transition {
    match parse_volume_command(submitted) {
        Some(VolumeCommand::Set(volume)) => {
            next.volume = volume;
            Transition::with(next, Effect::SetVolume(volume))
        }
        Some(VolumeCommand::Invalid) => {
            tracing::debug!(input = submitted, "Ignoring invalid volume command");
            Transition::to(next)
        }
        None => {
            next.name = submitted.to_string();
            next.stage = Stage::Confirmation;
            Transition::to(next)
        }
    }
}

fn submit_confirmation(mut next: Session, submitted: &str) -> Transition {
    match submitted.to_lowercase().as_str() {
        "y" | "yes" => {
            next.generation += 1;
            next.stage = Stage::Poem;
            next.is_generating = true;
            next.poem = None;
            next.error_message = None;
            next.restart_armed = false;
            let effect = Effect::RequestPoem {
                generation: next.generation,
                name: next.name.clone(),
            };
            Transition::with(next, effect)
        }
        "n" | "no" => {
            next.stage = Stage::Config;
            next.name.clear();
            next.error_message = None;
            Transition::to(next)
        }
        _ => {
            next.error_message = Some(INVALID_CONFIRMATION.to_string());
            Transition::to(next)
        }
    }
}

/// Poem: accept the settled poem, then wait for a key to loop back.
fn update_poem(session: &Session, event: &FlowEvent) -> Transition {
    match event {
        FlowEvent::PoemReady { generation, poem } => {
            if *generation != session.generation || !session.is_generating {
                tracing::debug!(
                    generation,
                    current = session.generation,
                    "Dropping stale poem"
                );
                return Transition::unchanged(session);
            }
            let mut next = session.clone();
            next.poem = Some(poem.clone());
            next.is_generating = false;
            Transition::to(next)
        }
        FlowEvent::ClosingRevealed if !session.restart_armed => {
            let mut next = session.clone();
            next.restart_armed = true;
            Transition::to(next)
        }
        FlowEvent::AnyKey
        | FlowEvent::Input(_)
        | FlowEvent::Paste(_)
        | FlowEvent::Backspace
        | FlowEvent::Submit
            if session.restart_armed =>
        {
            let mut next = session.clone();
            next.stage = Stage::Config;
            next.name.clear();
            next.poem = None;
            next.error_message = None;
            next.pending_input.clear();
            next.is_generating = false;
            next.restart_armed = false;
            Transition::to(next)
        }
        _ => Transition::unchanged(session),
    }
}

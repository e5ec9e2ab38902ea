//! Display State Types
//!
//! Types that represent what the terminal currently shows. They are derived
//! from FlowMessages and used for rendering.
//!
//! # Design Philosophy
//!
//! The TUI is a "thin client" - it renders what the controller tells it to.
//! The only thing it owns is animation: one [`Typewriter`] per text block,
//! advanced from the frame loop. When a reveal the flow cares about
//! finishes, the typewriter's completion callback queues the matching
//! [`FlowEvent`] for the app to forward.
//!
//! - Intro banner: reports [`FlowEvent::IntroRevealed`]
//! - Config / confirmation banner: restarts when its text changes
//! - Generating indicator: slow typewriter while a poem is in flight
//! - Poem: [`PoemReveal`], line by line
//! - Closing message: reports [`FlowEvent::ClosingRevealed`]

use std::time::Duration;

use tokio::sync::mpsc;

use doomsday_core::script::{self, CLOSING_TEXT, GENERATING_TEXT, INTRO_TEXT};
use doomsday_core::{FlowEvent, FlowMessage, PoemReveal, Session, Stage, TerminalConfig, Typewriter};

/// Cursor blink half-period
const BLINK_INTERVAL: Duration = Duration::from_millis(500);

/// Complete display state for the terminal
pub struct DisplayState {
    /// Latest session snapshot from the controller
    pub session: Session,
    /// Controller is shutting down
    pub quitting: bool,
    /// Block cursor currently drawn
    pub cursor_on: bool,

    // === Typewriter speeds ===
    text_speed: Duration,
    generating_speed: Duration,

    // === Active blocks ===
    intro: Typewriter,
    banner: Option<Typewriter>,
    generating: Option<Typewriter>,
    reveal: Option<PoemReveal>,
    closing: Option<Typewriter>,

    // === Reveal notifications ===
    events_tx: mpsc::UnboundedSender<FlowEvent>,
    events_rx: mpsc::UnboundedReceiver<FlowEvent>,

    blink_timer: Duration,
}

impl DisplayState {
    /// Create display state for a fresh session
    pub fn new(terminal: &TerminalConfig) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let intro = Self::notifying(
            Typewriter::new(INTRO_TEXT, terminal.text_speed),
            &events_tx,
            FlowEvent::IntroRevealed,
        );

        Self {
            session: Session::with_volume(terminal.initial_volume),
            quitting: false,
            cursor_on: true,
            text_speed: terminal.text_speed,
            generating_speed: terminal.generating_speed,
            intro,
            banner: None,
            generating: None,
            reveal: None,
            closing: None,
            events_tx,
            events_rx,
            blink_timer: Duration::ZERO,
        }
    }

    /// Attach a completion callback that queues `event`
    fn notifying(
        typewriter: Typewriter,
        tx: &mpsc::UnboundedSender<FlowEvent>,
        event: FlowEvent,
    ) -> Typewriter {
        let tx = tx.clone();
        typewriter.on_complete(move || {
            if tx.send(event.clone()).is_err() {
                tracing::debug!("Display dropped before reveal completed");
            }
        })
    }

    /// Apply a flow message to update display state
    pub fn apply_message(&mut self, msg: FlowMessage) {
        match msg {
            FlowMessage::State { session } => self.apply_session(session),
            FlowMessage::Quit => self.quitting = true,
            // Media is handled by the app's player
            FlowMessage::Media(_) => {}
        }
    }

    /// Swap in a new session snapshot and sync the text blocks with it
    fn apply_session(&mut self, session: Session) {
        let previous = std::mem::replace(&mut self.session, session);
        let entered = previous.stage != self.session.stage;

        if entered {
            tracing::debug!(from = ?previous.stage, to = ?self.session.stage, "Stage changed");
            self.clear_blocks();
        }

        match self.session.stage {
            Stage::Intro => {
                if entered {
                    self.intro = Self::notifying(
                        Typewriter::new(INTRO_TEXT, self.text_speed),
                        &self.events_tx,
                        FlowEvent::IntroRevealed,
                    );
                }
            }
            Stage::Config => {
                let text = script::config_text(self.session.volume);
                match self.banner.as_mut() {
                    Some(banner) => banner.restart(text, self.text_speed),
                    None => self.banner = Some(Typewriter::new(text, self.text_speed)),
                }
            }
            Stage::Confirmation => {
                let text = script::confirmation_text(&self.session.name);
                match self.banner.as_mut() {
                    Some(banner) => banner.restart(text, self.text_speed),
                    None => self.banner = Some(Typewriter::new(text, self.text_speed)),
                }
            }
            Stage::Poem => self.sync_poem_blocks(),
        }
    }

    fn sync_poem_blocks(&mut self) {
        if self.closing.is_none() {
            self.closing = Some(Self::notifying(
                Typewriter::new(CLOSING_TEXT, self.text_speed),
                &self.events_tx,
                FlowEvent::ClosingRevealed,
            ));
        }

        if self.session.is_generating {
            if self.generating.is_none() {
                self.generating = Some(Typewriter::new(GENERATING_TEXT, self.generating_speed));
            }
        } else if let Some(mut generating) = self.generating.take() {
            generating.cancel();
        }

        match (&self.session.poem, &self.reveal) {
            (Some(poem), None) => self.reveal = Some(PoemReveal::new(poem, self.text_speed)),
            (None, Some(_)) => self.reveal = None,
            _ => {}
        }
    }

    /// Drop every stage-specific block
    fn clear_blocks(&mut self) {
        for typewriter in [
            self.banner.as_mut(),
            self.generating.as_mut(),
            self.closing.as_mut(),
        ]
        .into_iter()
        .flatten()
        {
            typewriter.cancel();
        }
        self.banner = None;
        self.generating = None;
        self.reveal = None;
        self.closing = None;
    }

    /// Advance animations. Returns true if anything visible changed.
    pub fn update(&mut self, delta: Duration) -> bool {
        let mut changed = false;

        self.blink_timer += delta;
        if self.blink_timer >= BLINK_INTERVAL {
            self.blink_timer = Duration::ZERO;
            self.cursor_on = !self.cursor_on;
            changed = true;
        }

        if self.session.stage == Stage::Intro {
            changed |= self.intro.advance(delta).changed();
        }
        for typewriter in [
            self.banner.as_mut(),
            self.generating.as_mut(),
            self.closing.as_mut(),
        ]
        .into_iter()
        .flatten()
        {
            changed |= typewriter.advance(delta).changed();
        }
        if let Some(reveal) = self.reveal.as_mut() {
            changed |= reveal.advance(delta);
        }

        changed
    }

    /// Reveal everything on screen at once
    pub fn skip(&mut self) {
        if self.session.stage == Stage::Intro {
            self.intro.finish();
        }
        for typewriter in [
            self.banner.as_mut(),
            self.generating.as_mut(),
            self.closing.as_mut(),
        ]
        .into_iter()
        .flatten()
        {
            typewriter.finish();
        }
        if let Some(reveal) = self.reveal.as_mut() {
            reveal.finish();
        }
    }

    /// Reveal notifications queued since the last call
    pub fn take_events(&mut self) -> Vec<FlowEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.events_rx.try_recv() {
            events.push(event);
        }
        events
    }

    // === Accessors for rendering ===

    /// Visible part of the intro banner
    pub fn intro_text(&self) -> &str {
        self.intro.visible()
    }

    /// Visible part of the config / confirmation banner
    pub fn banner_text(&self) -> &str {
        self.banner.as_ref().map_or("", Typewriter::visible)
    }

    /// Visible part of the generating indicator, if shown
    pub fn generating_text(&self) -> Option<&str> {
        self.generating.as_ref().map(Typewriter::visible)
    }

    /// Visible poem lines; the last may be partial
    pub fn poem_lines(&self) -> Vec<&str> {
        self.reveal
            .as_ref()
            .map(PoemReveal::visible_lines)
            .unwrap_or_default()
    }

    /// Visible part of the closing message
    pub fn closing_text(&self) -> &str {
        self.closing.as_ref().map_or("", Typewriter::visible)
    }
}

//! Integration Tests for TUI + Flow Controller
//!
//! These tests drive the surface pieces (FlowClient, DisplayState, key
//! mapping, media player) together, the way the App's frame loop does, but
//! without a real terminal. A mock completion backend stands in for the
//! remote endpoint.
//!
//! # Test Coverage
//!
//! 1. **Intro**: banner types out, Start appears, Start begins playback
//! 2. **Config**: volume commands and name entry
//! 3. **Poem**: remote poem, fallback poem, restart loop

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pretty_assertions::assert_eq;

use doomsday_core::{
    CompletionBackend, CompletionRequest, FetchError, FlowMessage, MediaPlayer, PoemSource,
    Session, SourceSettings, Stage, TerminalConfig,
};
use doomsday_tui::display::DisplayState;
use doomsday_tui::input::{map_key, map_paste, KeyAction};
use doomsday_tui::media::TerminalMedia;
use doomsday_tui::FlowClient;

// ============================================================================
// Mock Backend
// ============================================================================

struct IntegrationMockBackend {
    reply: Option<&'static str>,
    request_count: Arc<AtomicUsize>,
}

#[async_trait]
impl CompletionBackend for IntegrationMockBackend {
    fn name(&self) -> &str {
        "IntegrationMock"
    }

    async fn complete(&self, _request: &CompletionRequest) -> Result<String, FetchError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        self.reply
            .map(str::to_string)
            .ok_or(FetchError::Malformed("mock failure".to_string()))
    }
}

// ============================================================================
// Headless Surface
// ============================================================================

/// The App's frame loop without a terminal
struct HeadlessSurface {
    client: FlowClient<IntegrationMockBackend>,
    display: DisplayState,
    media: TerminalMedia,
    request_count: Arc<AtomicUsize>,
}

impl HeadlessSurface {
    async fn new(reply: Option<&'static str>) -> Self {
        let terminal = TerminalConfig {
            text_speed: Duration::from_millis(1),
            generating_speed: Duration::from_millis(1),
            initial_volume: 45,
        };
        let request_count = Arc::new(AtomicUsize::new(0));
        let backend = IntegrationMockBackend {
            reply,
            request_count: Arc::clone(&request_count),
        };
        let mut client = FlowClient::new(
            PoemSource::new(backend, SourceSettings::default()),
            Session::with_volume(terminal.initial_volume),
        );
        client.start().await;

        let mut surface = Self {
            client,
            display: DisplayState::new(&terminal),
            media: TerminalMedia::new(),
            request_count,
        };
        surface.process_messages();
        surface
    }

    fn process_messages(&mut self) {
        for msg in self.client.recv_all() {
            match msg {
                FlowMessage::Media(command) => self.media.apply(command),
                other => self.display.apply_message(other),
            }
        }
    }

    /// One frame: collect poem, apply messages, animate, forward reveals
    async fn frame(&mut self) {
        self.client.poll_generation().await.unwrap();
        self.process_messages();
        self.display.update(Duration::from_millis(5));
        for event in self.display.take_events() {
            self.client.send_event(event).await.unwrap();
        }
        self.process_messages();
        tokio::task::yield_now().await;
    }

    async fn frames(&mut self, n: usize) {
        for _ in 0..n {
            self.frame().await;
        }
    }

    async fn act(&mut self, action: KeyAction) {
        match action {
            KeyAction::Flow(event) => {
                self.client.send_event(event).await.unwrap();
                self.process_messages();
            }
            KeyAction::Skip => self.display.skip(),
            KeyAction::Ignore => {}
        }
    }

    async fn press(&mut self, code: KeyCode) {
        let action = map_key(self.client.session(), KeyEvent::new(code, KeyModifiers::NONE));
        self.act(action).await;
    }

    async fn type_line(&mut self, text: &str) {
        for c in text.chars() {
            self.press(KeyCode::Char(c)).await;
        }
        self.press(KeyCode::Enter).await;
    }

    fn stage(&self) -> Stage {
        self.display.session.stage
    }
}

const POEM: &str = "Ashes fall on Nova's name\nThe sky ignites in silent flame\nThe hymns are sung, the doors are sealed\nAnd nothing waits beyond the field";

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_intro_start_begins_playback() {
    let mut surface = HeadlessSurface::new(Some(POEM)).await;
    assert_eq!(surface.stage(), Stage::Intro);

    // Start does nothing until the banner is revealed
    surface.press(KeyCode::Enter).await;
    surface.frame().await;
    assert!(surface.display.session.start_visible);
    assert_eq!(surface.stage(), Stage::Intro);
    assert!(!surface.media.is_playing());

    surface.press(KeyCode::Enter).await;
    assert_eq!(surface.stage(), Stage::Config);
    assert!(surface.media.is_playing());
    assert_eq!(surface.media.volume(), 45);
}

#[tokio::test]
async fn test_volume_and_name_entry() {
    let mut surface = HeadlessSurface::new(Some(POEM)).await;
    surface.press(KeyCode::Enter).await;
    surface.frame().await;
    surface.press(KeyCode::Enter).await;

    surface.type_line("volume 80").await;
    assert_eq!(surface.display.session.volume, 80);
    assert_eq!(surface.media.volume(), 80);
    assert_eq!(surface.stage(), Stage::Config);

    surface.type_line("Novx").await;
    assert_eq!(surface.display.session.name, "Novx");
    assert_eq!(surface.stage(), Stage::Confirmation);

    surface.type_line("no").await;
    assert_eq!(surface.stage(), Stage::Config);

    surface.press(KeyCode::Char('N')).await;
    surface.press(KeyCode::Char('o')).await;
    surface.press(KeyCode::Char('x')).await;
    surface.press(KeyCode::Backspace).await;
    let action = map_paste(surface.client.session(), "va".to_string());
    surface.act(action).await;
    assert_eq!(surface.display.session.pending_input, "Nova");
    surface.press(KeyCode::Enter).await;

    assert_eq!(surface.stage(), Stage::Confirmation);
    assert_eq!(surface.display.session.name, "Nova");
}

#[tokio::test]
async fn test_full_round_with_remote_poem() {
    let mut surface = HeadlessSurface::new(Some(POEM)).await;
    surface.press(KeyCode::Enter).await;
    surface.frame().await;
    surface.press(KeyCode::Enter).await;
    surface.type_line("Nova").await;
    surface.type_line("y").await;

    assert_eq!(surface.stage(), Stage::Poem);
    assert!(surface.display.session.is_generating);

    surface.frames(200).await;

    assert!(!surface.display.session.is_generating);
    assert_eq!(surface.request_count.load(Ordering::SeqCst), 1);
    let expected: Vec<&str> = POEM.lines().collect();
    assert_eq!(surface.display.poem_lines(), expected);
    assert!(surface.display.session.restart_armed);

    // Any key loops back to config, keeping the volume
    surface.press(KeyCode::Char('x')).await;
    assert_eq!(surface.stage(), Stage::Config);
    assert!(surface.display.session.name.is_empty());
    assert!(surface.display.poem_lines().is_empty());
    assert!(surface.media.is_playing());
}

#[tokio::test]
async fn test_remote_failure_shows_fallback() {
    let mut surface = HeadlessSurface::new(None).await;
    surface.press(KeyCode::Enter).await;
    surface.frame().await;
    surface.press(KeyCode::Enter).await;
    surface.type_line("Nova").await;
    surface.type_line("YES").await;

    surface.frames(200).await;

    let session = &surface.display.session;
    assert_eq!(session.stage, Stage::Poem);
    assert!(!session.is_generating);
    assert!(session.poem.as_ref().unwrap().is_fallback());
}

#[tokio::test]
async fn test_escape_quits() {
    let mut surface = HeadlessSurface::new(Some(POEM)).await;
    surface.press(KeyCode::Esc).await;

    assert!(surface.display.quitting);
    assert!(surface.client.is_quitting());
}

#[tokio::test]
async fn test_request_quit_notifies_surface() {
    let mut surface = HeadlessSurface::new(Some(POEM)).await;
    surface.client.request_quit().await.unwrap();
    surface.process_messages();

    assert!(surface.display.quitting);
    assert!(surface.client.is_quitting());
}

//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, paste, frame tick)
//! - FlowClient for the stage machine
//! - DisplayState for typewriter animation
//! - TerminalMedia for background music state
//!
//! Each frame the App:
//! 1. Converts terminal events to FlowEvents (see [`crate::input`])
//! 2. Collects a finished poem request
//! 3. Applies FlowMessages to DisplayState and the media player
//! 4. Advances animations and forwards finished reveals
//! 5. Renders based on DisplayState

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use rand::Rng;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout, Margin, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, StatefulWidget};
use ratatui::{Frame, Terminal};
use unicode_width::UnicodeWidthChar;

use doomsday_core::script::START_LABEL;
use doomsday_core::{CompletionBackend, FlowMessage, MediaPlayer, Stage, TerminalConfig};

use crate::display::DisplayState;
use crate::flow_client::FlowClient;
use crate::input::{self, KeyAction};
use crate::media::TerminalMedia;
use crate::theme;
use crate::widgets::{TextBlock, TextBlockState, CURSOR};

/// ~30 FPS keeps 20 ms/char typing smooth
const FRAME_DURATION: Duration = Duration::from_millis(33);

/// Input line prompt
const PROMPT: &str = "> ";

/// Chance per frame that the visual panel glitches
const GLITCH_CHANCE: f64 = 0.04;

/// Visual panel art
const MUSHROOM_CLOUD: &[&str] = &[
    "      _.-^^---....,,--      ",
    "  _--                  --_  ",
    " <                        >)",
    " |                         | ",
    "  \\._                   _./ ",
    "     ```--. . , ; .--'''    ",
    "           | |   |          ",
    "        .-=||  | |=-.       ",
    "        `-=#$%&%$#=-'       ",
    "           | ;  :|          ",
    "  _____.,-#%&$@%#&#~,._____ ",
];

/// Main application state
pub struct App<B: CompletionBackend + 'static> {
    // === Core State ===
    /// Is the app still running?
    running: bool,

    // === Flow Integration ===
    /// Client for communicating with the embedded controller
    client: FlowClient<B>,
    /// Display state derived from FlowMessages
    display: DisplayState,
    /// Background music state
    media: TerminalMedia,

    // === Misc State ===
    /// Last frame time (for animations)
    last_frame: Instant,
    /// Row of the visual panel currently glitched
    glitch_row: Option<usize>,
    /// Something changed since the last draw
    needs_redraw: bool,
}

impl<B: CompletionBackend + 'static> App<B> {
    /// Create a new App instance
    pub fn new(client: FlowClient<B>, terminal: &TerminalConfig) -> Self {
        Self {
            running: true,
            client,
            display: DisplayState::new(terminal),
            media: TerminalMedia::new(),
            last_frame: Instant::now(),
            glitch_row: None,
            needs_redraw: true,
        }
    }

    /// Main event loop
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        // Create async event stream for non-blocking terminal events
        let mut event_stream = EventStream::new();

        // Publish the initial session and render it immediately
        self.client.start().await;
        self.process_flow_messages();
        self.render(terminal)?;

        while self.running {
            let frame_start = Instant::now();

            tokio::select! {
                biased;

                // Check for terminal events - highest priority
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event).await?,
                        Some(Err(e)) => tracing::warn!(error = %e, "Terminal event error"),
                        None => {
                            tracing::info!("Terminal event stream closed");
                            self.client.request_quit().await?;
                            self.process_flow_messages();
                        }
                    }
                }

                // Frame tick
                _ = tokio::time::sleep(Duration::from_millis(16)) => {}
            }

            // Collect a finished poem request
            self.client.poll_generation().await?;

            // Receive and process messages from the controller
            self.process_flow_messages();

            // Update animations and forward finished reveals
            self.update().await?;

            // Render only when something changed
            if self.needs_redraw {
                self.render(terminal)?;
                self.needs_redraw = false;
            }

            if self.display.quitting || self.client.is_quitting() {
                self.running = false;
            }

            // Frame rate limiting
            let elapsed = frame_start.elapsed();
            if elapsed < FRAME_DURATION {
                tokio::time::sleep(FRAME_DURATION - elapsed).await;
            }
        }

        Ok(())
    }

    /// Handle one terminal event
    async fn handle_event(&mut self, event: Event) -> anyhow::Result<()> {
        let action = match event {
            // Only handle Press events (not Release or Repeat)
            Event::Key(key) if key.kind == KeyEventKind::Press => self.map_key(key),
            Event::Paste(text) => input::map_paste(self.client.session(), text),
            Event::Resize(..) => {
                self.needs_redraw = true;
                KeyAction::Ignore
            }
            _ => KeyAction::Ignore,
        };
        self.dispatch(action).await
    }

    fn map_key(&self, key: KeyEvent) -> KeyAction {
        input::map_key(self.client.session(), key)
    }

    /// Carry out a key action
    async fn dispatch(&mut self, action: KeyAction) -> anyhow::Result<()> {
        match action {
            KeyAction::Flow(event) => {
                self.client.send_event(event).await?;
                self.process_flow_messages();
            }
            KeyAction::Skip => {
                self.display.skip();
                self.needs_redraw = true;
            }
            KeyAction::Ignore => {}
        }
        Ok(())
    }

    /// Process all pending messages from the controller
    fn process_flow_messages(&mut self) {
        for msg in self.client.recv_all() {
            self.needs_redraw = true;
            match msg {
                FlowMessage::Media(command) => self.media.apply(command),
                other => self.display.apply_message(other),
            }
        }
    }

    /// Update animations and state
    async fn update(&mut self) -> anyhow::Result<()> {
        let now = Instant::now();
        let delta = now - self.last_frame;
        self.last_frame = now;

        if self.display.update(delta) {
            self.needs_redraw = true;
        }

        let events = self.display.take_events();
        if !events.is_empty() {
            for event in events {
                self.client.send_event(event).await?;
            }
            self.process_flow_messages();
        }

        let mut rng = rand::thread_rng();
        let glitch_row = rng
            .gen_bool(GLITCH_CHANCE)
            .then(|| rng.gen_range(0..MUSHROOM_CLOUD.len()));
        if glitch_row != self.glitch_row {
            self.glitch_row = glitch_row;
            self.needs_redraw = true;
        }

        Ok(())
    }

    /// Render the UI
    fn render(&self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> anyhow::Result<()> {
        terminal.draw(|frame| self.draw(frame))?;
        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(theme::text_style()), area);

        let [terminal_area, visual_area] =
            Layout::horizontal([Constraint::Percentage(67), Constraint::Percentage(33)])
                .areas(area);

        let [content, status] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(terminal_area);
        let mut content = content.inner(Margin::new(2, 1));

        match self.display.session.stage {
            Stage::Intro => self.draw_intro(frame, &mut content),
            Stage::Config | Stage::Confirmation => self.draw_input_stage(frame, &mut content),
            Stage::Poem => self.draw_poem(frame, &mut content),
        }

        self.draw_status(frame, status);
        self.draw_visual(frame, visual_area);
    }

    fn draw_intro(&self, frame: &mut Frame, area: &mut Rect) {
        let session = &self.display.session;
        self.draw_text(frame, area, self.display.intro_text(), theme::text_style(), !session.start_visible);

        if session.start_visible {
            skip_lines(area, 1);
            let label = format!("[ {START_LABEL} ]");
            draw_line(frame, area, &label, theme::button_style());
            draw_line(frame, area, "press ENTER", theme::dim_style());
        }
    }

    fn draw_input_stage(&self, frame: &mut Frame, area: &mut Rect) {
        let session = &self.display.session;
        self.draw_text(frame, area, self.display.banner_text(), theme::text_style(), false);

        if let Some(error) = &session.error_message {
            skip_lines(area, 1);
            draw_line(frame, area, error, theme::error_style());
        }

        skip_lines(area, 1);
        self.draw_input(frame, area, &session.pending_input);
    }

    fn draw_poem(&self, frame: &mut Frame, area: &mut Rect) {
        if let Some(generating) = self.display.generating_text() {
            self.draw_text(frame, area, generating, theme::text_style(), true);
        } else {
            let lines = self.display.poem_lines();
            let last = lines.len().saturating_sub(1);
            for (i, line) in lines.iter().enumerate() {
                self.draw_text(frame, area, line, theme::text_style(), i == last);
            }
        }

        skip_lines(area, 2);
        self.draw_text(frame, area, self.display.closing_text(), theme::text_style(), true);
    }

    /// Draw a text block at the top of `area` and consume its height
    fn draw_text(&self, frame: &mut Frame, area: &mut Rect, text: &str, style: Style, cursor: bool) {
        if area.height == 0 {
            return;
        }

        let mut block = TextBlock::new(text).style(style);
        if cursor && self.display.cursor_on {
            block = block.cursor(theme::cursor_style());
        }

        let height = block.height(area.width).min(area.height);
        let target = Rect { height, ..*area };
        let mut state = TextBlockState::default();
        block.render(target, frame.buffer_mut(), &mut state);
        skip_lines(area, height);
    }

    /// Draw the prompt and input line, keeping its tail in view
    fn draw_input(&self, frame: &mut Frame, area: &mut Rect, input: &str) {
        if area.height == 0 {
            return;
        }

        let available = usize::from(area.width).saturating_sub(PROMPT.len() + 1);
        let mut width = 0;
        let mut start = input.len();
        for (i, c) in input.char_indices().rev() {
            width += c.width().unwrap_or(0);
            if width > available {
                break;
            }
            start = i;
        }

        let mut line = format!("{PROMPT}{}", &input[start..]);
        if self.display.cursor_on {
            line.push_str(CURSOR);
        }
        draw_line(frame, area, &line, theme::text_style());
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let music = self.media.label().unwrap_or_else(|| "♪ off".to_string());
        let status = format!(" {music} │ ESC to quit");
        frame
            .buffer_mut()
            .set_stringn(area.x, area.y, status, usize::from(area.width), theme::dim_style());
    }

    fn draw_visual(&self, frame: &mut Frame, area: Rect) {
        let top = art_top(area);

        for (i, row) in MUSHROOM_CLOUD.iter().enumerate() {
            let y = top.saturating_add(u16::try_from(i).unwrap_or(u16::MAX));
            if y >= area.bottom() {
                break;
            }

            let (shift, style) = if self.glitch_row == Some(i) {
                (2, Style::default().fg(theme::EMBER_RED))
            } else if i < 5 {
                (0, Style::default().fg(theme::EMBER_YELLOW))
            } else if i + 1 == MUSHROOM_CLOUD.len() {
                (0, Style::default().fg(theme::ASH_GRAY))
            } else {
                (0, Style::default().fg(theme::EMBER_RED))
            };

            let x = area.x + 1 + shift;
            if x < area.right() {
                let max_width = usize::from(area.right() - x);
                frame.buffer_mut().set_stringn(x, y, row, max_width, style);
            }
        }
    }
}

/// Draw one line at the top of `area` and consume it
fn draw_line(frame: &mut Frame, area: &mut Rect, text: &str, style: Style) {
    if area.height == 0 {
        return;
    }
    frame
        .buffer_mut()
        .set_stringn(area.x, area.y, text, usize::from(area.width), style);
    skip_lines(area, 1);
}

/// First row of the art, centred vertically in `area`
fn art_top(area: Rect) -> u16 {
    let art_height = u16::try_from(MUSHROOM_CLOUD.len()).unwrap_or(u16::MAX);
    area.y + area.height.saturating_sub(art_height) / 2
}

/// Drop `n` lines from the top of `area`
fn skip_lines(area: &mut Rect, n: u16) {
    let n = n.min(area.height);
    area.y += n;
    area.height -= n;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_lines_saturates() {
        let mut area = Rect::new(0, 0, 10, 3);
        skip_lines(&mut area, 2);
        assert_eq!(area, Rect::new(0, 2, 10, 1));
        skip_lines(&mut area, 5);
        assert_eq!(area.height, 0);
        assert_eq!(area.y, 3);
    }

    #[test]
    fn test_art_top_centres_and_clamps() {
        let tall = Rect::new(0, 4, 20, 31);
        assert_eq!(art_top(tall), 14);

        // Shorter than the art: start at the top and let rows clip
        let short = Rect::new(0, 4, 20, 3);
        assert_eq!(art_top(short), 4);
    }
}

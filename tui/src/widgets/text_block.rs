//! TextBlock Widget
//!
//! A borderless text region for typed terminal output. Keeps the newest
//! lines in view when the content outgrows the area, and can draw the block
//! cursor after the last character.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::StatefulWidget;
use textwrap::wrap;

/// Cursor glyph drawn after typed text
pub const CURSOR: &str = "▋";

/// State for a text block
#[derive(Debug, Default)]
pub struct TextBlockState {
    /// Scroll offset (lines from top)
    pub scroll_offset: usize,
    /// Total content lines
    pub total_lines: usize,
}

/// A borderless text block
pub struct TextBlock<'a> {
    content: &'a str,
    style: Style,
    cursor: Option<Style>,
}

impl<'a> TextBlock<'a> {
    /// Create a block over `content`
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            style: Style::default(),
            cursor: None,
        }
    }

    /// Set text style
    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Draw the block cursor after the text
    #[must_use]
    pub fn cursor(mut self, style: Style) -> Self {
        self.cursor = Some(style);
        self
    }

    /// Wrap content to `width` columns, one entry per screen line
    pub fn wrapped(&self, width: u16) -> Vec<String> {
        let width = usize::from(width.max(1));
        self.content
            .split('\n')
            .flat_map(|line| {
                if line.is_empty() {
                    vec![String::new()]
                } else {
                    wrap(line, width)
                        .into_iter()
                        .map(|cow| cow.to_string())
                        .collect()
                }
            })
            .collect()
    }

    /// Lines needed to show the whole block at `width`
    pub fn height(&self, width: u16) -> u16 {
        u16::try_from(self.wrapped(width).len()).unwrap_or(u16::MAX)
    }
}

impl StatefulWidget for TextBlock<'_> {
    type State = TextBlockState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let wrapped = self.wrapped(area.width);
        state.total_lines = wrapped.len();

        // Follow the newest line
        state.scroll_offset = state.total_lines.saturating_sub(usize::from(area.height));

        let mut end = (area.x, area.y);
        for (i, line) in wrapped
            .iter()
            .skip(state.scroll_offset)
            .take(usize::from(area.height))
            .enumerate()
        {
            let y = area.y.saturating_add(u16::try_from(i).unwrap_or(u16::MAX));
            end = buf.set_stringn(area.x, y, line, usize::from(area.width), self.style);
        }

        if let Some(cursor_style) = self.cursor {
            let (mut x, mut y) = end;
            if x >= area.right() {
                x = area.x;
                y = y.saturating_add(1);
            }
            if y < area.bottom() {
                buf.set_string(x, y, CURSOR, cursor_style);
            }
        }
    }
}

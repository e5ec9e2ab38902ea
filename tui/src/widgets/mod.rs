//! Widgets
//!
//! Terminal-specific ratatui widgets.

pub mod text_block;

pub use text_block::{TextBlock, TextBlockState, CURSOR};

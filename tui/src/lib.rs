//! Doomsday TUI - Terminal surface for the Doomsday Terminal
//!
//! This crate provides a full-screen terminal UI: burnt-orange phosphor text
//! typed out on the left, a mushroom cloud on the right.
//!
//! # Architecture
//!
//! - **FlowClient**: Embeds the headless flow controller from `doomsday-core`
//! - **Display**: Typewriter animation per text block
//! - **Input**: Key presses to flow events
//! - **Widgets**: Borderless text blocks with a block cursor

pub mod app;
pub mod display;
pub mod flow_client;
pub mod input;
pub mod media;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use flow_client::FlowClient;

//! Doomsday Core - Headless Engine for the Doomsday Terminal
//!
//! This crate holds everything the terminal does apart from drawing it: the
//! stage machine, the typewriter, poem generation and configuration. It can
//! drive the ratatui surface or run headless in tests.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Terminal Surface (tui)                    │
//! │   keys ──► FlowEvent            FlowMessage ──► draw / audio  │
//! └──────────────┬─────────────────────────▲─────────────────────┘
//!                │                         │
//! ┌──────────────┼─────────────────────────┼─────────────────────┐
//! │              ▼      DOOMSDAY CORE      │                     │
//! │  ┌───────────────────────────────────────────────────────┐   │
//! │  │                   FlowController                       │   │
//! │  │  ┌──────────┐  ┌──────────────┐  ┌──────────────────┐ │   │
//! │  │  │  flow::  │  │  PoemSource  │  │ CompletionBackend│ │   │
//! │  │  │  update  │  │  (fallbacks) │  │    (OpenAI)      │ │   │
//! │  │  └──────────┘  └──────────────┘  └──────────────────┘ │   │
//! │  └───────────────────────────────────────────────────────┘   │
//! │      Typewriter · PoemReveal · script · config               │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`FlowController`]: Owns the [`Session`] and carries out effects
//! - [`FlowEvent`]: Events sent from the surface to the controller
//! - [`FlowMessage`]: Messages sent from the controller to the surface
//! - [`Typewriter`]: Character-by-character text reveal
//! - [`PoemSource`]: Four-line prophecies with local fallback
//!
//! # Quick Start
//!
//! ```ignore
//! use doomsday_core::{
//!     load_config, FlowController, FlowEvent, OpenAiBackend, PoemSource, Session,
//! };
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = load_config()?;
//!     let backend = OpenAiBackend::new(&config.api.endpoint, None)?;
//!     let source = PoemSource::new(backend, config.source_settings());
//!
//!     let (tx, mut rx) = mpsc::channel(100);
//!     let mut controller = FlowController::new(source, Session::default(), tx);
//!     controller.publish().await;
//!
//!     loop {
//!         while let Ok(msg) = rx.try_recv() {
//!             // Render message
//!         }
//!         controller.poll_generation().await?;
//!         // Map input to FlowEvent and call controller.handle_event
//!     }
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`backend`]: Completion backend abstraction (OpenAI chat completions)
//! - [`config`]: TOML, environment and CLI configuration
//! - [`controller`]: The flow controller
//! - [`error`]: Poem fetch errors
//! - [`events`]: Events from the surface to the controller
//! - [`flow`]: Pure stage transitions
//! - [`media`]: Background music seam
//! - [`messages`]: Messages from the controller to the surface
//! - [`poem`]: Poem type, parsing and fallbacks
//! - [`reveal`]: Line-by-line poem reveal
//! - [`script`]: Terminal copy
//! - [`source`]: Poem generation with fallback
//! - [`typewriter`]: Character-by-character reveal
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod flow;
pub mod media;
pub mod messages;
pub mod poem;
pub mod reveal;
pub mod script;
pub mod source;
pub mod typewriter;

// Re-exports for convenience
pub use backend::{CompletionBackend, CompletionRequest, OpenAiBackend, DEFAULT_ENDPOINT};
pub use controller::FlowController;
pub use error::FetchError;
pub use events::FlowEvent;
pub use flow::{Effect, Session, Stage, Transition, DEFAULT_VOLUME, MAX_VOLUME};
pub use media::{MediaCommand, MediaPlayer};
pub use messages::FlowMessage;
pub use poem::{Poem, FALLBACK_POEMS, POEM_LINES};
pub use reveal::PoemReveal;
pub use source::{PoemSource, SourceSettings};
pub use typewriter::{Progress, Typewriter};

// Config exports
pub use config::{
    default_config_path, load_config, load_config_from_path, ApiConfig, ConfigError,
    ConfigOverrides, ConfigSource, DoomsdayConfig, DoomsdayToml, TerminalConfig,
};

//! Terminal Media Player
//!
//! The terminal has no audio output of its own. This player tracks what the
//! flow asked for so the status line can show it, and logs every change.

use doomsday_core::{MediaPlayer, MAX_VOLUME};

/// Background music state as requested by the flow
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TerminalMedia {
    playing: bool,
    volume: u8,
}

impl TerminalMedia {
    /// Create a stopped player
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether playback has started
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Current volume (0-100)
    pub fn volume(&self) -> u8 {
        self.volume
    }

    /// Status line label, if playing
    pub fn label(&self) -> Option<String> {
        self.playing.then(|| format!("♪ {}%", self.volume))
    }
}

impl MediaPlayer for TerminalMedia {
    fn start(&mut self, volume: u8) -> anyhow::Result<()> {
        anyhow::ensure!(volume <= MAX_VOLUME, "volume {volume} out of range");
        self.playing = true;
        self.volume = volume;
        tracing::info!(volume, "Background music started");
        Ok(())
    }

    fn set_volume(&mut self, volume: u8) -> anyhow::Result<()> {
        anyhow::ensure!(volume <= MAX_VOLUME, "volume {volume} out of range");
        self.volume = volume;
        tracing::info!(volume, playing = self.playing, "Background music volume changed");
        Ok(())
    }
}

//! Media Collaborator
//!
//! Background music is owned by whatever surface hosts the terminal. The
//! flow only signals when playback should start and what volume it should
//! use; failures on the media side are logged and never reach the flow.

use serde::{Deserialize, Serialize};

/// Media directives emitted by the controller
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaCommand {
    /// Begin looping background playback
    StartPlayback {
        /// Volume to start at (0-100)
        volume: u8,
    },
    /// Change playback volume (0-100)
    SetVolume(u8),
}

/// A background media player
pub trait MediaPlayer {
    /// Start looping playback at `volume`
    fn start(&mut self, volume: u8) -> anyhow::Result<()>;

    /// Change the playback volume
    fn set_volume(&mut self, volume: u8) -> anyhow::Result<()>;

    /// Carry out a command, logging any failure
    fn apply(&mut self, command: MediaCommand) {
        let result = match command {
            MediaCommand::StartPlayback { volume } => self.start(volume),
            MediaCommand::SetVolume(volume) => self.set_volume(volume),
        };

        if let Err(e) = result {
            tracing::warn!(?command, error = %e, "Media playback failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
        fail: bool,
    }

    impl MediaPlayer for Recorder {
        fn start(&mut self, volume: u8) -> anyhow::Result<()> {
            self.calls.push(format!("start {volume}"));
            if self.fail {
                anyhow::bail!("no audio device");
            }
            Ok(())
        }

        fn set_volume(&mut self, volume: u8) -> anyhow::Result<()> {
            self.calls.push(format!("volume {volume}"));
            Ok(())
        }
    }

    #[test]
    fn test_apply_dispatches_commands() {
        let mut player = Recorder::default();
        player.apply(MediaCommand::StartPlayback { volume: 45 });
        player.apply(MediaCommand::SetVolume(10));
        assert_eq!(player.calls, vec!["start 45", "volume 10"]);
    }

    #[test]
    fn test_apply_swallows_failures() {
        let mut player = Recorder {
            fail: true,
            ..Recorder::default()
        };
        player.apply(MediaCommand::StartPlayback { volume: 45 });
        player.apply(MediaCommand::SetVolume(50));
        assert_eq!(player.calls.len(), 2);
    }
}

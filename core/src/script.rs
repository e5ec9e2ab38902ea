//! Terminal script
//!
//! Fixed texts shown by the terminal and the prompts sent to the completion
//! endpoint.

/// Banner typed out on the intro screen
pub const INTRO_TEXT: &str = "DOOMSDAY TERMINAL v1.0

INITIALIZING...

CALIBRATING DOOM INDEXES...

SYNCING CULTIST HYMNS...";

/// Label of the intro Start control
pub const START_LABEL: &str = "START";

/// Shown while the poem request is in flight
pub const GENERATING_TEXT: &str = "GENERATING PROPHECY...";

/// Shown below the poem; once revealed, any key restarts
pub const CLOSING_TEXT: &str = "Your fate is sealed. [PRESS ANY KEY TO START AGAIN]";

/// Inline error for confirmation answers other than Y/N
pub const INVALID_CONFIRMATION: &str = "Invalid input. Please enter Y or N.";

/// System prompt for the completion endpoint
pub const SYSTEM_PROMPT: &str = "You are a cryptic oracle generating dark, prophetic poetry. \
Respond only with the requested lines, no additional text.";

/// Banner typed out on the config screen
pub fn config_text(volume: u8) -> String {
    format!(
        "Initializing Protocol: NUCLEAR_FALLOUT.exe...
Scanning for fallout shelters: COMPLETE.
Calibrating doom indexes: COMPLETE.
Predictive endgame analysis: LOADED.
Cultist Hymns: SYNCED.
Background music initialized at {volume}% volume.

[TYPE \"VOLUME X\" TO ADJUST BACKGROUND MUSIC (X = 0-100)]
[ENTER NAME TO REVEAL YOUR FATE]"
    )
}

/// Question asked on the confirmation screen
pub fn confirmation_text(name: &str) -> String {
    format!("Are you sure \"{name}\" is your name? (Y/N)")
}

/// User prompt asking for a poem woven around `name`
pub fn poem_prompt(name: &str) -> String {
    format!(
        "Generate 4 lines of dark, cryptic, apocalyptic poetry that incorporates the name \"{name}\".
The poetry should be mysterious and ominous, with themes of technology, doom, and cosmic horror.
Each line should be short (about 6-8 words).
Don't use the name directly, but weave its essence into the prophecy.
Format: Return only the 4 lines without any additional text."
    )
}

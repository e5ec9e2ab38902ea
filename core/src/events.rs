//! Flow Events
//!
//! Events sent from the terminal surface to the flow controller. The surface
//! reports what happened (a key, a finished reveal); the controller decides
//! what it means for the current stage.

use serde::{Deserialize, Serialize};

use crate::poem::Poem;

/// Events from the surface (and the poem task) to the controller
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowEvent {
    // ============================================
    // Reveal Events
    // ============================================
    /// The intro banner finished typing out
    IntroRevealed,

    /// The closing message finished typing out
    ClosingRevealed,

    // ============================================
    // User Input Events
    // ============================================
    /// User activated the Start control
    StartPressed,

    /// User typed a character into the input line
    Input(char),

    /// User pasted text into the input line
    Paste(String),

    /// User deleted the last character of the input line
    Backspace,

    /// User submitted the input line
    Submit,

    /// User pressed a key while no input line is shown
    AnyKey,

    /// User wants to leave the terminal
    Quit,

    // ============================================
    // Internal Events
    // ============================================
    /// A poem request settled
    PoemReady {
        /// Ticket of the request that produced this poem
        generation: u64,
        /// The poem (remote or fallback)
        poem: Poem,
    },
}

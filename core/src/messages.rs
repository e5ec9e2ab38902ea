//! Flow Messages
//!
//! Messages sent from the flow controller to the terminal surface. The
//! surface renders what it is told; it keeps no flow logic of its own.

use serde::{Deserialize, Serialize};

use crate::flow::Session;
use crate::media::MediaCommand;

/// Messages from the controller to the surface
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowMessage {
    /// The session changed; render this snapshot
    State {
        /// Full session after the transition
        session: Session,
    },

    /// Drive the background media collaborator
    Media(MediaCommand),

    /// The terminal is shutting down
    Quit,
}

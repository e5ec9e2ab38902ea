//! Flow Client
//!
//! Thin wrapper around the [`FlowController`] for TUI integration.
//! The controller is embedded directly and this client gives the app a
//! convenient interface for sending events and receiving messages.
//!
//! # Architecture
//!
//! The TUI is a "thin client" - it doesn't contain any flow logic.
//! The TUI's job is:
//! 1. Convert terminal events to FlowEvents
//! 2. Send FlowEvents to the controller
//! 3. Receive FlowMessages
//! 4. Render display state based on messages

use tokio::sync::mpsc;

use doomsday_core::{
    CompletionBackend, FlowController, FlowEvent, FlowMessage, PoemSource, Session,
};

/// Client for communicating with the embedded flow controller
pub struct FlowClient<B: CompletionBackend + 'static> {
    /// The embedded controller
    controller: FlowController<B>,
    /// Receiver for messages from the controller
    rx: mpsc::Receiver<FlowMessage>,
}

impl<B: CompletionBackend + 'static> FlowClient<B> {
    /// Create a client with an embedded controller
    pub fn new(source: PoemSource<B>, session: Session) -> Self {
        // Create channel for controller -> TUI messages
        let (tx, rx) = mpsc::channel(100);
        let controller = FlowController::new(source, session, tx);
        Self { controller, rx }
    }

    /// Publish the initial session so the surface can draw it
    pub async fn start(&mut self) {
        self.controller.publish().await;
    }

    /// Send raw flow event to the controller
    pub async fn send_event(&mut self, event: FlowEvent) -> anyhow::Result<()> {
        self.controller.handle_event(event).await
    }

    /// Notify the controller that user wants to quit
    pub async fn request_quit(&mut self) -> anyhow::Result<()> {
        self.send_event(FlowEvent::Quit).await
    }

    /// Collect a finished poem request (must be called regularly)
    pub async fn poll_generation(&mut self) -> anyhow::Result<bool> {
        self.controller.poll_generation().await
    }

    /// Receive all pending messages from the controller (non-blocking)
    pub fn recv_all(&mut self) -> Vec<FlowMessage> {
        let mut messages = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            messages.push(msg);
        }
        messages
    }

    /// Current session as seen by the controller
    pub fn session(&self) -> &Session {
        self.controller.session()
    }

    /// Whether the controller is shutting down
    pub fn is_quitting(&self) -> bool {
        self.controller.is_quitting()
    }
}

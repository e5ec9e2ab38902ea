//! Flow Controller - The Terminal's Orchestration Core
//!
//! The controller owns the [`Session`] and is the only thing that mutates
//! it. It is UI-agnostic and talks to its surface through two channels:
//! - [`FlowEvent`]: what the surface observed (keys, finished reveals)
//! - [`FlowMessage`]: what the surface should render or play
//!
//! Transitions come from [`flow::update`]; the controller carries out the
//! resulting [`Effect`]s. A poem request runs on a spawned task and is
//! collected by [`FlowController::poll_generation`] from the surface's event
//! loop, so the session is only ever touched from that loop.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::backend::CompletionBackend;
use crate::events::FlowEvent;
use crate::flow::{self, Effect, Session};
use crate::media::MediaCommand;
use crate::messages::FlowMessage;
use crate::poem::Poem;
use crate::source::PoemSource;

/// A poem request in flight
struct PendingPoem {
    generation: u64,
    handle: JoinHandle<Poem>,
}

/// The flow controller - headless stage machine driver
pub struct FlowController<B: CompletionBackend> {
    /// The single session instance
    session: Session,
    /// Where poems come from
    source: Arc<PoemSource<B>>,
    /// Channel to the surface
    tx: mpsc::Sender<FlowMessage>,
    /// Current poem request, if any
    pending: Option<PendingPoem>,
    /// Quit was requested
    quitting: bool,
}

impl<B: CompletionBackend + 'static> FlowController<B> {
    /// Create a new controller with a fresh session
    pub fn new(source: PoemSource<B>, session: Session, tx: mpsc::Sender<FlowMessage>) -> Self {
        Self {
            session,
            source: Arc::new(source),
            tx,
            pending: None,
            quitting: false,
        }
    }

    /// Current session
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Whether a poem request is in flight
    pub fn has_pending_poem(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether quit has been requested
    pub fn is_quitting(&self) -> bool {
        self.quitting
    }

    /// Send the current session to the surface
    pub async fn publish(&self) {
        self.send(FlowMessage::State {
            session: self.session.clone(),
        })
        .await;
    }

    /// Handle an event from the surface
    pub async fn handle_event(&mut self, event: FlowEvent) -> anyhow::Result<()> {
        let transition = flow::update(&self.session, &event);
        let changed = transition.session != self.session;
        self.session = transition.session;

        if changed {
            tracing::trace!(stage = ?self.session.stage, ?event, "Session updated");
            if !self.session.is_generating {
                self.cancel_pending();
            }
            self.publish().await;
        }

        for effect in transition.effects {
            self.apply(effect).await?;
        }

        Ok(())
    }

    /// Collect a finished poem request, if any.
    ///
    /// Call this regularly from the event loop. Returns true if a poem
    /// was delivered.
    pub async fn poll_generation(&mut self) -> anyhow::Result<bool> {
        let finished = self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.handle.is_finished());
        if !finished {
            return Ok(false);
        }

        self.settle_generation().await
    }

    /// Wait for the current poem request to settle and deliver it
    pub async fn settle_generation(&mut self) -> anyhow::Result<bool> {
        let Some(pending) = self.pending.take() else {
            return Ok(false);
        };

        let poem = match pending.handle.await {
            Ok(poem) => poem,
            Err(e) => {
                tracing::error!(error = %e, "Poem task failed, using first fallback poem");
                Poem::first_fallback()
            }
        };

        self.handle_event(FlowEvent::PoemReady {
            generation: pending.generation,
            poem,
        })
        .await?;
        Ok(true)
    }

    /// Carry out one effect
    async fn apply(&mut self, effect: Effect) -> anyhow::Result<()> {
        match effect {
            Effect::StartPlayback { volume } => {
                self.send(FlowMessage::Media(MediaCommand::StartPlayback { volume }))
                    .await;
            }
            Effect::SetVolume(volume) => {
                self.send(FlowMessage::Media(MediaCommand::SetVolume(volume)))
                    .await;
            }
            Effect::RequestPoem { generation, name } => {
                self.cancel_pending();
                tracing::info!(generation, "Requesting poem");

                let source = Arc::clone(&self.source);
                let handle = tokio::spawn(async move { source.generate(&name).await });
                self.pending = Some(PendingPoem { generation, handle });
            }
            Effect::Quit => {
                self.quitting = true;
                self.cancel_pending();
                self.send(FlowMessage::Quit).await;
            }
        }
        Ok(())
    }

    /// Abort a poem request nobody is waiting for anymore
    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            tracing::debug!(generation = pending.generation, "Cancelling poem request");
            pending.handle.abort();
        }
    }

    /// Send a message to the surface
    async fn send(&self, msg: FlowMessage) {
        if let Err(e) = self.tx.send(msg).await {
            tracing::warn!("Surface channel closed: {}", e);
        }
    }
}

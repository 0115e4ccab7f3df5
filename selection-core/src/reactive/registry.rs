//! Listener Registry
//!
//! The registry is the observing side's single coordinator for the shared
//! selection stream. Any number of listeners can subscribe, but only one
//! resolution stream exists.
//!
//! # Lifecycle
//!
//! 1. Created empty. Nothing is registered with the resolving side.
//!
//! 2. The first subscribe (0 → 1) records that subscriber's options as the
//!    active options and sends one `RegisterForSelectionChange` request.
//!    The resolving side answers with a pass right away.
//!
//! 3. Later subscribes only join the list. Their options are ignored; if they
//!    differ from the active ones a warning is logged.
//!
//! 4. The last unsubscribe (1 → 0) sends one `DeregisterForSelectionChange`
//!    and forgets the active options.
//!
//! Subscribes and unsubscribes while the count stays positive never reach
//! the resolving side. The 0 ↔ 1 transitions are the only synchronization
//! points of the whole system.
//!
//! # Threading
//!
//! The state sits behind a mutex so one registry can be shared. Callbacks
//! run outside the lock, so a listener may unsubscribe from inside its own
//! callback.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::listener::{Listener, ListenerId, SelectionEvent};
use crate::graph::BareNode;
use crate::resolve::ResolverOptions;
use crate::transport::{decode, PluginRequest, Port, TransportError, UiMessage};

#[derive(Debug, Default)]
struct RegistryState {
    listeners: Vec<Listener>,
    active_options: Option<ResolverOptions>,
}

/// The observing side's subscriber list.
#[derive(Debug)]
pub struct ListenerRegistry {
    state: Mutex<RegistryState>,
    requests: Port,
}

impl ListenerRegistry {
    /// Create an empty registry that sends requests through `requests`.
    pub fn new(requests: Port) -> Self {
        Self {
            state: Mutex::new(RegistryState::default()),
            requests,
        }
    }

    /// Add a listener.
    ///
    /// The first listener's `options` become the active options and trigger
    /// registration with the resolving side. A listener that is already
    /// subscribed is left alone.
    pub fn subscribe(&self, listener: Listener, options: ResolverOptions) -> Result<(), TransportError> {
        let mut state = self.state.lock();

        if state.listeners.iter().any(|existing| existing.id() == listener.id()) {
            debug!(listener = %listener.id(), "listener already subscribed");
            return Ok(());
        }

        if !state.listeners.is_empty() {
            if state.active_options.as_ref() != Some(&options) {
                warn!(
                    listener = %listener.id(),
                    "options differ from the first subscriber's and will be ignored"
                );
            }
            state.listeners.push(listener);
            return Ok(());
        }

        self.requests
            .send(&PluginRequest::RegisterForSelectionChange(options.clone()))?;
        info!(listener = %listener.id(), "registered for selection changes");
        state.active_options = Some(options);
        state.listeners.push(listener);
        Ok(())
    }

    /// Remove a listener by ID.
    ///
    /// Returns whether the listener was subscribed. Removing the last
    /// listener deregisters from the resolving side.
    pub fn unsubscribe(&self, id: ListenerId) -> Result<bool, TransportError> {
        let mut state = self.state.lock();

        let before = state.listeners.len();
        state.listeners.retain(|listener| listener.id() != id);
        if state.listeners.len() == before {
            return Ok(false);
        }

        if state.listeners.is_empty() {
            state.active_options = None;
            self.requests.send(&PluginRequest::DeregisterForSelectionChange)?;
            info!("deregistered from selection changes");
        }
        Ok(true)
    }

    /// Deliver an event to every current listener, in subscription order.
    pub fn broadcast(&self, event: &SelectionEvent) {
        let listeners = self.state.lock().listeners.clone();
        for listener in &listeners {
            listener.notify(event);
        }
    }

    /// Ask the resolving side to replace the host selection.
    pub fn set_selection(&self, nodes: Vec<BareNode>) -> Result<(), TransportError> {
        self.requests.send(&PluginRequest::SetSelection(nodes))
    }

    /// Handle one inbound frame from the resolving side.
    pub fn dispatch(&self, frame: &[u8]) -> Result<(), TransportError> {
        let event = match decode::<UiMessage>(frame)? {
            UiMessage::SelectionChangeStart => SelectionEvent::Started,
            UiMessage::SelectionChangeFinish(nodes) => SelectionEvent::Finished(Arc::new(nodes)),
        };
        self.broadcast(&event);
        Ok(())
    }

    /// The options in effect, if anyone is subscribed.
    pub fn active_options(&self) -> Option<ResolverOptions> {
        self.state.lock().active_options.clone()
    }

    /// Number of subscribed listeners.
    pub fn len(&self) -> usize {
        self.state.lock().listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().listeners.is_empty()
    }

    /// Dispatch inbound frames until the resolving side goes away.
    pub async fn run(self: Arc<Self>, mut inbound: mpsc::UnboundedReceiver<Vec<u8>>) {
        while let Some(frame) = inbound.recv().await {
            if let Err(err) = self.dispatch(&frame) {
                error!(error = %err, "dropping inbound frame");
            }
        }
        debug!("inbound channel closed");
    }
}

//! Selection Service
//!
//! The resolving side of the boundary. It owns the host graph, listens to the
//! host's event streams while at least one observer is registered, and
//! answers every relevant event with a resolution pass:
//!
//! ```text
//! SelectionChangeStart  →  resolve_selection(...)  →  SelectionChangeFinish(nodes)
//! ```
//!
//! # Design Decisions
//!
//! - Options are fixed by the first registration. A second registration
//!   while listening keeps them and only triggers a fresh pass.
//! - Node-change events are gated by the change detector, so edits outside
//!   the selection never cause a pass.
//! - A failed pass is logged and produces no finish message. Observers keep
//!   whatever snapshot they had.

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::changes::changes_apply_to_selection;
use crate::graph::{BareNode, HostEvent, HostEventKind, NodeChangeEvent, PageId, SceneGraph};
use crate::resolve::{resolve_selection, ResolverOptions};
use crate::transport::{decode, PluginRequest, Port, TransportError, UiMessage};

/// Resolves the host selection on behalf of the observing side.
#[derive(Debug)]
pub struct SelectionService<G> {
    graph: G,
    outbound: Port,
    options: ResolverOptions,
    /// The page whose node-change stream is subscribed, while listening.
    watched_page: Option<PageId>,
}

impl<G: SceneGraph> SelectionService<G> {
    /// Create an idle service. Nothing is subscribed until a registration
    /// request arrives.
    pub fn new(graph: G, outbound: Port) -> Self {
        Self {
            graph,
            outbound,
            options: ResolverOptions::default(),
            watched_page: None,
        }
    }

    pub fn graph(&self) -> &G {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut G {
        &mut self.graph
    }

    pub fn into_graph(self) -> G {
        self.graph
    }

    /// Whether the service is subscribed to the host's event streams.
    pub fn is_listening(&self) -> bool {
        self.watched_page.is_some()
    }

    /// The options used for every pass.
    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Decode and handle one request frame.
    pub fn handle_frame(&mut self, frame: &[u8]) -> Result<(), TransportError> {
        let request = decode::<PluginRequest>(frame)?;
        self.handle_request(request)
    }

    pub fn handle_request(&mut self, request: PluginRequest) -> Result<(), TransportError> {
        match request {
            PluginRequest::RegisterForSelectionChange(options) => {
                self.register(options);
                self.refresh()?;
            }
            PluginRequest::DeregisterForSelectionChange => self.deregister(),
            PluginRequest::SetSelection(nodes) => self.set_selection(&nodes),
        }
        Ok(())
    }

    /// React to one host event. Events are ignored while not listening.
    pub fn handle_host_event(&mut self, event: HostEvent) -> Result<(), TransportError> {
        if !self.is_listening() {
            debug!(?event, "not listening, ignoring host event");
            return Ok(());
        }

        match event {
            HostEvent::SelectionChanged => {
                self.refresh()?;
            }
            HostEvent::NodesChanged(changes) => {
                if self.touches_selection(&changes) {
                    self.refresh()?;
                }
            }
            HostEvent::CurrentPageChanged => self.follow_current_page(),
            HostEvent::Close => self.deregister(),
        }
        Ok(())
    }

    /// Run one resolution pass and send both phases.
    ///
    /// Returns whether a snapshot was sent. A resolution failure is not an
    /// error here: it is logged and the finish message is withheld.
    pub fn refresh(&mut self) -> Result<bool, TransportError> {
        self.outbound.send(&UiMessage::SelectionChangeStart)?;

        match resolve_selection(&self.graph, &self.options) {
            Ok(nodes) => {
                debug!(nodes = nodes.len(), "sending selection snapshot");
                self.outbound.send(&UiMessage::SelectionChangeFinish(nodes))?;
                Ok(true)
            }
            Err(err) => {
                error!(error = %err, "selection resolution failed");
                Ok(false)
            }
        }
    }

    /// Serve requests and host events until either channel closes or the
    /// host signals close. Gives the graph back.
    pub async fn run(
        mut self,
        mut requests: mpsc::UnboundedReceiver<Vec<u8>>,
        mut host_events: mpsc::UnboundedReceiver<HostEvent>,
    ) -> G {
        loop {
            tokio::select! {
                frame = requests.recv() => {
                    let Some(frame) = frame else { break };
                    if let Err(err) = self.handle_frame(&frame) {
                        error!(error = %err, "failed to handle request");
                    }
                }
                event = host_events.recv() => {
                    let Some(event) = event else { break };
                    let closing = event == HostEvent::Close;
                    if let Err(err) = self.handle_host_event(event) {
                        error!(error = %err, "failed to handle host event");
                    }
                    if closing {
                        break;
                    }
                }
            }
        }
        self.teardown();
        debug!("selection service stopped");
        self.graph
    }

    fn register(&mut self, options: ResolverOptions) {
        if self.is_listening() {
            if options != self.options {
                warn!("already registered, keeping the active options");
            }
            return;
        }

        let page = self.graph.current_page();
        self.graph.subscribe(HostEventKind::SelectionChange);
        self.graph.subscribe(HostEventKind::NodeChange { page: page.clone() });
        info!(%page, "listening for selection changes");
        self.options = options;
        self.watched_page = Some(page);
    }

    fn deregister(&mut self) {
        if self.teardown() {
            info!("stopped listening for selection changes");
        }
    }

    fn teardown(&mut self) -> bool {
        let Some(page) = self.watched_page.take() else {
            return false;
        };
        self.graph.unsubscribe(HostEventKind::SelectionChange);
        self.graph.unsubscribe(HostEventKind::NodeChange { page });
        true
    }

    fn set_selection(&mut self, nodes: &[BareNode]) {
        debug!(count = nodes.len(), "replacing host selection");
        self.graph.set_selection(nodes);
    }

    fn touches_selection(&self, changes: &NodeChangeEvent) -> bool {
        let selection = self.graph.selection();
        !selection.is_empty() && changes_apply_to_selection(changes, &selection)
    }

    fn follow_current_page(&mut self) {
        let page = self.graph.current_page();
        let Some(watched) = self.watched_page.as_mut() else {
            return;
        };
        if *watched == page {
            return;
        }
        let previous = std::mem::replace(watched, page.clone());
        self.graph.unsubscribe(HostEventKind::NodeChange { page: previous });
        self.graph.subscribe(HostEventKind::NodeChange { page });
    }
}

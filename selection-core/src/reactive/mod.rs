//! Selection Stream
//!
//! This module connects the resolver to its observers. Two halves talk over
//! the transport:
//!
//! ## Resolving side
//!
//! [`SelectionService`] owns the host graph. While registered it listens to
//! selection and mutation events, filters mutations through
//! [`changes_apply_to_selection`], and answers with a start message followed
//! by the resolved snapshot.
//!
//! ## Observing side
//!
//! [`ListenerRegistry`] keeps the list of [`Listener`]s. Only the first
//! subscriber's options are sent across, and only the 0 ↔ 1 transitions of
//! the subscriber count produce requests. Inbound messages are fanned out to
//! every listener as [`SelectionEvent`]s.

mod changes;
mod listener;
mod registry;
mod service;

pub use changes::{changes_apply_to_selection, MAX_CHANGE_DEPTH};
pub use listener::{Listener, ListenerId, SelectionEvent};
pub use registry::ListenerRegistry;
pub use service::SelectionService;

//! Privilege Boundary
//!
//! The resolving side and the observing side share no memory. Everything
//! that crosses between them is one of the messages defined here, encoded as
//! a MessagePack frame and pushed through a [`Port`].
//!
//! # Messages
//!
//! Observing side → resolving side ([`PluginRequest`]):
//!
//! - `RegisterForSelectionChange(options)` on the first subscriber
//! - `DeregisterForSelectionChange` after the last subscriber leaves
//! - `SetSelection(nodes)` to replace the host selection
//!
//! Resolving side → observing side ([`UiMessage`]):
//!
//! - `SelectionChangeStart` before a resolution pass
//! - `SelectionChangeFinish(snapshot)` after a successful pass
//!
//! Delivery is FIFO per direction; nothing else is guaranteed.

mod port;
mod protocol;

pub use port::{channel, decode, encode, Port, TransportError};
pub use protocol::{PluginRequest, UiMessage};

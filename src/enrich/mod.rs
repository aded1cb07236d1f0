//! Downstream enrichment: turning feed events into identity reports.

mod dispatch;
mod identity;
mod session;

pub use dispatch::{DispatchConfig, Dispatcher};
pub use identity::gather_identifiers;
pub use session::SessionStore;

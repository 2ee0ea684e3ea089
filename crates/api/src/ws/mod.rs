//! Live checklist over WebSocket.
//!
//! Connection bookkeeping and heartbeat live in [`manager`]; each connection
//! runs one [`session`] that owns a checklist reconciler.

mod handler;
mod heartbeat;
pub mod manager;
pub mod session;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use manager::WsManager;

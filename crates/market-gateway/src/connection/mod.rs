//! Connection management

mod connection;
mod debounce;
mod manager;

pub use connection::{Connection, ConnectionState, Outbound, FRAME_WINDOW, MAX_FRAMES_PER_WINDOW};
pub use debounce::{ReadDebouncer, MARK_READ_DEBOUNCE};
pub use manager::{ConnectionManager, Released};

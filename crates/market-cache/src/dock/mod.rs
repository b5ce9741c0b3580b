//! Per-user dock layout storage

mod dock_store;

pub use dock_store::{DockStore, DOCK_KEY_PREFIX, DOCK_TTL_SECS};
